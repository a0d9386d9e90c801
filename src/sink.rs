// Flacook -- Raw PCM extraction from FLAC streams
// Copyright 2026 The Flacook Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The `sink` module contains the consumers of interleaved sample blocks.
//!
//! All side effects of a decode run happen in a sink: writing bytes, updating
//! a digest, or pushing audio to a device. Every sink owns its own output, so
//! several conversions can run side by side without sharing state.

use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;

use md5::{Digest, Md5};

use crate::device::AudioDevice;
use crate::metadata::Format;

/// Consumes interleaved sample blocks.
///
/// `consume` is called once per decoded frame with the stream format and the
/// interleaved, normalized samples of that frame. The block is only borrowed
/// for the duration of the call. An error aborts the decode run.
pub trait Sink {
    /// Consumes one interleaved block.
    fn consume(&mut self, format: &Format, samples: &[i32]) -> io::Result<()>;
}

impl<F> Sink for F where F: FnMut(&Format, &[i32]) -> io::Result<()> {
    fn consume(&mut self, format: &Format, samples: &[i32]) -> io::Result<()> {
        self(format, samples)
    }
}

/// Writes headerless little-endian signed PCM.
///
/// Every sample is packed to `bits / 8` bytes; channels stay interleaved.
pub struct RawWriter<W: io::Write> {
    writer: io::BufWriter<W>,
    /// Packed bytes of the current block.
    bytes: Vec<u8>,
    written: u64,
}

impl RawWriter<fs::File> {
    /// Creates a new raw file, failing if the path already exists.
    ///
    /// An existing file is never truncated or otherwise modified; the error
    /// has kind `io::ErrorKind::AlreadyExists`.
    pub fn create_new<P: AsRef<Path>>(path: P) -> io::Result<RawWriter<fs::File>> {
        let file = fs::OpenOptions::new().write(true).create_new(true).open(path)?;
        Ok(RawWriter::new(file))
    }
}

impl<W: io::Write> RawWriter<W> {
    /// Wraps a writer in a buffered raw PCM writer.
    pub fn new(writer: W) -> RawWriter<W> {
        RawWriter {
            writer: io::BufWriter::new(writer),
            bytes: Vec::new(),
            written: 0,
        }
    }

    /// Returns the number of bytes handed to the writer so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Flushes buffered output and returns the inner writer.
    ///
    /// Call this once, after the decode run completed successfully.
    pub fn finish(self) -> io::Result<W> {
        self.writer.into_inner().map_err(io::Error::from)
    }
}

impl<W: io::Write> Sink for RawWriter<W> {
    fn consume(&mut self, format: &Format, samples: &[i32]) -> io::Result<()> {
        self.bytes.clear();
        format.depth.pack_into(samples, &mut self.bytes);
        self.writer.write_all(&self.bytes)?;
        self.written += self.bytes.len() as u64;
        Ok(())
    }
}

/// Feeds the raw PCM byte stream into a cryptographic digest.
///
/// The bytes are exactly those that `RawWriter` would write, so the digest of
/// a run can be compared with a digest of a reference decoder's raw output,
/// or, for MD5, with the signature in the STREAMINFO block.
pub struct DigestSink<D: Digest> {
    digest: D,
    /// Packed bytes of the current block.
    bytes: Vec<u8>,
}

/// A `DigestSink` computing MD5, the digest used by FLAC itself.
pub type Md5Sink = DigestSink<Md5>;

impl<D: Digest> DigestSink<D> {
    /// Creates a sink with a fresh digest state.
    pub fn new() -> DigestSink<D> {
        DigestSink {
            digest: D::new(),
            bytes: Vec::new(),
        }
    }

    /// Returns the digest of all bytes consumed so far.
    pub fn finish(self) -> Vec<u8> {
        self.digest.finalize().to_vec()
    }

    /// Returns the digest as lowercase hexadecimal.
    pub fn finish_hex(self) -> String {
        hex::encode(self.finish())
    }
}

impl<D: Digest> Default for DigestSink<D> {
    fn default() -> DigestSink<D> {
        DigestSink::new()
    }
}

impl<D: Digest> Sink for DigestSink<D> {
    fn consume(&mut self, format: &Format, samples: &[i32]) -> io::Result<()> {
        self.bytes.clear();
        format.depth.pack_into(samples, &mut self.bytes);
        self.digest.update(&self.bytes);
        Ok(())
    }
}

/// Pumps blocks into an audio device, one block per write.
///
/// The device write blocks until the device accepted the whole block, which
/// holds back the decode loop: no frame is decoded ahead of playback.
pub struct DevicePump<D: AudioDevice> {
    device: D,
}

impl<D: AudioDevice> DevicePump<D> {
    /// Creates a pump that writes to the given device.
    pub fn new(device: D) -> DevicePump<D> {
        DevicePump { device: device }
    }

    /// Returns a mutable reference to the device.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Waits for the device to play everything written, and returns it.
    pub fn finish(mut self) -> io::Result<D> {
        self.device.drain()?;
        Ok(self.device)
    }
}

impl<D: AudioDevice> Sink for DevicePump<D> {
    fn consume(&mut self, format: &Format, samples: &[i32]) -> io::Result<()> {
        self.device.write_block(format, samples)
    }
}

#[cfg(test)]
fn stereo(depth: crate::sample::BitDepth) -> Format {
    Format {
        channels: 2,
        depth: depth,
        sample_rate: 44_100,
    }
}

#[test]
fn verify_raw_writer_packs_little_endian() {
    use crate::sample::BitDepth;
    let mut writer = RawWriter::new(Vec::new());
    let f16 = stereo(BitDepth::Sixteen);
    writer.consume(&f16, &[0x0102 << 16, -2 << 16]).unwrap();
    writer.consume(&f16, &[0x7fff << 16, 0]).unwrap();
    assert_eq!(writer.bytes_written(), 8);

    let out = writer.finish().unwrap();
    assert_eq!(out, vec![0x02, 0x01, 0xfe, 0xff, 0xff, 0x7f, 0x00, 0x00]);
}

#[test]
fn verify_raw_writer_uses_three_bytes_for_24_bit() {
    use crate::sample::BitDepth;
    let mut writer = RawWriter::new(Vec::new());
    writer.consume(&stereo(BitDepth::TwentyFour), &[0x0a0b0c << 8, -1 << 8]).unwrap();
    let out = writer.finish().unwrap();
    assert_eq!(out, vec![0x0c, 0x0b, 0x0a, 0xff, 0xff, 0xff]);
}

#[test]
fn verify_raw_writer_refuses_existing_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"precious").unwrap();
    file.flush().unwrap();

    match RawWriter::create_new(file.path()) {
        Err(err) => assert_eq!(err.kind(), io::ErrorKind::AlreadyExists),
        Ok(..) => panic!("existing file must not be opened for writing"),
    }
    assert_eq!(fs::read(file.path()).unwrap(), b"precious");
}

#[test]
fn verify_md5_sink_hashes_packed_bytes() {
    use crate::sample::BitDepth;
    let mut sink = Md5Sink::new();
    sink.consume(&stereo(BitDepth::Eight), &[1 << 24, 2 << 24]).unwrap();
    sink.consume(&stereo(BitDepth::Eight), &[3 << 24]).unwrap();
    // md5 of the bytes 01 02 03.
    assert_eq!(sink.finish_hex(), "5289df737df57326fcdd22597afb1fac");
}

#[test]
fn verify_md5_sink_of_nothing_is_md5_of_empty_input() {
    assert_eq!(Md5Sink::new().finish_hex(), "d41d8cd98f00b204e9800998ecf8427e");
}

#[cfg(test)]
#[derive(Default)]
struct RecordingDevice {
    blocks: Vec<Vec<i32>>,
    drained: bool,
}

#[cfg(test)]
impl AudioDevice for RecordingDevice {
    fn write_block(&mut self, format: &Format, samples: &[i32]) -> io::Result<()> {
        assert_eq!(format.channels, 2);
        self.blocks.push(samples.to_vec());
        Ok(())
    }

    fn drain(&mut self) -> io::Result<()> {
        self.drained = true;
        Ok(())
    }
}

#[test]
fn verify_device_pump_forwards_whole_blocks() {
    let mut pump = DevicePump::new(RecordingDevice::default());
    let f = stereo(crate::sample::BitDepth::Sixteen);
    pump.consume(&f, &[1, 2, 3, 4]).unwrap();
    pump.consume(&f, &[5, 6]).unwrap();
    assert_eq!(pump.device_mut().blocks.len(), 2);

    let device = pump.finish().unwrap();
    assert!(device.drained);
    assert_eq!(device.blocks, vec![vec![1, 2, 3, 4], vec![5, 6]]);
}
