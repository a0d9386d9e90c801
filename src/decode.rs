// Flacook -- Raw PCM extraction from FLAC streams
// Copyright 2026 The Flacook Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The `decode` module contains the frame-by-frame decode loop.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};
use crate::frame::{Frame, Interleaver};
use crate::metadata::{Format, StreamInfo};
use crate::sink::Sink;
use crate::stream::{FlacSource, FrameSource};

/// Drives decoding of one stream, pushing interleaved blocks into a sink.
///
/// A decoder only exists for a stream that was opened successfully and has a
/// supported bit depth; the interleaver is bound at that point. Running the
/// decoder consumes it, so the stream is released when the run ends, whether
/// it finished or failed.
pub struct Decoder<S: FrameSource> {
    source: S,
    streaminfo: StreamInfo,
    format: Format,
    interleaver: Interleaver,
    /// Scratch space for the interleaved form of the current frame.
    buffer: Vec<i32>,
}

/// What a completed run delivered to its sink.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// The number of blocks passed to the sink.
    pub frames: u64,
    /// The number of inter-channel samples passed to the sink.
    pub samples: u64,
}

impl Decoder<FlacSource<fs::File>> {
    /// Opens the FLAC file at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Decoder<FlacSource<fs::File>>> {
        Decoder::from_source(FlacSource::open(path)?)
    }
}

impl<R: io::Read> Decoder<FlacSource<R>> {
    /// Opens a FLAC stream read from the given input.
    pub fn new(input: R) -> Result<Decoder<FlacSource<R>>> {
        Decoder::from_source(FlacSource::new(input)?)
    }
}

impl<S: FrameSource> Decoder<S> {
    /// Wraps an open source, binding the interleaver for its bit depth.
    ///
    /// Fails with `Error::UnsupportedBitDepth` before any frame is read if the
    /// stream declares a bit depth other than 8, 16, or 24.
    pub fn from_source(source: S) -> Result<Decoder<S>> {
        let streaminfo = source.streaminfo();
        let format = Format::from_streaminfo(&streaminfo)?;

        log::debug!("opened stream: {}, {} samples",
                    format,
                    streaminfo.samples.map_or("unknown".to_string(), |n| n.to_string()));

        Ok(Decoder {
            source: source,
            streaminfo: streaminfo,
            format: format,
            interleaver: Interleaver::new(format.depth),
            buffer: Vec::new(),
        })
    }

    /// Returns the stream metadata.
    pub fn streaminfo(&self) -> &StreamInfo {
        &self.streaminfo
    }

    /// Returns the validated format that the sink will receive.
    pub fn format(&self) -> &Format {
        &self.format
    }

    /// Decodes the stream to the end, passing every interleaved block to `sink`.
    ///
    /// Frames are pulled one at a time; the sink has consumed a block before
    /// the next frame is decoded, and the block is not retained afterwards.
    /// The run stops at the first error: a decode error is returned as
    /// `Error::Decode`, a sink error as `Error::Io`. Nothing is retried. A
    /// frame whose channel count differs from STREAMINFO is a decode error.
    pub fn run<C: Sink + ?Sized>(mut self, sink: &mut C) -> Result<Summary> {
        let mut summary = Summary::default();

        loop {
            let frame = match self.source.read_next()? {
                Some(frame) => frame,
                None => break,
            };

            // Claxon sizes a block from the frame header alone.
            if frame.channel_count() as u32 != self.format.channels {
                log::debug!("frame {} has {} channels, STREAMINFO says {}",
                            summary.frames,
                            frame.channel_count(),
                            self.format.channels);
                let msg = "frame channel count differs from STREAMINFO";
                return Err(Error::Decode(claxon::Error::FormatError(msg)));
            }

            let block_size = frame.block_size() as u64;

            self.interleaver.interleave_into(frame, &mut self.buffer);
            sink.consume(&self.format, &self.buffer).map_err(Error::Io)?;

            summary.frames += 1;
            summary.samples += block_size;
            log::trace!("frame {}: {} samples per channel", summary.frames, block_size);
        }

        log::debug!("end of stream after {} frames, {} samples", summary.frames, summary.samples);
        Ok(summary)
    }
}

/// A source that yields prepared frames, optionally failing at the end.
#[cfg(test)]
struct MemorySource {
    streaminfo: StreamInfo,
    frames: Vec<Vec<Vec<i32>>>,
    next: usize,
    fail_at_end: bool,
    pulls: std::rc::Rc<std::cell::Cell<usize>>,
}

#[cfg(test)]
impl MemorySource {
    fn new(bits_per_sample: u32, frames: Vec<Vec<Vec<i32>>>) -> MemorySource {
        let channels = frames.first().map_or(2, |f| f.channel_count() as u32);
        MemorySource {
            streaminfo: StreamInfo {
                channels: channels,
                bits_per_sample: bits_per_sample,
                sample_rate: 48_000,
                samples: None,
                md5sum: [0; 16],
            },
            frames: frames,
            next: 0,
            fail_at_end: false,
            pulls: std::rc::Rc::new(std::cell::Cell::new(0)),
        }
    }
}

#[cfg(test)]
impl FrameSource for MemorySource {
    type Frame = Vec<Vec<i32>>;

    fn streaminfo(&self) -> StreamInfo {
        self.streaminfo
    }

    fn read_next(&mut self) -> Result<Option<&Vec<Vec<i32>>>> {
        self.pulls.set(self.pulls.get() + 1);
        if self.next < self.frames.len() {
            self.next += 1;
            Ok(Some(&self.frames[self.next - 1]))
        } else if self.fail_at_end {
            Err(Error::Decode(claxon::Error::FormatError("frame CRC mismatch")))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
fn stereo_frames(n: usize, block_size: usize) -> Vec<Vec<Vec<i32>>> {
    (0..n)
        .map(|i| {
            let left: Vec<i32> = (0..block_size).map(|t| (i * block_size + t) as i32).collect();
            let right: Vec<i32> = (0..block_size).map(|t| -((i * block_size + t) as i32)).collect();
            vec![left, right]
        })
        .collect()
}

#[test]
fn verify_run_calls_sink_once_per_frame() {
    let source = MemorySource::new(16, stereo_frames(5, 16));
    let pulls = source.pulls.clone();
    let decoder = Decoder::from_source(source).unwrap();

    let mut calls = 0;
    let mut sink = |format: &Format, samples: &[i32]| -> io::Result<()> {
        assert_eq!(format.channels, 2);
        assert_eq!(samples.len(), 32);
        assert_eq!(samples[2], ((calls * 16 + 1) as i32) << 16);
        assert_eq!(samples[3], -((calls * 16 + 1) as i32) << 16);
        calls += 1;
        Ok(())
    };
    let summary = decoder.run(&mut sink).unwrap();

    assert_eq!(calls, 5);
    assert_eq!(summary, Summary { frames: 5, samples: 80 });
    // Five frames plus the end-of-stream pull, and nothing after that.
    assert_eq!(pulls.get(), 6);
}

#[test]
fn verify_run_reports_decode_error_after_delivered_frames() {
    let mut source = MemorySource::new(24, stereo_frames(4, 20));
    source.fail_at_end = true;
    let decoder = Decoder::from_source(source).unwrap();

    let mut calls = 0;
    let mut sink = |_: &Format, _: &[i32]| -> io::Result<()> {
        calls += 1;
        Ok(())
    };
    match decoder.run(&mut sink) {
        Err(Error::Decode(..)) => {}
        other => panic!("expected decode error, got {:?}", other),
    }
    assert_eq!(calls, 4);
}

#[test]
fn verify_run_stops_at_first_sink_error() {
    let source = MemorySource::new(8, stereo_frames(10, 16));
    let pulls = source.pulls.clone();
    let decoder = Decoder::from_source(source).unwrap();

    let mut calls = 0;
    let mut sink = |_: &Format, _: &[i32]| -> io::Result<()> {
        calls += 1;
        if calls == 3 {
            Err(io::Error::new(io::ErrorKind::WriteZero, "device gone"))
        } else {
            Ok(())
        }
    };
    match decoder.run(&mut sink) {
        Err(Error::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::WriteZero),
        other => panic!("expected io error, got {:?}", other),
    }
    assert_eq!(calls, 3);
    assert_eq!(pulls.get(), 3);
}

#[test]
fn verify_run_rejects_frame_with_other_channel_count() {
    let mut frames = stereo_frames(3, 16);
    // The last frame is mono in a stereo stream.
    frames[2].truncate(1);
    let decoder = Decoder::from_source(MemorySource::new(16, frames)).unwrap();

    let mut calls = 0;
    let mut sink = |_: &Format, samples: &[i32]| -> io::Result<()> {
        assert_eq!(samples.len(), 32);
        calls += 1;
        Ok(())
    };
    match decoder.run(&mut sink) {
        Err(Error::Decode(..)) => {}
        other => panic!("expected decode error, got {:?}", other),
    }
    assert_eq!(calls, 2);
}

#[test]
fn verify_unsupported_depth_fails_before_any_frame_is_read() {
    for &bits in &[4, 12, 20, 32] {
        let source = MemorySource::new(bits, stereo_frames(2, 16));
        let pulls = source.pulls.clone();
        match Decoder::from_source(source) {
            Err(Error::UnsupportedBitDepth(n)) => assert_eq!(n, bits),
            Err(err) => panic!("expected unsupported bit depth, got {:?}", err),
            Ok(..) => panic!("bit depth {} should be refused", bits),
        }
        assert_eq!(pulls.get(), 0);
    }
}

#[test]
fn verify_run_on_empty_stream_succeeds_without_calls() {
    let decoder = Decoder::from_source(MemorySource::new(16, Vec::new())).unwrap();
    let mut calls = 0;
    let mut sink = |_: &Format, _: &[i32]| -> io::Result<()> {
        calls += 1;
        Ok(())
    };
    assert_eq!(decoder.run(&mut sink).unwrap(), Summary::default());
    assert_eq!(calls, 0);
}

#[test]
fn verify_format_is_bound_at_open() {
    let decoder = Decoder::from_source(MemorySource::new(24, stereo_frames(1, 16))).unwrap();
    assert_eq!(decoder.format().depth.bits(), 24);
    assert_eq!(decoder.streaminfo().sample_rate, 48_000);
}
