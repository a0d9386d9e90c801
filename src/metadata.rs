// Flacook -- Raw PCM extraction from FLAC streams
// Copyright 2026 The Flacook Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The `metadata` module describes the stream-level properties of a FLAC stream.

use std::fmt;
use std::path::Path;

use crate::error::Result;
use crate::sample::BitDepth;

/// The STREAMINFO properties that matter for extracting raw samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamInfo {
    /// The number of channels, between 1 and 8.
    pub channels: u32,
    /// The number of bits per sample as declared by the encoder.
    pub bits_per_sample: u32,
    /// The sample rate in Hz.
    pub sample_rate: u32,
    /// The total number of inter-channel samples, if known.
    pub samples: Option<u64>,
    /// MD5 signature of the unencoded audio data, all zeros if unknown.
    ///
    /// The unencoded audio is hashed in exactly the layout of the raw output
    /// format, so the digest of a raw conversion can be compared with it.
    pub md5sum: [u8; 16],
}

impl StreamInfo {
    /// Copies the relevant fields out of the STREAMINFO block read by Claxon.
    pub fn from_claxon(streaminfo: &claxon::metadata::StreamInfo) -> StreamInfo {
        StreamInfo {
            channels: streaminfo.channels,
            bits_per_sample: streaminfo.bits_per_sample,
            sample_rate: streaminfo.sample_rate,
            samples: streaminfo.samples,
            md5sum: streaminfo.md5sum,
        }
    }

    /// Returns whether the encoder stored an MD5 signature.
    ///
    /// An encoder that did not compute the signature writes all zeros.
    pub fn has_md5sum(&self) -> bool {
        self.md5sum.iter().any(|&b| b != 0)
    }

    /// Returns the MD5 signature as lowercase hexadecimal.
    pub fn md5sum_hex(&self) -> String {
        hex::encode(self.md5sum)
    }
}

/// The validated stream format that sinks receive with every block.
///
/// The bit depth in here is the single source of truth for both the shift
/// applied while interleaving and the byte width used while packing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Format {
    /// The number of interleaved channels.
    pub channels: u32,
    /// The bit depth of the source samples.
    pub depth: BitDepth,
    /// The sample rate in Hz.
    pub sample_rate: u32,
}

impl Format {
    /// Validates the stream metadata, failing on unsupported bit depths.
    pub fn from_streaminfo(info: &StreamInfo) -> Result<Format> {
        let depth = BitDepth::from_bits(info.bits_per_sample)?;
        Ok(Format {
            channels: info.channels,
            depth: depth,
            sample_rate: info.sample_rate,
        })
    }

    /// Returns a SoX command line that plays a raw file in this format.
    pub fn play_command(&self, raw_path: &Path) -> String {
        format!("play -c {} -b {} -r {} -e signed {}",
                self.channels,
                self.depth.bits(),
                self.sample_rate,
                raw_path.display())
    }
}

impl fmt::Display for Format {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter,
               "{} channels, {} bits/sample, {} sample rate",
               self.channels,
               self.depth.bits(),
               self.sample_rate)
    }
}

#[cfg(test)]
fn stereo_info(bits_per_sample: u32) -> StreamInfo {
    StreamInfo {
        channels: 2,
        bits_per_sample: bits_per_sample,
        sample_rate: 44_100,
        samples: Some(4096),
        md5sum: [0; 16],
    }
}

#[test]
fn verify_format_rejects_unsupported_depth() {
    match Format::from_streaminfo(&stereo_info(20)) {
        Err(crate::error::Error::UnsupportedBitDepth(20)) => {}
        other => panic!("expected unsupported bit depth, got {:?}", other),
    }
}

#[test]
fn verify_format_display_and_play_command() {
    let format = Format::from_streaminfo(&stereo_info(16)).unwrap();
    assert_eq!(format.depth, BitDepth::Sixteen);
    assert_eq!(format.to_string(), "2 channels, 16 bits/sample, 44100 sample rate");
    assert_eq!(format.play_command(Path::new("out.raw")),
               "play -c 2 -b 16 -r 44100 -e signed out.raw");
}

#[test]
fn verify_md5sum_presence() {
    let mut info = stereo_info(24);
    assert!(!info.has_md5sum());
    info.md5sum[15] = 0xab;
    assert!(info.has_md5sum());
    assert_eq!(info.md5sum_hex(), "000000000000000000000000000000ab");
}
