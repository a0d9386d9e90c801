// Flacook -- Raw PCM extraction from FLAC streams
// Copyright 2026 The Flacook Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

mod common;

use std::io;
use std::path::Path;

use flacook::{BitDepth, Decoder, FlacSource, FrameSource};

#[test]
fn verify_streaminfo_matches_what_was_written() {
    let frames = common::noise_frames(16, 2, &[4096, 4096, 808]);
    let source = FlacSource::new(io::Cursor::new(common::encode(16, &frames))).unwrap();
    let streaminfo = source.streaminfo();

    assert_eq!(streaminfo.channels, 2);
    assert_eq!(streaminfo.bits_per_sample, 16);
    assert_eq!(streaminfo.sample_rate, 44_100);
    assert_eq!(streaminfo.samples, Some(9000));
    assert!(streaminfo.has_md5sum());
    assert_eq!(streaminfo.md5sum_hex(), common::raw_md5_hex(16, &frames));
}

#[test]
fn verify_format_is_derived_from_streaminfo() {
    for &(bits, depth) in &[(8, BitDepth::Eight), (16, BitDepth::Sixteen), (24, BitDepth::TwentyFour)] {
        let frames = common::noise_frames(bits, 5, &[16]);
        let decoder = Decoder::new(io::Cursor::new(common::encode(bits, &frames))).unwrap();
        let format = decoder.format();

        assert_eq!(format.channels, 5);
        assert_eq!(format.depth, depth);
        assert_eq!(format.sample_rate, 44_100);
        assert_eq!(
            format.play_command(Path::new("out.raw")),
            format!("play -c 5 -b {} -r 44100 -e signed out.raw", bits)
        );
    }
}

#[test]
fn verify_streaminfo_of_header_only_stream() {
    // Depths the decoder refuses are still readable from the header.
    let source = FlacSource::new(io::Cursor::new(common::encode_header_only(20, 1))).unwrap();
    let streaminfo = source.streaminfo();
    assert_eq!(streaminfo.bits_per_sample, 20);
    assert_eq!(streaminfo.channels, 1);
    assert!(!streaminfo.has_md5sum());
}
