// Flacook -- Raw PCM extraction from FLAC streams
// Copyright 2026 The Flacook Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

mod common;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use flacook::{Decoder, Error, Format, Md5Sink};

use common::Frames;

fn md5_of_decode(data: Vec<u8>) -> String {
    let decoder = Decoder::new(io::Cursor::new(data)).unwrap();
    let mut sink = Md5Sink::new();
    decoder.run(&mut sink).unwrap();
    sink.finish_hex()
}

fn check_conformance(bits_per_sample: u32, frames: &Frames) {
    let data = common::encode(bits_per_sample, frames);
    let expected = common::raw_md5_hex(bits_per_sample, frames);

    let decoder = Decoder::new(io::Cursor::new(data.clone())).unwrap();
    assert_eq!(decoder.streaminfo().md5sum_hex(), expected);

    assert_eq!(md5_of_decode(data), expected);
}

#[test]
fn verify_md5_of_8_bit_mono() {
    check_conformance(8, &common::noise_frames(8, 1, &[4096, 4096, 100]));
}

#[test]
fn verify_md5_of_16_bit_stereo() {
    check_conformance(16, &common::noise_frames(16, 2, &[1152, 1152, 1152, 576]));
}

#[test]
fn verify_md5_of_24_bit_surround() {
    check_conformance(24, &common::noise_frames(24, 6, &[192, 4608, 33]));
}

#[test]
fn verify_decoded_samples_are_shifted_and_interleaved() {
    let frames = common::noise_frames(16, 3, &[64, 20]);
    let data = common::encode(16, &frames);
    let decoder = Decoder::new(io::Cursor::new(data)).unwrap();

    let mut index = 0;
    let mut sink = |format: &Format, samples: &[i32]| -> io::Result<()> {
        let frame = &frames[index];
        assert_eq!(format.channels, 3);
        assert_eq!(samples.len(), frame[0].len() * 3);
        for t in 0..frame[0].len() {
            for c in 0..3 {
                assert_eq!(samples[t * 3 + c], frame[c][t] << 16);
            }
        }
        index += 1;
        Ok(())
    };
    let summary = decoder.run(&mut sink).unwrap();

    assert_eq!(index, 2);
    assert_eq!(summary.frames, 2);
    assert_eq!(summary.samples, 84);
}

#[test]
fn verify_sink_is_called_once_per_frame() {
    let frames = common::noise_frames(24, 2, &[256; 7]);
    let decoder = Decoder::new(io::Cursor::new(common::encode(24, &frames))).unwrap();

    let mut calls = 0;
    let mut sink = |_: &Format, _: &[i32]| -> io::Result<()> {
        calls += 1;
        Ok(())
    };
    decoder.run(&mut sink).unwrap();
    assert_eq!(calls, 7);
}

#[test]
fn verify_truncated_final_frame_is_a_decode_error() {
    let frames = common::noise_frames(16, 2, &[512; 5]);
    let mut data = common::encode(16, &frames);
    // Cut the stream in the middle of the samples of the last frame.
    let new_len = data.len() - 300;
    data.truncate(new_len);

    let decoder = Decoder::new(io::Cursor::new(data)).unwrap();
    let mut calls = 0;
    let mut sink = |_: &Format, _: &[i32]| -> io::Result<()> {
        calls += 1;
        Ok(())
    };
    match decoder.run(&mut sink) {
        Err(Error::Decode(..)) => {}
        other => panic!("expected a decode error, got {:?}", other),
    }
    assert_eq!(calls, 4);
}

#[test]
fn verify_unsupported_bit_depth_is_refused_at_open() {
    for &bits in &[12, 20] {
        let data = common::encode_header_only(bits, 2);
        match Decoder::new(io::Cursor::new(data)) {
            Err(Error::UnsupportedBitDepth(n)) => assert_eq!(n, bits),
            Err(err) => panic!("expected unsupported bit depth, got {}", err),
            Ok(..) => panic!("{} bits per sample should be refused", bits),
        }
    }
}

#[test]
fn verify_garbage_is_an_open_error() {
    match Decoder::new(io::Cursor::new(b"RIFF....WAVEfmt ".to_vec())) {
        Err(Error::Open(..)) => {}
        Err(err) => panic!("expected an open error, got {}", err),
        Ok(..) => panic!("garbage should not open as FLAC"),
    }
}

#[test]
fn verify_missing_file_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    match Decoder::open(dir.path().join("missing.flac")) {
        Err(Error::Open(..)) => {}
        Err(err) => panic!("expected an open error, got {}", err),
        Ok(..) => panic!("a missing file should not open"),
    }
}

#[test]
fn verify_conversion_writes_raw_pcm() {
    let frames = common::noise_frames(24, 2, &[1000, 999]);
    let dir = tempfile::tempdir().unwrap();
    let flac_path = dir.path().join("noise.flac");
    let raw_path = dir.path().join("noise.raw");
    fs::write(&flac_path, common::encode(24, &frames)).unwrap();

    let conversion = flacook::convert::flac_to_raw(&flac_path, &raw_path).unwrap();

    let expected = common::raw_bytes(24, &frames);
    assert_eq!(conversion.bytes, expected.len() as u64);
    assert_eq!(conversion.summary.samples, 1999);
    assert_eq!(conversion.format.to_string(), "2 channels, 24 bits/sample, 44100 sample rate");
    assert_eq!(fs::read(&raw_path).unwrap(), expected);
}

#[test]
fn verify_conversion_refuses_to_overwrite() {
    let frames = common::noise_frames(16, 2, &[128]);
    let dir = tempfile::tempdir().unwrap();
    let flac_path = dir.path().join("a.flac");
    let raw_path = dir.path().join("a.raw");
    fs::write(&flac_path, common::encode(16, &frames)).unwrap();
    fs::write(&raw_path, b"do not touch").unwrap();

    match flacook::convert::flac_to_raw(&flac_path, &raw_path) {
        Err(Error::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::AlreadyExists),
        other => panic!("expected an io error, got {:?}", other),
    }
    assert_eq!(fs::read(&raw_path).unwrap(), b"do not touch");
}

/// Reads `<md5>  <file>.raw` lines; `<file>` is relative to the manifest.
fn read_manifest(path: &Path) -> Vec<(PathBuf, String)> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(md5), Some(raw)) if raw.ends_with(".raw") => {
                    let flac = &raw[..raw.len() - 4];
                    Some((dir.join(flac), md5.to_lowercase()))
                }
                // Lines that don't match expectations are skipped.
                _ => None,
            }
        })
        .collect()
}

// Reference files are not part of the repository. Put FLAC files under
// testsamples/ and run testsamples/mkhash.sh to generate a manifest of digests
// computed with the reference decoder; this test then checks every file in it.
#[test]
fn verify_reference_manifests() {
    let root = Path::new("testsamples");
    if !root.exists() {
        return;
    }

    for entry in walkdir::WalkDir::new(root) {
        let entry = entry.unwrap();
        if entry.path().extension().map_or(true, |ext| ext != "md5") {
            continue;
        }
        for (flac, expected) in read_manifest(entry.path()) {
            let decoder = Decoder::open(&flac).unwrap();
            let mut sink = Md5Sink::new();
            decoder.run(&mut sink).unwrap();
            let actual = sink.finish_hex();
            if actual != expected {
                panic!("{}: expected {}, got {}", flac.display(), expected, actual);
            }
        }
    }
}

#[test]
fn verify_digest_matches_streaminfo() {
    let frames = common::noise_frames(8, 2, &[300, 300, 41]);
    let decoder = Decoder::new(io::Cursor::new(common::encode(8, &frames))).unwrap();
    let expected = decoder.streaminfo().md5sum;

    let digest = flacook::convert::to_digest::<md5::Md5, _>(decoder).unwrap();
    assert_eq!(&digest[..], &expected[..]);
}

#[test]
fn verify_frame_channel_count_must_match_streaminfo() {
    let frames = common::noise_frames(16, 1, &[64, 64]);
    let mut data = common::encode(16, &frames);
    // Declare two channels in STREAMINFO; the frames stay mono.
    data[20] |= 1 << 1;

    let decoder = Decoder::new(io::Cursor::new(data)).unwrap();
    assert_eq!(decoder.format().channels, 2);

    let mut calls = 0;
    let mut sink = |_: &Format, _: &[i32]| -> io::Result<()> {
        calls += 1;
        Ok(())
    };
    match decoder.run(&mut sink) {
        Err(Error::Decode(..)) => {}
        other => panic!("expected a decode error, got {:?}", other),
    }
    assert_eq!(calls, 0);
}

#[test]
fn verify_write_raw_fills_an_open_writer() {
    let frames = common::noise_frames(8, 3, &[50, 17]);
    let decoder = Decoder::new(io::Cursor::new(common::encode(8, &frames))).unwrap();

    let writer = flacook::RawWriter::new(Vec::new());
    let conversion = flacook::convert::write_raw(decoder, writer).unwrap();

    let expected = common::raw_bytes(8, &frames);
    assert_eq!(conversion.bytes, expected.len() as u64);
    assert_eq!(conversion.summary.frames, 2);
}

#[test]
fn verify_opening_existing_outfile_fails_before_decoding() {
    let dir = tempfile::tempdir().unwrap();
    let raw_path = dir.path().join("taken.raw");
    fs::write(&raw_path, b"taken").unwrap();

    match flacook::RawWriter::create_new(&raw_path) {
        Err(err) => assert_eq!(err.kind(), io::ErrorKind::AlreadyExists),
        Ok(..) => panic!("an existing outfile must not be opened"),
    }
    assert_eq!(fs::read(&raw_path).unwrap(), b"taken");
}
