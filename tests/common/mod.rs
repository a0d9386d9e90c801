// Flacook -- Raw PCM extraction from FLAC streams
// Copyright 2026 The Flacook Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

// A minimal FLAC writer for test fixtures. Every subframe is stored verbatim,
// so the output is bigger than the input, but it is a valid FLAC stream that
// exercises the full decode path, CRCs included.

#![allow(dead_code)]

use md5::{Digest, Md5};

/// Frames of a fixture: per frame, per channel, the raw samples.
pub type Frames = Vec<Vec<Vec<i32>>>;

fn crc8(data: &[u8]) -> u8 {
    // Polynomial x^8 + x^2 + x^1 + x^0, initialized with 0.
    let mut crc = 0u8;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 { (crc << 1) ^ 0x07 } else { crc << 1 };
        }
    }
    crc
}

fn crc16(data: &[u8]) -> u16 {
    // Polynomial x^16 + x^15 + x^2 + x^0, initialized with 0.
    let mut crc = 0u16;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 { (crc << 1) ^ 0x8005 } else { crc << 1 };
        }
    }
    crc
}

fn bps_code(bits_per_sample: u32) -> u8 {
    match bits_per_sample {
        8 => 0b001,
        12 => 0b010,
        16 => 0b100,
        20 => 0b101,
        24 => 0b110,
        _ => panic!("no frame header code for {} bits per sample", bits_per_sample),
    }
}

/// Packs samples the way the raw output format and the STREAMINFO MD5 do:
/// little-endian, `bits / 8` bytes per sample, channels interleaved.
///
/// This packs the raw sample values directly, without going through the
/// normalized 32-bit representation.
pub fn raw_bytes(bits_per_sample: u32, frames: &Frames) -> Vec<u8> {
    let width = (bits_per_sample / 8) as usize;
    let mut out = Vec::new();
    for frame in frames {
        for t in 0..frame[0].len() {
            for channel in frame {
                out.extend_from_slice(&channel[t].to_le_bytes()[..width]);
            }
        }
    }
    out
}

/// Returns the MD5 of the raw bytes as lowercase hexadecimal.
pub fn raw_md5_hex(bits_per_sample: u32, frames: &Frames) -> String {
    hex::encode(Md5::digest(&raw_bytes(bits_per_sample, frames)))
}

fn write_streaminfo(out: &mut Vec<u8>, bits_per_sample: u32, frames: &Frames, md5sum: &[u8]) {
    let channels = frames.first().map_or(1, |f| f.len()) as u64;
    let max_block_size = frames.iter().map(|f| f[0].len()).max().unwrap_or(16).max(16);
    let total: u64 = frames.iter().map(|f| f[0].len() as u64).sum();
    let sample_rate = 44_100u64;

    // Metadata block header: last-block flag, type 0 (STREAMINFO), length 34.
    out.extend_from_slice(&[0x80, 0x00, 0x00, 0x22]);
    out.extend_from_slice(&16u16.to_be_bytes());
    out.extend_from_slice(&(max_block_size as u16).to_be_bytes());
    // Minimum and maximum frame size are unknown.
    out.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
    let packed = sample_rate << 44
        | (channels - 1) << 41
        | (bits_per_sample as u64 - 1) << 36
        | total;
    out.extend_from_slice(&packed.to_be_bytes());
    out.extend_from_slice(md5sum);
}

fn write_frame(out: &mut Vec<u8>, number: usize, bits_per_sample: u32, frame: &[Vec<i32>]) {
    assert!(number < 128, "frame numbers are written as a single byte");
    let block_size = frame[0].len();
    let width = (bits_per_sample / 8) as usize;

    // Sync code with fixed blocking strategy, then the block size code 0111
    // (16-bit size follows) and sample rate code 1001 (44.1 kHz).
    let mut bytes = vec![0xff, 0xf8, 0x79];
    bytes.push(((frame.len() as u8 - 1) << 4) | (bps_code(bits_per_sample) << 1));
    bytes.push(number as u8);
    bytes.extend_from_slice(&((block_size - 1) as u16).to_be_bytes());
    let header_crc = crc8(&bytes);
    bytes.push(header_crc);

    for channel in frame {
        assert_eq!(channel.len(), block_size);
        // Zero padding bit, subframe type 000001 (verbatim), no wasted bits.
        bytes.push(0x02);
        for &sample in channel {
            bytes.extend_from_slice(&sample.to_be_bytes()[4 - width..]);
        }
    }

    let frame_crc = crc16(&bytes);
    bytes.extend_from_slice(&frame_crc.to_be_bytes());
    out.extend_from_slice(&bytes);
}

/// Encodes the frames as a FLAC stream with the given bits per sample.
///
/// `bits_per_sample` must be a multiple of 8 for the frames to be written,
/// but any depth with a frame header code can be declared in STREAMINFO when
/// `frames` is empty.
pub fn encode(bits_per_sample: u32, frames: &Frames) -> Vec<u8> {
    let md5sum = if bits_per_sample % 8 == 0 {
        Md5::digest(&raw_bytes(bits_per_sample, frames)).to_vec()
    } else {
        vec![0; 16]
    };

    let mut out = b"fLaC".to_vec();
    write_streaminfo(&mut out, bits_per_sample, frames, &md5sum);
    for (number, frame) in frames.iter().enumerate() {
        write_frame(&mut out, number, bits_per_sample, frame);
    }
    out
}

/// Encodes a stream that declares `bits_per_sample` but holds no audio.
pub fn encode_header_only(bits_per_sample: u32, channels: usize) -> Vec<u8> {
    let frames: Frames = vec![vec![vec![0; 16]; channels]];
    let mut out = b"fLaC".to_vec();
    write_streaminfo(&mut out, bits_per_sample, &frames, &[0; 16]);
    out
}

/// Deterministic pseudo-random frames that cover the full range of the
/// bit depth, including its extremes.
pub fn noise_frames(bits_per_sample: u32, channels: usize, block_sizes: &[usize]) -> Frames {
    let max = (1i64 << (bits_per_sample - 1)) - 1;
    let min = -max - 1;
    let range = (max - min + 1) as u64;
    let mut state = 0x2545_f491_4f6c_dd1du64 ^ bits_per_sample as u64;

    block_sizes
        .iter()
        .map(|&block_size| {
            (0..channels)
                .map(|_| {
                    (0..block_size)
                        .map(|t| {
                            match t {
                                0 => max as i32,
                                1 => min as i32,
                                _ => {
                                    // Xorshift, good enough to scatter bits.
                                    state ^= state << 13;
                                    state ^= state >> 7;
                                    state ^= state << 17;
                                    ((state % range) as i64 + min) as i32
                                }
                            }
                        })
                        .collect()
                })
                .collect()
        })
        .collect()
}
