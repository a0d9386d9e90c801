// Flacook -- Raw PCM extraction from FLAC streams
// Copyright 2026 The Flacook Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The `sample` module deals with sample widths and byte packing.
//!
//! Interleaved samples are normalized to the full 32-bit range: a sample of a
//! stream with bit depth `d` is shifted left by `32 - d` bits. Packing reverses
//! that by keeping only the `d / 8` most significant bytes, which are exactly
//! the bytes of the original sample.

use crate::error::{Error, Result};

/// The bit depths that can be interleaved and packed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitDepth {
    /// 8 bits per sample, stored as one byte.
    Eight,
    /// 16 bits per sample, stored as two bytes.
    Sixteen,
    /// 24 bits per sample, stored as three bytes.
    TwentyFour,
}

impl BitDepth {
    /// Maps the bits per sample declared in the stream to a bit depth.
    ///
    /// Fails with `Error::UnsupportedBitDepth` for anything other than 8, 16,
    /// or 24.
    pub fn from_bits(bits_per_sample: u32) -> Result<BitDepth> {
        match bits_per_sample {
            8 => Ok(BitDepth::Eight),
            16 => Ok(BitDepth::Sixteen),
            24 => Ok(BitDepth::TwentyFour),
            n => Err(Error::UnsupportedBitDepth(n)),
        }
    }

    /// Returns the number of significant bits per sample.
    pub fn bits(self) -> u32 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
            BitDepth::TwentyFour => 24,
        }
    }

    /// Returns the number of bytes a packed sample occupies.
    pub fn bytes(self) -> usize {
        self.bits() as usize / 8
    }

    /// Returns the left shift that moves a sample into the top of an `i32`.
    pub fn shift(self) -> u32 {
        32 - self.bits()
    }

    /// Appends the little-endian packed form of the normalized samples.
    ///
    /// Every sample contributes `bytes()` bytes: the high-order bytes of the
    /// 32-bit value, least significant first. The low-order bytes, which the
    /// interleaver filled with zeros, are dropped. Values are truncated, not
    /// rounded.
    pub fn pack_into(self, samples: &[i32], out: &mut Vec<u8>) {
        let skip = 4 - self.bytes();
        out.reserve(samples.len() * self.bytes());
        for &sample in samples {
            out.extend_from_slice(&sample.to_le_bytes()[skip..]);
        }
    }

    /// Restores a normalized sample from its packed little-endian bytes.
    ///
    /// This is the inverse of `pack_into` for a single sample.
    ///
    /// # Panics
    /// Panics if `packed` is shorter than `bytes()`.
    pub fn unpack(self, packed: &[u8]) -> i32 {
        let skip = 4 - self.bytes();
        let mut le = [0u8; 4];
        le[skip..].copy_from_slice(&packed[..self.bytes()]);
        i32::from_le_bytes(le)
    }
}

#[test]
fn verify_from_bits_accepts_only_byte_multiples_up_to_24() {
    assert_eq!(BitDepth::from_bits(8).unwrap(), BitDepth::Eight);
    assert_eq!(BitDepth::from_bits(16).unwrap(), BitDepth::Sixteen);
    assert_eq!(BitDepth::from_bits(24).unwrap(), BitDepth::TwentyFour);

    for &bits in &[0, 4, 12, 20, 32] {
        match BitDepth::from_bits(bits) {
            Err(Error::UnsupportedBitDepth(n)) => assert_eq!(n, bits),
            other => panic!("expected unsupported bit depth for {}, got {:?}", bits, other),
        }
    }
}

#[test]
fn verify_shift_and_width() {
    assert_eq!((BitDepth::Eight.shift(), BitDepth::Eight.bytes()), (24, 1));
    assert_eq!((BitDepth::Sixteen.shift(), BitDepth::Sixteen.bytes()), (16, 2));
    assert_eq!((BitDepth::TwentyFour.shift(), BitDepth::TwentyFour.bytes()), (8, 3));
}

#[test]
fn verify_pack_writes_original_sample_little_endian() {
    let mut out = Vec::new();
    BitDepth::Eight.pack_into(&[-2 << 24, 0x7f << 24], &mut out);
    assert_eq!(out, vec![0xfe, 0x7f]);

    let mut out = Vec::new();
    BitDepth::Sixteen.pack_into(&[0x1234 << 16, -1 << 16], &mut out);
    assert_eq!(out, vec![0x34, 0x12, 0xff, 0xff]);

    let mut out = Vec::new();
    BitDepth::TwentyFour.pack_into(&[0x12_3456 << 8, -0x40_0000 << 8], &mut out);
    assert_eq!(out, vec![0x56, 0x34, 0x12, 0x00, 0x00, 0xc0]);
}

#[test]
fn verify_pack_then_shift_back_is_lossless() {
    let depths = [BitDepth::Eight, BitDepth::Sixteen, BitDepth::TwentyFour];
    for &depth in &depths {
        let max = (1i32 << (depth.bits() - 1)) - 1;
        let min = -max - 1;
        let raws = [min, min + 1, -1, 0, 1, max - 1, max, max / 3, min / 7];
        for &raw in &raws {
            let normalized = raw << depth.shift();
            let mut packed = Vec::new();
            depth.pack_into(&[normalized], &mut packed);
            assert_eq!(packed.len(), depth.bytes());
            assert_eq!(depth.unpack(&packed), normalized);
            assert_eq!(depth.unpack(&packed) >> depth.shift(), raw);
        }
    }
}

#[test]
fn verify_every_eight_bit_value_survives_packing() {
    for raw in -128i32..128 {
        let normalized = raw << 24;
        let mut packed = Vec::new();
        BitDepth::Eight.pack_into(&[normalized], &mut packed);
        assert_eq!(packed, vec![raw as i8 as u8]);
        assert_eq!(BitDepth::Eight.unpack(&packed), normalized);
    }
}
