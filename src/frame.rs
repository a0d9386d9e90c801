// Flacook -- Raw PCM extraction from FLAC streams
// Copyright 2026 The Flacook Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The `frame` module turns decoded frames into interleaved sample blocks.

use crate::sample::BitDepth;

/// A decoded unit of audio: one run of samples per channel.
///
/// All channels hold `block_size()` samples.
pub trait Frame {
    /// Returns the number of inter-channel samples in the frame.
    fn block_size(&self) -> usize;

    /// Returns the number of channels in the frame.
    fn channel_count(&self) -> usize;

    /// Returns the samples of the (zero-based) `ch`-th channel.
    ///
    /// # Panics
    /// May panic if `ch` is not less than `channel_count()`.
    fn samples(&self, ch: usize) -> &[i32];
}

impl Frame for claxon::Block {
    fn block_size(&self) -> usize {
        self.duration() as usize
    }

    fn channel_count(&self) -> usize {
        self.channels() as usize
    }

    fn samples(&self, ch: usize) -> &[i32] {
        self.channel(ch as u32)
    }
}

/// Owned frames, one vector per channel.
impl Frame for Vec<Vec<i32>> {
    fn block_size(&self) -> usize {
        self.first().map_or(0, |ch| ch.len())
    }

    fn channel_count(&self) -> usize {
        self.len()
    }

    fn samples(&self, ch: usize) -> &[i32] {
        &self[ch]
    }
}

/// Interleaves the channels of a frame, normalizing samples to 32 bits.
///
/// An interleaver is bound to one bit depth when a stream is opened, and is
/// used unchanged for every frame of that stream.
#[derive(Clone, Copy, Debug)]
pub struct Interleaver {
    depth: BitDepth,
    shift: u32,
}

impl Interleaver {
    /// Creates the interleaver for streams of the given bit depth.
    pub fn new(depth: BitDepth) -> Interleaver {
        Interleaver {
            depth: depth,
            shift: depth.shift(),
        }
    }

    /// Returns the bit depth this interleaver was bound to.
    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    /// Interleaves the frame into `out`, replacing its previous contents.
    ///
    /// Afterwards `out` holds `block_size * channel_count` samples, where the
    /// sample at time `t` of channel `c` is at index `t * channel_count + c`,
    /// shifted left by `32 - bits`. No clipping or dithering is applied.
    pub fn interleave_into<F: Frame + ?Sized>(&self, frame: &F, out: &mut Vec<i32>) {
        let block_size = frame.block_size();
        let channels = frame.channel_count();

        out.clear();
        out.resize(block_size * channels, 0);

        for ch in 0..channels {
            let src = &frame.samples(ch)[..block_size];
            for (t, &sample) in src.iter().enumerate() {
                out[t * channels + ch] = sample << self.shift;
            }
        }
    }

    /// Interleaves the frame into a newly allocated vector.
    pub fn interleave<F: Frame + ?Sized>(&self, frame: &F) -> Vec<i32> {
        let mut out = Vec::with_capacity(frame.block_size() * frame.channel_count());
        self.interleave_into(frame, &mut out);
        out
    }
}

#[cfg(test)]
fn ramp_frame(channels: usize, block_size: usize, bits: u32) -> Vec<Vec<i32>> {
    // Spread values over the full signed range of the bit depth, with a
    // different pattern per channel.
    let max = (1i32 << (bits - 1)) - 1;
    let min = -max - 1;
    (0..channels)
        .map(|ch| {
            (0..block_size)
                .map(|t| {
                    let v = (t as i64 * 7919 + ch as i64 * 104_729) % (max as i64 - min as i64 + 1);
                    (v + min as i64) as i32
                })
                .collect()
        })
        .collect()
}

#[test]
fn verify_interleave_layout_and_shift() {
    let depths = [BitDepth::Eight, BitDepth::Sixteen, BitDepth::TwentyFour];
    for &depth in &depths {
        for &channels in &[1, 2, 3, 8] {
            let block_size = 37;
            let frame = ramp_frame(channels, block_size, depth.bits());
            let out = Interleaver::new(depth).interleave(&frame);

            assert_eq!(out.len(), block_size * channels);
            for t in 0..block_size {
                for c in 0..channels {
                    assert_eq!(out[t * channels + c], frame[c][t] << (32 - depth.bits()));
                }
            }
        }
    }
}

#[test]
fn verify_interleave_stereo_by_hand() {
    let frame = vec![vec![1, -1, 2], vec![-128, 127, 0]];
    let out = Interleaver::new(BitDepth::Eight).interleave(&frame);
    assert_eq!(out, vec![1 << 24, -128 << 24, -1 << 24, 127 << 24, 2 << 24, 0]);

    let out = Interleaver::new(BitDepth::Sixteen).interleave(&frame);
    assert_eq!(out, vec![1 << 16, -128 << 16, -1 << 16, 127 << 16, 2 << 16, 0]);
}

#[test]
fn verify_interleave_into_replaces_previous_block() {
    let interleaver = Interleaver::new(BitDepth::TwentyFour);
    let mut out = vec![42; 100];

    interleaver.interleave_into(&vec![vec![5, 6], vec![7, 8]], &mut out);
    assert_eq!(out, vec![5 << 8, 7 << 8, 6 << 8, 8 << 8]);

    interleaver.interleave_into(&vec![vec![-3]], &mut out);
    assert_eq!(out, vec![-3 << 8]);
}

#[test]
fn verify_interleave_empty_frame() {
    let frame: Vec<Vec<i32>> = Vec::new();
    assert!(Interleaver::new(BitDepth::Sixteen).interleave(&frame).is_empty());
}

#[test]
fn verify_interleaver_remembers_depth() {
    assert_eq!(Interleaver::new(BitDepth::Eight).depth(), BitDepth::Eight);
}
