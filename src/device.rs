// Flacook -- Raw PCM extraction from FLAC streams
// Copyright 2026 The Flacook Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The `device` module defines the interface to audio output devices.

use std::io;

use crate::metadata::Format;

/// An audio output that accepts interleaved 32-bit samples.
///
/// Samples arrive normalized: the significant bits of the source occupy the
/// top of each `i32`, so a device configured for signed 32-bit samples plays
/// them at the right level regardless of the source bit depth.
pub trait AudioDevice {
    /// Writes one block of interleaved samples.
    ///
    /// Blocks until the device has accepted the entire block. The block holds
    /// `samples.len() / format.channels` frames at `format.sample_rate`.
    fn write_block(&mut self, format: &Format, samples: &[i32]) -> io::Result<()>;

    /// Blocks until everything written so far has been played.
    fn drain(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a, D: AudioDevice + ?Sized> AudioDevice for &'a mut D {
    fn write_block(&mut self, format: &Format, samples: &[i32]) -> io::Result<()> {
        (**self).write_block(format, samples)
    }

    fn drain(&mut self) -> io::Result<()> {
        (**self).drain()
    }
}
