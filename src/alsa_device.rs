// Flacook -- Raw PCM extraction from FLAC streams
// Copyright 2026 The Flacook Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! ALSA playback, available with the `alsa` feature.

use std::io;

use alsa::pcm::{Access, HwParams, PCM};
use alsa::{Direction, ValueOr};

use crate::device::AudioDevice;
use crate::metadata::Format;

/// A blocking ALSA playback device.
///
/// The PCM is opened on the first block, for the channel count and sample
/// rate of that block's stream, as interleaved signed 32-bit samples. It is
/// reopened when a later stream has a different channel count or rate.
pub struct AlsaDevice {
    name: String,
    current: Option<(PCM, Format)>,
}

impl AlsaDevice {
    /// Creates a device for the named PCM, such as `"default"` or `"hw:0,0"`.
    ///
    /// Nothing is opened until the first block is written.
    pub fn new(name: &str) -> AlsaDevice {
        AlsaDevice {
            name: name.to_string(),
            current: None,
        }
    }

    /// Returns the PCM name.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn configure(&mut self, format: &Format) -> io::Result<&PCM> {
        let stale = match self.current {
            Some((_, ref open)) => {
                open.channels != format.channels || open.sample_rate != format.sample_rate
            }
            None => true,
        };

        if stale {
            drain_previous(self.current.take(), |&(ref pcm, _)| pcm.drain().map_err(device_error))?;
            let pcm = open_playback(&self.name, format).map_err(device_error)?;
            self.current = Some((pcm, *format));
        }

        match self.current {
            Some((ref pcm, _)) => Ok(pcm),
            None => Err(io::Error::new(io::ErrorKind::NotConnected, "ALSA device is not open")),
        }
    }
}

impl AudioDevice for AlsaDevice {
    fn write_block(&mut self, format: &Format, samples: &[i32]) -> io::Result<()> {
        let channels = format.channels.max(1) as usize;

        let pcm = self.configure(format)?;
        let pcm_io = pcm.io_i32().map_err(device_error)?;

        write_frames(samples, channels, |block| pcm_io.writei(block).map_err(device_error))
    }

    fn drain(&mut self) -> io::Result<()> {
        match self.current {
            Some((ref pcm, _)) => pcm.drain().map_err(device_error),
            None => Ok(()),
        }
    }
}

/// Drains the stream that is about to be replaced, if any.
fn drain_previous<P, F>(previous: Option<P>, drain: F) -> io::Result<()>
    where F: FnOnce(&P) -> io::Result<()>
{
    match previous {
        Some(ref p) => drain(p),
        None => Ok(()),
    }
}

/// Writes all frames of an interleaved block, continuing after short writes.
///
/// The first failed write fails the block.
fn write_frames<F>(samples: &[i32], channels: usize, mut write: F) -> io::Result<()>
    where F: FnMut(&[i32]) -> io::Result<usize>
{
    let frames = samples.len() / channels;
    let mut written = 0;
    while written < frames {
        match write(&samples[written * channels..frames * channels])? {
            0 => {
                return Err(io::Error::new(io::ErrorKind::WriteZero,
                                          "ALSA device accepted no frames"));
            }
            n => written += n,
        }
    }
    Ok(())
}

fn open_playback(name: &str, format: &Format) -> alsa::Result<PCM> {
    let pcm = PCM::new(name, Direction::Playback, false)?;

    // The hardware parameters borrow the PCM, they must be gone before it
    // can be returned.
    {
        let hwp = HwParams::any(&pcm)?;
        hwp.set_access(Access::RWInterleaved)?;
        hwp.set_format(alsa::pcm::Format::s32())?;
        hwp.set_channels(format.channels)?;
        hwp.set_rate(format.sample_rate, ValueOr::Nearest)?;
        pcm.hw_params(&hwp)?;
    }

    log::info!("ALSA playback: device={}, {}", name, format);
    Ok(pcm)
}

fn device_error(err: alsa::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err)
}

#[test]
fn verify_write_frames_continues_after_short_write() {
    let samples: Vec<i32> = (0..12).collect();
    let mut calls = Vec::new();
    write_frames(&samples, 2, |block| {
        calls.push(block.len());
        Ok(block.len().min(4) / 2)
    }).unwrap();
    assert_eq!(calls, vec![12, 8, 4]);
}

#[test]
fn verify_write_frames_fails_on_first_error() {
    let samples = [0i32; 8];
    let mut calls = 0;
    let result = write_frames(&samples, 2, |_| {
        calls += 1;
        Err(io::Error::new(io::ErrorKind::Other, "underrun"))
    });
    assert_eq!(result.unwrap_err().kind(), io::ErrorKind::Other);
    assert_eq!(calls, 1);
}

#[test]
fn verify_write_frames_refuses_zero_progress() {
    let result = write_frames(&[0i32; 4], 2, |_| Ok(0));
    assert_eq!(result.unwrap_err().kind(), io::ErrorKind::WriteZero);
}

#[test]
fn verify_drain_previous_propagates_failure() {
    let result = drain_previous(Some(7), |_| Err(io::Error::new(io::ErrorKind::Other, "drain")));
    assert_eq!(result.unwrap_err().kind(), io::ErrorKind::Other);
    assert!(drain_previous(None::<u32>, |_| panic!("nothing to drain")).is_ok());
}
