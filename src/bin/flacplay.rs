// Flacook -- Raw PCM extraction from FLAC streams
// Copyright 2026 The Flacook Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

// Plays one or more FLAC files through ALSA.

use std::env;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use flacook::alsa_device::AlsaDevice;
use flacook::{Decoder, DevicePump};

fn flacplay(device: &mut AlsaDevice, filename: &Path) -> Result<()> {
    println!("Playing {}...", filename.display());

    let decoder = Decoder::open(filename)
        .with_context(|| format!("while opening infile {}", filename.display()))?;
    println!("{}", decoder.format());

    let mut pump = DevicePump::new(device);
    decoder.run(&mut pump).context("while playing samples")?;
    pump.finish().context("while draining the audio device")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <file> [file...]", args[0]);
        process::exit(1);
    }

    let device_name = env::var("FLACOOK_DEVICE").unwrap_or_else(|_| "default".to_string());
    let mut device = AlsaDevice::new(&device_name);

    for filename in &args[1..] {
        flacplay(&mut device, Path::new(filename))?;
    }

    Ok(())
}
