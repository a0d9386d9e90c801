// Flacook -- Raw PCM extraction from FLAC streams
// Copyright 2026 The Flacook Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

// Converts FLAC files to headerless little-endian signed raw PCM files.

use std::env;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use flacook::{Decoder, RawWriter};

fn flac2raw(infile: &Path, outfile: &Path) -> Result<()> {
    println!("Converting {} to {}...", infile.display(), outfile.display());

    let decoder = Decoder::open(infile)
        .with_context(|| format!("while opening infile {}", infile.display()))?;
    let format = *decoder.format();
    println!("{}", format);

    let writer = RawWriter::create_new(outfile)
        .with_context(|| format!("while opening outfile {}", outfile.display()))?;
    flacook::convert::write_raw(decoder, writer)
        .with_context(|| format!("while converting samples to {}", outfile.display()))?;

    println!("Done!  If you have sox installed, play with:");
    println!("    {}", format.play_command(outfile));
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    // Conversions come in pairs: foo -> bar, baz -> bingo, etc.
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || args.len() % 2 != 1 {
        eprintln!("Usage: {} <infile> <outfile> [infile outfile...]", args[0]);
        process::exit(1);
    }

    for pair in args[1..].chunks(2) {
        flac2raw(Path::new(&pair[0]), Path::new(&pair[1]))?;
    }

    Ok(())
}
