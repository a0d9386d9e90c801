// Flacook -- Raw PCM extraction from FLAC streams
// Copyright 2026 The Flacook Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

// Prints the MD5 of the raw PCM that each FLAC file decodes to, one
// `<md5>  <file>.raw` line per file, in the layout of a test manifest.

use std::env;
use std::path::Path;
use std::process;

use anyhow::{bail, Context, Result};
use flacook::{Decoder, Md5Sink};

fn flacsum(filename: &Path) -> Result<()> {
    let decoder = Decoder::open(filename)
        .with_context(|| format!("while opening infile {}", filename.display()))?;
    let streaminfo = *decoder.streaminfo();

    let mut sink = Md5Sink::new();
    decoder.run(&mut sink)
        .with_context(|| format!("while hashing samples of {}", filename.display()))?;
    let digest = sink.finish_hex();

    println!("{}  {}.raw", digest, filename.display());

    if streaminfo.has_md5sum() && streaminfo.md5sum_hex() != digest {
        bail!("{}: decoded audio has MD5 {}, but STREAMINFO says {}",
              filename.display(),
              digest,
              streaminfo.md5sum_hex());
    }
    if !streaminfo.has_md5sum() {
        log::info!("{}: no MD5 signature in STREAMINFO", filename.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <file> [file...]", args[0]);
        process::exit(1);
    }

    for filename in &args[1..] {
        flacsum(Path::new(filename))?;
    }

    Ok(())
}
