// Flacook -- Raw PCM extraction from FLAC streams
// Copyright 2026 The Flacook Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The `convert` module wires decoders to sinks for whole-stream operations.

use std::io;
use std::path::Path;

use md5::Digest;

use crate::decode::{Decoder, Summary};
use crate::error::Result;
use crate::metadata::Format;
use crate::sink::{DigestSink, RawWriter};
use crate::stream::FrameSource;

/// The outcome of a raw conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Conversion {
    /// The format of the converted stream.
    pub format: Format,
    /// What the decode run delivered.
    pub summary: Summary,
    /// The size of the raw output in bytes.
    pub bytes: u64,
}

/// Decodes the stream into a new headerless raw PCM file.
///
/// The output path must not exist yet; if it does, this fails with an
/// `Error::Io` of kind `AlreadyExists` before anything is decoded, and the
/// existing file is left as it was. The output is flushed once, after the
/// stream has been decoded completely.
pub fn to_raw<S, P>(decoder: Decoder<S>, output: P) -> Result<Conversion>
    where S: FrameSource,
          P: AsRef<Path>
{
    let writer = RawWriter::create_new(output)?;
    write_raw(decoder, writer)
}

/// Decodes the stream into an already opened raw writer, then flushes it.
pub fn write_raw<S, W>(decoder: Decoder<S>, mut writer: RawWriter<W>) -> Result<Conversion>
    where S: FrameSource,
          W: io::Write
{
    let format = *decoder.format();
    let summary = decoder.run(&mut writer)?;
    let bytes = writer.bytes_written();
    writer.finish()?;

    Ok(Conversion {
        format: format,
        summary: summary,
        bytes: bytes,
    })
}

/// Converts the FLAC file at `input` into a raw PCM file at `output`.
pub fn flac_to_raw<P, Q>(input: P, output: Q) -> Result<Conversion>
    where P: AsRef<Path>,
          Q: AsRef<Path>
{
    to_raw(Decoder::open(input)?, output)
}

/// Decodes the stream and returns the digest of its raw PCM bytes.
pub fn to_digest<D, S>(decoder: Decoder<S>) -> Result<Vec<u8>>
    where D: Digest,
          S: FrameSource
{
    let mut sink = DigestSink::<D>::new();
    decoder.run(&mut sink)?;
    Ok(sink.finish())
}
