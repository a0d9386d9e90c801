// Flacook -- Raw PCM extraction from FLAC streams
// Copyright 2026 The Flacook Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The `stream` module is the seam between Flacook and the FLAC decoder.
//!
//! Decoding itself is done by Claxon. The `FrameSource` trait captures the
//! little that the decode loop needs from it: the stream metadata, and a way
//! to pull the next frame that tells a clean end of stream apart from a
//! decode error.

use std::fs;
use std::io;
use std::path::Path;

use claxon::{Block, FlacReader};

use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::metadata::StreamInfo;

/// An open stream of decoded frames.
pub trait FrameSource {
    /// The type of frame this source yields.
    type Frame: Frame + ?Sized;

    /// Returns the stream metadata, which is known as soon as the source is open.
    fn streaminfo(&self) -> StreamInfo;

    /// Decodes the next frame.
    ///
    /// Returns `Ok(None)` when the input ends cleanly at a frame boundary. Any
    /// other failure, including input that ends inside a frame, is an
    /// `Error::Decode`. The returned frame is only valid until the next call.
    fn read_next(&mut self) -> Result<Option<&Self::Frame>>;
}

/// A `FrameSource` that decodes a FLAC stream with Claxon.
pub struct FlacSource<R: io::Read> {
    reader: FlacReader<R>,
    streaminfo: StreamInfo,
    /// The most recently decoded block; its buffer is recycled for the next.
    block: Option<Block>,
}

impl FlacSource<fs::File> {
    /// Opens the FLAC file at the given path and reads its metadata.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<FlacSource<fs::File>> {
        let reader = FlacReader::open(path).map_err(Error::Open)?;
        Ok(FlacSource::from_reader(reader))
    }
}

impl<R: io::Read> FlacSource<R> {
    /// Reads the metadata of a FLAC stream from the given input.
    ///
    /// Afterwards the input is positioned at the first frame.
    pub fn new(input: R) -> Result<FlacSource<R>> {
        let reader = FlacReader::new(input).map_err(Error::Open)?;
        Ok(FlacSource::from_reader(reader))
    }

    fn from_reader(reader: FlacReader<R>) -> FlacSource<R> {
        let streaminfo = StreamInfo::from_claxon(&reader.streaminfo());
        FlacSource {
            reader: reader,
            streaminfo: streaminfo,
            block: None,
        }
    }
}

impl<R: io::Read> FrameSource for FlacSource<R> {
    type Frame = Block;

    fn streaminfo(&self) -> StreamInfo {
        self.streaminfo
    }

    fn read_next(&mut self) -> Result<Option<&Block>> {
        let buffer = match self.block.take() {
            Some(block) => block.into_buffer(),
            None => Vec::new(),
        };
        match self.reader.blocks().read_next_or_eof(buffer) {
            Ok(Some(block)) => {
                self.block = Some(block);
                Ok(self.block.as_ref())
            }
            Ok(None) => Ok(None),
            Err(err) => Err(Error::Decode(err)),
        }
    }
}
