// Flacook -- Raw PCM extraction from FLAC streams
// Copyright 2026 The Flacook Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The `error` module defines the error and result types.

use std::error;
use std::fmt;
use std::io;
use std::result;

/// An error that prevents a decode run from completing.
///
/// Every error is fatal to the run that produced it. Nothing is retried and
/// partial output is not salvaged.
#[derive(Debug)]
pub enum Error {
    /// The FLAC source could not be opened, or its metadata is malformed.
    Open(claxon::Error),

    /// The stream declares a bit depth other than 8, 16, or 24.
    UnsupportedBitDepth(u32),

    /// A frame could not be decoded, for instance because the stream ends
    /// halfway through it.
    Decode(claxon::Error),

    /// Consuming decoded samples failed.
    ///
    /// This covers write errors on the output file or the audio device, and
    /// an output path that already exists.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Open(ref err) => write!(formatter, "failed to open FLAC stream: {}", err),
            Error::UnsupportedBitDepth(bits) => {
                write!(formatter, "unsupported bit depth: {} bits per sample", bits)
            }
            Error::Decode(ref err) => write!(formatter, "failed to decode frame: {}", err),
            Error::Io(ref err) => err.fmt(formatter),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Open(ref err) => Some(err),
            Error::UnsupportedBitDepth(..) => None,
            Error::Decode(ref err) => Some(err),
            Error::Io(ref err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

/// A type for results generated by Flacook where the error type is hard-wired.
pub type Result<T> = result::Result<T, Error>;

#[test]
fn verify_error_messages_name_the_cause() {
    let err = Error::UnsupportedBitDepth(12);
    assert_eq!(format!("{}", err), "unsupported bit depth: 12 bits per sample");

    let err = Error::Decode(claxon::Error::FormatError("frame CRC mismatch"));
    assert!(format!("{}", err).starts_with("failed to decode frame: "));
    assert!(error::Error::source(&err).is_some());
}

#[test]
fn verify_io_error_converts() {
    let io_err = io::Error::new(io::ErrorKind::AlreadyExists, "exists");
    match Error::from(io_err) {
        Error::Io(err) => assert_eq!(err.kind(), io::ErrorKind::AlreadyExists),
        other => panic!("unexpected error {:?}", other),
    }
}
