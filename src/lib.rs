// Flacook -- Raw PCM extraction from FLAC streams
// Copyright 2026 The Flacook Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! Flacook decodes FLAC streams into raw interleaved PCM.
//!
//! The actual FLAC decoding is done by [Claxon][claxon]. Flacook drives the
//! decoder frame by frame, interleaves the channels of every frame, and hands
//! the resulting blocks to a [`Sink`](sink/trait.Sink.html): a raw file
//! writer, a digest, an audio device, or anything else that implements the
//! trait.
//!
//! Interleaved samples are normalized to 32 bits: a sample with bit depth `d`
//! is shifted left by `32 - d`. Only bit depths 8, 16, and 24 are supported.
//! Sinks that produce bytes pack every sample back into `d / 8` little-endian
//! bytes, which is the headerless raw format that tools like SoX read.
//!
//! # Examples
//!
//! Converting a file to raw PCM:
//!
//! ```no_run
//! let conversion = flacook::convert::flac_to_raw("song.flac", "song.raw").unwrap();
//! println!("{}", conversion.format);
//! ```
//!
//! Checking the decoded audio against the MD5 signature in the stream:
//!
//! ```no_run
//! use flacook::{Decoder, Md5Sink};
//!
//! let decoder = Decoder::open("song.flac").unwrap();
//! let expected = decoder.streaminfo().md5sum_hex();
//! let mut sink = Md5Sink::new();
//! decoder.run(&mut sink).unwrap();
//! assert_eq!(sink.finish_hex(), expected);
//! ```
//!
//! [claxon]: https://docs.rs/claxon

#![warn(missing_docs)]

pub mod convert;
pub mod decode;
pub mod device;
pub mod error;
pub mod frame;
pub mod metadata;
pub mod sample;
pub mod sink;
pub mod stream;

#[cfg(feature = "alsa")]
pub mod alsa_device;

pub use decode::{Decoder, Summary};
pub use error::{Error, Result};
pub use frame::{Frame, Interleaver};
pub use metadata::{Format, StreamInfo};
pub use sample::BitDepth;
pub use sink::{DevicePump, DigestSink, Md5Sink, RawWriter, Sink};
pub use stream::{FlacSource, FrameSource};
