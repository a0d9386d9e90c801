// Flacook -- Raw PCM extraction from FLAC streams
// Copyright 2026 The Flacook Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

#![no_main]

use std::io::Cursor;

use flacook::{Decoder, Format, RawWriter};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let decoder = match Decoder::new(Cursor::new(data)) {
        Ok(d) => d,
        Err(..) => return,
    };
    let format: Format = *decoder.format();

    let mut writer = RawWriter::new(Vec::new());
    if let Ok(summary) = decoder.run(&mut writer) {
        let bytes = writer.finish().unwrap();
        let expected = summary.samples * format.channels as u64 * format.depth.bytes() as u64;
        assert_eq!(bytes.len() as u64, expected);
    }
});
