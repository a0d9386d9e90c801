// Flacook -- Raw PCM extraction from FLAC streams
// Copyright 2026 The Flacook Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

#![no_main]

use std::io::Cursor;

use flacook::{Decoder, Md5Sink};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let decoder = match Decoder::new(Cursor::new(data)) {
        Ok(d) => d,
        Err(..) => return,
    };

    // Whatever the input, the decoder must either finish or fail cleanly.
    let mut sink = Md5Sink::new();
    let _ = decoder.run(&mut sink);
    let _ = sink.finish_hex();
});
