//! Byte-oriented run-length coding.
//!
//! Each maximal run of equal bytes becomes one or more `(byte, count)` pairs,
//! with `count` in `1..=255`. Runs longer than 255 are split.

use std::io::{Error, ErrorKind, Result};

const MAX_RUN: usize = u8::MAX as usize;

pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < data.len() {
        let byte = data[i];
        let run = data[i..]
            .iter()
            .take(MAX_RUN)
            .take_while(|&&b| b == byte)
            .count();

        out.push(byte);
        out.push(run as u8);
        i += run;
    }

    out
}

pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() % 2 != 0 {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!("run-length stream has odd length {}", data.len()),
        ));
    }

    let expanded: usize = data.chunks_exact(2).map(|pair| pair[1] as usize).sum();
    let mut out = Vec::with_capacity(expanded);

    for (index, pair) in data.chunks_exact(2).enumerate() {
        let (byte, count) = (pair[0], pair[1]);
        if count == 0 {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("zero-length run at pair {}", index),
            ));
        }
        out.resize(out.len() + count as usize, byte);
    }

    Ok(out)
}
