//! Context-based compression: DEFLATE in a zlib frame.

use std::io::{Read, Result, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

pub const DEFAULT_LEVEL: u32 = 6;
pub const MAX_LEVEL: u32 = 9;

pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let level = flate2::Compression::new(level.min(MAX_LEVEL));
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), level);
    encoder.write_all(data)?;
    encoder.finish()
}

pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    ZlibDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}
