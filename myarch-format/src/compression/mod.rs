//! Compression support for the archive format.
//!
//! Every file payload in an archive is compressed with the single scheme named
//! in the header. All schemes work on complete buffers:
//! - [`Compression::Stored`] keeps bytes as they are.
//! - [`Compression::Deflate`] is DEFLATE wrapped in a zlib frame (see [`deflate`]).
//! - [`Compression::RunLength`] is the `(byte, count)` scheme in [`rle`].

use std::fmt;
use std::io::{Error, ErrorKind, Result};

pub mod deflate;
pub mod rle;

pub mod constants {
    /// Compression ID for stored (uncompressed) data.
    pub const COMPRESSION_STORED: u8 = 0x00;
    /// Compression ID for zlib-framed DEFLATE data.
    pub const COMPRESSION_DEFLATE: u8 = 0x01;
    /// Compression ID for run-length coded data.
    pub const COMPRESSION_RUN_LENGTH: u8 = 0x02;
}

use self::constants::*;

/// Compression algorithm identifier.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub enum Compression {
    Stored,
    Deflate,
    RunLength,
    Unknown(u8),
}

impl Default for Compression {
    fn default() -> Self {
        Compression::Stored
    }
}

impl Compression {
    pub const fn available_variants() -> &'static [&'static str] {
        &["stored", "deflate", "rle"]
    }

    pub const fn id(self) -> u8 {
        match self {
            Compression::Stored => COMPRESSION_STORED,
            Compression::Deflate => COMPRESSION_DEFLATE,
            Compression::RunLength => COMPRESSION_RUN_LENGTH,
            Compression::Unknown(id) => id,
        }
    }

    pub const fn from_id(id: u8) -> Self {
        match id {
            COMPRESSION_STORED => Compression::Stored,
            COMPRESSION_DEFLATE => Compression::Deflate,
            COMPRESSION_RUN_LENGTH => Compression::RunLength,
            id => Compression::Unknown(id),
        }
    }

    pub const fn is_known(self) -> bool {
        !matches!(self, Compression::Unknown(_))
    }

    /// Compresses a whole buffer. `level` only affects [`Compression::Deflate`].
    pub fn compress(self, data: &[u8], level: u32) -> Result<Vec<u8>> {
        match self {
            Compression::Stored => Ok(data.to_vec()),
            Compression::Deflate => deflate::compress(data, level),
            Compression::RunLength => Ok(rle::encode(data)),
            Compression::Unknown(id) => Err(unsupported(id)),
        }
    }

    pub fn decompress(self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Compression::Stored => Ok(data.to_vec()),
            Compression::Deflate => deflate::decompress(data),
            Compression::RunLength => rle::decode(data),
            Compression::Unknown(id) => Err(unsupported(id)),
        }
    }
}

fn unsupported(id: u8) -> Error {
    Error::new(
        ErrorKind::InvalidInput,
        format!("unsupported compression scheme with id {}", id),
    )
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compression::Stored => write!(f, "stored"),
            Compression::Deflate => write!(f, "DEFLATE"),
            Compression::RunLength => write!(f, "RLE"),
            Compression::Unknown(id) => write!(f, "Unknown(id: {:x})", id),
        }
    }
}

impl fmt::Debug for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Compression; 3] = [
        Compression::Stored,
        Compression::Deflate,
        Compression::RunLength,
    ];

    #[test]
    fn ids_match_the_header_table() {
        assert_eq!(Compression::Stored.id(), 0);
        assert_eq!(Compression::Deflate.id(), 1);
        assert_eq!(Compression::RunLength.id(), 2);
        for c in ALL.iter() {
            assert_eq!(Compression::from_id(c.id()), *c);
        }
        assert_eq!(Compression::from_id(0x30), Compression::Unknown(0x30));
    }

    #[test]
    fn roundtrip_each_scheme() {
        let data = b"aaaaaaaaaaaaaaabbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbcdefghij\0\0\0\0";
        for c in ALL.iter() {
            let compressed = c.compress(data, deflate::DEFAULT_LEVEL).unwrap();
            assert_eq!(c.decompress(&compressed).unwrap(), &data[..], "{}", c);
        }
    }

    #[test]
    fn empty_input() {
        for c in ALL.iter() {
            let compressed = c.compress(b"", deflate::DEFAULT_LEVEL).unwrap();
            assert!(c.decompress(&compressed).unwrap().is_empty(), "{}", c);
        }
        assert!(Compression::Stored.compress(b"", 6).unwrap().is_empty());
        assert!(Compression::RunLength.compress(b"", 6).unwrap().is_empty());
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        let err = Compression::Unknown(9).compress(b"x", 6).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let err = Compression::Unknown(9).decompress(b"x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
