//! Integrity protection applied to each file payload.

use std::fmt;

pub mod constants {
    /// Protection ID for payloads without a checksum. The stored checksum is always 0.
    pub const PROTECTION_NONE: u8 = 0x00;
    /// Protection ID for CRC-32/IEEE over the uncompressed bytes.
    pub const PROTECTION_CRC32: u8 = 0x01;
}

use self::constants::*;

/// Integrity scheme identifier, recorded once in the archive header.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub enum Protection {
    None,
    Crc32,
    Unknown(u8),
}

impl Default for Protection {
    fn default() -> Self {
        Protection::Crc32
    }
}

impl Protection {
    pub const fn available_variants() -> &'static [&'static str] {
        &["none", "crc32"]
    }

    pub const fn id(self) -> u8 {
        match self {
            Protection::None => PROTECTION_NONE,
            Protection::Crc32 => PROTECTION_CRC32,
            Protection::Unknown(id) => id,
        }
    }

    pub const fn from_id(id: u8) -> Self {
        match id {
            PROTECTION_NONE => Protection::None,
            PROTECTION_CRC32 => Protection::Crc32,
            id => Protection::Unknown(id),
        }
    }

    pub const fn is_known(self) -> bool {
        !matches!(self, Protection::Unknown(_))
    }

    /// Computes the checksum of `data` under this scheme.
    ///
    /// `None` always yields 0, and so does `Unknown`: callers reject unknown
    /// schemes before any payload is processed.
    pub fn compute(self, data: &[u8]) -> u32 {
        match self {
            Protection::Crc32 => crc32fast::hash(data),
            Protection::None | Protection::Unknown(_) => 0,
        }
    }
}

impl fmt::Display for Protection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protection::None => write!(f, "none"),
            Protection::Crc32 => write!(f, "CRC-32"),
            Protection::Unknown(id) => write!(f, "Unknown(id: {:x})", id),
        }
    }
}

impl fmt::Debug for Protection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
