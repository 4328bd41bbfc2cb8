use std::fmt;

use crate::{Compression, Protection};

/// Make some attempt to not accidentally load plain text files.
pub const SIGNATURE: &[u8; 6] = b"MYARCH";

/// Size of the serialized header in bytes.
pub const HEADER_LEN: u64 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FormatVersion {
    pub major: u8,
    pub minor: u8,
}

impl FormatVersion {
    /// The version written by this implementation.
    pub const CURRENT: FormatVersion = FormatVersion { major: 1, minor: 1 };

    pub const fn new(major: u8, minor: u8) -> FormatVersion {
        FormatVersion { major, minor }
    }

    /// Only the current major is readable. Minors up to the current one share
    /// its layout; anything newer may carry fields this reader cannot skip.
    pub fn is_supported(self) -> bool {
        self.major == Self::CURRENT.major && self.minor <= Self::CURRENT.minor
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHeader {
    pub(crate) signature: [u8; 6],
    pub(crate) version: FormatVersion,
    pub(crate) compression: Compression,
    pub(crate) protection: Protection,
    pub(crate) entry_count: u32,
}

impl ArchiveHeader {
    pub(crate) fn new(
        compression: Compression,
        protection: Protection,
        entry_count: u32,
    ) -> ArchiveHeader {
        ArchiveHeader {
            signature: *SIGNATURE,
            version: FormatVersion::CURRENT,
            compression,
            protection,
            entry_count,
        }
    }

    pub fn version(&self) -> FormatVersion {
        self.version
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn protection(&self) -> Protection {
        self.protection
    }

    pub fn entry_count(&self) -> u32 {
        self.entry_count
    }
}
