use std::fmt;

use crate::path::ArchivePath;

pub mod constants {
    /// Entry kind byte for a regular file.
    pub const ENTRY_KIND_FILE: u8 = 0x00;
    /// Entry kind byte for a directory.
    pub const ENTRY_KIND_DIRECTORY: u8 = 0x01;
}

use self::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    #[inline(always)]
    pub const fn id(self) -> u8 {
        match self {
            EntryKind::File => ENTRY_KIND_FILE,
            EntryKind::Directory => ENTRY_KIND_DIRECTORY,
        }
    }

    #[inline(always)]
    pub const fn from_id(id: u8) -> Option<EntryKind> {
        match id {
            ENTRY_KIND_FILE => Some(EntryKind::File),
            ENTRY_KIND_DIRECTORY => Some(EntryKind::Directory),
            _ => None,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Directory => write!(f, "directory"),
        }
    }
}

/// One row of the metadata table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The path of the entry, relative to the archive root.
    pub path: ArchivePath,

    pub kind: EntryKind,
}

impl Entry {
    pub fn file(path: ArchivePath) -> Entry {
        Entry {
            path,
            kind: EntryKind::File,
        }
    }

    pub fn directory(path: ArchivePath) -> Entry {
        Entry {
            path,
            kind: EntryKind::Directory,
        }
    }

    #[inline(always)]
    pub fn path(&self) -> &ArchivePath {
        &self.path
    }

    #[inline(always)]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    #[inline(always)]
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// The payload of a file entry: checksum of the original bytes, then the
/// compressed bytes prefixed by their length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadRecord {
    /// Checksum of the uncompressed bytes; 0 when protection is disabled.
    pub checksum: u32,

    /// The compressed bytes, exactly `compressed_size` long.
    pub data: Vec<u8>,
}

impl PayloadRecord {
    #[inline(always)]
    pub fn compressed_size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Bytes this record occupies in the archive.
    #[inline(always)]
    pub fn encoded_len(&self) -> u64 {
        4 + 8 + self.compressed_size()
    }
}
