//! Reader and writer for `MYARCH` archives: a fixed header, a metadata table
//! describing every entry, and one payload record per file.

pub mod checksum;
pub mod compression;
mod counting;
mod de;
mod file;
pub mod fs;
mod header;
pub mod path;
mod record;
mod ser;

pub use checksum::Protection;
pub use compression::Compression;
pub use file::reader::{
    ArchiveReader, ExtractError, ExtractOptions, ExtractStats, OpenError, ValidateStats,
};
pub use file::writer::{ArchiveWriter, EncodeOptions, WriteError, WriteStats};
pub use file::{EntrySink, EntrySource};
pub use header::{ArchiveHeader, FormatVersion, HEADER_LEN, SIGNATURE};
pub use path::ArchivePath;
pub use record::{Entry, EntryKind, PayloadRecord};
