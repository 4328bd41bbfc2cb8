use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::EntrySink;
use crate::{
    counting::CountingReader,
    de::DeserializeOwned,
    header::{ArchiveHeader, FormatVersion, SIGNATURE},
    path::ArchivePath,
    record::{Entry, PayloadRecord},
    Compression, Protection,
};

#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("Could not read header. Is this a valid archive?")]
    MissingHeader(#[source] std::io::Error),

    #[error("Invalid signature {0:02x?}. This is not an archive.")]
    InvalidSignature([u8; 6]),

    #[error("Unsupported format version {0}.")]
    UnsupportedVersion(FormatVersion),

    #[error("Unsupported compression scheme: {0}")]
    UnsupportedCompression(Compression),

    #[error("Unsupported protection scheme: {0}")]
    UnsupportedProtection(Protection),

    #[error("Invalid metadata entry at index {1}.")]
    InvalidEntry(#[source] std::io::Error, u32),

    #[error("Path appears more than once in the metadata table. Path: '{0}'")]
    DuplicatePath(ArchivePath),

    #[error("Failed to read archive. Path: '{}'", .1.display())]
    ReadFailed(#[source] std::io::Error, PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Creating directory failed. Path: '{1}'")]
    CreateDirFailed(#[source] std::io::Error, ArchivePath),

    #[error("Writing file failed. Path: '{1}'")]
    WriteFileFailed(#[source] std::io::Error, ArchivePath),

    #[error("Payload record is truncated or unreadable. Path: '{1}'")]
    TruncatedRecord(#[source] std::io::Error, ArchivePath),

    #[error("Decompressing file failed. Path: '{1}'")]
    DecompressionFailed(#[source] std::io::Error, ArchivePath),

    #[error("Checksum mismatch, archive is corrupt. Path: '{path}' (expected {expected:08x}, found {actual:08x})")]
    ChecksumMismatch {
        path: ArchivePath,
        expected: u32,
        actual: u32,
    },
}

impl ExtractError {
    /// True when the archive bytes themselves are damaged, as opposed to a
    /// failure of the destination.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            ExtractError::TruncatedRecord(..)
                | ExtractError::DecompressionFailed(..)
                | ExtractError::ChecksumMismatch { .. }
        )
    }

    /// The archive path of the entry that failed.
    pub fn path(&self) -> &ArchivePath {
        match self {
            ExtractError::CreateDirFailed(_, path)
            | ExtractError::WriteFileFailed(_, path)
            | ExtractError::TruncatedRecord(_, path)
            | ExtractError::DecompressionFailed(_, path)
            | ExtractError::ChecksumMismatch { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Compare the stored checksum of every file before writing it out.
    pub verify_checksums: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            verify_checksums: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Number of files written.
    pub files_extracted: u64,
    /// Number of directory entries created.
    pub dirs_created: u64,
    /// Total uncompressed bytes handed to the sink.
    pub bytes_written: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidateStats {
    /// Number of payload records decoded.
    pub files_checked: u64,
    /// Total uncompressed bytes verified.
    pub bytes_checked: u64,
}

/// Reads an archive front to back.
///
/// The header and the complete metadata table are read when the reader is
/// created; payload records are then consumed in table order.
pub struct ArchiveReader<R> {
    reader: CountingReader<R>,
    header: ArchiveHeader,
    entries: Vec<Entry>,
    cursor: usize,
}

impl<R> std::fmt::Debug for ArchiveReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveReader")
            .field("header", &self.header)
            .field("entries", &self.entries)
            .field("cursor", &self.cursor)
            .finish()
    }
}

fn read_header<R: Read>(reader: &mut CountingReader<R>) -> Result<ArchiveHeader, OpenError> {
    let mut signature = [0u8; 6];
    reader
        .read_exact(&mut signature)
        .map_err(OpenError::MissingHeader)?;

    if &signature != SIGNATURE {
        return Err(OpenError::InvalidSignature(signature));
    }

    let version = FormatVersion::deserialize_owned(reader).map_err(OpenError::MissingHeader)?;
    if !version.is_supported() {
        return Err(OpenError::UnsupportedVersion(version));
    }

    let compression = Compression::deserialize_owned(reader).map_err(OpenError::MissingHeader)?;
    if !compression.is_known() {
        return Err(OpenError::UnsupportedCompression(compression));
    }

    let protection = Protection::deserialize_owned(reader).map_err(OpenError::MissingHeader)?;
    if !protection.is_known() {
        return Err(OpenError::UnsupportedProtection(protection));
    }

    let mut count = [0u8; 4];
    reader
        .read_exact(&mut count)
        .map_err(OpenError::MissingHeader)?;
    let entry_count = u32::from_le_bytes(count);

    tracing::debug!(
        end = format_args!("{:#x}", reader.position()),
        %version,
        %compression,
        %protection,
        entry_count,
        "deserialized ArchiveHeader"
    );

    Ok(ArchiveHeader {
        signature,
        version,
        compression,
        protection,
        entry_count,
    })
}

fn read_entries<R: Read>(
    reader: &mut CountingReader<R>,
    count: u32,
) -> Result<Vec<Entry>, OpenError> {
    let start = reader.position();

    // Every entry is at least 4 bytes, so don't let a damaged count reserve
    // more than the stream could possibly hold.
    let mut entries = Vec::with_capacity((count as usize).min(4096));
    let mut seen = HashSet::with_capacity(entries.capacity());

    for index in 0..count {
        let entry =
            Entry::deserialize_owned(reader).map_err(|e| OpenError::InvalidEntry(e, index))?;
        if !seen.insert(entry.path.clone()) {
            return Err(OpenError::DuplicatePath(entry.path));
        }
        entries.push(entry);
    }

    let end = reader.position();
    tracing::debug!(
        start = format_args!("{:#x}", start),
        end = format_args!("{:#x}", end),
        bytes = end - start,
        count,
        "deserialized metadata table"
    );

    Ok(entries)
}

impl ArchiveReader<BufReader<File>> {
    /// Opens an archive file and reads its header and metadata table.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, OpenError> {
        let file = File::open(path.as_ref())
            .map_err(|e| OpenError::ReadFailed(e, path.as_ref().to_path_buf()))?;
        ArchiveReader::new(BufReader::new(file))
    }
}

impl<R: Read> ArchiveReader<R> {
    pub fn new(reader: R) -> Result<Self, OpenError> {
        let mut reader = CountingReader::new(reader);
        let header = read_header(&mut reader)?;
        let entries = read_entries(&mut reader, header.entry_count)?;

        Ok(ArchiveReader {
            reader,
            header,
            entries,
            cursor: 0,
        })
    }

    #[inline(always)]
    pub fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    #[inline(always)]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Reads the payload record of the next file entry without decoding it.
    ///
    /// Returns the index of the entry the record belongs to, or `None` once
    /// every file entry has been consumed.
    pub fn next_record(&mut self) -> Result<Option<(usize, PayloadRecord)>, ExtractError> {
        let index = match self.entries[self.cursor..].iter().position(|e| e.is_file()) {
            Some(offset) => self.cursor + offset,
            None => {
                self.cursor = self.entries.len();
                return Ok(None);
            }
        };

        let record = self.read_record(index)?;
        Ok(Some((index, record)))
    }

    fn read_record(&mut self, index: usize) -> Result<PayloadRecord, ExtractError> {
        self.cursor = index + 1;
        let path = &self.entries[index].path;

        let start = self.reader.position();
        let record = PayloadRecord::deserialize_owned(&mut self.reader)
            .map_err(|e| ExtractError::TruncatedRecord(e, path.clone()))?;

        tracing::trace!(
            start = format_args!("{:#x}", start),
            end = format_args!("{:#x}", self.reader.position()),
            path = %path,
            compressed = record.compressed_size(),
            "deserialized PayloadRecord"
        );

        Ok(record)
    }

    /// Reads, decompresses and verifies the next file.
    pub fn next_file(&mut self) -> Result<Option<(Entry, Vec<u8>)>, ExtractError> {
        match self.next_record()? {
            Some((index, record)) => {
                let entry = self.entries[index].clone();
                let data = self.decode_record(&entry.path, record, true)?;
                Ok(Some((entry, data)))
            }
            None => Ok(None),
        }
    }

    fn decode_record(
        &self,
        path: &ArchivePath,
        record: PayloadRecord,
        verify: bool,
    ) -> Result<Vec<u8>, ExtractError> {
        let data = self
            .header
            .compression
            .decompress(&record.data)
            .map_err(|e| ExtractError::DecompressionFailed(e, path.clone()))?;

        if verify {
            let actual = self.header.protection.compute(&data);
            if actual != record.checksum {
                return Err(ExtractError::ChecksumMismatch {
                    path: path.clone(),
                    expected: record.checksum,
                    actual,
                });
            }
        }

        Ok(data)
    }

    /// Recreates every entry not yet consumed through `sink`, in table order.
    /// Entries already returned by [`ArchiveReader::next_record`] or
    /// [`ArchiveReader::next_file`] are skipped.
    ///
    /// Decoding stops at the first failure. Files before the failing entry
    /// have been written; nothing after it is.
    pub fn extract_all<S: EntrySink>(
        mut self,
        mut sink: S,
        options: ExtractOptions,
    ) -> Result<ExtractStats, ExtractError> {
        let mut stats = ExtractStats::default();

        for index in self.cursor..self.entries.len() {
            let entry = self.entries[index].clone();

            if entry.is_directory() {
                sink.create_directory(&entry.path)
                    .map_err(|e| ExtractError::CreateDirFailed(e, entry.path.clone()))?;
                stats.dirs_created += 1;
                continue;
            }

            if let Some(parent) = entry.path.parent() {
                sink.create_directory(&parent)
                    .map_err(|e| ExtractError::CreateDirFailed(e, parent.clone()))?;
            }

            let record = self.read_record(index)?;
            let data = self.decode_record(&entry.path, record, options.verify_checksums)?;

            sink.write_file(&entry.path, &data)
                .map_err(|e| ExtractError::WriteFileFailed(e, entry.path.clone()))?;

            tracing::debug!(path = %entry.path, bytes = data.len(), "extracted file");
            stats.files_extracted += 1;
            stats.bytes_written += data.len() as u64;
        }

        tracing::info!(
            files = stats.files_extracted,
            dirs = stats.dirs_created,
            bytes = stats.bytes_written,
            "archive extracted"
        );

        Ok(stats)
    }

    /// Decodes and verifies every payload not yet consumed, without writing
    /// anything.
    pub fn validate_all(mut self) -> Result<ValidateStats, ExtractError> {
        let mut stats = ValidateStats::default();

        while let Some((_, data)) = self.next_file()? {
            stats.files_checked += 1;
            stats.bytes_checked += data.len() as u64;
        }

        Ok(stats)
    }
}
