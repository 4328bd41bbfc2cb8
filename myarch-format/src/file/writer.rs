use std::collections::HashSet;
use std::convert::TryFrom;
use std::io::Write;
use std::path::PathBuf;

use super::EntrySource;
use crate::{
    compression::deflate::DEFAULT_LEVEL,
    counting::CountingWriter,
    header::ArchiveHeader,
    path::ArchivePath,
    record::{Entry, PayloadRecord},
    ser::Serialize,
    Compression, Protection,
};

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Path already exists in archive. Path: '{0}'")]
    DuplicatePath(ArchivePath),

    #[error("Too many entries for a single archive: {0}")]
    TooManyEntries(usize),

    #[error("Unsupported compression scheme: {0}")]
    UnsupportedCompression(Compression),

    #[error("Unsupported protection scheme: {0}")]
    UnsupportedProtection(Protection),

    #[error("Reading source file failed. Path: '{1}'")]
    ReadSourceFailed(#[source] std::io::Error, ArchivePath),

    #[error("Compressing file failed. Path: '{1}'")]
    CompressionFailed(#[source] std::io::Error, ArchivePath),

    #[error("Writing archive data failed.")]
    WriteFailed(#[source] std::io::Error),

    #[error("Collecting entries failed. Path: '{}'", .1.display())]
    EnumerateFailed(#[source] std::io::Error, PathBuf),

    #[error("Creating archive failed. Path: '{}'", .1.display())]
    CreateArchiveFailed(#[source] std::io::Error, PathBuf),
}

/// Scheme selection for a new archive. Applies to every file in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub compression: Compression,
    pub protection: Protection,
    /// DEFLATE level, 0-9. Ignored by the other schemes.
    pub level: u32,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            compression: Compression::Stored,
            protection: Protection::Crc32,
            level: DEFAULT_LEVEL,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WriteStats {
    /// Entries in the metadata table.
    pub entries: u64,
    /// Payload records written.
    pub files: u64,
    /// Uncompressed bytes read from the source.
    pub bytes_read: u64,
    /// Total size of the archive.
    pub bytes_written: u64,
}

/// Collects the ordered entry list of an archive, then writes it in one pass.
#[derive(Debug, Default)]
pub struct ArchiveWriter {
    options: EncodeOptions,
    entries: Vec<Entry>,
    known: HashSet<ArchivePath>,
    size_hint: u64,
}

impl ArchiveWriter {
    pub fn new(options: EncodeOptions) -> ArchiveWriter {
        ArchiveWriter {
            options,
            ..Default::default()
        }
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: EncodeOptions) {
        self.options = options;
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Sum of the size hints given to [`ArchiveWriter::insert`].
    pub fn size_hint(&self) -> u64 {
        self.size_hint
    }

    pub fn mkdir(&mut self, path: ArchivePath) -> Result<(), WriteError> {
        self.push(Entry::directory(path))
    }

    /// Registers a file entry. Its bytes are only requested from the
    /// [`EntrySource`] once [`ArchiveWriter::write`] reaches the payload section.
    pub fn insert(&mut self, path: ArchivePath, size_hint: u64) -> Result<(), WriteError> {
        self.push(Entry::file(path))?;
        self.size_hint += size_hint;
        Ok(())
    }

    fn push(&mut self, entry: Entry) -> Result<(), WriteError> {
        if !self.known.insert(entry.path.clone()) {
            return Err(WriteError::DuplicatePath(entry.path));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Writes the header, the full metadata table, then one payload record per
    /// file entry in table order.
    ///
    /// Any failure aborts immediately; whatever was already written to `writer`
    /// is an incomplete archive that readers reject.
    pub fn write<W: Write, S: EntrySource>(
        &self,
        writer: W,
        mut source: S,
    ) -> Result<WriteStats, WriteError> {
        let EncodeOptions {
            compression,
            protection,
            level,
        } = self.options;

        if !compression.is_known() {
            return Err(WriteError::UnsupportedCompression(compression));
        }
        if !protection.is_known() {
            return Err(WriteError::UnsupportedProtection(protection));
        }

        let entry_count = u32::try_from(self.entries.len())
            .map_err(|_| WriteError::TooManyEntries(self.entries.len()))?;

        let mut writer = CountingWriter::new(writer);

        ArchiveHeader::new(compression, protection, entry_count)
            .write(&mut writer)
            .map_err(WriteError::WriteFailed)?;
        self.entries[..]
            .write(&mut writer)
            .map_err(WriteError::WriteFailed)?;

        tracing::debug!(
            entries = entry_count,
            bytes = writer.bytes_written(),
            %compression,
            %protection,
            "wrote metadata table"
        );

        let mut stats = WriteStats {
            entries: entry_count as u64,
            ..Default::default()
        };

        for entry in self.entries.iter().filter(|e| e.is_file()) {
            let raw = source
                .read_file(&entry.path)
                .map_err(|e| WriteError::ReadSourceFailed(e, entry.path.clone()))?;

            let checksum = protection.compute(&raw);
            let data = compression
                .compress(&raw, level)
                .map_err(|e| WriteError::CompressionFailed(e, entry.path.clone()))?;
            let record = PayloadRecord { checksum, data };

            record.write(&mut writer).map_err(WriteError::WriteFailed)?;

            tracing::trace!(
                path = %entry.path,
                raw = raw.len(),
                compressed = record.compressed_size(),
                checksum = format_args!("{:08x}", checksum),
                "wrote payload record"
            );

            stats.files += 1;
            stats.bytes_read += raw.len() as u64;
        }

        writer.flush().map_err(WriteError::WriteFailed)?;
        stats.bytes_written = writer.bytes_written();

        tracing::info!(
            entries = stats.entries,
            files = stats.files,
            bytes_read = stats.bytes_read,
            bytes_written = stats.bytes_written,
            "archive written"
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoFiles;

    impl EntrySource for NoFiles {
        fn read_file(&mut self, path: &ArchivePath) -> std::io::Result<Vec<u8>> {
            Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                path.to_string(),
            ))
        }
    }

    struct Fixed(&'static [u8]);

    impl EntrySource for Fixed {
        fn read_file(&mut self, _path: &ArchivePath) -> std::io::Result<Vec<u8>> {
            Ok(self.0.to_vec())
        }
    }

    #[test]
    fn duplicate_paths_are_rejected() {
        let mut writer = ArchiveWriter::default();
        writer.mkdir(ArchivePath::new("a").unwrap()).unwrap();
        let err = writer.insert(ArchivePath::new("./a").unwrap(), 0).unwrap_err();
        assert!(matches!(err, WriteError::DuplicatePath(p) if p.as_str() == "a"));
        assert_eq!(writer.entries().len(), 1);
    }

    #[test]
    fn empty_archive_is_just_a_header() {
        let writer = ArchiveWriter::default();
        let mut out = vec![];
        let stats = writer.write(&mut out, NoFiles).unwrap();
        assert_eq!(out, b"MYARCH\x01\x01\x00\x01\x00\x00\x00\x00");
        assert_eq!(stats.bytes_written, 14);
    }

    #[test]
    fn directories_read_nothing() {
        let mut writer = ArchiveWriter::default();
        writer.mkdir(ArchivePath::new("only/dirs").unwrap()).unwrap();
        let mut out = vec![];
        let stats = writer.write(&mut out, NoFiles).unwrap();
        assert_eq!(stats.files, 0);
        assert_eq!(out.len(), 14 + 2 + 9 + 1);
    }

    #[test]
    fn empty_file_with_run_length_and_crc32() {
        let mut writer = ArchiveWriter::new(EncodeOptions {
            compression: Compression::RunLength,
            protection: Protection::Crc32,
            ..Default::default()
        });
        writer.insert(ArchivePath::new("empty").unwrap(), 0).unwrap();

        let mut out = vec![];
        writer.write(&mut out, Fixed(b"")).unwrap();

        let mut expected = b"MYARCH\x01\x01\x02\x01\x01\x00\x00\x00".to_vec();
        expected.extend_from_slice(b"\x05\x00empty\x00");
        expected.extend_from_slice(&crc32fast::hash(b"").to_le_bytes());
        expected.extend_from_slice(&0u64.to_le_bytes());
        assert_eq!(out, expected);
    }

    #[test]
    fn unknown_schemes_are_refused_before_writing() {
        let writer = ArchiveWriter::new(EncodeOptions {
            compression: Compression::Unknown(0x42),
            ..Default::default()
        });
        let mut out = vec![];
        assert!(matches!(
            writer.write(&mut out, NoFiles),
            Err(WriteError::UnsupportedCompression(Compression::Unknown(0x42)))
        ));
        assert!(out.is_empty());

        let writer = ArchiveWriter::new(EncodeOptions {
            protection: Protection::Unknown(3),
            ..Default::default()
        });
        assert!(matches!(
            writer.write(&mut out, NoFiles),
            Err(WriteError::UnsupportedProtection(Protection::Unknown(3)))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn size_hints_accumulate() {
        let mut writer = ArchiveWriter::default();
        writer.insert(ArchivePath::new("a").unwrap(), 10).unwrap();
        writer.insert(ArchivePath::new("b").unwrap(), 32).unwrap();
        assert_eq!(writer.size_hint(), 42);
    }
}
