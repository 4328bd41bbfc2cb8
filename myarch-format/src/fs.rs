//! Filesystem collaborators: tree enumeration, an [`EntrySource`] reading from
//! disk, an [`EntrySink`] writing below a destination directory, and the
//! create/extract entry points built on them.

use std::collections::HashMap;
use std::fs;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use tempfile::NamedTempFile;

use crate::{
    ArchivePath, ArchiveReader, ArchiveWriter, EncodeOptions, EntryKind, EntrySink, EntrySource,
    ExtractError, ExtractOptions, ExtractStats, OpenError, WriteError, WriteStats,
};

/// One enumerated filesystem item, ready to be registered with an
/// [`ArchiveWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedEntry {
    pub path: ArchivePath,
    pub kind: EntryKind,
    /// File size at enumeration time, 0 for directories.
    pub size: u64,
    /// Where the entry lives on disk.
    pub fs_path: PathBuf,
}

fn walk_error(e: jwalk::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}

fn to_archive_path(relative: &Path) -> io::Result<ArchivePath> {
    ArchivePath::new(relative).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{}: {}", relative.display(), e),
        )
    })
}

/// Lists everything below `root`, parents before children and siblings
/// sorted by name. Hidden files are included. `root` itself is not an entry.
///
/// When `root` is a regular file the result is that single file, named by its
/// basename.
pub fn enumerate<P: AsRef<Path>>(root: P) -> io::Result<Vec<CollectedEntry>> {
    let root = root.as_ref();
    let meta = fs::metadata(root)?;

    if meta.is_file() {
        let name = root.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} has no file name", root.display()),
            )
        })?;
        return Ok(vec![CollectedEntry {
            path: to_archive_path(Path::new(name))?,
            kind: EntryKind::File,
            size: meta.len(),
            fs_path: root.to_path_buf(),
        }]);
    }

    let mut out = vec![];

    for entry in WalkDir::new(root).sort(true).skip_hidden(false) {
        let entry = entry.map_err(walk_error)?;
        if entry.depth == 0 {
            continue;
        }

        let fs_path = entry.path();
        let relative = fs_path
            .strip_prefix(root)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        let file_type = entry.file_type();
        let (kind, size) = if file_type.is_dir() {
            (EntryKind::Directory, 0)
        } else if file_type.is_file() {
            (EntryKind::File, entry.metadata().map_err(walk_error)?.len())
        } else {
            tracing::debug!(path = %fs_path.display(), "skipping entry that is neither file nor directory");
            continue;
        };

        out.push(CollectedEntry {
            path: to_archive_path(relative)?,
            kind,
            size,
            fs_path,
        });
    }

    tracing::debug!(root = %root.display(), entries = out.len(), "enumerated tree");
    Ok(out)
}

/// Reads file contents from disk.
#[derive(Debug, Clone)]
pub struct FsSource {
    base: PathBuf,
    known: HashMap<ArchivePath, PathBuf>,
}

impl FsSource {
    /// Resolves archive paths against `root`, or against its parent directory
    /// when `root` is a file.
    pub fn new<P: AsRef<Path>>(root: P) -> FsSource {
        let root = root.as_ref();
        let base = if root.is_file() {
            root.parent().map(Path::to_path_buf).unwrap_or_default()
        } else {
            root.to_path_buf()
        };

        FsSource {
            base,
            known: HashMap::new(),
        }
    }

    /// Reads from the exact on-disk locations recorded during enumeration.
    pub fn with_entries(mut self, entries: &[CollectedEntry]) -> FsSource {
        self.known = entries
            .iter()
            .filter(|e| e.kind == EntryKind::File)
            .map(|e| (e.path.clone(), e.fs_path.clone()))
            .collect();
        self
    }

    fn resolve(&self, path: &ArchivePath) -> PathBuf {
        match self.known.get(path) {
            Some(p) => p.clone(),
            None => self.base.join(path.to_path_buf()),
        }
    }
}

impl EntrySource for FsSource {
    fn read_file(&mut self, path: &ArchivePath) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(path))
    }
}

/// Recreates entries below a destination directory.
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new<P: Into<PathBuf>>(root: P) -> FsSink {
        FsSink { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl EntrySink for FsSink {
    fn create_directory(&mut self, path: &ArchivePath) -> io::Result<()> {
        fs::create_dir_all(self.root.join(path.to_path_buf()))
    }

    fn write_file(&mut self, path: &ArchivePath, data: &[u8]) -> io::Result<()> {
        fs::write(self.root.join(path.to_path_buf()), data)
    }
}

/// Archives everything below `root` into `archive_path`.
///
/// The archive is written to a temporary file next to `archive_path` and only
/// renamed into place once encoding succeeded, so a failure never leaves a
/// partial archive behind. An existing file at `archive_path` is replaced.
pub fn create_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    root: P,
    archive_path: Q,
    options: EncodeOptions,
) -> Result<WriteStats, WriteError> {
    let root = root.as_ref();
    let archive_path = archive_path.as_ref();

    let entries =
        enumerate(root).map_err(|e| WriteError::EnumerateFailed(e, root.to_path_buf()))?;

    let mut writer = ArchiveWriter::new(options);
    for entry in entries.iter() {
        match entry.kind {
            EntryKind::Directory => writer.mkdir(entry.path.clone())?,
            EntryKind::File => writer.insert(entry.path.clone(), entry.size)?,
        }
    }

    let dir = match archive_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| WriteError::CreateArchiveFailed(e, archive_path.to_path_buf()))?;

    let source = FsSource::new(root).with_entries(&entries);
    let stats = writer.write(BufWriter::new(tmp.as_file_mut()), source)?;

    tmp.persist(archive_path)
        .map_err(|e| WriteError::CreateArchiveFailed(e.error, archive_path.to_path_buf()))?;

    tracing::debug!(
        archive = %archive_path.display(),
        size_hint = writer.size_hint(),
        "persisted archive"
    );

    Ok(stats)
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractArchiveError {
    #[error(transparent)]
    Open(#[from] OpenError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Creating destination directory failed. Path: '{}'", .1.display())]
    CreateDestinationFailed(#[source] io::Error, PathBuf),
}

/// Opens `archive_path` and recreates its contents below `dest`.
pub fn extract_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    dest: Q,
    options: ExtractOptions,
) -> Result<ExtractStats, ExtractArchiveError> {
    let dest = dest.as_ref();
    let reader = ArchiveReader::open(archive_path)?;

    fs::create_dir_all(dest)
        .map_err(|e| ExtractArchiveError::CreateDestinationFailed(e, dest.to_path_buf()))?;

    Ok(reader.extract_all(FsSink::new(dest), options)?)
}
