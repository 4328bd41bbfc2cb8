use std::io::Result;

use crate::path::ArchivePath;

pub mod reader;
pub mod writer;

/// Supplies the bytes of file entries while an archive is written.
pub trait EntrySource {
    fn read_file(&mut self, path: &ArchivePath) -> Result<Vec<u8>>;
}

/// Receives directories and verified file contents while an archive is extracted.
pub trait EntrySink {
    /// Must succeed when the directory already exists.
    fn create_directory(&mut self, path: &ArchivePath) -> Result<()>;

    fn write_file(&mut self, path: &ArchivePath, data: &[u8]) -> Result<()>;
}

impl<S: EntrySource + ?Sized> EntrySource for &mut S {
    fn read_file(&mut self, path: &ArchivePath) -> Result<Vec<u8>> {
        (**self).read_file(path)
    }
}

impl<S: EntrySink + ?Sized> EntrySink for &mut S {
    fn create_directory(&mut self, path: &ArchivePath) -> Result<()> {
        (**self).create_directory(path)
    }

    fn write_file(&mut self, path: &ArchivePath, data: &[u8]) -> Result<()> {
        (**self).write_file(path, data)
    }
}
