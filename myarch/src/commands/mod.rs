use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use myarch_format::ArchiveReader;

use crate::error::{Error, Result};

mod create;
mod extract;
mod info;
mod list;
mod validate;

pub use create::run as create;
pub use extract::run as extract;
pub use info::run as info;
pub use list::run as list;
pub use validate::run as validate;

fn open_archive(path: &Path) -> Result<ArchiveReader<BufReader<File>>> {
    ArchiveReader::open(path).map_err(|source| Error::OpenArchive {
        path: path.to_path_buf(),
        source,
    })
}
