use std::path::PathBuf;

use myarch_format::{ExtractError, OpenError, WriteError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to open archive '{}'", path.display())]
    OpenArchive {
        path: PathBuf,
        #[source]
        source: OpenError,
    },

    #[error("Archive '{}' already exists; pass --force to replace it", path.display())]
    ArchiveExists { path: PathBuf },

    #[error("Cowardly refusing to archive '{}' into itself", path.display())]
    ArchiveInsideSource { path: PathBuf },

    #[error("Compression level {0} is out of range [0-9]")]
    InvalidLevel(u32),

    #[error("Failed to create archive '{}'", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: WriteError,
    },

    #[error("Failed to process '{}'", path.display())]
    ProcessFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Extraction failed")]
    Extract {
        #[source]
        source: ExtractError,
    },

    #[error("Archive '{}' failed validation", path.display())]
    Validate {
        path: PathBuf,
        #[source]
        source: ExtractError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
