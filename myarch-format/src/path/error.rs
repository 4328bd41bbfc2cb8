#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntoArchivePathError {
    #[error("unrepresentable string found in path")]
    UnrepresentableStr,

    #[error("non-canonical path found in archive")]
    NonCanonical,

    #[error("no path provided")]
    EmptyPath,

    #[error("path is {0} bytes long, the limit is 65535")]
    TooLong(usize),
}
