use humansize::{file_size_opts as options, FileSize};
use myarch_format::{Entry, EntryKind};

/// Human readable size with binary units.
pub fn format_size(size: u64) -> String {
    size.file_size(options::BINARY)
        .unwrap_or_else(|_| size.to_string())
}

/// Platform path of an entry, with a trailing separator for directories.
#[inline(always)]
pub fn format_path(entry: &Entry) -> String {
    let mut path = entry.path.to_path_buf().display().to_string();
    if entry.kind == EntryKind::Directory {
        path.push(std::path::MAIN_SEPARATOR);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use myarch_format::ArchivePath;

    #[test]
    fn directories_get_a_trailing_separator() {
        let dir = Entry::directory(ArchivePath::new("a/b").unwrap());
        let file = Entry::file(ArchivePath::new("a/b/c").unwrap());
        let sep = std::path::MAIN_SEPARATOR;
        assert_eq!(format_path(&dir), format!("a{}b{}", sep, sep));
        assert_eq!(format_path(&file), format!("a{}b{}c", sep, sep));
    }

    #[test]
    fn sizes() {
        assert!(format_size(0).starts_with('0'));
        assert!(format_size(2048).contains("KiB"));
    }
}
