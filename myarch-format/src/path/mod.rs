use std::{
    fmt,
    path::{Path, PathBuf},
};

mod error;

pub use self::error::IntoArchivePathError;

/// The separator used between segments of an `ArchivePath`, independent of
/// the platform the archive was created on.
pub const PATH_ARCHIVE_SEP: &str = "/";

/// Longest path that fits behind the u16 length prefix of a metadata entry.
pub const MAX_PATH_LEN: usize = u16::MAX as usize;

/// A relative, `/`-delimited, UTF-8 path as stored in the metadata table.
#[derive(Debug, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ArchivePath(pub(crate) String);

/// Characters no stored segment may contain. Anything else, including
/// whitespace and control characters, is kept exactly as the filesystem
/// reported it.
fn is_forbidden_char(c: char) -> bool {
    c == '\\' || c == '\0'
}

fn is_valid_segment(seg: &str) -> bool {
    !seg.is_empty() && seg != "." && seg != ".." && !seg.chars().any(is_forbidden_char)
}

/// Splits a platform path into archive segments. Root, prefix and `.`
/// components are dropped and `..` removes the previous segment; every other
/// component is kept byte for byte. `None` if a component is not UTF-8 or
/// contains a forbidden character.
pub fn sanitize<P: AsRef<Path>>(path: P) -> Option<Vec<String>> {
    use std::path::Component;

    let mut out = vec![];

    for component in path.as_ref().components() {
        match component {
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(os_str) => out.push(
                os_str
                    .to_str()
                    .filter(|x| !x.chars().any(is_forbidden_char))
                    .map(str::to_string)?,
            ),
        }
    }

    Some(out)
}

impl ArchivePath {
    /// Builds an `ArchivePath` from a platform path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<ArchivePath, IntoArchivePathError> {
        let out = sanitize(&path).ok_or(IntoArchivePathError::UnrepresentableStr)?;

        if out.is_empty() {
            return Err(IntoArchivePathError::EmptyPath);
        }

        let joined = out.join(PATH_ARCHIVE_SEP);
        if joined.len() > MAX_PATH_LEN {
            return Err(IntoArchivePathError::TooLong(joined.len()));
        }

        Ok(ArchivePath(joined))
    }

    /// Validates a path exactly as it was read from an archive.
    ///
    /// Accepts every path [`ArchivePath::new`] can produce and nothing else,
    /// so extraction can never escape its root.
    pub fn from_archive_str(s: &str) -> Result<ArchivePath, IntoArchivePathError> {
        if s.is_empty() {
            return Err(IntoArchivePathError::EmptyPath);
        }

        if s.len() > MAX_PATH_LEN {
            return Err(IntoArchivePathError::TooLong(s.len()));
        }

        if !s.split(PATH_ARCHIVE_SEP).all(is_valid_segment) {
            return Err(IntoArchivePathError::NonCanonical);
        }

        Ok(ArchivePath(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_path_buf(&self) -> PathBuf {
        self.iter().collect()
    }

    pub fn parent(&self) -> Option<ArchivePath> {
        self.0
            .rsplit_once(PATH_ARCHIVE_SEP)
            .map(|(parent, _)| ArchivePath(parent.to_string()))
    }

    pub fn iter(&self) -> std::str::Split<'_, &str> {
        self.0.split(PATH_ARCHIVE_SEP)
    }
}

impl fmt::Display for ArchivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitisation() {
        let path = ArchivePath::new("/something/../somethingelse/./foo.txt").unwrap();
        assert_eq!(path.0, "somethingelse/foo.txt");
        let path = ArchivePath::new("../something/../somethingelse/./foo.txt/.").unwrap();
        assert_eq!(path.0, "somethingelse/foo.txt");

        // Backslashes are separators on Windows and forbidden characters elsewhere
        let path = ArchivePath::new(r"..\something\..\somethingelse\.\foo.txt\.");

        #[cfg(not(windows))]
        assert!(path.is_err());
        #[cfg(windows)]
        assert_eq!(path.unwrap().0, "somethingelse/foo.txt");
    }

    #[test]
    fn sanitisation_null() {
        assert!(ArchivePath::new("\0").is_err());
        assert!(ArchivePath::new("a\0b").is_err());
    }

    #[test]
    fn sanitisation_empty() {
        assert_eq!(ArchivePath::new(""), Err(IntoArchivePathError::EmptyPath));
        assert_eq!(ArchivePath::new("/"), Err(IntoArchivePathError::EmptyPath));
    }

    #[test]
    fn names_are_kept_verbatim() {
        for name in &[" lead.txt", "trail.txt ", "x ", "a\nb", "tab\there", "e\u{301}.txt", "\u{e9}.txt"] {
            let path = ArchivePath::new(name).unwrap();
            assert_eq!(path.as_str(), *name);
            assert_eq!(ArchivePath::from_archive_str(name).unwrap(), path);
        }

        // NFD and NFC spellings stay distinct
        assert_ne!(
            ArchivePath::new("e\u{301}").unwrap(),
            ArchivePath::new("\u{e9}").unwrap()
        );
    }

    #[test]
    fn sanitisation_doubled_slashes() {
        let path = ArchivePath::new("/cant/hate//the/path").unwrap();
        assert_eq!(path.0, "cant/hate/the/path");
    }

    #[test]
    fn sanitisation_bidi() {
        let path = ArchivePath::new("this is now العَرَبِيَّة.txt").unwrap();
        assert_eq!(path.0, "this is now العَرَبِيَّة.txt");
    }

    #[test]
    fn sanitisation_icecube_emoji() {
        let path = ArchivePath::new("///🧊/🧊").unwrap();
        assert_eq!(path.0, "🧊/🧊");
    }

    #[test]
    fn too_long() {
        let long = "a".repeat(MAX_PATH_LEN + 1);
        assert_eq!(
            ArchivePath::new(&long),
            Err(IntoArchivePathError::TooLong(MAX_PATH_LEN + 1))
        );
        assert!(ArchivePath::new("a".repeat(MAX_PATH_LEN)).is_ok());
    }

    #[test]
    fn archive_str_rejects_escapes() {
        for bad in &["", "/etc/passwd", "a/../b", "..", ".", "a//b", "a/./b", "a/", "a\\b", "a\0b"] {
            assert!(ArchivePath::from_archive_str(bad).is_err(), "{:?}", bad);
        }
        assert_eq!(ArchivePath::from_archive_str("a/b.txt").unwrap().as_str(), "a/b.txt");
        assert!(ArchivePath::from_archive_str("bell\u{7}/ x ").is_ok());
    }

    #[test]
    fn components() {
        let path = ArchivePath::new("a/b/c.txt").unwrap();
        assert_eq!(path.parent().unwrap().as_str(), "a/b");
        assert_eq!(path.iter().collect::<Vec<_>>(), vec!["a", "b", "c.txt"]);
        assert_eq!(path.to_path_buf(), Path::new("a").join("b").join("c.txt"));
        assert!(ArchivePath::new("top").unwrap().parent().is_none());
    }
}
