use std::io::{Error, ErrorKind, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::{
    header::FormatVersion,
    record::{EntryKind, PayloadRecord},
    ArchivePath, Compression, Entry, Protection,
};

pub(crate) trait DeserializeOwned {
    fn deserialize_owned<R: Read>(reader: &mut R) -> std::io::Result<Self>
    where
        Self: Sized;
}

impl DeserializeOwned for FormatVersion {
    fn deserialize_owned<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let major = reader.read_u8()?;
        let minor = reader.read_u8()?;
        Ok(FormatVersion { major, minor })
    }
}

impl DeserializeOwned for Compression {
    fn deserialize_owned<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        Ok(Compression::from_id(reader.read_u8()?))
    }
}

impl DeserializeOwned for Protection {
    fn deserialize_owned<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        Ok(Protection::from_id(reader.read_u8()?))
    }
}

impl DeserializeOwned for ArchivePath {
    fn deserialize_owned<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let len = reader.read_u16::<LittleEndian>()?;
        let mut buf = vec![0u8; len as usize];
        reader.read_exact(&mut buf)?;

        let s = String::from_utf8(buf).map_err(|e| Error::new(ErrorKind::InvalidData, e))?;
        ArchivePath::from_archive_str(&s).map_err(|e| {
            Error::new(
                ErrorKind::InvalidData,
                format!("invalid path {:?}: {}", s, e),
            )
        })
    }
}

impl DeserializeOwned for Entry {
    fn deserialize_owned<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let path = ArchivePath::deserialize_owned(reader)?;
        let ty = reader.read_u8()?;
        let kind = EntryKind::from_id(ty).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidData,
                format!("invalid or unsupported entry kind {} for {:?}", ty, path.as_str()),
            )
        })?;

        Ok(Entry { path, kind })
    }
}

impl DeserializeOwned for PayloadRecord {
    fn deserialize_owned<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let checksum = reader.read_u32::<LittleEndian>()?;
        let len = reader.read_u64::<LittleEndian>()?;

        // Never trust `len` for an up-front allocation: a damaged size field
        // simply runs into the end of the stream.
        let mut data = Vec::new();
        reader.take(len).read_to_end(&mut data)?;

        if (data.len() as u64) != len {
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                format!("payload record truncated: expected {} bytes, found {}", len, data.len()),
            ));
        }

        Ok(PayloadRecord { checksum, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry() {
        let mut bytes: &[u8] = &[7, 0, b'a', b'/', b'b', b'.', b't', b'x', b't', 0];
        let entry = Entry::deserialize_owned(&mut bytes).unwrap();
        assert_eq!(entry, Entry::file(ArchivePath::new("a/b.txt").unwrap()));
    }

    #[test]
    fn entry_with_unknown_kind() {
        let mut bytes: &[u8] = &[1, 0, b'a', 9];
        let err = Entry::deserialize_owned(&mut bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn entry_with_escaping_path() {
        let mut bytes: &[u8] = &[5, 0, b'.', b'.', b'/', b'x', b'y', 0];
        let err = Entry::deserialize_owned(&mut bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn entry_with_invalid_utf8() {
        let mut bytes: &[u8] = &[2, 0, 0xC3, 0x28, 0];
        let err = Entry::deserialize_owned(&mut bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn payload_record() {
        let mut bytes: &[u8] = &[1, 0, 0, 0, 3, 0, 0, 0, 0, 0, 0, 0, b'a', b'b', b'c', 0xFF];
        let record = PayloadRecord::deserialize_owned(&mut bytes).unwrap();
        assert_eq!(record.checksum, 1);
        assert_eq!(record.data, b"abc");
        // The trailing byte belongs to whatever follows
        assert_eq!(bytes, &[0xFF]);
    }

    #[test]
    fn truncated_payload_record() {
        let mut bytes: &[u8] = &[0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 1, 2];
        let err = PayloadRecord::deserialize_owned(&mut bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }
}
