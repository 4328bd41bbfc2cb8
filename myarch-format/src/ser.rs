use std::convert::TryFrom;
use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::{
    header::FormatVersion, record::PayloadRecord, ArchiveHeader, ArchivePath, Compression, Entry,
    Protection,
};

pub(crate) trait Serialize {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()>;
}

impl Serialize for FormatVersion {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u8(self.major)?;
        writer.write_u8(self.minor)
    }
}

impl Serialize for Compression {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u8(self.id())
    }
}

impl Serialize for Protection {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u8(self.id())
    }
}

impl Serialize for ArchiveHeader {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.signature)?;
        self.version.write(writer)?;
        self.compression.write(writer)?;
        self.protection.write(writer)?;
        writer.write_u32::<LittleEndian>(self.entry_count)
    }
}

impl Serialize for ArchivePath {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let bytes = self.0.as_bytes();
        let len = u16::try_from(bytes.len()).map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("path too long to encode: {} bytes", bytes.len()),
            )
        })?;
        writer.write_u16::<LittleEndian>(len)?;
        writer.write_all(bytes)
    }
}

impl Serialize for Entry {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.path.write(writer)?;
        writer.write_u8(self.kind.id())
    }
}

impl Serialize for PayloadRecord {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u32::<LittleEndian>(self.checksum)?;
        writer.write_u64::<LittleEndian>(self.compressed_size())?;
        writer.write_all(&self.data)
    }
}

impl<T: Serialize> Serialize for [T] {
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for item in self.iter() {
            item.write(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Vec<u8> {
        let mut buf = vec![];
        value.write(&mut buf).unwrap();
        buf
    }

    #[test]
    fn header_layout() {
        let header = ArchiveHeader::new(Compression::RunLength, Protection::Crc32, 0x0102_0304);
        assert_eq!(
            to_bytes(&header),
            vec![b'M', b'Y', b'A', b'R', b'C', b'H', 1, 1, 2, 1, 0x04, 0x03, 0x02, 0x01]
        );
        assert_eq!(to_bytes(&header).len() as u64, crate::header::HEADER_LEN);
    }

    #[test]
    fn entry_layout() {
        let entry = Entry::directory(ArchivePath::new("a/b").unwrap());
        assert_eq!(to_bytes(&entry), vec![3, 0, b'a', b'/', b'b', 1]);
    }

    #[test]
    fn payload_layout() {
        let record = PayloadRecord {
            checksum: 0xDEAD_BEEF,
            data: vec![b'h', b'i'],
        };
        assert_eq!(
            to_bytes(&record),
            vec![0xEF, 0xBE, 0xAD, 0xDE, 2, 0, 0, 0, 0, 0, 0, 0, b'h', b'i']
        );
        assert_eq!(record.encoded_len(), 14);
    }
}
