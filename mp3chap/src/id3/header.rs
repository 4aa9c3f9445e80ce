//! The 10-byte header every ID3v2 tag starts with

use std::io::{self, Read, Seek, SeekFrom};

/// The header in front of every ID3v2 tag
///
/// ```text
/// "ID3" | major | revision | flags | size (4 bytes, syncsafe)
/// ```
///
/// The size field counts the bytes _after_ the header (and before the optional v2.4 footer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// The major version (3 for ID3v2.3, 4 for ID3v2.4)
    pub major: u8,

    /// The revision, which is always backwards compatible within a major version
    pub revision: u8,

    /// Header flags (unsynchronisation, extended header, experimental, footer)
    pub flags: u8,

    /// The size of the tag, excluding header and footer
    pub size: u32,
}

impl Header {
    /// The length in bytes of the header (and of the v2.4 footer)
    pub const LEN: usize = 10;

    /// The largest size a syncsafe 28-bit integer can express
    pub const MAX_SIZE: u32 = 0x0FFF_FFFF;

    pub(crate) const FLAG_UNSYNCHRONISATION: u8 = 0x80;
    pub(crate) const FLAG_EXTENDED_HEADER: u8 = 0x40;
    const FLAG_FOOTER: u8 = 0x10;

    const SIGNATURE: &'static [u8; 3] = b"ID3";

    /// Construct a flag-less header for a tag body of `size` bytes
    pub fn new(major: u8, size: u32) -> Self {
        Self {
            major,
            revision: 0,
            flags: 0,
            size,
        }
    }

    /// Parse a header from raw bytes
    ///
    /// Returns `None` when the bytes don't form a valid ID3v2 header.
    pub fn from_bytes(bytes: &[u8; Self::LEN]) -> Option<Self> {
        if &bytes[..3] != Self::SIGNATURE {
            return None;
        }

        let (major, revision) = (bytes[3], bytes[4]);
        if major == 0xFF || revision == 0xFF {
            return None;
        }

        Some(Self {
            major,
            revision,
            flags: bytes[5],
            size: decode_syncsafe([bytes[6], bytes[7], bytes[8], bytes[9]])?,
        })
    }

    /// Try to read a header from an I/O reader
    ///
    /// Streams too short to contain a header yield `None`, like streams that
    /// simply don't start with one.
    pub fn from_reader<R>(mut reader: R) -> Result<Option<Self>, io::Error>
    where
        R: Read,
    {
        let mut bytes = [0; Self::LEN];
        match reader.read_exact(&mut bytes) {
            Ok(()) => Ok(Self::from_bytes(&bytes)),
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Serialize the header to bytes
    ///
    /// Returns `None` if the size doesn't fit in a syncsafe integer.
    pub fn to_bytes(&self) -> Option<[u8; Self::LEN]> {
        let size = encode_syncsafe(self.size)?;

        Some([
            Self::SIGNATURE[0],
            Self::SIGNATURE[1],
            Self::SIGNATURE[2],
            self.major,
            self.revision,
            self.flags,
            size[0],
            size[1],
            size[2],
            size[3],
        ])
    }

    /// Is a v2.4 footer appended to the tag?
    pub fn has_footer(&self) -> bool {
        self.major >= 4 && self.flags & Self::FLAG_FOOTER != 0
    }

    /// The total number of bytes the tag occupies in a file, header and footer included
    pub fn tag_len(&self) -> u64 {
        let footer = if self.has_footer() { Self::LEN } else { 0 };
        (Self::LEN + footer) as u64 + self.size as u64
    }
}

/// Determine how many bytes at the start of a stream belong to an ID3v2 tag
///
/// Returns 0 if the stream doesn't start with a tag. The reader is left positioned
/// at the first byte after the tag.
pub fn leading_tag_len<R>(mut reader: R) -> Result<u64, io::Error>
where
    R: Read + Seek,
{
    reader.seek(SeekFrom::Start(0))?;

    let len = match Header::from_reader(&mut reader)? {
        Some(header) => header.tag_len(),
        None => 0,
    };

    reader.seek(SeekFrom::Start(len))?;
    Ok(len)
}

/// Encode a 28-bit integer as four bytes with their highest bit cleared
pub fn encode_syncsafe(value: u32) -> Option<[u8; 4]> {
    if value > Header::MAX_SIZE {
        return None;
    }

    Some([
        ((value >> 21) & 0x7F) as u8,
        ((value >> 14) & 0x7F) as u8,
        ((value >> 7) & 0x7F) as u8,
        (value & 0x7F) as u8,
    ])
}

/// Decode four syncsafe bytes, rejecting any that has its highest bit set
pub fn decode_syncsafe(bytes: [u8; 4]) -> Option<u32> {
    bytes.iter().try_fold(0u32, |value, byte| {
        (*byte < 0x80).then(|| (value << 7) | *byte as u32)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn syncsafe() {
        assert_eq!(encode_syncsafe(0), Some([0, 0, 0, 0]));
        assert_eq!(encode_syncsafe(0x7F), Some([0, 0, 0, 0x7F]));
        assert_eq!(encode_syncsafe(0x80), Some([0, 0, 1, 0]));
        assert_eq!(encode_syncsafe(Header::MAX_SIZE), Some([0x7F; 4]));
        assert_eq!(encode_syncsafe(Header::MAX_SIZE + 1), None);

        assert_eq!(decode_syncsafe([0, 0, 1, 0]), Some(0x80));
        assert_eq!(decode_syncsafe([0x7F; 4]), Some(Header::MAX_SIZE));
        assert_eq!(decode_syncsafe([0, 0, 0x80, 0]), None);
    }

    #[test]
    fn header_bytes() {
        let header = Header::new(3, 1000);
        let bytes = header.to_bytes().unwrap();

        assert_eq!(&bytes[..6], b"ID3\x03\x00\x00");
        assert_eq!(Header::from_bytes(&bytes), Some(header));
        assert_eq!(header.tag_len(), 1010);
    }

    #[test]
    fn footer() {
        let mut header = Header::new(4, 100);
        header.flags = 0x10;
        assert_eq!(header.tag_len(), 120);

        // The footer flag means nothing before v2.4
        header.major = 3;
        assert_eq!(header.tag_len(), 110);
    }

    #[test]
    fn leading_len() {
        let mut bytes = Header::new(3, 6).to_bytes().unwrap().to_vec();
        bytes.extend_from_slice(&[0; 6]);
        bytes.extend_from_slice(b"audio");

        let mut reader = Cursor::new(bytes);
        assert_eq!(leading_tag_len(&mut reader).unwrap(), 16);
        assert_eq!(reader.position(), 16);

        assert_eq!(leading_tag_len(Cursor::new(b"audio only")).unwrap(), 0);
        assert_eq!(leading_tag_len(Cursor::new(b"ID3")).unwrap(), 0);
    }
}
