//! Detection of the fixed-size ID3v1 tag at the end of a file

use std::io::{self, Read, Seek, SeekFrom};

/// The length in bytes of an ID3v1 tag
pub const LEN: u64 = 128;

const SIGNATURE: &[u8; 3] = b"TAG";

/// Does the stream end in an ID3v1 tag?
pub fn has_trailing_tag<R>(mut reader: R) -> Result<bool, io::Error>
where
    R: Read + Seek,
{
    let len = reader.seek(SeekFrom::End(0))?;
    if len < LEN {
        return Ok(false);
    }

    reader.seek(SeekFrom::Start(len - LEN))?;

    let mut signature = [0; 3];
    reader.read_exact(&mut signature)?;

    Ok(&signature == SIGNATURE)
}
