//! Text encodings used by ID3v2 text frames

use thiserror::Error;

const LATIN1: u8 = 0;
const UTF16_BOM: u8 = 1;
const UTF16_BE: u8 = 2;
const UTF8: u8 = 3;

/// Encode a string as the body of a text frame (encoding byte followed by the text)
///
/// ISO-8859-1 is used when every character fits, UTF-16 with a byte-order mark
/// otherwise. Both are understood by ID3v2.3 readers.
pub fn encode(text: &str) -> Vec<u8> {
    if text.chars().all(|c| (c as u32) < 0x100) {
        let mut bytes = Vec::with_capacity(text.len() + 1);
        bytes.push(LATIN1);
        bytes.extend(text.chars().map(|c| c as u8));
        bytes
    } else {
        let mut bytes = vec![UTF16_BOM, 0xFF, 0xFE];
        bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
        bytes
    }
}

/// Decode the body of a text frame
///
/// Decoding stops at the first null terminator. Multiple values (v2.4) are not
/// split; only the first one is returned.
pub fn decode(bytes: &[u8]) -> Result<String, DecodeTextError> {
    let (encoding, text) = bytes.split_first().ok_or(DecodeTextError::Empty)?;

    match *encoding {
        LATIN1 => Ok(until_nul(text).iter().map(|b| *b as char).collect()),
        UTF8 => String::from_utf8(until_nul(text).to_vec()).map_err(|_| DecodeTextError::Utf8),
        UTF16_BOM => match text {
            [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
            [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
            _ => Err(DecodeTextError::MissingByteOrderMark),
        },
        UTF16_BE => decode_utf16(text, u16::from_be_bytes),
        encoding => Err(DecodeTextError::UnknownEncoding(encoding)),
    }
}

fn until_nul(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|b| *b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String, DecodeTextError> {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .take_while(|unit| *unit != 0);

    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|_| DecodeTextError::Utf16)
}

/// Errors that might be returned from [`decode()`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeTextError {
    /// The frame didn't even contain an encoding byte
    #[error("The text frame is empty")]
    Empty,

    /// The encoding byte wasn't one of the four defined encodings
    #[error("Unknown text encoding {0}")]
    UnknownEncoding(u8),

    /// UTF-16 text has to start with a byte-order mark
    #[error("UTF-16 text without a byte-order mark")]
    MissingByteOrderMark,

    #[error("Invalid UTF-8 text")]
    Utf8,

    #[error("Invalid UTF-16 text")]
    Utf16,
}
