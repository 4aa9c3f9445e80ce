//! Encoding and decoding of the ID3v2 frames needed for chapters
//!
//! Three frame types are involved, as laid out by the
//! [ID3v2 chapter addendum](https://id3.org/id3v2-chapters-1.0):
//!
//! * `CHAP`: a named time range, see [`ChapterEntry`]
//! * `CTOC`: an ordered list of chapter identifiers, see [`TocEntry`]
//! * `TIT2`: the title, embedded as a sub-frame in both of the above

use super::{
    ReadTagError, WriteTagError,
    header::{decode_syncsafe, encode_syncsafe},
    text,
};
use std::io::Write;

/// The length in bytes of a frame header (id, size and flags)
const HEADER_LEN: usize = 10;

pub(crate) const CHAP: &[u8; 4] = b"CHAP";
pub(crate) const CTOC: &[u8; 4] = b"CTOC";
pub(crate) const TIT2: &[u8; 4] = b"TIT2";

/// Byte offsets in CHAP frames are ignored when set to this value
const NO_OFFSET: u32 = 0xFFFF_FFFF;

const CTOC_TOP_LEVEL: u8 = 0x02;
const CTOC_ORDERED: u8 = 0x01;

/// A single frame, still in its serialized form
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawFrame<'a> {
    pub id: [u8; 4],
    pub body: &'a [u8],
}

/// A chapter: an element id plus a time range in milliseconds, optionally titled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterEntry {
    /// Identifier, unique within the tag
    pub element_id: String,

    /// Start time in milliseconds
    pub start: u32,

    /// End time in milliseconds
    pub end: u32,

    /// The title displayed by players
    pub title: Option<String>,
}

/// The table of contents, listing chapters by their element id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Identifier, unique within the tag
    pub element_id: String,

    /// Is this the root of the table-of-contents tree?
    pub top_level: bool,

    /// Should the children be played in order?
    pub ordered: bool,

    /// The element ids of the chapters in this table of contents
    pub child_ids: Vec<String>,

    /// A human readable description
    pub description: Option<String>,
}

impl ChapterEntry {
    /// Serialize the complete CHAP frame, header included
    pub(crate) fn encode(&self, major: u8) -> Result<Vec<u8>, WriteTagError> {
        let mut body = Vec::new();
        push_element_id(&mut body, &self.element_id)?;

        for value in [self.start, self.end, NO_OFFSET, NO_OFFSET] {
            body.extend_from_slice(&value.to_be_bytes());
        }

        if let Some(title) = &self.title {
            write_frame(&mut body, TIT2, &text::encode(title), major)?;
        }

        frame_bytes(CHAP, &body, major)
    }

    /// Parse a CHAP frame body
    pub(crate) fn decode(body: &[u8], major: u8) -> Result<Self, ReadTagError> {
        let (element_id, rest) = split_element_id(body, CHAP)?;

        if rest.len() < 16 {
            return Err(ReadTagError::Truncated { frame: *CHAP });
        }

        let start = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]);
        let end = u32::from_be_bytes([rest[4], rest[5], rest[6], rest[7]]);

        Ok(Self {
            element_id,
            start,
            end,
            title: find_title(&rest[16..], major)?,
        })
    }
}

impl TocEntry {
    /// Serialize the complete CTOC frame, header included
    pub(crate) fn encode(&self, major: u8) -> Result<Vec<u8>, WriteTagError> {
        let count = u8::try_from(self.child_ids.len()).map_err(|_| {
            WriteTagError::TooManyChapters {
                count: self.child_ids.len(),
            }
        })?;

        let mut flags = 0;
        if self.top_level {
            flags |= CTOC_TOP_LEVEL;
        }
        if self.ordered {
            flags |= CTOC_ORDERED;
        }

        let mut body = Vec::new();
        push_element_id(&mut body, &self.element_id)?;
        body.push(flags);
        body.push(count);

        for child in &self.child_ids {
            push_element_id(&mut body, child)?;
        }

        if let Some(description) = &self.description {
            write_frame(&mut body, TIT2, &text::encode(description), major)?;
        }

        frame_bytes(CTOC, &body, major)
    }

    /// Parse a CTOC frame body
    pub(crate) fn decode(body: &[u8], major: u8) -> Result<Self, ReadTagError> {
        let (element_id, rest) = split_element_id(body, CTOC)?;

        let [flags, count, rest @ ..] = rest else {
            return Err(ReadTagError::Truncated { frame: *CTOC });
        };

        let mut rest = rest;
        let mut child_ids = Vec::with_capacity(*count as usize);
        for _ in 0..*count {
            let (child, remainder) = split_element_id(rest, CTOC)?;
            child_ids.push(child);
            rest = remainder;
        }

        Ok(Self {
            element_id,
            top_level: flags & CTOC_TOP_LEVEL != 0,
            ordered: flags & CTOC_ORDERED != 0,
            child_ids,
            description: find_title(rest, major)?,
        })
    }
}

/// Split a sequence of frames into individual frames
///
/// Stops at the start of padding (a zero byte where a frame id is expected), or when
/// not enough bytes are left for another frame header.
pub(crate) fn split_frames(
    mut bytes: &[u8],
    major: u8,
) -> Result<Vec<RawFrame<'_>>, ReadTagError> {
    let mut frames = Vec::new();

    while bytes.len() >= HEADER_LEN && bytes[0] != 0 {
        let id = [bytes[0], bytes[1], bytes[2], bytes[3]];
        let size_bytes = [bytes[4], bytes[5], bytes[6], bytes[7]];

        let size = match major {
            4.. => decode_syncsafe(size_bytes)
                .ok_or(ReadTagError::InvalidFrameSize { frame: id })?,
            _ => u32::from_be_bytes(size_bytes),
        };
        let size = size as usize;

        let body = bytes[HEADER_LEN..]
            .get(..size)
            .ok_or(ReadTagError::Truncated { frame: id })?;

        frames.push(RawFrame { id, body });
        bytes = &bytes[HEADER_LEN + size..];
    }

    Ok(frames)
}

/// Write a frame header followed by the frame body
pub(crate) fn write_frame<W>(
    mut writer: W,
    id: &[u8; 4],
    body: &[u8],
    major: u8,
) -> Result<(), WriteTagError>
where
    W: Write,
{
    let size = u32::try_from(body.len())
        .map_err(|_| WriteTagError::TagTooLarge { size: body.len() })?;

    let size_bytes = if major >= 4 {
        encode_syncsafe(size).ok_or(WriteTagError::TagTooLarge { size: body.len() })?
    } else {
        size.to_be_bytes()
    };

    writer.write_all(id)?;
    writer.write_all(&size_bytes)?;
    writer.write_all(&[0, 0])?;
    writer.write_all(body)?;

    Ok(())
}

fn frame_bytes(id: &[u8; 4], body: &[u8], major: u8) -> Result<Vec<u8>, WriteTagError> {
    let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
    write_frame(&mut bytes, id, body, major)?;
    Ok(bytes)
}

fn push_element_id(bytes: &mut Vec<u8>, element_id: &str) -> Result<(), WriteTagError> {
    if element_id.is_empty() || element_id.contains('\0') || !element_id.is_ascii() {
        return Err(WriteTagError::InvalidElementId(element_id.to_owned()));
    }

    bytes.extend_from_slice(element_id.as_bytes());
    bytes.push(0);
    Ok(())
}

fn split_element_id<'a>(
    bytes: &'a [u8],
    frame: &[u8; 4],
) -> Result<(String, &'a [u8]), ReadTagError> {
    let end = bytes
        .iter()
        .position(|b| *b == 0)
        .ok_or(ReadTagError::Truncated { frame: *frame })?;

    let element_id = bytes[..end].iter().map(|b| *b as char).collect();
    Ok((element_id, &bytes[end + 1..]))
}

/// Look for a TIT2 sub-frame and decode it
fn find_title(subframes: &[u8], major: u8) -> Result<Option<String>, ReadTagError> {
    for frame in split_frames(subframes, major)? {
        if &frame.id == TIT2 {
            return Ok(Some(text::decode(frame.body)?));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(element_id: &str, start: u32, end: u32, title: &str) -> ChapterEntry {
        ChapterEntry {
            element_id: element_id.to_owned(),
            start,
            end,
            title: Some(title.to_owned()),
        }
    }

    #[test]
    fn chap_layout() {
        let bytes = chapter("chp0", 0, 60000, "A").encode(3).unwrap();

        assert_eq!(&bytes[..4], CHAP);
        let size = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
        assert_eq!(size, bytes.len() - HEADER_LEN);

        let body = &bytes[HEADER_LEN..];
        assert_eq!(&body[..5], b"chp0\0");
        assert_eq!(&body[5..9], &0u32.to_be_bytes());
        assert_eq!(&body[9..13], &60000u32.to_be_bytes());
        assert_eq!(&body[13..21], &[0xFF; 8]);
        assert_eq!(&body[21..25], TIT2);
        assert_eq!(&body[31..], b"\x00A");
    }

    #[test]
    fn chap_decode() {
        let entry = chapter("chp1", 60001, 105501, "Zweites Kapitel");
        let bytes = entry.encode(3).unwrap();

        let frames = split_frames(&bytes, 3).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(ChapterEntry::decode(frames[0].body, 3).unwrap(), entry);
    }

    #[test]
    fn ctoc_roundtrip_v24() {
        let toc = TocEntry {
            element_id: "toc".to_owned(),
            top_level: true,
            ordered: true,
            child_ids: vec!["chp0".to_owned(), "chp1".to_owned()],
            description: Some("Table of contents".to_owned()),
        };

        let bytes = toc.encode(4).unwrap();
        let body = &bytes[HEADER_LEN..];
        assert_eq!(&body[..6], b"toc\0\x03\x02");

        let frames = split_frames(&bytes, 4).unwrap();
        assert_eq!(&frames[0].id, CTOC);
        assert_eq!(TocEntry::decode(frames[0].body, 4).unwrap(), toc);
    }

    #[test]
    fn too_many_children() {
        let toc = TocEntry {
            element_id: "toc".to_owned(),
            top_level: true,
            ordered: true,
            child_ids: (0..256).map(|i| format!("chp{i}")).collect(),
            description: None,
        };

        assert!(matches!(
            toc.encode(3),
            Err(WriteTagError::TooManyChapters { count: 256 })
        ));
    }

    #[test]
    fn invalid_element_id() {
        assert!(matches!(
            chapter("", 0, 1, "Empty").encode(3),
            Err(WriteTagError::InvalidElementId(_))
        ));
        assert!(matches!(
            chapter("a\0b", 0, 1, "Nul").encode(3),
            Err(WriteTagError::InvalidElementId(_))
        ));
    }

    #[test]
    fn padding_stops_frames() {
        let mut bytes = chapter("chp0", 0, 1, "A").encode(3).unwrap();
        bytes.extend_from_slice(&[0; 32]);

        assert_eq!(split_frames(&bytes, 3).unwrap().len(), 1);
    }

    #[test]
    fn truncated_frame() {
        let bytes = chapter("chp0", 0, 1, "A").encode(3).unwrap();

        assert!(matches!(
            split_frames(&bytes[..bytes.len() - 1], 3),
            Err(ReadTagError::Truncated { frame }) if &frame == CHAP
        ));
    }
}
