//! Just enough ID3 to strip tags off MP3 files and write chapters back onto them
//!
//! MP3 files usually carry their metadata in two places:
//!
//! * An ID3v2 tag at the start of the file, of variable length (see [`header`])
//! * An ID3v1 tag in the last 128 bytes of the file (see [`v1`])
//!
//! Merging files means copying what's between those two tags. The chapters of the
//! merged file are then written as a fresh ID3v2 tag, see [`ChapterTag`].

pub mod frame;
pub mod header;
pub mod text;
pub mod v1;

use crate::chapter::ChapterSet;
use frame::{CHAP, CTOC, split_frames};
use header::Header;
use log::debug;
use std::{
    fs::{self, File, OpenOptions},
    io::{self, Read, Seek, Write},
    path::Path,
};
use tempfile::NamedTempFile;
use text::DecodeTextError;
use thiserror::Error;

pub use frame::{ChapterEntry, TocEntry};

/// Where the tags are located in an MP3 file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagLayout {
    /// The number of bytes taken up by an ID3v2 tag at the start of the file
    pub leading: u64,

    /// The number of bytes taken up by an ID3v1 tag at the end of the file
    pub trailing: u64,
}

impl TagLayout {
    /// Detect the tags in an arbitrary I/O reader
    pub fn from_reader<R>(mut reader: R) -> Result<Self, io::Error>
    where
        R: Read + Seek,
    {
        let leading = header::leading_tag_len(&mut reader)?;
        let trailing = if v1::has_trailing_tag(&mut reader)? {
            v1::LEN
        } else {
            0
        };

        Ok(Self { leading, trailing })
    }

    /// The number of bytes between the tags, for a file of `size` bytes
    ///
    /// Malformed files whose tags claim more than the whole file yield 0.
    pub fn payload_len(&self, size: u64) -> u64 {
        size.saturating_sub(self.leading + self.trailing)
    }
}

/// An ID3v2 tag holding a table of contents and the chapters it refers to
///
/// ```no_run
/// # use mp3chap::id3::ChapterTag;
/// // Read the chapters back from a merged file
/// if let Some(tag) = ChapterTag::from_path("audiobook.mp3")? {
///     for chapter in &tag.chapters {
///         println!("{} - {}: {:?}", chapter.start, chapter.end, chapter.title);
///     }
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterTag {
    /// The (top-level) table of contents
    pub toc: TocEntry,

    /// The chapters, in the order they're stored in the tag
    pub chapters: Vec<ChapterEntry>,
}

impl ChapterTag {
    /// The ID3v2 major version written by [`ChapterTag::encode()`]
    pub const VERSION: u8 = 3;

    /// The element id of the table of contents
    pub const TOC_ELEMENT_ID: &'static str = "toc";

    /// The description given to the table of contents
    pub const TOC_DESCRIPTION: &'static str = "Table of contents";

    /// Build a tag from a [`ChapterSet`]
    ///
    /// Chapters are given the element ids `chp0`, `chp1`, etc. The chapter names are
    /// only used as titles, so two chapters with the same name don't collide.
    pub fn from_chapters(chapters: &ChapterSet) -> Result<Self, WriteTagError> {
        let chapters = chapters
            .iter()
            .enumerate()
            .map(|(index, chapter)| {
                let time = |ms: u64| {
                    u32::try_from(ms).map_err(|_| WriteTagError::TimeOutOfRange { ms })
                };

                Ok(ChapterEntry {
                    element_id: format!("chp{index}"),
                    start: time(chapter.start())?,
                    end: time(chapter.end())?,
                    title: Some(chapter.name().to_owned()),
                })
            })
            .collect::<Result<Vec<_>, WriteTagError>>()?;

        let toc = TocEntry {
            element_id: Self::TOC_ELEMENT_ID.to_owned(),
            top_level: true,
            ordered: true,
            child_ids: chapters
                .iter()
                .map(|chapter| chapter.element_id.clone())
                .collect(),
            description: Some(Self::TOC_DESCRIPTION.to_owned()),
        };

        Ok(Self { toc, chapters })
    }

    /// Serialize to a complete ID3v2.3 tag, header included
    pub fn encode(&self) -> Result<Vec<u8>, WriteTagError> {
        let mut frames = self.toc.encode(Self::VERSION)?;
        for chapter in &self.chapters {
            frames.extend(chapter.encode(Self::VERSION)?);
        }

        let header = u32::try_from(frames.len())
            .ok()
            .and_then(|size| Header::new(Self::VERSION, size).to_bytes())
            .ok_or(WriteTagError::TagTooLarge { size: frames.len() })?;

        let mut bytes = Vec::with_capacity(Header::LEN + frames.len());
        bytes.extend_from_slice(&header);
        bytes.extend(frames);

        Ok(bytes)
    }

    /// Read the chapter tag at the start of an arbitrary I/O reader
    ///
    /// Returns `None` if there's no ID3v2 tag, or the tag doesn't have a table of contents.
    pub fn from_reader<R>(mut reader: R) -> Result<Option<Self>, ReadTagError>
    where
        R: Read,
    {
        let Some(header) = Header::from_reader(&mut reader)? else {
            return Ok(None);
        };

        if !(3..=4).contains(&header.major) {
            return Err(ReadTagError::UnsupportedVersion(header.major));
        }

        let mut body = vec![0; header.size as usize];
        reader.read_exact(&mut body)?;

        // v2.4 unsynchronises per frame, which never touches the frames we write
        if header.major == 3 && header.flags & Header::FLAG_UNSYNCHRONISATION != 0 {
            body = resynchronise(&body);
        }

        let frames = split_frames(&body[extended_header_len(&header, &body)?..], header.major)?;

        let mut toc = None;
        let mut chapters = Vec::new();

        for frame in frames {
            match &frame.id {
                CTOC => {
                    let entry = TocEntry::decode(frame.body, header.major)?;
                    if toc.is_none() || entry.top_level {
                        toc = Some(entry);
                    }
                }
                CHAP => chapters.push(ChapterEntry::decode(frame.body, header.major)?),
                _ => (),
            }
        }

        Ok(toc.map(|toc| Self { toc, chapters }))
    }

    /// Read the chapter tag from a path on disk
    pub fn from_path<P>(path: P) -> Result<Option<Self>, ReadTagError>
    where
        P: AsRef<Path>,
    {
        Self::from_reader(io::BufReader::new(File::open(path)?))
    }

    /// Replace the ID3v2 tag of a file with this tag
    ///
    /// Whatever ID3v2 tag the file started with is dropped entirely; the rest of the file
    /// is left untouched. The new file is assembled next to the old one and then moved over it.
    pub fn write_to_path<P>(&self, path: P) -> Result<(), WriteTagError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let tag = self.encode()?;

        let mut source = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(WriteTagError::Open)?;
        let permissions = source.metadata()?.permissions();

        let old_len = header::leading_tag_len(&mut source)?;
        debug!(
            "Replacing {old_len} byte ID3v2 tag of {} with {} byte chapter tag",
            path.display(),
            tag.len()
        );

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(&tag)?;
        io::copy(&mut source, &mut temp)?;
        temp.flush()?;
        drop(source);

        fs::set_permissions(temp.path(), permissions)?;
        temp.persist(path)
            .map_err(|error| WriteTagError::Replace(error.error))?;

        Ok(())
    }
}

/// The number of bytes to skip over an extended header, if present
fn extended_header_len(header: &Header, body: &[u8]) -> Result<usize, ReadTagError> {
    if header.flags & Header::FLAG_EXTENDED_HEADER == 0 {
        return Ok(0);
    }

    let size_bytes: [u8; 4] = body
        .get(..4)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(ReadTagError::InvalidExtendedHeader)?;

    // v2.3 excludes the size field itself from the size, v2.4 doesn't
    let len = match header.major {
        3 => u32::from_be_bytes(size_bytes) as usize + 4,
        _ => header::decode_syncsafe(size_bytes)
            .ok_or(ReadTagError::InvalidExtendedHeader)? as usize,
    };

    if len > body.len() {
        return Err(ReadTagError::InvalidExtendedHeader);
    }

    Ok(len)
}

/// Undo unsynchronisation: every `FF 00` goes back to `FF`
fn resynchronise(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut previous = 0;

    for byte in bytes {
        if !(previous == 0xFF && *byte == 0x00) {
            out.push(*byte);
        }
        previous = *byte;
    }

    out
}

/// Errors that might be returned from writing a [`ChapterTag`]
#[derive(Debug, Error)]
pub enum WriteTagError {
    /// The target file could not be opened for writing
    #[error("Could not open the file for writing")]
    Open(#[source] io::Error),

    /// Any other failure that has to do with I/O
    #[error("Something failed with I/O")]
    Io(#[from] io::Error),

    /// Moving the rewritten file over the original failed
    #[error("Could not replace the original file")]
    Replace(#[source] io::Error),

    /// A table of contents can refer to at most 255 chapters
    #[error("{count} chapters don't fit in a single table of contents")]
    TooManyChapters { count: usize },

    /// The tag exceeds the size a syncsafe integer can express
    #[error("A tag of {size} bytes exceeds the ID3v2 size limit")]
    TagTooLarge { size: usize },

    /// Element ids have to be non-empty ASCII without null bytes
    #[error("Invalid element id {0:?}")]
    InvalidElementId(String),

    /// Chapter times are stored as 32-bit milliseconds
    #[error("{ms}ms does not fit in a chapter frame")]
    TimeOutOfRange { ms: u64 },
}

/// Errors that might be returned from [`ChapterTag::from_reader()`]
#[derive(Debug, Error)]
pub enum ReadTagError {
    /// Any failure that has to do with I/O
    #[error("Something failed with I/O")]
    Io(#[from] io::Error),

    /// Only ID3v2.3 and ID3v2.4 are supported
    #[error("ID3v2.{0} is not supported")]
    UnsupportedVersion(u8),

    #[error("The extended header is malformed")]
    InvalidExtendedHeader,

    /// A v2.4 frame size wasn't a valid syncsafe integer
    #[error("Frame {} has an invalid size", String::from_utf8_lossy(.frame))]
    InvalidFrameSize { frame: [u8; 4] },

    /// A frame ended before all of its fields were read
    #[error("Frame {} is truncated", String::from_utf8_lossy(.frame))]
    Truncated { frame: [u8; 4] },

    /// A title couldn't be decoded
    #[error("Could not decode text")]
    Text(#[from] DecodeTextError),
}
