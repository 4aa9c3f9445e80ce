//! Merge a directory of MP3 files into a single MP3 with ID3v2 chapters
//!
//! The pipeline is split into small, independent steps:
//!
//! * [`discover`](discover::discover) lists the MP3 files in a directory in natural order
//! * [`ChapterSet::from_files`](chapter::ChapterSet::from_files) derives one chapter per file
//! * A [`Concatenator`](concat::Concatenator) glues the audio payloads together
//! * [`ChapterTag::write_to_path`](id3::ChapterTag::write_to_path) attaches the chapters to the
//!   result
//!
//! [`merge`](merge::merge) runs all of these in one go. Doing it step by step looks like this:
//!
//! ```no_run
//! # use mp3chap::{chapter::ChapterSet, concat::{Concatenator, InProcess}};
//! # use mp3chap::{discover::discover, id3::ChapterTag};
//! let files = discover("audiobook")?;
//! let chapters = ChapterSet::from_files(&files);
//!
//! InProcess.concat(&files, "audiobook.mp3".as_ref())?;
//! ChapterTag::from_chapters(&chapters)?.write_to_path("audiobook.mp3")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod audio_file;
pub mod chapter;
pub mod concat;
pub mod discover;
pub mod id3;
pub mod merge;
pub mod natural;

#[cfg(test)]
pub(crate) mod test_utils;
