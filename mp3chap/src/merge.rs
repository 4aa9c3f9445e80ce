//! The full pipeline: discover, concatenate and write chapters

use crate::{
    chapter::ChapterSet,
    concat::{ConcatError, Concatenator},
    discover::{DiscoverError, discover},
    id3::{ChapterTag, WriteTagError},
};
use log::{debug, info};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// The result of a successful [`merge()`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedOutput {
    /// Where the merged file was written
    pub path: PathBuf,

    /// The size of the merged file in bytes, chapter tag included
    pub size: u64,

    /// The chapters written to the merged file
    pub chapters: ChapterSet,
}

/// Merge all MP3 files in a directory into a single file with one chapter per input file
///
/// If `output` already exists inside `dir`, say from an earlier run, it is not treated as
/// an input. Nothing is written if the directory holds no MP3 files. If concatenation fails, no
/// chapters are written and the output file may be incomplete. If writing the chapters
/// fails, the concatenated audio is left in place without them.
pub fn merge<C>(dir: &Path, output: &Path, concatenator: &C) -> Result<MergedOutput, MergeError>
where
    C: Concatenator + ?Sized,
{
    let mut files = discover(dir)?;
    if let Ok(output) = fs::canonicalize(output) {
        files.retain(|file| {
            let is_output = fs::canonicalize(&file.path).is_ok_and(|path| path == output);
            if is_output {
                debug!("Skipping {}, it is the output file", file.path.display());
            }

            !is_output
        });
    }

    if files.is_empty() {
        return Err(MergeError::NoInput {
            dir: dir.display().to_string(),
        });
    }

    info!("Merging {} files into {}", files.len(), output.display());

    let chapters = ChapterSet::from_files(&files);
    concatenator.concat(&files, output)?;

    ChapterTag::from_chapters(&chapters)?.write_to_path(output)?;

    let size = fs::metadata(output)
        .map_err(WriteTagError::from)?
        .len();

    Ok(MergedOutput {
        path: output.to_owned(),
        size,
        chapters,
    })
}

/// Derive the default output file name from the input directory
///
/// The name of the directory holding the MP3 files is used, with an `.mp3` extension.
/// If `path` points to a file, the directory containing that file is used instead.
pub fn default_output_name(path: &Path) -> Option<PathBuf> {
    let absolute = std::path::absolute(path).ok()?;
    let dir = if absolute.is_file() {
        absolute.parent()?
    } else {
        absolute.as_path()
    };

    let mut name = dir.file_name()?.to_owned();
    name.push(".mp3");
    Some(PathBuf::from(name))
}

/// Errors that might be returned from [`merge()`]
#[derive(Debug, Error)]
pub enum MergeError {
    /// Listing the input files failed
    #[error("Could not list the MP3 files")]
    Discover(#[from] DiscoverError),

    /// The directory held no MP3 files
    #[error("No MP3 files found in {dir}")]
    NoInput { dir: String },

    /// Concatenating the audio failed
    #[error("Could not concatenate the MP3 files")]
    Concat(#[from] ConcatError),

    /// Writing the chapters to the merged file failed
    #[error("Could not write the chapters")]
    WriteTag(#[from] WriteTagError),
}
