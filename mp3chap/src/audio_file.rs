//! A single MP3 file on disk, as found by [`discover`](crate::discover::discover)

use crate::id3::TagLayout;
use lofty::{
    config::ParseOptions,
    file::{AudioFile as _, FileType, TaggedFileExt},
    prelude::Accessor,
    probe::Probe,
};
use log::debug;
use std::{
    fs::File,
    io::{self, BufReader},
    ops::Range,
    path::{Path, PathBuf},
    time::Duration,
};

/// An MP3 file, with the metadata needed to merge it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    /// Where the file lives
    pub path: PathBuf,

    /// The size of the file in bytes
    pub size: u64,

    /// How long the audio lasts
    pub duration: Duration,

    /// The title tag, or an empty string if there is none
    pub title: String,

    /// Where the ID3 tags are located in the file
    pub layout: TagLayout,
}

impl AudioFile {
    /// Inspect a file on disk
    ///
    /// Returns `None` if the contents aren't recognized as MP3 audio. Failing to read
    /// the file at all is an error.
    pub fn probe<P>(path: P) -> Result<Option<Self>, io::Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();

        let mut reader = BufReader::new(File::open(path)?);
        let size = reader.get_ref().metadata()?.len();
        let layout = TagLayout::from_reader(&mut reader)?;

        let Some((duration, title)) = read_mpeg_properties(path) else {
            return Ok(None);
        };

        debug!(
            "{}: {} bytes, {} byte ID3v2 tag, {} byte ID3v1 tag, {:?}",
            path.display(),
            size,
            layout.leading,
            layout.trailing,
            duration
        );

        Ok(Some(Self {
            path: path.to_owned(),
            size,
            duration,
            title,
            layout,
        }))
    }

    /// The number of audio bytes, excluding the tags
    pub fn payload_len(&self) -> u64 {
        self.layout.payload_len(self.size)
    }

    /// The byte range holding the audio, excluding the tags
    pub fn payload_range(&self) -> Range<u64> {
        let start = self.layout.leading.min(self.size);
        start..start + self.payload_len()
    }
}

/// Detect MPEG audio by content and read its duration and title
fn read_mpeg_properties(path: &Path) -> Option<(Duration, String)> {
    let probe = match Probe::open(path).and_then(|probe| Ok(probe.guess_file_type()?)) {
        Ok(probe) => probe,
        Err(error) => {
            debug!("Could not probe {}: {error}", path.display());
            return None;
        }
    };

    if probe.file_type() != Some(FileType::Mpeg) {
        debug!("{} is not an MP3 file", path.display());
        return None;
    }

    let tagged = match probe
        .options(ParseOptions::new().read_cover_art(false))
        .read()
    {
        Ok(tagged) => tagged,
        Err(error) => {
            debug!("Could not read {} as MP3: {error}", path.display());
            return None;
        }
    };

    let title = tagged
        .primary_tag()
        .and_then(|tag| tag.title())
        .or_else(|| tagged.tags().iter().find_map(|tag| tag.title()))
        .map(|title| title.into_owned())
        .unwrap_or_default();

    Some((tagged.properties().duration(), title))
}
