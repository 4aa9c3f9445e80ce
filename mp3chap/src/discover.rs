//! Finding the MP3 files to merge

use crate::{audio_file::AudioFile, natural};
use log::debug;
use std::{io, path::Path};
use thiserror::Error;
use walkdir::WalkDir;

/// List the MP3 files in a directory, in natural order of their file names
///
/// Only the top level of the directory is searched. Symbolic links are followed, and files
/// whose contents aren't recognized as MP3 audio are skipped.
pub fn discover<P>(dir: P) -> Result<Vec<AudioFile>, DiscoverError>
where
    P: AsRef<Path>,
{
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1) {
        let entry = entry?;
        // Follows links, and a dangling one is no file at all
        if entry.path().is_file() {
            entries.push(entry);
        }
    }

    entries.sort_by(|a, b| {
        natural::compare(&a.file_name().to_string_lossy(), &b.file_name().to_string_lossy())
    });

    let mut files = Vec::with_capacity(entries.len());
    for entry in entries {
        let path = entry.path();

        match AudioFile::probe(path) {
            Ok(Some(file)) => files.push(file),
            Ok(None) => debug!("Skipping {}", path.display()),
            Err(source) => {
                return Err(DiscoverError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        }
    }

    Ok(files)
}

/// Errors that might be returned from [`discover()`]
#[derive(Debug, Error)]
pub enum DiscoverError {
    /// The directory could not be listed
    #[error("Could not list the directory")]
    Walk(#[from] walkdir::Error),

    /// A file in the directory could not be read
    #[error("Could not read {path}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{id3v2_tag, mpeg_frames};
    use std::fs;
    use tempfile::tempdir;

    fn write_mp3(dir: &Path, name: &str, title: &str) {
        let mut bytes = id3v2_tag(title);
        bytes.extend(mpeg_frames(10));
        fs::write(dir.join(name), bytes).unwrap();
    }

    #[test]
    fn natural_order() {
        let dir = tempdir().unwrap();
        write_mp3(dir.path(), "track2.mp3", "Two");
        write_mp3(dir.path(), "track10.mp3", "Ten");
        write_mp3(dir.path(), "track1.mp3", "One");

        let files = discover(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|file| file.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, ["track1.mp3", "track2.mp3", "track10.mp3"]);

        let titles: Vec<_> = files.iter().map(|file| file.title.as_str()).collect();
        assert_eq!(titles, ["One", "Two", "Ten"]);
    }

    #[test]
    fn skips_everything_else() {
        let dir = tempdir().unwrap();
        write_mp3(dir.path(), "chapter.mp3", "Chapter");
        fs::write(dir.path().join("cover.txt"), "Not audio at all").unwrap();

        fs::create_dir(dir.path().join("bonus")).unwrap();
        write_mp3(&dir.path().join("bonus"), "bonus.mp3", "Bonus");

        let files = discover(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].title, "Chapter");
    }

    #[test]
    fn dot_files_are_merged_too() {
        let dir = tempdir().unwrap();
        write_mp3(dir.path(), ".intro.mp3", "Intro");
        write_mp3(dir.path(), "chapter.mp3", "Chapter");

        let files = discover(dir.path()).unwrap();
        let titles: Vec<_> = files.iter().map(|file| file.title.as_str()).collect();
        assert_eq!(titles, ["Intro", "Chapter"]);
    }

    #[cfg(unix)]
    #[test]
    fn follows_symlinks() {
        use std::os::unix::fs::symlink;

        let sources = tempdir().unwrap();
        write_mp3(sources.path(), "one.mp3", "One");
        write_mp3(sources.path(), "two.mp3", "Two");

        let dir = tempdir().unwrap();
        symlink(sources.path().join("one.mp3"), dir.path().join("1.mp3")).unwrap();
        symlink(sources.path().join("two.mp3"), dir.path().join("2.mp3")).unwrap();
        symlink(sources.path().join("gone.mp3"), dir.path().join("3.mp3")).unwrap();

        let files = discover(dir.path()).unwrap();
        let titles: Vec<_> = files.iter().map(|file| file.title.as_str()).collect();
        assert_eq!(titles, ["One", "Two"]);
    }

    #[test]
    fn empty_directory() {
        let dir = tempdir().unwrap();
        assert!(discover(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_directory() {
        let dir = tempdir().unwrap();

        assert!(matches!(
            discover(dir.path().join("missing")),
            Err(DiscoverError::Walk(_))
        ));
    }
}
