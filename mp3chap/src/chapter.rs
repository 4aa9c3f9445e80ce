//! Chapters of the merged file, one per input file

use crate::audio_file::AudioFile;
use std::slice;

/// A named time range within the merged file
///
/// All times are in whole milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    name: String,
    start: u64,
    length: u64,
}

impl Chapter {
    /// The number of milliseconds between the end of one chapter and the start of the next
    pub const GAP: u64 = 1;

    /// The name of the chapter, taken from the title of its input file
    pub fn name(&self) -> &str {
        &self.name
    }

    /// When the chapter starts
    pub fn start(&self) -> u64 {
        self.start
    }

    /// How long the chapter lasts
    pub fn length(&self) -> u64 {
        self.length
    }

    /// When the chapter ends
    pub fn end(&self) -> u64 {
        self.start + self.length
    }
}

/// An ordered, immutable sequence of [`Chapter`]s
///
/// The first chapter starts at 0, every next one starts [`Chapter::GAP`] after the end
/// of its predecessor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterSet {
    chapters: Vec<Chapter>,
}

impl ChapterSet {
    /// Derive one chapter per file, in the same order
    ///
    /// The name is the file's title (possibly empty) and the length its duration,
    /// with any fraction of a millisecond cut off.
    pub fn from_files(files: &[AudioFile]) -> Self {
        Self::from_lengths(
            files
                .iter()
                .map(|file| (file.title.clone(), file.duration.as_millis() as u64)),
        )
    }

    /// Lay out chapters back to back, given their names and lengths in milliseconds
    pub fn from_lengths<I>(chapters: I) -> Self
    where
        I: IntoIterator<Item = (String, u64)>,
    {
        let chapters = chapters
            .into_iter()
            .scan(0, |next_start, (name, length)| {
                let start = *next_start;
                *next_start = start + length + Chapter::GAP;

                Some(Chapter {
                    name,
                    start,
                    length,
                })
            })
            .collect();

        Self { chapters }
    }

    /// Iterate over the chapters in order
    pub fn iter(&self) -> slice::Iter<'_, Chapter> {
        self.chapters.iter()
    }

    pub fn as_slice(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

impl<'a> IntoIterator for &'a ChapterSet {
    type Item = &'a Chapter;
    type IntoIter = slice::Iter<'a, Chapter>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::audio_file;
    use std::time::Duration;

    #[test]
    fn three_files() {
        let files = [
            audio_file("a.mp3", "A", Duration::from_secs_f64(60.0)),
            audio_file("b.mp3", "B", Duration::from_secs_f64(45.5)),
            audio_file("c.mp3", "C", Duration::from_secs_f64(30.25)),
        ];

        let chapters = ChapterSet::from_files(&files);
        let summary: Vec<_> = chapters
            .iter()
            .map(|chapter| (chapter.name(), chapter.start(), chapter.end()))
            .collect();

        assert_eq!(
            summary,
            [("A", 0, 60000), ("B", 60001, 105501), ("C", 105502, 135752)]
        );
    }

    #[test]
    fn one_chapter_per_file() {
        for count in 0..8 {
            let files: Vec<_> = (0..count)
                .map(|i| {
                    audio_file(
                        &format!("{i}.mp3"),
                        &i.to_string(),
                        Duration::from_millis(1000 * i as u64 + 7),
                    )
                })
                .collect();

            let chapters = ChapterSet::from_files(&files);
            assert_eq!(chapters.len(), count);

            for (chapter, file) in chapters.iter().zip(&files) {
                assert_eq!(chapter.name(), file.title);
            }
        }
    }

    #[test]
    fn gap_between_chapters() {
        let lengths = [0, 1, 999, 0, 123_456].map(|length| (String::new(), length));
        let chapters = ChapterSet::from_lengths(lengths);

        assert_eq!(chapters.as_slice()[0].start(), 0);
        for pair in chapters.as_slice().windows(2) {
            assert_eq!(pair[1].start(), pair[0].start() + pair[0].length() + 1);
        }
    }

    #[test]
    fn truncates_fractional_milliseconds() {
        let files = [
            audio_file("a.mp3", "", Duration::from_micros(1_999)),
            audio_file("b.mp3", "", Duration::ZERO),
        ];
        let chapters = ChapterSet::from_files(&files);

        assert_eq!(chapters.as_slice()[0].length(), 1);
        assert_eq!(chapters.as_slice()[0].name(), "");
        assert_eq!(chapters.as_slice()[1].start(), 2);
        assert_eq!(chapters.as_slice()[1].length(), 0);
    }
}
