//! # MP3 Chapter Tools
//!
//! Audiobooks and podcasts are often distributed as a folder of MP3 files, one per
//! chapter. Most players handle a single file with embedded chapters a lot better.
//! This crate provides command-line utilities that merge such a folder into one MP3,
//! with an [ID3v2 chapter](https://id3.org/id3v2-chapters-1.0) for every input file.
//!
//! ## Merge
//!
//! ```console
//! mp3chap 0.1.0
//! Merge a directory of MP3 files into a single MP3 with chapters
//!
//! USAGE:
//!     mp3chap [OPTIONS] <DIRECTORY>
//!
//! ARGS:
//!     <DIRECTORY>    Directory with the MP3 files to merge
//!
//! OPTIONS:
//!         --ffmpeg                     Use ffmpeg for concatenating the MP3 files
//!         --ffmpeg-path <PROGRAM>      The ffmpeg executable to run [default: ffmpeg]
//!     -h, --help                       Print help information
//!     -o, --output <MP3>               The output file, named after the directory by default
//!     -v, --verbose                    Log more details (repeat for even more)
//!     -V, --version                    Print version information
//! ```
//!
//! ### Example
//!
//! ```console
//! 4ntler@mbp > mp3chap ~/Audiobooks/Dracula
//! 00. 0s - 12m 3s 82ms            Chapter 1
//! 01. 12m 3s 83ms - 25m 40s 10ms  Chapter 2
//! 02. 25m 40s 11ms - 38m 2s 500ms Chapter 3
//! Wrote Dracula.mp3
//! ```
//!
//! ## Inspect
//!
//! ```console
//! mp3chap-inspect 0.1.0
//! Print the chapters stored in MP3 files
//!
//! USAGE:
//!     mp3chap-inspect [OPTIONS] <FILE>...
//!
//! ARGS:
//!     <FILE>...    The MP3 file(s) to inspect
//! ```

pub mod inspect;
pub mod merge;
pub mod utils;
