//! Gluing the audio of multiple MP3 files together
//!
//! Two strategies are available, both behind the [`Concatenator`] trait:
//!
//! * [`InProcess`] copies the bytes between the ID3 tags of every file
//! * [`Ffmpeg`] hands the work to an external `ffmpeg` process, using stream copy

mod ffmpeg;
mod in_process;

pub use ffmpeg::Ffmpeg;
pub use in_process::InProcess;

use crate::audio_file::AudioFile;
use std::{io, path::Path, process::ExitStatus};
use thiserror::Error;

/// Something that can concatenate the audio of MP3 files into a single output file
///
/// The output file is created or overwritten. Files are concatenated in the order
/// they're given.
pub trait Concatenator {
    fn concat(&self, files: &[AudioFile], output: &Path) -> Result<(), ConcatError>;
}

/// Errors that might be returned from [`Concatenator::concat()`]
///
/// If concatenation fails halfway, the output file is left as is.
#[derive(Debug, Error)]
pub enum ConcatError {
    /// There were no files to concatenate
    #[error("No MP3 files to concatenate")]
    NoInput,

    /// The output file could not be created
    #[error("Could not create {path}")]
    Create {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Copying the audio from one of the input files failed
    #[error("Could not copy the audio from {path}")]
    Copy {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The external tool could not be started
    #[error("Could not run {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The external tool ran, but reported failure
    #[error("{command}\n{status}\n{stdout}{stderr}")]
    Tool {
        command: String,
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
}
