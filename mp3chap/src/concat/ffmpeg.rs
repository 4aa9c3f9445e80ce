use super::{ConcatError, Concatenator};
use crate::audio_file::AudioFile;
use log::info;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

/// Concatenate by running `ffmpeg` with its [concat protocol](https://trac.ffmpeg.org/wiki/Concatenate#protocol)
///
/// The protocol simply appends all files into one stream, which is then stream-copied
/// into the output without re-encoding. The call blocks until `ffmpeg` exits.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    program: PathBuf,
}

impl Ffmpeg {
    /// The program run by [`Ffmpeg::default()`]
    pub const DEFAULT_PROGRAM: &'static str = "ffmpeg";

    /// Use a specific `ffmpeg` executable
    pub fn new<P>(program: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            program: program.into(),
        }
    }

    /// The executable that will be run
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The arguments passed to `ffmpeg`
    ///
    /// ```text
    /// -i concat:file1.mp3|file2.mp3|... -y -c copy output.mp3
    /// ```
    pub fn args(files: &[AudioFile], output: &Path) -> Vec<OsString> {
        let mut input = OsString::from("concat:");
        for (index, file) in files.iter().enumerate() {
            if index > 0 {
                input.push("|");
            }
            input.push(&file.path);
        }

        vec![
            "-i".into(),
            input,
            "-y".into(),
            "-c".into(),
            "copy".into(),
            output.into(),
        ]
    }
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROGRAM)
    }
}

impl Concatenator for Ffmpeg {
    fn concat(&self, files: &[AudioFile], output: &Path) -> Result<(), ConcatError> {
        if files.is_empty() {
            return Err(ConcatError::NoInput);
        }

        let args = Self::args(files, output);
        let command = std::iter::once(self.program.as_os_str())
            .chain(args.iter().map(OsString::as_os_str))
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");

        info!("Running {command}");

        let result = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| ConcatError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !result.status.success() {
            return Err(ConcatError::Tool {
                command,
                status: result.status,
                stdout: String::from_utf8_lossy(&result.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::audio_file;
    use std::time::Duration;

    fn files() -> Vec<AudioFile> {
        ["book/01.mp3", "book/02.mp3", "book/10.mp3"]
            .iter()
            .map(|path| audio_file(path, "", Duration::ZERO))
            .collect()
    }

    #[test]
    fn args() {
        let args = Ffmpeg::args(&files(), Path::new("book.mp3"));

        assert_eq!(
            args,
            [
                "-i",
                "concat:book/01.mp3|book/02.mp3|book/10.mp3",
                "-y",
                "-c",
                "copy",
                "book.mp3"
            ]
        );
    }

    #[test]
    fn no_input() {
        assert!(matches!(
            Ffmpeg::default().concat(&[], Path::new("book.mp3")),
            Err(ConcatError::NoInput)
        ));
    }

    #[test]
    fn missing_program() {
        let ffmpeg = Ffmpeg::new("this-program-does-not-exist-anywhere");

        assert!(matches!(
            ffmpeg.concat(&files(), Path::new("book.mp3")),
            Err(ConcatError::Spawn { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn failing_program() {
        let ffmpeg = Ffmpeg::new("false");

        match ffmpeg.concat(&files(), Path::new("book.mp3")) {
            Err(ConcatError::Tool {
                command, status, ..
            }) => {
                assert!(command.starts_with("false -i concat:book/01.mp3|"));
                assert!(command.ends_with("-c copy book.mp3"));
                assert!(!status.success());
            }
            other => panic!("Expected a tool failure, got {other:?}"),
        }
    }
}
