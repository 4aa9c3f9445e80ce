use super::{ConcatError, Concatenator};
use crate::audio_file::AudioFile;
use log::debug;
use std::{
    fs::File,
    io::{self, BufWriter, Read, Seek, SeekFrom, Write},
    path::Path,
};

/// Concatenate by copying raw bytes, skipping the ID3 tags of every file
///
/// No audio is decoded or re-encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct InProcess;

impl Concatenator for InProcess {
    fn concat(&self, files: &[AudioFile], output: &Path) -> Result<(), ConcatError> {
        if files.is_empty() {
            return Err(ConcatError::NoInput);
        }

        let create_error = |source| ConcatError::Create {
            path: output.display().to_string(),
            source,
        };

        let mut writer = BufWriter::new(File::create(output).map_err(create_error)?);

        for file in files {
            copy_payload(file, &mut writer).map_err(|source| ConcatError::Copy {
                path: file.path.display().to_string(),
                source,
            })?;
        }

        writer.flush().map_err(create_error)?;
        Ok(())
    }
}

/// Append the bytes between the tags of a file to a writer
fn copy_payload<W>(file: &AudioFile, mut writer: W) -> Result<(), io::Error>
where
    W: Write,
{
    let range = file.payload_range();
    debug!(
        "Copying bytes {}..{} of {}",
        range.start,
        range.end,
        file.path.display()
    );

    let mut reader = File::open(&file.path)?;
    reader.seek(SeekFrom::Start(range.start))?;

    let len = range.end - range.start;
    let copied = io::copy(&mut reader.take(len), &mut writer)?;

    if copied != len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {len} bytes of audio, found {copied}"),
        ));
    }

    Ok(())
}
