//! The `mp3chap` command

use crate::utils::format_ms;
use anyhow::{Context, Result};
use clap::Parser;
use mp3chap::{
    concat::{Concatenator, Ffmpeg, InProcess},
    merge::default_output_name,
};
use std::path::PathBuf;

/// Arguments for the `mp3chap` command
#[derive(Parser)]
#[clap(
    author,
    version,
    about = "Merge a directory of MP3 files into a single MP3 with chapters",
    long_about = "Merge a directory of MP3 files into a single MP3 with chapters.\n\nFiles are merged in natural order of their names (track2 before track10). Every file becomes a chapter, named after its title tag."
)]
pub struct MergeArgs {
    /// Directory with the MP3 files to merge
    directory: PathBuf,

    /// The output file, named after the directory by default
    #[clap(short, long, value_name = "MP3")]
    output: Option<PathBuf>,

    /// Use ffmpeg for concatenating the MP3 files
    #[clap(long)]
    ffmpeg: bool,

    /// The ffmpeg executable to run
    #[clap(long, value_name = "PROGRAM", default_value = "ffmpeg")]
    ffmpeg_path: PathBuf,

    /// Log more details (repeat for even more)
    #[clap(short, long, parse(from_occurrences))]
    pub verbose: usize,
}

/// Merge a directory of MP3 files into a single MP3 with chapters
pub fn merge(args: MergeArgs) -> Result<()> {
    let output = match args.output {
        Some(output) => output,
        None => default_output_name(&args.directory).context(format!(
            "Could not derive an output name from {}",
            args.directory.display()
        ))?,
    };

    let concatenator: Box<dyn Concatenator> = if args.ffmpeg {
        Box::new(Ffmpeg::new(args.ffmpeg_path))
    } else {
        Box::new(InProcess)
    };

    let merged = mp3chap::merge::merge(&args.directory, &output, concatenator.as_ref())
        .context(format!("Merging {} failed", args.directory.display()))?;

    let ranges: Vec<_> = merged
        .chapters
        .iter()
        .map(|chapter| {
            format!(
                "{} - {}",
                format_ms(chapter.start()),
                format_ms(chapter.end())
            )
        })
        .collect();
    let width = ranges.iter().map(String::len).max().unwrap_or_default();

    for (index, (chapter, range)) in merged.chapters.iter().zip(&ranges).enumerate() {
        println!("{index:02}. {range:<width$} {}", chapter.name());
    }

    println!("Wrote {}", merged.path.display());

    Ok(())
}
