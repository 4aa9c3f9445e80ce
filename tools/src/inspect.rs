//! The `mp3chap-inspect` command

use crate::utils::format_ms;
use anyhow::{Context, Result};
use clap::Parser;
use mp3chap::id3::ChapterTag;
use std::path::{Path, PathBuf};

/// Arguments for the `mp3chap-inspect` command
#[derive(Parser)]
#[clap(author, version, about = "Print the chapters stored in MP3 files", long_about = None)]
pub struct InspectArgs {
    /// The MP3 file(s) to inspect
    #[clap(required = true, value_name = "FILE")]
    paths: Vec<PathBuf>,

    /// Log more details (repeat for even more)
    #[clap(short, long, parse(from_occurrences))]
    pub verbose: usize,
}

/// Print the chapters stored in MP3 files
pub fn inspect(args: &InspectArgs) -> Result<()> {
    if let Some((last, rest)) = args.paths.split_last() {
        for path in rest {
            print(path)?;
            println!();
        }

        print(last)?;
    }

    Ok(())
}

fn print(path: &Path) -> Result<()> {
    let tag = ChapterTag::from_path(path)
        .context(format!("Reading the chapters of {} failed", path.display()))?;

    println!("{}", path.display());

    let Some(tag) = tag else {
        println!("  No chapters");
        return Ok(());
    };

    if let Some(description) = &tag.toc.description {
        println!("  {description}");
    }

    for (index, chapter) in tag.chapters.iter().enumerate() {
        println!(
            "{index:>3} | {:<8} | {} - {} | {}",
            chapter.element_id,
            format_ms(chapter.start.into()),
            format_ms(chapter.end.into()),
            chapter.title.as_deref().unwrap_or_default()
        );
    }

    Ok(())
}
