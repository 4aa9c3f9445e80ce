use anyhow::Result;
use clap::Parser;

use mp3chap_tools::merge::{merge, MergeArgs};
use mp3chap_tools::utils::init_logging;

fn main() -> Result<()> {
    let args = MergeArgs::parse_from(wild::args());
    init_logging(args.verbose);

    merge(args)
}
