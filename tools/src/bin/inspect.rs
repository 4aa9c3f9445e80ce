use anyhow::Result;
use clap::Parser;

use mp3chap_tools::inspect::{inspect, InspectArgs};
use mp3chap_tools::utils::init_logging;

fn main() -> Result<()> {
    let args = InspectArgs::parse_from(wild::args());
    init_logging(args.verbose);

    inspect(&args)
}
