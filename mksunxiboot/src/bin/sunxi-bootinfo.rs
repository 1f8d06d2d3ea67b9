//! Entry point for the sunxi-bootinfo image inspector

use clap::Parser;
use mksunxiboot::cli::{InfoArgs, init_logger, run_info};

fn main() -> anyhow::Result<()> {
    let args = InfoArgs::parse();
    init_logger(args.verbose);

    run_info(args)
}
