//! Main entry point for the mksunxiboot CLI tool

use clap::Parser;
use mksunxiboot::cli::{Args, init_logger, run_cli};

fn main() -> anyhow::Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        // usage errors go to stdout, like the help text
        Err(e) if e.use_stderr() => {
            print!("{}", e.render());
            std::process::exit(e.exit_code());
        }
        Err(e) => e.exit(),
    };
    init_logger(args.verbose);

    run_cli(args)
}
