//! Command line interface for mksunxiboot and sunxi-bootinfo

use crate::error::SunxiBootError;
use crate::{BootImage, BootImageBuilder, BootProfile, VERSION};
use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use log::{LevelFilter, debug};
use std::fs::File;
use std::path::PathBuf;

/// Command line arguments for mksunxiboot
#[derive(Parser, Debug)]
#[command(name = "mksunxiboot")]
#[command(version = VERSION)]
#[command(about = "Makes an input bin file to sun4i bootable image", long_about = None)]
pub struct Args {
    /// Raw boot0 binary
    pub input: PathBuf,

    /// Image file to create or overwrite
    pub output: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode - only output errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Command line arguments for sunxi-bootinfo
#[derive(Parser, Debug)]
#[command(name = "sunxi-bootinfo")]
#[command(version = VERSION)]
#[command(about = "Show and verify the header of a sun4i boot image", long_about = None)]
pub struct InfoArgs {
    /// Image file to examine
    pub image_file: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Set up `env_logger`; `RUST_LOG` takes precedence over `verbose`.
pub fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

/// Build a boot image from `args.input` into `args.output`.
pub fn run_cli(args: Args) -> anyhow::Result<()> {
    let profile = &BootProfile::SUN4I_BOOT0;
    let quiet = args.quiet;

    let mut input = File::open(&args.input).map_err(|source| SunxiBootError::OpenInput {
        path: args.input.clone(),
        source,
    })?;
    let mut output = File::create(&args.output).map_err(|source| SunxiBootError::OpenOutput {
        path: args.output.clone(),
        source,
    })?;

    let builder = BootImageBuilder::new(profile).payload_from_reader(&mut input)?;
    let stats = *builder.stats();
    if !quiet {
        println!("File size: 0x{:x}", stats.file_size);
        println!("Load size: 0x{:x}", stats.load_size);
        println!("Read 0x{:x} bytes", stats.read);
    }

    let image = builder.build()?;
    image.write_to(&mut output)?;
    if !quiet {
        println!("Write 0x{:x} bytes", image.len());
    }

    debug!(
        "{} -> {}: check_sum 0x{:08x}",
        args.input.display(),
        args.output.display(),
        image.header().check_sum
    );

    Ok(())
}

/// Print the header of `args.image_file` and verify it.
pub fn run_info(args: InfoArgs) -> anyhow::Result<()> {
    let profile = &BootProfile::SUN4I_BOOT0;

    let data = std::fs::read(&args.image_file)
        .with_context(|| format!("Failed to read image '{}'", args.image_file.display()))?;
    let image = BootImage::from_bytes(&data)?;

    println!("{}", args.image_file.display().to_string().bold());
    println!("{}", image.header().summary());
    if data.len() > image.len() {
        println!("Trailing: {} bytes past length", data.len() - image.len());
    }

    match image.verify(profile) {
        Ok(()) => {
            println!("Image verification {}", "successful".green());
            Ok(())
        }
        Err(e) => {
            println!("Image verification {}", "FAILED".red());
            Err(e.into())
        }
    }
}
