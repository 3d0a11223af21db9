use anyhow::Result;
use clap::Parser;
use mtbmeta::{logging, process::rv_number, Config};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Restore the commented header of a table and add an Rv_number column"
)]
struct Args {
    /// Path to the input data file
    #[arg(short, long)]
    data: PathBuf,
    /// Path to save the output data file
    #[arg(short, long)]
    output: PathBuf,
    /// YAML file overriding the built-in layout constants
    #[arg(long)]
    config: Option<PathBuf>,
    /// Where to stage the re-headed table before parsing
    #[arg(long)]
    staging: Option<PathBuf>,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(staging) = args.staging {
        config.header.staging_path = staging;
    }

    info!(data = %args.data.display(), "adding Rv numbers");
    rv_number::process_file(
        &args.data,
        &args.output,
        &config,
        &mut std::io::stdout().lock(),
    )?;
    Ok(())
}
