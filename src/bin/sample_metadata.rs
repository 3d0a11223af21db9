use anyhow::Result;
use clap::Parser;
use mtbmeta::{logging, process::samples, Config};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Derive sample metadata from a list of FASTQ paths")]
struct Args {
    /// Path to the fastq list file
    #[arg(short = 'f', long = "fastq_list")]
    fastq_list: PathBuf,
    /// Output file (default: sample_metadata.txt)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// YAML file overriding the built-in layout constants
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(output) = args.output {
        config.samples.output_path = output;
    }

    info!(list = %args.fastq_list.display(), "building sample metadata");
    samples::process_path_list(&args.fastq_list, &config.samples)?;
    Ok(())
}
