use anyhow::Result;
use clap::Parser;
use mtbmeta::{logging, process::drugs, Config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Print each distinct drug in a sample metadata table")]
struct Args {
    /// Tab-delimited sample metadata file
    sample_metadata: PathBuf,
    /// YAML file overriding the built-in layout constants
    #[arg(long)]
    config: Option<PathBuf>,
    /// Footer rows to ignore at the end of the file
    #[arg(long)]
    trailer_rows: Option<usize>,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(n) = args.trailer_rows {
        config.drugs.trailer_rows = n;
    }

    let unique = drugs::extract_unique_drugs(&args.sample_metadata, &config.drugs)?;
    drugs::write_drugs(&unique, &mut std::io::stdout().lock())?;
    Ok(())
}
