use anyhow::Result;
use std::{io::Write, path::Path};
use tracing::{info, instrument};

use crate::config::{Config, RvNumberConfig};
use crate::process::header::load_with_recovered_header;
use crate::process::utils::segment;
use crate::table::{Table, TAB};

/// `RVBD1234:abc` → `rv1234`: first separator segment, prefix swapped.
pub fn derive_rv_number(orf: &str, rule: &RvNumberConfig) -> String {
    let locus = segment(orf, &rule.separator, 0).unwrap_or_default();
    if rule.from_prefix.is_empty() {
        return locus.to_string();
    }
    locus.replace(&rule.from_prefix, &rule.to_prefix)
}

/// Derive the target column from the source column and move it into place.
/// An existing target column is overwritten, not duplicated.
pub fn add_rv_number(table: &mut Table, rule: &RvNumberConfig) -> Result<()> {
    let derived: Vec<String> = table
        .column(&rule.source_column)?
        .map(|orf| derive_rv_number(orf, rule))
        .collect();
    table.set_column(&rule.target_column, derived)?;
    table.move_column(&rule.target_column, rule.position)?;
    Ok(())
}

/// Restore the header of `input`, add the derived column, write `output`.
/// The initial-table preview and the confirmation go to `report`.
#[instrument(
    level = "info",
    skip(input, output, config, report),
    fields(input = %input.as_ref().display())
)]
pub fn process_file<P: AsRef<Path>, Q: AsRef<Path>, W: Write>(
    input: P,
    output: Q,
    config: &Config,
    report: &mut W,
) -> Result<Table> {
    let output = output.as_ref();
    let mut table = load_with_recovered_header(input, &config.header)?;

    writeln!(report, "Initial table:")?;
    write!(report, "{}", table.preview(config.header.preview_rows))?;

    add_rv_number(&mut table, &config.rv_number)?;
    table.write_delimited(output, TAB)?;
    info!(rows = table.len(), output = %output.display(), "wrote table");
    writeln!(report, "\nTable saved to {}", output.display())?;
    report.flush()?;
    Ok(table)
}
