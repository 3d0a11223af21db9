use anyhow::Result;
use std::{collections::HashSet, io::Write, path::Path};
use tracing::{debug, instrument};

use crate::config::DrugsConfig;
use crate::table::{Table, TAB};

/// Distinct values of `column` in first-occurrence order, ignoring the last
/// `trailer_rows` rows. An empty cell is reported as an empty value, not `nan`.
pub fn unique_values(mut table: Table, column: &str, trailer_rows: usize) -> Result<Vec<String>> {
    // resolve the column before trimming so a bad name fails on short tables too
    table.column_index(column)?;
    table.drop_tail(trailer_rows);

    let mut seen = HashSet::new();
    let unique: Vec<String> = table
        .column(column)?
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect();
    Ok(unique)
}

/// Load a tab-delimited sample metadata file and list its drugs.
#[instrument(level = "info", skip(path, config), fields(path = %path.as_ref().display()))]
pub fn extract_unique_drugs<P: AsRef<Path>>(path: P, config: &DrugsConfig) -> Result<Vec<String>> {
    let table = Table::read_delimited(path, TAB)?;
    debug!(rows = table.len(), trailer = config.trailer_rows, "loaded metadata");
    unique_values(table, &config.column, config.trailer_rows)
}

/// One drug per line.
pub fn write_drugs<W: Write>(drugs: &[String], out: &mut W) -> Result<()> {
    for drug in drugs {
        writeln!(out, "{}", drug)?;
    }
    out.flush()?;
    Ok(())
}
