use anyhow::{Context, Result};
use std::{fs, path::Path};
use tracing::{debug, instrument};

use crate::config::HeaderConfig;
use crate::error::MetaError;
use crate::process::utils::strip_marker;
use crate::table::{Table, TAB};

/// The commented line that actually names the columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredHeader {
    /// Zero-based line number of the comment line.
    pub line: usize,
    /// Column names line with the marker and whitespace stripped.
    pub text: String,
}

/// Find the last line starting with `marker`, scanning from the end.
pub fn recover_header(text: &str, marker: &str) -> Option<RecoveredHeader> {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    (0..lines.len())
        .rev()
        .find(|&i| lines[i].starts_with(marker))
        .map(|i| RecoveredHeader {
            line: i,
            text: strip_marker(lines[i], marker),
        })
}

/// Header text followed by every line after the comment line.
pub fn stage_table(text: &str, header: &RecoveredHeader) -> String {
    let mut staged = String::with_capacity(text.len());
    staged.push_str(&header.text);
    staged.push('\n');
    for line in text.split_inclusive('\n').skip(header.line + 1) {
        staged.push_str(line);
    }
    staged
}

/// Read `input`, restore its commented header, stage the result at the
/// configured staging path and parse it as a tab-delimited table.
#[instrument(level = "info", skip(input, config), fields(path = %input.as_ref().display()))]
pub fn load_with_recovered_header<P: AsRef<Path>>(input: P, config: &HeaderConfig) -> Result<Table> {
    let input = input.as_ref();
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let header = recover_header(&text, &config.marker).ok_or_else(|| MetaError::MissingHeader {
        file: input.to_path_buf(),
        marker: config.marker.clone(),
    })?;
    debug!(line = header.line, header = %header.text, "recovered header");

    let staged = stage_table(&text, &header);
    fs::write(&config.staging_path, staged).with_context(|| {
        format!(
            "Failed to write staging file {}",
            config.staging_path.display()
        )
    })?;
    debug!(staging = %config.staging_path.display(), "staged table");

    Table::read_delimited(&config.staging_path, TAB)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::init_test_logging;
    use tempfile::tempdir;

    const INPUT: &str = "# run 42\n# generated by a pipeline\n#col1\tcol2\tOrf\tcount\na\tb\tRVBD0001:dnaA\t7\nc\td\tRVBD0002:dnaN\t9\n";

    #[test]
    fn test_recover_header_takes_last_comment() {
        let header = recover_header(INPUT, "#").unwrap();
        assert_eq!(header.line, 2);
        assert_eq!(header.text, "col1\tcol2\tOrf\tcount");
    }

    #[test]
    fn test_recover_header_ignores_indented_marker() {
        assert_eq!(recover_header("a\tb\n  # not a header\n", "#"), None);
    }

    #[test]
    fn test_stage_table_drops_preamble() {
        let header = recover_header(INPUT, "#").unwrap();
        assert_eq!(
            stage_table(INPUT, &header),
            "col1\tcol2\tOrf\tcount\na\tb\tRVBD0001:dnaA\t7\nc\td\tRVBD0002:dnaN\t9\n"
        );
    }

    #[test]
    fn test_load_with_recovered_header() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let input = dir.path().join("in.txt");
        fs::write(&input, INPUT)?;
        let config = HeaderConfig {
            staging_path: dir.path().join("temp_file.txt"),
            ..HeaderConfig::default()
        };

        let table = load_with_recovered_header(&input, &config)?;
        assert_eq!(table.headers, vec!["col1", "col2", "Orf", "count"]);
        assert_eq!(table.len(), 2);
        assert!(config.staging_path.exists());
        Ok(())
    }

    #[test]
    fn test_missing_header_is_named_error() -> Result<()> {
        let dir = tempdir()?;
        let input = dir.path().join("in.txt");
        fs::write(&input, "a\tb\n1\t2\n")?;
        let config = HeaderConfig {
            staging_path: dir.path().join("temp_file.txt"),
            ..HeaderConfig::default()
        };

        let err = load_with_recovered_header(&input, &config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MetaError>(),
            Some(MetaError::MissingHeader { .. })
        ));
        assert!(!config.staging_path.exists());
        Ok(())
    }
}
