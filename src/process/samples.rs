use anyhow::{Context, Result};
use csv::ReaderBuilder;
use regex::Regex;
use std::{collections::BTreeMap, fmt, fs::File, path::Path};
use tracing::{debug, info, instrument, warn};

use crate::config::SamplesConfig;
use crate::error::MetaError;
use crate::process::utils::segment;
use crate::table::{Table, COMMA, TAB};

/// Working column names, before the configured names are applied.
const COLUMNS: [&str; 4] = ["sample", "drug", "conc_xMIC", "days_predepletion"];

/// A concentration code after lookup: either a known multiple of the MIC
/// or the code exactly as it appeared.
#[derive(Debug, Clone, PartialEq)]
pub enum Concentration {
    Multiple(f64),
    Raw(String),
}

impl fmt::Display for Concentration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Concentration::Multiple(m) => write!(f, "{}", m),
            Concentration::Raw(code) => f.write_str(code),
        }
    }
}

/// Code → multiple-of-MIC lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct MicLabels(BTreeMap<String, f64>);

impl MicLabels {
    pub fn new(labels: BTreeMap<String, f64>) -> Self {
        Self(labels)
    }

    /// Unmapped codes pass through as `Raw`.
    pub fn resolve(&self, code: &str) -> Concentration {
        match self.0.get(code) {
            Some(&m) => Concentration::Multiple(m),
            None => Concentration::Raw(code.to_string()),
        }
    }
}

/// One row of the sample metadata table. Fields are `None` when the path
/// does not look like a sample FASTQ.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    pub column_name: Option<String>,
    pub drug: Option<String>,
    pub conc_x_mic: Option<Concentration>,
    pub days_predepletion: String,
}

impl SampleRecord {
    fn into_row(self) -> Vec<String> {
        vec![
            self.column_name.unwrap_or_default(),
            self.drug.unwrap_or_default(),
            self.conc_x_mic.map(|c| c.to_string()).unwrap_or_default(),
            self.days_predepletion,
        ]
    }
}

/// Compiled form of [`SamplesConfig`].
pub struct SampleParser {
    pattern: Regex,
    labels: MicLabels,
    days_predepletion: String,
    columns: Vec<String>,
}

impl SampleParser {
    pub fn new(config: &SamplesConfig) -> Result<Self> {
        let pattern = Regex::new(&config.pattern)
            .with_context(|| format!("invalid sample pattern {:?}", config.pattern))?;
        Ok(Self {
            pattern,
            labels: MicLabels::new(config.mic_labels.clone()),
            days_predepletion: config.days_predepletion.clone(),
            columns: config.columns.clone(),
        })
    }

    /// `raw_fastq/S1_RIF_25.fastq.gz` → sample `S1_RIF_25`, drug `RIF`,
    /// concentration 0.25.
    pub fn parse(&self, path: &str) -> SampleRecord {
        let sample = self
            .pattern
            .captures(path)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
        if sample.is_none() {
            warn!(path, "path does not match the sample pattern");
        }

        let drug = sample
            .as_deref()
            .and_then(|s| segment(s, "_", 1))
            .map(str::to_string);
        let conc_x_mic = sample
            .as_deref()
            .and_then(|s| segment(s, "_", 2))
            .map(|code| self.labels.resolve(code));

        SampleRecord {
            column_name: sample,
            drug,
            conc_x_mic,
            days_predepletion: self.days_predepletion.clone(),
        }
    }
}

/// Read a headerless, single-column list of paths.
#[instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_path_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut rdr = ReaderBuilder::new()
        .delimiter(COMMA)
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut paths = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result
            .with_context(|| format!("CSV parse error in {} at record {}", path.display(), idx))?;
        if record.len() != 1 {
            return Err(MetaError::NotSingleColumn {
                file: path.to_path_buf(),
                row: idx,
                fields: record.len(),
            }
            .into());
        }
        paths.push(record[0].to_string());
    }
    debug!(paths = paths.len(), "read path list");
    Ok(paths)
}

/// Build the sample metadata table from FASTQ paths.
pub fn synthesize<S: AsRef<str>>(paths: &[S], parser: &SampleParser) -> Result<Table> {
    let mut table = Table::new(COLUMNS.iter().map(|c| c.to_string()).collect());
    table.rows = paths
        .iter()
        .map(|p| parser.parse(p.as_ref()).into_row())
        .collect();
    table.rename_columns(parser.columns.as_slice())?;
    Ok(table)
}

/// Read the path list at `input` and write the metadata table to the
/// configured output path.
#[instrument(level = "info", skip(input, config), fields(input = %input.as_ref().display()))]
pub fn process_path_list<P: AsRef<Path>>(input: P, config: &SamplesConfig) -> Result<Table> {
    let parser = SampleParser::new(config)?;
    let paths = read_path_list(input)?;
    let table = synthesize(&paths, &parser)?;
    table.write_delimited(&config.output_path, TAB)?;
    info!(
        rows = table.len(),
        output = %config.output_path.display(),
        "wrote sample metadata"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::init_test_logging;
    use std::fs;
    use tempfile::tempdir;

    fn parser() -> SampleParser {
        SampleParser::new(&SamplesConfig::default()).unwrap()
    }

    #[test]
    fn test_parse_sample_path() {
        let rec = parser().parse("raw_fastq/SAMPLE1_RIF_25.fastq.gz");
        assert_eq!(rec.column_name.as_deref(), Some("SAMPLE1_RIF_25"));
        assert_eq!(rec.drug.as_deref(), Some("RIF"));
        assert_eq!(rec.conc_x_mic, Some(Concentration::Multiple(0.25)));
        assert_eq!(rec.days_predepletion, "1");
    }

    #[test]
    fn test_parse_sample_inside_longer_path() {
        let rec = parser().parse("/data/run7/raw_fastq/H37Rv-ko_INH_03.fastq.gz");
        assert_eq!(rec.column_name.as_deref(), Some("H37Rv-ko_INH_03"));
        assert_eq!(rec.conc_x_mic, Some(Concentration::Multiple(0.03125)));
    }

    #[test]
    fn test_unmapped_code_passes_through() {
        let rec = parser().parse("raw_fastq/S2_EMB_99.fastq.gz");
        assert_eq!(rec.conc_x_mic, Some(Concentration::Raw("99".into())));
        assert_eq!(rec.conc_x_mic.unwrap().to_string(), "99");
    }

    #[test]
    fn test_non_matching_path_is_missing() {
        let rec = parser().parse("trimmed/S3_RIF_25.fq");
        assert_eq!(rec.column_name, None);
        assert_eq!(rec.drug, None);
        assert_eq!(rec.conc_x_mic, None);
        assert_eq!(rec.days_predepletion, "1");
    }

    #[test]
    fn test_two_segment_sample_has_no_concentration() {
        let rec = parser().parse("raw_fastq/DMSO_1.fastq.gz");
        assert_eq!(rec.drug.as_deref(), Some("1"));
        assert_eq!(rec.conc_x_mic, None);
    }

    #[test]
    fn test_concentration_display() {
        assert_eq!(Concentration::Multiple(1.0).to_string(), "1");
        assert_eq!(Concentration::Multiple(0.0625).to_string(), "0.0625");
    }

    #[test]
    fn test_column_names_must_cover_every_column() {
        let config = SamplesConfig {
            columns: vec!["sample".into(), "drug".into()],
            ..SamplesConfig::default()
        };
        let parser = SampleParser::new(&config).unwrap();
        let err = synthesize(&["raw_fastq/S1_RIF_25.fastq.gz"], &parser).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MetaError>(),
            Some(MetaError::ColumnCount { expected: 2, actual: 4 })
        ));
    }

    #[test]
    fn test_multi_column_list_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let list = dir.path().join("fastqs.txt");
        fs::write(&list, "raw_fastq/S1_RIF_25.fastq.gz\nraw_fastq/S2_INH_50.fastq.gz,extra\n")?;
        let err = read_path_list(&list).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MetaError>(),
            Some(MetaError::NotSingleColumn { row: 1, fields: 2, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_process_path_list_writes_table() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let list = dir.path().join("fastqs.txt");
        fs::write(
            &list,
            "raw_fastq/SAMPLE1_RIF_25.fastq.gz\nraw_fastq/SAMPLE2_INH_99.fastq.gz\nnotes.txt\n",
        )?;
        let config = SamplesConfig {
            output_path: dir.path().join("sample_metadata.txt"),
            ..SamplesConfig::default()
        };

        let table = process_path_list(&list, &config)?;
        assert_eq!(table.len(), 3);

        let written = fs::read_to_string(&config.output_path)?;
        assert_eq!(
            written,
            "column_name\tdrug\tconc_xMIC\tdays_predepletion\n\
             SAMPLE1_RIF_25\tRIF\t0.25\t1\n\
             SAMPLE2_INH_99\tINH\t99\t1\n\
             \t\t\t1\n"
        );
        Ok(())
    }
}
