use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path, path::PathBuf};
use tracing::debug;

/// Concentration codes used in sample names, as multiples of the MIC.
static DEFAULT_MIC_LABELS: Lazy<BTreeMap<String, f64>> = Lazy::new(|| {
    [
        ("03", 0.03125),
        ("06", 0.0625),
        ("12", 0.125),
        ("25", 0.25),
        ("37", 0.375),
        ("50", 0.5),
        ("75", 0.75),
        ("1", 1.0),
        ("2", 2.0),
    ]
    .into_iter()
    .map(|(code, mult)| (code.to_string(), mult))
    .collect()
});

/// Dataset layout constants. Every field has a default so a partial YAML
/// file (or none at all) is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub header: HeaderConfig,
    pub rv_number: RvNumberConfig,
    pub drugs: DrugsConfig,
    pub samples: SamplesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Prefix marking the commented header line.
    pub marker: String,
    /// Where the re-headed table is staged before parsing.
    pub staging_path: PathBuf,
    /// Rows shown in the "Initial table" preview.
    pub preview_rows: usize,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            marker: "#".into(),
            staging_path: PathBuf::from("temp_file.txt"),
            preview_rows: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RvNumberConfig {
    pub source_column: String,
    pub target_column: String,
    pub separator: String,
    pub from_prefix: String,
    pub to_prefix: String,
    /// Zero-based column index the derived column is moved to.
    pub position: usize,
}

impl Default for RvNumberConfig {
    fn default() -> Self {
        Self {
            source_column: "Orf".into(),
            target_column: "Rv_number".into(),
            separator: ":".into(),
            from_prefix: "RVBD".into(),
            to_prefix: "rv".into(),
            position: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrugsConfig {
    pub column: String,
    /// Footer rows at the end of the metadata table that are not samples.
    pub trailer_rows: usize,
}

impl Default for DrugsConfig {
    fn default() -> Self {
        Self {
            column: "drug".into(),
            trailer_rows: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplesConfig {
    /// Regex whose first capture group is the sample name.
    pub pattern: String,
    pub days_predepletion: String,
    pub mic_labels: BTreeMap<String, f64>,
    /// Names given to the sample, drug, concentration and days columns.
    pub columns: Vec<String>,
    pub output_path: PathBuf,
}

impl Default for SamplesConfig {
    fn default() -> Self {
        Self {
            pattern: r"raw_fastq/([\w\d_-]+_[\d_]+)\.fastq\.gz".into(),
            days_predepletion: "1".into(),
            mic_labels: DEFAULT_MIC_LABELS.clone(),
            columns: ["column_name", "drug", "conc_xMIC", "days_predepletion"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            output_path: PathBuf::from("sample_metadata.txt"),
        }
    }
}

impl Config {
    /// Read a YAML config file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// The config at `path` if given, the built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_yaml_file(p),
            None => Ok(Self::default()),
        }
    }
}
