use std::path::PathBuf;

/// Named failures of the metadata pipelines. Plumbing errors (I/O, CSV,
/// YAML) travel alongside these through `anyhow`.
#[derive(thiserror::Error, Debug)]
pub enum MetaError {
    #[error("No line starting with {marker:?} found in \"{}\"", file.display())]
    MissingHeader { file: PathBuf, marker: String },

    #[error("Column \"{name}\" not found; available columns: {available:?}")]
    MissingColumn {
        name: String,
        available: Vec<String>,
    },

    #[error("Cannot place column \"{name}\" at index {index}: table has {width} other columns")]
    ColumnPosition {
        name: String,
        index: usize,
        width: usize,
    },

    #[error("Column \"{column}\" needs {expected} values, got {actual}")]
    RowCount {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Expected {expected} column names but table has {actual} columns")]
    ColumnCount { expected: usize, actual: usize },

    #[error("Row {row} of \"{}\" has {fields} fields; expected a single column of paths", file.display())]
    NotSingleColumn {
        file: PathBuf,
        row: usize,
        fields: usize,
    },

    #[error("Row {row} has {fields} fields but the header has {width}")]
    RaggedRow {
        row: usize,
        fields: usize,
        width: usize,
    },
}
