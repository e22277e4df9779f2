use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV write error: {0}")]
    CsvWrite(String),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Required input file is missing: {0}")]
    MissingInput(PathBuf),

    #[error("Input file '{path}' is missing required columns: {columns:?}")]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    #[error("Empty input: {0}")]
    EmptyTable(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
