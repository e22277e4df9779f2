use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PipelineError, Result};

/// A raw tabular input held fully in memory. Raw sources are a flexible
/// superset of the expected schema, so cells are only reachable through
/// named columns; an absent column reads as an absent value.
#[derive(Debug)]
pub struct RawTable {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

impl RawTable {
    /// Loads a raw CSV file. A missing file is the caller's fatal
    /// precondition, not a recoverable condition.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PipelineError::MissingInput(path.to_path_buf()));
        }
        let file = fs::File::open(path)?;
        let mut table = Self::from_reader(file)?;
        table.path = path.to_path_buf();
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut rows = Vec::new();
        for row in csv_reader.records() {
            rows.push(row?);
        }
        Ok(Self {
            path: PathBuf::from("<memory>"),
            headers,
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &StringRecord> {
        self.rows.iter()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Checks the stage's minimum viable schema, naming every absent
    /// column at once.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| !self.has_column(name))
            .map(|name| name.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::MissingColumns {
                path: self.path.clone(),
                columns: missing,
            })
        }
    }

    /// The raw cell under a named column, or `None` when the column does
    /// not exist in this file.
    pub fn field<'a>(&self, row: &'a StringRecord, name: &str) -> Option<&'a str> {
        self.column(name).and_then(|index| row.get(index))
    }
}

/// Serializes canonical records into an in-memory CSV buffer and writes it
/// in one shot, so a failed stage leaves no partial output file behind.
pub fn write_records<S: Serialize>(path: &Path, records: &[S]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| PipelineError::CsvWrite(e.to_string()))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

/// Reads an interim canonical file back into typed records.
pub fn read_records<D: DeserializeOwned>(path: &Path) -> Result<Vec<D>> {
    if !path.exists() {
        return Err(PipelineError::MissingInput(path.to_path_buf()));
    }
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}
