use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{PipelineError, Result};

/// Optional configuration file in the working directory. Absent file means
/// conventional defaults; the only knob is the data-root directory.
pub const CONFIG_FILE: &str = "gridload.toml";

const DEFAULT_DATA_ROOT: &str = "data";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub data_root: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        if !Path::new(CONFIG_FILE).exists() {
            return Ok(Self { data_root: None });
        }
        let content = fs::read_to_string(CONFIG_FILE).map_err(|e| {
            PipelineError::Config(format!("Failed to read config file '{}': {}", CONFIG_FILE, e))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Fixed, conventionally-located input and output paths for every pipeline
/// stage, all derived from a single data root:
///
///   raw/        the three externally sourced tables
///   interim/    one canonical file per normalizer
///   processed/  the region summary and the enriched master table
///   logs/       the structured report of the last full run
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub raw_facilities: PathBuf,
    pub raw_emissions: PathBuf,
    pub raw_capacity: PathBuf,
    pub interim_facilities: PathBuf,
    pub interim_emissions: PathBuf,
    pub interim_capacity: PathBuf,
    pub region_summary: PathBuf,
    pub enriched_facilities: PathBuf,
    pub run_report: PathBuf,
}

impl DataPaths {
    pub fn from_root(root: &Path) -> Self {
        let raw = root.join("raw");
        let interim = root.join("interim");
        let processed = root.join("processed");
        Self {
            raw_facilities: raw.join(constants::RAW_FACILITIES_FILE),
            raw_emissions: raw.join(constants::RAW_EMISSIONS_FILE),
            raw_capacity: raw.join(constants::RAW_CAPACITY_FILE),
            interim_facilities: interim.join(constants::INTERIM_FACILITIES_FILE),
            interim_emissions: interim.join(constants::INTERIM_EMISSIONS_FILE),
            interim_capacity: interim.join(constants::INTERIM_CAPACITY_FILE),
            region_summary: processed.join(constants::REGION_SUMMARY_FILE),
            enriched_facilities: processed.join(constants::ENRICHED_FACILITIES_FILE),
            run_report: root.join("logs").join(constants::RUN_REPORT_FILE),
        }
    }

    /// Paths from `gridload.toml` when present, conventional defaults
    /// otherwise.
    pub fn load() -> Result<Self> {
        let config = Config::load()?;
        let root = config
            .data_root
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_ROOT));
        Ok(Self::from_root(&root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_derive_from_root() {
        let paths = DataPaths::from_root(Path::new("/srv/griddata"));
        assert_eq!(
            paths.raw_facilities,
            PathBuf::from("/srv/griddata/raw/ai_facilities_raw.csv")
        );
        assert_eq!(
            paths.interim_capacity,
            PathBuf::from("/srv/griddata/interim/capacity_cleaned.csv")
        );
        assert_eq!(
            paths.region_summary,
            PathBuf::from("/srv/griddata/processed/region_summary.csv")
        );
    }
}
