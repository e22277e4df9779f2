// The cleaning / aggregation / join pipeline, one module per stage.

pub mod capacity;
pub mod emissions;
pub mod facilities;
pub mod geocode;
pub mod integrate;
pub mod rules;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::DataPaths;
use crate::error::Result;

/// What one stage did to its data, used for the lifecycle confirmation
/// message and the structured run report.
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: &'static str,
    pub rows_in: usize,
    pub rows_out: usize,
    pub rows_dropped: usize,
    pub output: PathBuf,
}

impl StageReport {
    pub fn new(
        stage: &'static str,
        rows_in: usize,
        rows_out: usize,
        rows_dropped: usize,
        output: &Path,
    ) -> Self {
        Self {
            stage,
            rows_in,
            rows_out,
            rows_dropped,
            output: output.to_path_buf(),
        }
    }

    pub fn confirmation(&self) -> String {
        if self.rows_dropped > 0 {
            format!(
                "{}: {} rows in, {} rows out ({} dropped), written to {}",
                self.stage,
                self.rows_in,
                self.rows_out,
                self.rows_dropped,
                self.output.display()
            )
        } else {
            format!(
                "{}: {} rows in, {} rows out, written to {}",
                self.stage,
                self.rows_in,
                self.rows_out,
                self.output.display()
            )
        }
    }
}

/// Summary of a full pipeline run, persisted as JSON next to the logs.
#[derive(Debug, Serialize)]
pub struct PipelineReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub stages: Vec<StageReport>,
}

/// Runs every stage in dependency order: the three normalizers are
/// mutually independent, the geocode tag needs the facility interim file,
/// and integration needs all three interim files.
pub fn run_all(paths: &DataPaths) -> Result<Vec<StageReport>> {
    let started_at = Utc::now();

    let mut stages = Vec::new();
    stages.push(facilities::run(paths)?);
    stages.push(emissions::run(paths)?);
    stages.push(capacity::run(paths)?);
    stages.push(geocode::run(paths)?);
    let (regions, enriched) = integrate::run(paths)?;
    stages.push(regions);
    stages.push(enriched);

    let report = PipelineReport {
        started_at,
        finished_at: Utc::now(),
        stages,
    };
    write_run_report(&paths.run_report, &report)?;
    info!(stages = report.stages.len(), "pipeline run complete");
    Ok(report.stages)
}

fn write_run_report(path: &Path, report: &PipelineReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_vec_pretty(report)?;
    fs::write(path, body)?;
    Ok(())
}
