use tracing::info;

use crate::config::DataPaths;
use crate::domain::{FacilityRecord, GeocodeStatus};
use crate::error::Result;
use crate::pipeline::StageReport;
use crate::table;

/// Placeholder geocoding pass: no lookup happens, each facility is only
/// flagged by whether it already carries coordinates. Rewrites the interim
/// facility file in place.
pub struct GeocodeTagger;

impl GeocodeTagger {
    pub fn tag(&self, records: Vec<FacilityRecord>) -> Vec<FacilityRecord> {
        records
            .into_iter()
            .map(|record| {
                let status = if record.latitude.is_some() {
                    GeocodeStatus::Ok
                } else {
                    GeocodeStatus::Missing
                };
                FacilityRecord {
                    geocode_status: Some(status),
                    ..record
                }
            })
            .collect()
    }
}

pub fn run(paths: &DataPaths) -> Result<StageReport> {
    let records: Vec<FacilityRecord> = table::read_records(&paths.interim_facilities)?;
    let rows = records.len();
    let tagged = GeocodeTagger.tag(records);
    table::write_records(&paths.interim_facilities, &tagged)?;
    info!(rows, "geocode status tagged");
    Ok(StageReport::new(
        "geocode",
        rows,
        rows,
        0,
        &paths.interim_facilities,
    ))
}
