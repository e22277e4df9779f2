use std::collections::HashSet;

use tracing::info;

use crate::config::DataPaths;
use crate::constants::UNKNOWN_REGION;
use crate::domain::FacilityRecord;
use crate::error::Result;
use crate::pipeline::rules::{self, BoundedRange, POWER_MW_RANGE, YEAR_ANNOUNCED_RANGE};
use crate::pipeline::StageReport;
use crate::table::{self, RawTable};

/// Columns forming the facility identity key. Deduplication is part of the
/// stage contract, so the raw registry must carry all five.
const IDENTITY_COLUMNS: [&str; 5] = ["company", "site_name", "address", "city", "state"];

/// Cleans the raw AI-facility registry into canonical facility records.
pub struct FacilityNormalizer {
    pub power_range: BoundedRange,
    pub year_range: BoundedRange,
}

impl Default for FacilityNormalizer {
    fn default() -> Self {
        Self {
            power_range: POWER_MW_RANGE,
            year_range: YEAR_ANNOUNCED_RANGE,
        }
    }
}

impl FacilityNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produces canonical records in input order, minus rows collapsed by
    /// identity-key deduplication (first occurrence wins).
    pub fn normalize(&self, table: &RawTable) -> Result<Vec<FacilityRecord>> {
        table.require_columns(&IDENTITY_COLUMNS)?;

        let mut seen: HashSet<_> = HashSet::new();
        let mut records = Vec::new();
        for row in table.rows() {
            let record = self.normalize_row(table, row);
            if seen.insert(record.identity_key()) {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn normalize_row(&self, table: &RawTable, row: &csv::StringRecord) -> FacilityRecord {
        let company = rules::clean_text(table.field(row, "company"))
            .map(|name| rules::collapse_spaces(&name));

        // Power figures arrive as free text ("1,200 MW"); scrub before
        // coercing, then reject implausible magnitudes.
        let scrubbed_power = table
            .field(row, "estimated_power_mw")
            .map(rules::scrub_numeric);
        let estimated_power_mw = rules::parse_numeric(scrubbed_power.as_deref())
            .and_then(|mw| self.power_range.admit(mw));

        let year_announced = rules::parse_numeric(table.field(row, "year_announced"))
            .and_then(|year| self.year_range.admit(year))
            .map(|year| year as i32);

        let region_code = rules::normalize_code(table.field(row, "region_code"))
            .unwrap_or_else(|| UNKNOWN_REGION.to_string());

        FacilityRecord {
            company,
            site_name: rules::clean_text(table.field(row, "site_name")),
            address: rules::clean_text(table.field(row, "address")),
            city: rules::clean_text(table.field(row, "city")),
            state: rules::normalize_state(table.field(row, "state")),
            // Coordinates are coerced but never range-checked; real
            // geocoding is out of scope.
            latitude: rules::parse_numeric(table.field(row, "latitude")),
            longitude: rules::parse_numeric(table.field(row, "longitude")),
            estimated_power_mw,
            year_announced,
            region_code,
            geocode_status: None,
        }
    }
}

pub fn run(paths: &DataPaths) -> Result<StageReport> {
    let table = RawTable::load(&paths.raw_facilities)?;
    let records = FacilityNormalizer::new().normalize(&table)?;
    table::write_records(&paths.interim_facilities, &records)?;
    info!(
        rows_in = table.len(),
        rows_out = records.len(),
        "facility registry cleaned"
    );
    Ok(StageReport::new(
        "clean-facilities",
        table.len(),
        records.len(),
        table.len() - records.len(),
        &paths.interim_facilities,
    ))
}
