use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::info;

use crate::config::DataPaths;
use crate::constants::RENEWABLE_FUELS;
use crate::domain::CapacityAggregate;
use crate::error::Result;
use crate::pipeline::rules;
use crate::pipeline::StageReport;
use crate::table::{self, RawTable};

const REQUIRED_COLUMNS: [&str; 2] = ["region_code", "capacity_mw"];

#[derive(Default)]
struct RegionAccumulator {
    total_capacity_mw: f64,
    renewable_capacity_mw: f64,
    plant_ids: HashSet<String>,
}

/// Cleans raw generator rows and rolls them up to one aggregate per
/// region, in first-seen region order.
pub struct CapacityNormalizer;

impl CapacityNormalizer {
    /// Returns the per-region aggregates and the number of input rows
    /// dropped (non-positive capacity or no region to group under).
    pub fn normalize(&self, table: &RawTable) -> Result<(Vec<CapacityAggregate>, usize)> {
        table.require_columns(&REQUIRED_COLUMNS)?;

        let mut groups: IndexMap<String, RegionAccumulator> = IndexMap::new();
        let mut dropped = 0usize;
        for row in table.rows() {
            let capacity = rules::parse_numeric(table.field(row, "capacity_mw"))
                .filter(|mw| *mw > 0.0);
            let region = rules::normalize_code(table.field(row, "region_code"));
            let (Some(capacity_mw), Some(region_code)) = (capacity, region) else {
                dropped += 1;
                continue;
            };

            let fuel_type = rules::normalize_code(table.field(row, "fuel_type"));
            let renewable = fuel_type
                .as_deref()
                .map_or(false, |fuel| RENEWABLE_FUELS.contains(fuel));

            let accumulator = groups.entry(region_code).or_default();
            accumulator.total_capacity_mw += capacity_mw;
            if renewable {
                accumulator.renewable_capacity_mw += capacity_mw;
            }
            if let Some(plant_id) = rules::clean_text(table.field(row, "plant_id")) {
                accumulator.plant_ids.insert(plant_id);
            }
        }

        let aggregates = groups
            .into_iter()
            .map(|(region_code, accumulator)| CapacityAggregate {
                region_code,
                total_capacity_mw: accumulator.total_capacity_mw,
                renewable_capacity_mw: accumulator.renewable_capacity_mw,
                plant_count: accumulator.plant_ids.len() as u64,
                renewable_capacity_share: capacity_share(
                    accumulator.renewable_capacity_mw,
                    accumulator.total_capacity_mw,
                ),
            })
            .collect();
        Ok((aggregates, dropped))
    }
}

/// Renewable fraction of installed capacity; a zero denominator maps to
/// 0.0, never to infinity or NaN.
pub fn capacity_share(renewable_mw: f64, total_mw: f64) -> f64 {
    if total_mw > 0.0 {
        renewable_mw / total_mw
    } else {
        0.0
    }
}

pub fn run(paths: &DataPaths) -> Result<StageReport> {
    let table = RawTable::load(&paths.raw_capacity)?;
    let (aggregates, dropped) = CapacityNormalizer.normalize(&table)?;
    table::write_records(&paths.interim_capacity, &aggregates)?;
    info!(
        rows_in = table.len(),
        regions = aggregates.len(),
        dropped,
        "generator capacity aggregated"
    );
    Ok(StageReport::new(
        "clean-capacity",
        table.len(),
        aggregates.len(),
        dropped,
        &paths.interim_capacity,
    ))
}
