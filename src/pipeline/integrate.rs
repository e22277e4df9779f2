use std::cmp::Ordering;
use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::info;

use crate::config::DataPaths;
use crate::domain::{
    CapacityAggregate, EmissionsRecord, EnrichedFacility, FacilityRecord, RegionSummary,
};
use crate::error::{PipelineError, Result};
use crate::pipeline::StageReport;
use crate::table;

/// Columns present in both the facility and region-summary shapes. The
/// region-sourced copy keeps the suffix so no column is dropped or
/// overwritten in the enriched output.
pub const COLLIDING_COLUMNS: [&str; 1] = ["region_code"];
pub const REGION_COLUMN_SUFFIX: &str = "_region";

pub fn region_suffixed(column: &str) -> String {
    format!("{column}{REGION_COLUMN_SUFFIX}")
}

#[derive(Default)]
struct FacilityAccumulator {
    count: u64,
    resolved_power: Vec<f64>,
}

/// Groups facilities per region and left-joins the result against the
/// emissions and capacity sides. The output row set is exactly the region
/// codes observed in facility data.
pub struct RegionAggregator;

impl RegionAggregator {
    pub fn aggregate(
        &self,
        facilities: &[FacilityRecord],
        emissions: &[EmissionsRecord],
        capacity: &[CapacityAggregate],
    ) -> Vec<RegionSummary> {
        let mut groups: IndexMap<&str, FacilityAccumulator> = IndexMap::new();
        for facility in facilities {
            let accumulator = groups.entry(facility.region_code.as_str()).or_default();
            accumulator.count += 1;
            if let Some(power) = facility.estimated_power_mw {
                accumulator.resolved_power.push(power);
            }
        }

        // First record wins on a duplicated region key, mirroring the
        // facility dedup policy.
        let mut emissions_by_region: HashMap<&str, &EmissionsRecord> = HashMap::new();
        for record in emissions {
            emissions_by_region
                .entry(record.region_code.as_str())
                .or_insert(record);
        }
        let mut capacity_by_region: HashMap<&str, &CapacityAggregate> = HashMap::new();
        for aggregate in capacity {
            capacity_by_region
                .entry(aggregate.region_code.as_str())
                .or_insert(aggregate);
        }

        let mut summaries: Vec<RegionSummary> = groups
            .into_iter()
            .map(|(region_code, accumulator)| {
                let ai_total_mw: f64 = accumulator.resolved_power.iter().sum();
                let emissions = emissions_by_region.get(region_code).copied();
                let capacity = capacity_by_region.get(region_code).copied();
                RegionSummary {
                    region_code: region_code.to_string(),
                    ai_facility_count: accumulator.count,
                    ai_total_mw,
                    ai_mw_median: median(&accumulator.resolved_power),
                    total_generation_mwh: emissions.map(|e| e.total_generation_mwh),
                    renewable_generation_mwh: emissions
                        .and_then(|e| e.renewable_generation_mwh),
                    fossil_generation_mwh: emissions.and_then(|e| e.fossil_generation_mwh),
                    emissions_lbs_co2: emissions.and_then(|e| e.emissions_lbs_co2),
                    renewable_share: emissions.and_then(|e| e.renewable_share),
                    emissions_intensity: emissions.and_then(|e| e.emissions_intensity),
                    total_capacity_mw: capacity.map(|c| c.total_capacity_mw),
                    renewable_capacity_mw: capacity.map(|c| c.renewable_capacity_mw),
                    plant_count: capacity.map(|c| c.plant_count),
                    renewable_capacity_share: capacity.map(|c| c.renewable_capacity_share),
                    ai_share_of_capacity: ai_share_of_capacity(
                        ai_total_mw,
                        capacity.map(|c| c.total_capacity_mw),
                    ),
                }
            })
            .collect();

        // Descending AI load; region code breaks ties so repeated runs
        // are byte-identical.
        summaries.sort_by(|a, b| {
            b.ai_total_mw
                .partial_cmp(&a.ai_total_mw)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.region_code.cmp(&b.region_code))
        });
        summaries
    }
}

/// AI load over installed capacity. A missing or zero denominator leaves
/// the ratio unresolved: "no denominator" must stay distinguishable from
/// "no AI load".
pub fn ai_share_of_capacity(ai_total_mw: f64, total_capacity_mw: Option<f64>) -> Option<f64> {
    match total_capacity_mw {
        Some(total) if total > 0.0 => Some(ai_total_mw / total),
        _ => None,
    }
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Joins each facility back against its region summary; the left side is
/// preserved verbatim and in order.
pub struct FacilityEnricher;

impl FacilityEnricher {
    pub fn enrich(
        &self,
        facilities: &[FacilityRecord],
        summaries: &[RegionSummary],
    ) -> Vec<EnrichedFacility> {
        let mut by_region: HashMap<&str, &RegionSummary> = HashMap::new();
        for summary in summaries {
            by_region.entry(summary.region_code.as_str()).or_insert(summary);
        }

        facilities
            .iter()
            .map(|facility| {
                let summary = by_region.get(facility.region_code.as_str()).copied();
                EnrichedFacility {
                    company: facility.company.clone(),
                    site_name: facility.site_name.clone(),
                    address: facility.address.clone(),
                    city: facility.city.clone(),
                    state: facility.state.clone(),
                    latitude: facility.latitude,
                    longitude: facility.longitude,
                    estimated_power_mw: facility.estimated_power_mw,
                    year_announced: facility.year_announced,
                    region_code: facility.region_code.clone(),
                    geocode_status: facility.geocode_status,
                    region_code_region: summary.map(|s| s.region_code.clone()),
                    ai_facility_count: summary.map(|s| s.ai_facility_count),
                    ai_total_mw: summary.map(|s| s.ai_total_mw),
                    ai_mw_median: summary.map(|s| s.ai_mw_median),
                    total_generation_mwh: summary.and_then(|s| s.total_generation_mwh),
                    renewable_generation_mwh: summary
                        .and_then(|s| s.renewable_generation_mwh),
                    fossil_generation_mwh: summary.and_then(|s| s.fossil_generation_mwh),
                    emissions_lbs_co2: summary.and_then(|s| s.emissions_lbs_co2),
                    renewable_share: summary.and_then(|s| s.renewable_share),
                    emissions_intensity: summary.and_then(|s| s.emissions_intensity),
                    total_capacity_mw: summary.and_then(|s| s.total_capacity_mw),
                    renewable_capacity_mw: summary.and_then(|s| s.renewable_capacity_mw),
                    plant_count: summary.and_then(|s| s.plant_count),
                    renewable_capacity_share: summary
                        .and_then(|s| s.renewable_capacity_share),
                    ai_share_of_capacity: summary.and_then(|s| s.ai_share_of_capacity),
                }
            })
            .collect()
    }
}

pub fn run(paths: &DataPaths) -> Result<(StageReport, StageReport)> {
    let facilities: Vec<FacilityRecord> = table::read_records(&paths.interim_facilities)?;
    if facilities.is_empty() {
        return Err(PipelineError::EmptyTable(format!(
            "no facility records in {}",
            paths.interim_facilities.display()
        )));
    }
    let emissions: Vec<EmissionsRecord> = table::read_records(&paths.interim_emissions)?;
    let capacity: Vec<CapacityAggregate> = table::read_records(&paths.interim_capacity)?;

    let summaries = RegionAggregator.aggregate(&facilities, &emissions, &capacity);
    table::write_records(&paths.region_summary, &summaries)?;
    info!(regions = summaries.len(), "region summary built");

    let enriched = FacilityEnricher.enrich(&facilities, &summaries);
    table::write_records(&paths.enriched_facilities, &enriched)?;
    info!(facilities = enriched.len(), "facility master table enriched");

    Ok((
        StageReport::new(
            "integrate-regions",
            facilities.len(),
            summaries.len(),
            0,
            &paths.region_summary,
        ),
        StageReport::new(
            "integrate-facilities",
            facilities.len(),
            enriched.len(),
            0,
            &paths.enriched_facilities,
        ),
    ))
}
