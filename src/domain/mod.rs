use serde::{Deserialize, Serialize};

/// Outcome of the placeholder geocoding pass. No lookup is performed; the
/// flag only records whether a facility already carries coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocodeStatus {
    Ok,
    Missing,
}

/// A cleaned AI data-center facility row. Unresolved fields stay `None`;
/// cleaning never rejects a whole row over a single bad value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub company: Option<String>,
    pub site_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    /// Two-letter US state/DC code, unresolved when outside the valid set.
    pub state: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Estimated demand in MW, unresolved outside [5, 2000].
    pub estimated_power_mw: Option<f64>,
    /// Announcement year, unresolved outside [2000, 2050].
    pub year_announced: Option<i32>,
    /// Normalized region code; `UNKNOWN` when the source carried none.
    pub region_code: String,
    pub geocode_status: Option<GeocodeStatus>,
}

/// The identity key facilities are deduplicated on. Two rows equal on this
/// key describe the same site; the first occurrence wins.
pub type FacilityKey = (
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

impl FacilityRecord {
    pub fn identity_key(&self) -> FacilityKey {
        (
            self.company.clone(),
            self.site_name.clone(),
            self.address.clone(),
            self.city.clone(),
            self.state.clone(),
        )
    }
}

/// Cleaned per-region generation and emissions figures. Rows without
/// strictly positive total generation never become records: a region with
/// nothing generated has no meaningful share or intensity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionsRecord {
    pub region_code: String,
    pub total_generation_mwh: f64,
    pub renewable_generation_mwh: Option<f64>,
    pub fossil_generation_mwh: Option<f64>,
    pub emissions_lbs_co2: Option<f64>,
    /// Renewable fraction of total generation, clamped to [0, 1].
    pub renewable_share: Option<f64>,
    /// lbs CO2 per MWh generated, unclamped.
    pub emissions_intensity: Option<f64>,
}

/// Generator capacity rolled up to one row per region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityAggregate {
    pub region_code: String,
    /// Sum of positive nameplate capacities.
    pub total_capacity_mw: f64,
    /// Capacity restricted to the renewable fuel-type set.
    pub renewable_capacity_mw: f64,
    /// Count of distinct plant identifiers.
    pub plant_count: u64,
    /// renewable / total, 0.0 on a zero total.
    pub renewable_capacity_share: f64,
}

/// One row per region code observed in the facility data, carrying the AI
/// demand aggregates plus whatever the emissions and capacity sides know
/// about the region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSummary {
    pub region_code: String,
    pub ai_facility_count: u64,
    /// Sum of resolved facility power estimates; 0 when none resolved.
    pub ai_total_mw: f64,
    /// Median of resolved facility power estimates; 0 when none resolved.
    pub ai_mw_median: f64,
    pub total_generation_mwh: Option<f64>,
    pub renewable_generation_mwh: Option<f64>,
    pub fossil_generation_mwh: Option<f64>,
    pub emissions_lbs_co2: Option<f64>,
    pub renewable_share: Option<f64>,
    pub emissions_intensity: Option<f64>,
    pub total_capacity_mw: Option<f64>,
    pub renewable_capacity_mw: Option<f64>,
    pub plant_count: Option<u64>,
    pub renewable_capacity_share: Option<f64>,
    /// AI load over installed capacity; unresolved when the denominator is
    /// missing or zero. May exceed 1.
    pub ai_share_of_capacity: Option<f64>,
}

/// A facility row joined against its region summary. Every facility field
/// survives verbatim; region-sourced fields are unresolved when the region
/// has no summary. The summary's own region code keeps the `_region`
/// suffix so neither copy of the colliding column is dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedFacility {
    pub company: Option<String>,
    pub site_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub estimated_power_mw: Option<f64>,
    pub year_announced: Option<i32>,
    pub region_code: String,
    pub geocode_status: Option<GeocodeStatus>,
    pub region_code_region: Option<String>,
    pub ai_facility_count: Option<u64>,
    pub ai_total_mw: Option<f64>,
    pub ai_mw_median: Option<f64>,
    pub total_generation_mwh: Option<f64>,
    pub renewable_generation_mwh: Option<f64>,
    pub fossil_generation_mwh: Option<f64>,
    pub emissions_lbs_co2: Option<f64>,
    pub renewable_share: Option<f64>,
    pub emissions_intensity: Option<f64>,
    pub total_capacity_mw: Option<f64>,
    pub renewable_capacity_mw: Option<f64>,
    pub plant_count: Option<u64>,
    pub renewable_capacity_share: Option<f64>,
    pub ai_share_of_capacity: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_key_ignores_coordinates() {
        let record = FacilityRecord {
            company: Some("Acme AI".to_string()),
            site_name: Some("Site One".to_string()),
            address: Some("1 Main St".to_string()),
            city: Some("The Dalles".to_string()),
            state: Some("OR".to_string()),
            latitude: Some(45.6),
            longitude: Some(-121.2),
            estimated_power_mw: Some(100.0),
            year_announced: Some(2023),
            region_code: "NWPP".to_string(),
            geocode_status: None,
        };
        let mut other = record.clone();
        other.latitude = Some(40.0);
        other.estimated_power_mw = None;
        assert_eq!(record.identity_key(), other.identity_key());
    }
}
