use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Sentinel region assigned when a facility row carries no region code.
pub const UNKNOWN_REGION: &str = "UNKNOWN";

/// Two-letter US state and DC codes accepted as resolved facility states.
/// Anything outside this set is treated as unresolved, not as an error.
pub static VALID_STATES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID",
        "IL", "IN", "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS",
        "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH", "OK",
        "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV",
        "WI", "WY", "DC",
    ]
    .into_iter()
    .collect()
});

/// Fuel types counted toward renewable generator capacity.
pub static RENEWABLE_FUELS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["WIND", "SOLAR", "HYDRO", "HYDROELECTRIC", "GEOTHERMAL", "BIOMASS"]
        .into_iter()
        .collect()
});

// Conventional file names under the data root; see config::DataPaths for
// how they combine into full paths.
pub const RAW_FACILITIES_FILE: &str = "ai_facilities_raw.csv";
pub const RAW_EMISSIONS_FILE: &str = "regional_emissions_raw.csv";
pub const RAW_CAPACITY_FILE: &str = "generator_capacity_raw.csv";
pub const INTERIM_FACILITIES_FILE: &str = "facilities_cleaned.csv";
pub const INTERIM_EMISSIONS_FILE: &str = "emissions_cleaned.csv";
pub const INTERIM_CAPACITY_FILE: &str = "capacity_cleaned.csv";
pub const REGION_SUMMARY_FILE: &str = "region_summary.csv";
pub const ENRICHED_FACILITIES_FILE: &str = "facilities_enriched.csv";
pub const RUN_REPORT_FILE: &str = "pipeline_report.json";
