use anyhow::Result;
use std::fs;
use tempfile::tempdir;

use gridload::config::DataPaths;
use gridload::domain::{EnrichedFacility, FacilityRecord, GeocodeStatus, RegionSummary};
use gridload::pipeline;
use gridload::table;

const RAW_FACILITIES: &str = "\
company,site_name,address,city,state,latitude,longitude,estimated_power_mw,year_announced,region_code
Hyper  Scale Inc,Alpha Campus,100 Grid Rd,Columbus,oh,39.9,-82.9,100,2023,rfc1
Hyper Scale Inc,Beta Campus,200 Grid Rd,Columbus,OH,,,200,2024,RFC1
Hyper Scale Inc,Gamma Campus,300 Grid Rd,Columbus,OH,40.1,-83.0,3000,2026,RFC1
Hyper Scale Inc,Alpha Campus,100 Grid Rd,Columbus,OH,41.5,-80.0,999,2025,RFC1
Desert Compute,Solo Site,1 Mesa Dr,Phoenix,AZ,33.4,-112.0,50,2022,azps
";

const RAW_EMISSIONS: &str = "\
region_code,total_generation_mwh,renewable_generation_mwh,fossil_generation_mwh,emissions_lbs_co2
rfc1,1000,250,750,800
AZPS,0,10,0,5
NOAI,500,100,400,300
";

const RAW_CAPACITY: &str = "\
plant_id,plant_name,state,region_code,capacity_mw,fuel_type
1,Grid Alpha,OH,RFC1,400,Natural Gas
2,Grid Beta,OH,rfc1,200,wind
3,Mesa Plant,AZ,AZPS,-5,solar
4,Far Plant,TX,XYZ1,1000,coal
";

fn stage_paths(root: &std::path::Path) -> Result<DataPaths> {
    let paths = DataPaths::from_root(root);
    fs::create_dir_all(paths.raw_facilities.parent().unwrap())?;
    fs::write(&paths.raw_facilities, RAW_FACILITIES)?;
    fs::write(&paths.raw_emissions, RAW_EMISSIONS)?;
    fs::write(&paths.raw_capacity, RAW_CAPACITY)?;
    Ok(paths)
}

#[test]
fn test_full_pipeline_end_to_end() -> Result<()> {
    let temp_dir = tempdir()?;
    let paths = stage_paths(temp_dir.path())?;

    let reports = pipeline::run_all(&paths)?;
    assert_eq!(reports.len(), 6);

    // Facility normalization: the duplicate Alpha Campus row collapses,
    // keeping the first occurrence's coordinates.
    let facilities: Vec<FacilityRecord> = table::read_records(&paths.interim_facilities)?;
    assert_eq!(facilities.len(), 4);
    assert_eq!(facilities[0].company.as_deref(), Some("Hyper Scale Inc"));
    assert_eq!(facilities[0].latitude, Some(39.9));
    assert_eq!(facilities[0].state.as_deref(), Some("OH"));

    // Out-of-range power was rejected per-value, not per-record
    assert_eq!(facilities[2].site_name.as_deref(), Some("Gamma Campus"));
    assert_eq!(facilities[2].estimated_power_mw, None);
    assert_eq!(facilities[2].year_announced, Some(2026));

    // Geocode pass tagged every record
    assert_eq!(facilities[0].geocode_status, Some(GeocodeStatus::Ok));
    assert_eq!(facilities[1].geocode_status, Some(GeocodeStatus::Missing));

    // Region summary: only regions observed in facility data, sorted by
    // descending AI load.
    let summaries: Vec<RegionSummary> = table::read_records(&paths.region_summary)?;
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].region_code, "RFC1");
    assert_eq!(summaries[1].region_code, "AZPS");
    assert!(!summaries.iter().any(|s| s.region_code == "NOAI"));
    assert!(!summaries.iter().any(|s| s.region_code == "XYZ1"));

    let rfc1 = &summaries[0];
    assert_eq!(rfc1.ai_facility_count, 3);
    assert_eq!(rfc1.ai_total_mw, 300.0);
    assert_eq!(rfc1.ai_mw_median, 150.0);
    assert_eq!(rfc1.total_generation_mwh, Some(1000.0));
    assert_eq!(rfc1.renewable_share, Some(0.25));
    assert_eq!(rfc1.emissions_intensity, Some(0.8));
    assert_eq!(rfc1.total_capacity_mw, Some(600.0));
    assert_eq!(rfc1.renewable_capacity_mw, Some(200.0));
    assert_eq!(rfc1.plant_count, Some(2));
    assert_eq!(rfc1.ai_share_of_capacity, Some(0.5));

    // AZPS lost its emissions row (zero generation) and its only capacity
    // row (negative capacity); the ratio stays unresolved, not zero.
    let azps = &summaries[1];
    assert_eq!(azps.ai_facility_count, 1);
    assert_eq!(azps.ai_total_mw, 50.0);
    assert_eq!(azps.total_generation_mwh, None);
    assert_eq!(azps.total_capacity_mw, None);
    assert_eq!(azps.ai_share_of_capacity, None);

    // Enriched master table: one row per canonical facility, input order
    // preserved, region fields joined in.
    let enriched: Vec<EnrichedFacility> = table::read_records(&paths.enriched_facilities)?;
    assert_eq!(enriched.len(), 4);
    assert_eq!(enriched[0].site_name.as_deref(), Some("Alpha Campus"));
    assert_eq!(enriched[0].region_code, "RFC1");
    assert_eq!(enriched[0].region_code_region.as_deref(), Some("RFC1"));
    assert_eq!(enriched[0].ai_total_mw, Some(300.0));
    assert_eq!(enriched[3].site_name.as_deref(), Some("Solo Site"));
    assert_eq!(enriched[3].region_code_region.as_deref(), Some("AZPS"));
    assert_eq!(enriched[3].ai_share_of_capacity, None);

    Ok(())
}

#[test]
fn test_rerun_is_byte_identical() -> Result<()> {
    let temp_dir = tempdir()?;
    let paths = stage_paths(temp_dir.path())?;

    pipeline::run_all(&paths)?;
    let first_summary = fs::read(&paths.region_summary)?;
    let first_enriched = fs::read(&paths.enriched_facilities)?;
    let first_interim = fs::read(&paths.interim_facilities)?;

    pipeline::run_all(&paths)?;
    assert_eq!(first_summary, fs::read(&paths.region_summary)?);
    assert_eq!(first_enriched, fs::read(&paths.enriched_facilities)?);
    assert_eq!(first_interim, fs::read(&paths.interim_facilities)?);

    Ok(())
}

#[test]
fn test_missing_raw_input_aborts_with_no_output() -> Result<()> {
    let temp_dir = tempdir()?;
    let paths = DataPaths::from_root(temp_dir.path());

    let result = pipeline::facilities::run(&paths);
    assert!(result.is_err());
    assert!(!paths.interim_facilities.exists());

    Ok(())
}

#[test]
fn test_integrate_requires_interim_inputs() -> Result<()> {
    let temp_dir = tempdir()?;
    let paths = stage_paths(temp_dir.path())?;

    // Facilities cleaned, but the other normalizers never ran
    pipeline::facilities::run(&paths)?;
    let result = pipeline::integrate::run(&paths);
    assert!(result.is_err());
    assert!(!paths.region_summary.exists());

    Ok(())
}
