use tracing::info;

use crate::config::DataPaths;
use crate::domain::EmissionsRecord;
use crate::error::Result;
use crate::pipeline::rules;
use crate::pipeline::StageReport;
use crate::table::{self, RawTable};

/// The drop rule on total generation is structural, so these columns must
/// exist; the remaining numeric columns are optional.
const REQUIRED_COLUMNS: [&str; 2] = ["region_code", "total_generation_mwh"];

/// Cleans raw regional generation/emissions rows into canonical records.
pub struct EmissionsNormalizer;

impl EmissionsNormalizer {
    /// Keeps one record per row with strictly positive total generation;
    /// everything else is dropped rather than becoming a 0/0 share.
    pub fn normalize(&self, table: &RawTable) -> Result<Vec<EmissionsRecord>> {
        table.require_columns(&REQUIRED_COLUMNS)?;

        let mut records = Vec::new();
        for row in table.rows() {
            let total = rules::parse_numeric(table.field(row, "total_generation_mwh"));
            let Some(total_generation_mwh) = total.filter(|mwh| *mwh > 0.0) else {
                continue;
            };

            let renewable_generation_mwh =
                rules::parse_numeric(table.field(row, "renewable_generation_mwh"));
            let fossil_generation_mwh =
                rules::parse_numeric(table.field(row, "fossil_generation_mwh"));
            let emissions_lbs_co2 = rules::parse_numeric(table.field(row, "emissions_lbs_co2"));

            let renewable_share = renewable_generation_mwh
                .map(|renewable| rules::clamp_unit(renewable / total_generation_mwh));
            let emissions_intensity =
                emissions_lbs_co2.map(|emissions| emissions / total_generation_mwh);

            records.push(EmissionsRecord {
                region_code: rules::normalize_code(table.field(row, "region_code"))
                    .unwrap_or_default(),
                total_generation_mwh,
                renewable_generation_mwh,
                fossil_generation_mwh,
                emissions_lbs_co2,
                renewable_share,
                emissions_intensity,
            });
        }
        Ok(records)
    }
}

pub fn run(paths: &DataPaths) -> Result<StageReport> {
    let table = RawTable::load(&paths.raw_emissions)?;
    let records = EmissionsNormalizer.normalize(&table)?;
    table::write_records(&paths.interim_emissions, &records)?;
    info!(
        rows_in = table.len(),
        rows_out = records.len(),
        "emissions data cleaned"
    );
    Ok(StageReport::new(
        "clean-emissions",
        table.len(),
        records.len(),
        table.len() - records.len(),
        &paths.interim_emissions,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "region_code,total_generation_mwh,renewable_generation_mwh,fossil_generation_mwh,emissions_lbs_co2";

    fn normalize(csv: &str) -> Vec<EmissionsRecord> {
        EmissionsNormalizer
            .normalize(&RawTable::from_reader(csv.as_bytes()).unwrap())
            .unwrap()
    }

    #[test]
    fn test_derived_share_and_intensity() {
        let records = normalize(&format!("{HEADER}\n rfc1 ,1000,250,750,800\n"));
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.region_code, "RFC1");
        assert_eq!(record.renewable_share, Some(0.25));
        assert_eq!(record.emissions_intensity, Some(0.8));
    }

    #[test]
    fn test_zero_total_generation_dropped() {
        let records = normalize(&format!(
            "{HEADER}\nRFC1,0,10,0,5\nRFC2,-50,10,0,5\nRFC3,100,10,90,50\n"
        ));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].region_code, "RFC3");
    }

    #[test]
    fn test_unparseable_total_dropped() {
        let records = normalize(&format!("{HEADER}\nRFC1,n/a,10,0,5\n"));
        assert!(records.is_empty());
    }

    #[test]
    fn test_share_clamped_on_adversarial_values() {
        let records = normalize(&format!(
            "{HEADER}\nRFC1,100,250,0,\nRFC2,100,-40,0,\n"
        ));
        assert_eq!(records[0].renewable_share, Some(1.0));
        assert_eq!(records[1].renewable_share, Some(0.0));
    }

    #[test]
    fn test_coercion_failure_leaves_field_unresolved() {
        let records = normalize(&format!("{HEADER}\nRFC1,1000,unknown,750,\n"));
        let record = &records[0];
        assert_eq!(record.renewable_generation_mwh, None);
        assert_eq!(record.renewable_share, None);
        assert_eq!(record.emissions_lbs_co2, None);
        assert_eq!(record.emissions_intensity, None);
        assert_eq!(record.fossil_generation_mwh, Some(750.0));
    }

    #[test]
    fn test_missing_total_column_is_fatal() {
        let table = RawTable::from_reader("region_code,renewable_generation_mwh\nRFC1,5\n".as_bytes())
            .unwrap();
        assert!(EmissionsNormalizer.normalize(&table).is_err());
    }
}
