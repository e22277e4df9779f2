//! Per-value cleaning rules shared by the normalizers.
//!
//! Each rule is a pure function from a raw cell to an optional cleaned
//! value, so the domain rules (range bounds, enumerated-set membership)
//! can be tested one at a time.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants;

static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.]").unwrap());

/// An inclusive numeric domain. Values outside it are treated as sensor
/// or typo noise and become unresolved.
#[derive(Debug, Clone, Copy)]
pub struct BoundedRange {
    pub min: f64,
    pub max: f64,
}

impl BoundedRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn admit(&self, value: f64) -> Option<f64> {
        if value < self.min || value > self.max {
            None
        } else {
            Some(value)
        }
    }
}

/// Plausible facility demand in MW.
pub const POWER_MW_RANGE: BoundedRange = BoundedRange::new(5.0, 2000.0);
/// Plausible announcement years.
pub const YEAR_ANNOUNCED_RANGE: BoundedRange = BoundedRange::new(2000.0, 2050.0);

/// Trims surrounding whitespace; an empty or absent cell is unresolved.
pub fn clean_text(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Collapses internal runs of whitespace to single spaces.
pub fn collapse_spaces(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical code form: trimmed and upper-cased. Idempotent.
pub fn normalize_code(raw: Option<&str>) -> Option<String> {
    clean_text(raw).map(|value| value.to_uppercase())
}

/// A state code is only resolved when it lands in the US state/DC set.
pub fn normalize_state(raw: Option<&str>) -> Option<String> {
    normalize_code(raw).filter(|code| constants::VALID_STATES.contains(code.as_str()))
}

/// Numeric coercion; failures and non-finite values are unresolved.
pub fn parse_numeric(raw: Option<&str>) -> Option<f64> {
    raw?.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Strips everything but digits and decimal points, the pre-pass for
/// free-text power figures like "1,200 MW".
pub fn scrub_numeric(raw: &str) -> String {
    NON_NUMERIC.replace_all(raw, "").into_owned()
}

/// Clamps a ratio into [0, 1].
pub fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
