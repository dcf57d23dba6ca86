//! Market benchmark model.
//!
//! A [`Benchmark`] is immutable reference data: a quartile curve for one
//! specialty and coverage type from one survey.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The specialty name used for catch-all benchmark records.
pub const GENERIC_SPECIALTY: &str = "All Specialties";

/// A quartile-based market benchmark.
///
/// Only the median is mandatory; any of the other quartile points may be absent.
///
/// # Example
///
/// ```
/// use comp_engine::models::Benchmark;
///
/// let benchmark = Benchmark {
///     id: "ped-inhouse-2024".to_string(),
///     specialty: "Pediatrics".to_string(),
///     coverage_type: "In-house".to_string(),
///     source: "MGMA".to_string(),
///     survey_year: Some(2024),
///     p25: Some(1200.0),
///     p50: 1500.0,
///     p75: Some(1900.0),
///     p90: Some(2400.0),
/// };
/// assert!(benchmark.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    /// Unique identifier for the record within its catalog.
    pub id: String,
    /// The specialty the survey row describes.
    pub specialty: String,
    /// The coverage arrangement (e.g. "In-house", "Home call").
    pub coverage_type: String,
    /// The publishing survey.
    pub source: String,
    /// The survey year, when known.
    #[serde(default)]
    pub survey_year: Option<u16>,
    /// 25th percentile.
    #[serde(default)]
    pub p25: Option<f64>,
    /// Median.
    pub p50: f64,
    /// 75th percentile.
    #[serde(default)]
    pub p75: Option<f64>,
    /// 90th percentile.
    #[serde(default)]
    pub p90: Option<f64>,
}

impl Benchmark {
    /// Returns the `(percentile, value)` control points that are present, in
    /// ascending percentile order.
    pub fn control_points(&self) -> Vec<(f64, f64)> {
        [
            (25.0, self.p25),
            (50.0, Some(self.p50)),
            (75.0, self.p75),
            (90.0, self.p90),
        ]
        .into_iter()
        .filter_map(|(pct, value)| value.map(|v| (pct, v)))
        .collect()
    }

    /// Checks that the record is usable as a quartile curve.
    ///
    /// Rejects non-finite or negative values, a non-positive median, and
    /// quartiles that decrease as the percentile rises.
    pub fn validate(&self) -> EngineResult<()> {
        let field = |name: &str| format!("benchmark[{}].{}", self.id, name);

        if self.p50 <= 0.0 || !self.p50.is_finite() {
            return Err(EngineError::validation(
                field("p50"),
                format!("median must be a positive number, got {}", self.p50),
            ));
        }

        let points = self.control_points();
        for (pct, value) in &points {
            if !value.is_finite() || *value < 0.0 {
                return Err(EngineError::validation(
                    field(&format!("p{}", pct)),
                    format!("must be a non-negative number, got {}", value),
                ));
            }
        }

        for pair in points.windows(2) {
            let (lo_pct, lo) = pair[0];
            let (hi_pct, hi) = pair[1];
            if hi < lo {
                return Err(EngineError::validation(
                    field(&format!("p{}", hi_pct)),
                    format!("p{} ({}) is below p{} ({})", hi_pct, hi, lo_pct, lo),
                ));
            }
        }

        Ok(())
    }
}
