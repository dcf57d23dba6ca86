//! Configuration types for the compensation engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every policy field has a
//! default, so a partial `policy.yaml` is valid.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{EngineError, EngineResult};
use crate::models::Benchmark;

/// Percentile thresholds and burden adjustment used by the FMV classifier.
///
/// # Example
///
/// ```
/// use comp_engine::config::FmvPolicy;
///
/// let policy = FmvPolicy::default();
/// assert_eq!(policy.moderate_above, 75.0);
/// assert_eq!(policy.high_above, 90.0);
/// assert_eq!(policy.burden_downgrade_threshold, 75.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FmvPolicy {
    /// Percentiles above this are at least MODERATE.
    pub moderate_above: f64,
    /// Percentiles above this are HIGH.
    pub high_above: f64,
    /// Burden scores at or above this downgrade the risk level one step.
    pub burden_downgrade_threshold: f64,
}

impl Default for FmvPolicy {
    fn default() -> Self {
        Self {
            moderate_above: 75.0,
            high_above: 90.0,
            burden_downgrade_threshold: 75.0,
        }
    }
}

impl FmvPolicy {
    /// Rejects thresholds that are out of order or non-finite.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.moderate_above.is_finite() || !self.high_above.is_finite() {
            return Err(EngineError::validation(
                "fmv",
                "risk thresholds must be finite numbers",
            ));
        }
        if self.high_above < self.moderate_above {
            return Err(EngineError::validation(
                "fmv.high_above",
                format!(
                    "must not be below moderate_above ({} < {})",
                    self.high_above, self.moderate_above
                ),
            ));
        }
        if !(0.0..=100.0).contains(&self.burden_downgrade_threshold) {
            return Err(EngineError::validation(
                "fmv.burden_downgrade_threshold",
                format!(
                    "must be within 0-100, got {}",
                    self.burden_downgrade_threshold
                ),
            ));
        }
        Ok(())
    }
}

/// Limits that trigger advisory warnings on call budgets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallWarningPolicy {
    /// Holiday calls per year above this raise a warning.
    pub max_holidays_per_year: f64,
}

impl Default for CallWarningPolicy {
    fn default() -> Self {
        Self {
            max_holidays_per_year: 12.0,
        }
    }
}

/// The complete engine policy loaded from `policy.yaml`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnginePolicy {
    /// FMV classifier settings.
    pub fmv: FmvPolicy,
    /// Call budget warning settings.
    pub call: CallWarningPolicy,
}

/// Benchmark catalog file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct BenchmarkFile {
    /// The benchmark records in the file.
    pub benchmarks: Vec<Benchmark>,
}

/// An immutable, validated list of benchmark records.
///
/// Catalog order is preserved; it breaks ties between equally recent matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkCatalog {
    benchmarks: Vec<Benchmark>,
}

impl BenchmarkCatalog {
    /// Creates a catalog, validating every record and rejecting duplicate ids.
    pub fn new(benchmarks: Vec<Benchmark>) -> EngineResult<Self> {
        let mut seen = HashSet::new();
        for benchmark in &benchmarks {
            benchmark.validate()?;
            if !seen.insert(benchmark.id.as_str()) {
                return Err(EngineError::validation(
                    format!("benchmark[{}].id", benchmark.id),
                    "duplicate benchmark id",
                ));
            }
        }
        Ok(Self { benchmarks })
    }

    /// Returns all records in catalog order.
    pub fn benchmarks(&self) -> &[Benchmark] {
        &self.benchmarks
    }

    /// Gets a record by id.
    pub fn get(&self, id: &str) -> Option<&Benchmark> {
        self.benchmarks.iter().find(|b| b.id == id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    /// True when the catalog holds no records.
    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }
}
