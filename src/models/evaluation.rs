//! FMV evaluation input and result models.

use serde::{Deserialize, Serialize};

use super::Benchmark;

/// Fair-market-value risk tier.
///
/// Ordered so that `Low < Moderate < High`.
///
/// # Example
///
/// ```
/// use comp_engine::models::RiskLevel;
///
/// assert!(RiskLevel::Low < RiskLevel::High);
/// assert_eq!(RiskLevel::High.downgrade(), RiskLevel::Moderate);
/// assert_eq!(RiskLevel::Low.downgrade(), RiskLevel::Low);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// At or below the 75th percentile.
    Low,
    /// Above the 75th and at or below the 90th percentile.
    Moderate,
    /// Above the 90th percentile.
    High,
}

impl RiskLevel {
    /// Returns the level one step lower; `Low` stays `Low`.
    pub fn downgrade(self) -> Self {
        match self {
            RiskLevel::High => RiskLevel::Moderate,
            RiskLevel::Moderate | RiskLevel::Low => RiskLevel::Low,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Moderate => write!(f, "MODERATE"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// How a benchmark was matched to the requested specialty and coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Specialty and coverage type both matched.
    Exact,
    /// Specialty matched; the coverage type differs.
    SpecialtyOnly,
    /// The generic specialty record for the requested coverage type.
    GenericSpecialty,
}

/// One request to place an observed compensation metric against the market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationInput {
    /// The provider's specialty.
    pub specialty: String,
    /// The coverage arrangement being valued.
    pub coverage_type: String,
    /// The observed metric, in the benchmark's units (e.g. pay per 24h).
    pub observed_value: f64,
    /// Optional call-burden score on a 0-100 scale.
    #[serde(default)]
    pub burden_score: Option<f64>,
}

/// The outcome of an FMV evaluation.
///
/// `benchmark` is `None` when no market reference was found; the risk level
/// is then the neutral `Moderate` default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// The benchmark the observation was placed against.
    pub benchmark: Option<Benchmark>,
    /// How the benchmark was matched.
    pub match_kind: Option<MatchKind>,
    /// The estimated percentile; may fall below 0 or above 100.
    pub percentile_estimate: Option<f64>,
    /// The final risk level after any burden adjustment.
    pub risk_level: RiskLevel,
    /// True when a high burden score lowered the risk level.
    pub burden_adjusted: bool,
    /// Advisory notes accumulated during evaluation.
    pub notes: Vec<String>,
    /// Plain-language summary for reports.
    pub narrative: String,
}
