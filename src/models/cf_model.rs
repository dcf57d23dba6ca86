//! Conversion-factor compensation models.
//!
//! A [`CfModel`] turns productivity (wRVUs) into clinical dollars. Tiered
//! variants share a [`TierLadder`]: N-1 bounded brackets followed by one
//! open-ended bracket, so a ladder without a top bracket cannot be built.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{AuditStep, Benchmark};

/// One tier as it appears in stored scenario data.
///
/// Only the last tier of a list omits its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierSpec {
    /// Upper bound of the bracket; `None` for the open-ended top bracket.
    #[serde(default, alias = "percentile_threshold", skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// Conversion factor paid inside the bracket.
    pub cf: f64,
}

/// A bracket with a finite upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundedTier {
    /// Upper bound of the bracket, in the ladder's threshold units.
    pub threshold: f64,
    /// Conversion factor paid inside the bracket.
    pub cf: f64,
}

/// An ordered tier list: bounded brackets in ascending threshold order plus
/// the conversion factor of the open-ended top bracket.
///
/// Serialized as the plain `[{threshold, cf}, ..., {cf}]` list.
///
/// # Example
///
/// ```
/// use comp_engine::models::{TierLadder, TierSpec};
///
/// let ladder = TierLadder::from_specs(vec![
///     TierSpec { threshold: Some(4000.0), cf: 45.0 },
///     TierSpec { threshold: Some(6000.0), cf: 50.0 },
///     TierSpec { threshold: None, cf: 55.0 },
/// ])
/// .unwrap();
///
/// assert_eq!(ladder.bounded().len(), 2);
/// assert_eq!(ladder.final_cf(), 55.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TierSpec>", into = "Vec<TierSpec>")]
pub struct TierLadder {
    bounded: Vec<BoundedTier>,
    final_cf: f64,
}

impl TierLadder {
    /// Builds a ladder, rejecting unsorted thresholds and negative or
    /// non-finite values.
    pub fn new(bounded: Vec<BoundedTier>, final_cf: f64) -> EngineResult<Self> {
        for (index, tier) in bounded.iter().enumerate() {
            if !tier.threshold.is_finite() || tier.threshold < 0.0 {
                return Err(EngineError::validation(
                    format!("tiers[{}].threshold", index),
                    format!("must be a non-negative number, got {}", tier.threshold),
                ));
            }
            check_cf(&format!("tiers[{}].cf", index), tier.cf)?;
        }
        check_cf(&format!("tiers[{}].cf", bounded.len()), final_cf)?;

        for (index, pair) in bounded.windows(2).enumerate() {
            if pair[1].threshold <= pair[0].threshold {
                return Err(EngineError::validation(
                    format!("tiers[{}].threshold", index + 1),
                    format!(
                        "thresholds must ascend: {} does not exceed {}",
                        pair[1].threshold, pair[0].threshold
                    ),
                ));
            }
        }

        Ok(Self { bounded, final_cf })
    }

    /// Builds a ladder from a stored tier list in which exactly the last tier
    /// omits its threshold.
    pub fn from_specs(specs: Vec<TierSpec>) -> EngineResult<Self> {
        let Some((last, rest)) = specs.split_last() else {
            return Err(EngineError::validation("tiers", "at least one tier is required"));
        };

        if last.threshold.is_some() {
            return Err(EngineError::validation(
                format!("tiers[{}].threshold", rest.len()),
                "the last tier must omit its threshold",
            ));
        }

        let bounded = rest
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                spec.threshold
                    .map(|threshold| BoundedTier { threshold, cf: spec.cf })
                    .ok_or_else(|| {
                        EngineError::validation(
                            format!("tiers[{}].threshold", index),
                            "only the last tier may omit its threshold",
                        )
                    })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        Self::new(bounded, last.cf)
    }

    /// The bounded brackets in ascending threshold order.
    pub fn bounded(&self) -> &[BoundedTier] {
        &self.bounded
    }

    /// The conversion factor of the open-ended top bracket.
    pub fn final_cf(&self) -> f64 {
        self.final_cf
    }

    /// Total number of tiers including the top bracket.
    pub fn len(&self) -> usize {
        self.bounded.len() + 1
    }

    /// Always false; a ladder has at least its top bracket.
    pub fn is_empty(&self) -> bool {
        false
    }
}

fn check_cf(field: &str, cf: f64) -> EngineResult<()> {
    if !cf.is_finite() || cf < 0.0 {
        return Err(EngineError::validation(
            field,
            format!("conversion factor must be a non-negative number, got {}", cf),
        ));
    }
    Ok(())
}

impl TryFrom<Vec<TierSpec>> for TierLadder {
    type Error = EngineError;

    fn try_from(specs: Vec<TierSpec>) -> Result<Self, Self::Error> {
        Self::from_specs(specs)
    }
}

impl From<TierLadder> for Vec<TierSpec> {
    fn from(ladder: TierLadder) -> Self {
        ladder
            .bounded
            .iter()
            .map(|tier| TierSpec {
                threshold: Some(tier.threshold),
                cf: tier.cf,
            })
            .chain(std::iter::once(TierSpec {
                threshold: None,
                cf: ladder.final_cf,
            }))
            .collect()
    }
}

/// How the thresholds of a `tiered` model are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierType {
    /// Thresholds are cumulative wRVU counts.
    Threshold,
    /// Thresholds are percentages (0-100) of the provider's own wRVUs.
    Percentage,
}

/// An FTE band of an `fte_adjusted` model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FteTier {
    /// Inclusive lower FTE bound.
    pub fte_min: f64,
    /// Exclusive upper FTE bound (inclusive for the last tier).
    pub fte_max: f64,
    /// Conversion factor paid to providers in the band.
    pub cf: f64,
}

/// The conversion-factor tiering schemes.
///
/// # Example
///
/// ```
/// use comp_engine::models::CfModel;
///
/// let json = r#"{"model_type": "quality_weighted", "base_cf": 52.0, "quality_score": 90}"#;
/// let model: CfModel = serde_json::from_str(json).unwrap();
/// assert_eq!(model.model_type(), "quality_weighted");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model_type", rename_all = "snake_case")]
pub enum CfModel {
    /// One flat conversion factor.
    Single {
        /// Dollars per wRVU.
        cf: f64,
    },
    /// Marginal brackets over wRVU counts or percentages of total wRVUs.
    Tiered {
        /// How thresholds are expressed.
        tier_type: TierType,
        /// The tier ladder.
        tiers: TierLadder,
    },
    /// Marginal brackets whose thresholds are market wRVU percentiles.
    PercentileTiered {
        /// The tier ladder; thresholds are percentiles on a 0-100 scale.
        tiers: TierLadder,
    },
    /// A flat CF solved so modeled TCC lands on a target market percentile.
    BudgetNeutral {
        /// The TCC percentile to land on.
        target_tcc_percentile: f64,
        /// The CF in force before the change, reported for comparison.
        #[serde(default)]
        base_cf: Option<f64>,
    },
    /// A base CF scaled by a quality score.
    QualityWeighted {
        /// Dollars per wRVU at a perfect quality score.
        base_cf: f64,
        /// Quality score on a 0-1 or 0-100 scale.
        quality_score: f64,
    },
    /// A CF chosen by the provider's FTE band.
    FteAdjusted {
        /// FTE bands in ascending order.
        tiers: Vec<FteTier>,
    },
}

impl CfModel {
    /// The serialized discriminant of the variant.
    pub fn model_type(&self) -> &'static str {
        match self {
            CfModel::Single { .. } => "single",
            CfModel::Tiered { .. } => "tiered",
            CfModel::PercentileTiered { .. } => "percentile_tiered",
            CfModel::BudgetNeutral { .. } => "budget_neutral",
            CfModel::QualityWeighted { .. } => "quality_weighted",
            CfModel::FteAdjusted { .. } => "fte_adjusted",
        }
    }
}

/// Variant-specific inputs for CF evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CfContext<'a> {
    /// wRVU benchmark, required by `percentile_tiered`.
    pub wrvu_benchmark: Option<&'a Benchmark>,
    /// TCC benchmark, required by `budget_neutral`.
    pub tcc_benchmark: Option<&'a Benchmark>,
    /// Fixed (non-productivity) compensation.
    pub fixed_compensation: f64,
}

/// wRVUs paid inside one bracket of a tiered evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketLine {
    /// Zero-based position of the tier in its ladder.
    pub tier_index: usize,
    /// Lower wRVU bound of the bracket.
    pub lower_bound: f64,
    /// Upper wRVU bound; `None` for the open-ended top bracket.
    pub upper_bound: Option<f64>,
    /// wRVUs paid in this bracket.
    pub wrvus: f64,
    /// Conversion factor of the bracket.
    pub cf: f64,
    /// `wrvus * cf`.
    pub dollars: f64,
}

/// The outcome of evaluating a CF model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CfEvaluation {
    /// Productivity dollars earned.
    pub clinical_dollars: f64,
    /// `clinical_dollars / wrvus`, or 0 when wRVUs are 0.
    pub effective_cf: f64,
    /// Per-bracket breakdown; empty for flat variants.
    pub brackets: Vec<BracketLine>,
    /// Advisory warnings that did not block the evaluation.
    pub warnings: Vec<String>,
    /// Audit steps documenting the evaluation.
    pub audit_steps: Vec<AuditStep>,
}

/// A named model for side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CfScenario {
    /// Display name of the scenario.
    pub name: String,
    /// The model to evaluate.
    pub model: CfModel,
}

/// One row of a scenario comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CfScenarioResult {
    /// Display name of the scenario.
    pub name: String,
    /// The model evaluation.
    pub evaluation: CfEvaluation,
    /// Fixed compensation plus clinical dollars.
    pub modeled_tcc: f64,
    /// Percentile of `modeled_tcc` on the TCC benchmark, when one was supplied.
    pub tcc_percentile: Option<f64>,
}
