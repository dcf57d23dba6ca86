//! Conversion-factor model evaluation.
//!
//! This module turns a provider's wRVUs into clinical dollars under each of
//! the [`CfModel`] tiering schemes.
//!
//! ## Schemes
//!
//! - **single**: `wrvus x cf`
//! - **tiered / threshold**: marginal brackets over cumulative wRVU thresholds
//! - **tiered / percentage**: marginal brackets whose bounds are percentages of
//!   the provider's own wRVUs
//! - **percentile_tiered**: bounds are market wRVU percentiles, converted to
//!   wRVUs on the context's wRVU benchmark
//! - **budget_neutral**: one flat CF solved so `fixed + wrvus x CF` lands on the
//!   target TCC percentile
//! - **quality_weighted**: `base_cf x quality`, with quality normalized to 0-1
//! - **fte_adjusted**: the CF of the band containing the provider's FTE

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, BoundedTier, BracketLine, CfContext, CfEvaluation, CfModel, CfScenario,
    CfScenarioResult, FteTier, TierLadder, TierType,
};

use super::percentile::{estimate_percentile, value_at_percentile};
use super::tier_walk::marginal_brackets;
use super::validation::{ensure_fte, ensure_non_negative, validate_cf_model};

/// Evaluates a CF model for one provider.
///
/// # Arguments
///
/// * `model` - The tiering scheme
/// * `wrvus` - The provider's wRVUs for the period
/// * `fte` - The provider's FTE in `(0, 1]`
/// * `context` - Benchmarks and fixed compensation needed by some variants
///
/// # Errors
///
/// - [`EngineError::Validation`] for out-of-range inputs, malformed model
///   parameters, a malformed context benchmark, or a missing benchmark the
///   variant needs
/// - [`EngineError::DegenerateInput`] for a budget-neutral model with no wRVUs
/// - [`EngineError::UnmatchedTier`] when no FTE band covers the provider
///
/// # Example
///
/// ```
/// use comp_engine::calculation::evaluate_cf;
/// use comp_engine::models::{CfContext, CfModel};
///
/// let model = CfModel::Single { cf: 50.0 };
/// let result = evaluate_cf(&model, 4800.0, 1.0, &CfContext::default()).unwrap();
///
/// assert_eq!(result.clinical_dollars, 240_000.0);
/// assert_eq!(result.effective_cf, 50.0);
/// ```
pub fn evaluate_cf(
    model: &CfModel,
    wrvus: f64,
    fte: f64,
    context: &CfContext<'_>,
) -> EngineResult<CfEvaluation> {
    if matches!(model, CfModel::BudgetNeutral { .. }) && wrvus <= 0.0 {
        return Err(EngineError::DegenerateInput {
            message: format!("budget-neutral CF needs positive wRVUs, got {}", wrvus),
        });
    }
    ensure_non_negative("wrvus", wrvus)?;
    ensure_fte("fte", fte)?;
    ensure_non_negative("context.fixed_compensation", context.fixed_compensation)?;
    validate_cf_model(model)?;
    for benchmark in [context.wrvu_benchmark, context.tcc_benchmark].into_iter().flatten() {
        benchmark.validate()?;
    }

    let mut warnings = Vec::new();
    let mut audit_steps = Vec::new();

    let (clinical_dollars, brackets) = match model {
        CfModel::Single { cf } => {
            audit_steps.push(flat_step(1, "cf_single", "Single Conversion Factor", wrvus, *cf));
            (wrvus * cf, Vec::new())
        }
        CfModel::Tiered { tier_type, tiers } => {
            let bounded = match tier_type {
                TierType::Threshold => tiers.bounded().to_vec(),
                TierType::Percentage => rescale(tiers, |pct| pct / 100.0 * wrvus),
            };
            walk(wrvus, &bounded, tiers.final_cf(), &mut audit_steps)
        }
        CfModel::PercentileTiered { tiers } => {
            let benchmark = context.wrvu_benchmark.ok_or_else(|| {
                EngineError::validation(
                    "context.wrvu_benchmark",
                    "percentile-tiered models require a wRVU benchmark",
                )
            })?;
            let bounded = rescale(tiers, |pct| value_at_percentile(pct, benchmark));
            audit_steps.push(
                AuditStep::new(1, "cf_percentile_bounds", "Percentile Tier Bounds")
                    .with_input(serde_json::json!({
                        "benchmark_id": benchmark.id,
                        "percentiles": tiers.bounded().iter().map(|t| t.threshold).collect::<Vec<_>>(),
                    }))
                    .with_output(serde_json::json!({
                        "wrvu_bounds": bounded.iter().map(|t| t.threshold).collect::<Vec<_>>(),
                    }))
                    .with_reasoning(format!(
                        "Converted {} percentile bounds to wRVUs on benchmark '{}'",
                        bounded.len(),
                        benchmark.id
                    )),
            );
            walk(wrvus, &bounded, tiers.final_cf(), &mut audit_steps)
        }
        CfModel::BudgetNeutral {
            target_tcc_percentile,
            base_cf,
        } => {
            let cf = solve_budget_neutral_cf(*target_tcc_percentile, wrvus, context)?;
            if cf < 0.0 {
                warnings.push(format!(
                    "Fixed compensation already exceeds the p{} TCC target; the solved CF of {:.2} is negative.",
                    target_tcc_percentile, cf
                ));
            }
            let mut step = flat_step(1, "cf_budget_neutral", "Budget-Neutral Conversion Factor", wrvus, cf);
            step.input["target_tcc_percentile"] = serde_json::json!(target_tcc_percentile);
            step.input["fixed_compensation"] = serde_json::json!(context.fixed_compensation);
            step.output["base_cf"] = serde_json::json!(base_cf);
            step.output["cf_change"] = serde_json::json!(base_cf.map(|base| cf - base));
            audit_steps.push(step);
            (wrvus * cf, Vec::new())
        }
        CfModel::QualityWeighted {
            base_cf,
            quality_score,
        } => {
            let quality = normalize_quality(*quality_score);
            let cf = base_cf * quality;
            let mut step = flat_step(1, "cf_quality_weighted", "Quality-Weighted Conversion Factor", wrvus, cf);
            step.input["base_cf"] = serde_json::json!(base_cf);
            step.input["quality_score"] = serde_json::json!(quality_score);
            step.output["normalized_quality"] = serde_json::json!(quality);
            audit_steps.push(step);
            (wrvus * cf, Vec::new())
        }
        CfModel::FteAdjusted { tiers } => {
            let (index, tier) = select_fte_tier(tiers, fte)?;
            let mut step = flat_step(1, "cf_fte_adjusted", "FTE-Adjusted Conversion Factor", wrvus, tier.cf);
            step.input["fte"] = serde_json::json!(fte);
            step.output["tier_index"] = serde_json::json!(index);
            audit_steps.push(step);
            (wrvus * tier.cf, Vec::new())
        }
    };

    let effective_cf = if wrvus > 0.0 {
        clinical_dollars / wrvus
    } else {
        0.0
    };

    audit_steps.push(
        AuditStep::new(
            audit_steps.len() as u32 + 1,
            "cf_effective",
            "Effective Conversion Factor",
        )
        .with_input(serde_json::json!({
            "model_type": model.model_type(),
            "wrvus": wrvus,
        }))
        .with_output(serde_json::json!({
            "clinical_dollars": clinical_dollars,
            "effective_cf": effective_cf,
        }))
        .with_reasoning(format!(
            "{} model pays ${:.2} for {} wRVUs (effective CF ${:.2})",
            model.model_type(),
            clinical_dollars,
            wrvus,
            effective_cf
        )),
    );

    debug!(
        model_type = model.model_type(),
        wrvus,
        fte,
        clinical_dollars,
        effective_cf,
        "Evaluated CF model"
    );

    Ok(CfEvaluation {
        clinical_dollars,
        effective_cf,
        brackets,
        warnings,
        audit_steps,
    })
}

/// Evaluates several named models for the same provider.
///
/// Each scenario is independent; the first failing scenario aborts the comparison.
pub fn compare_cf_scenarios(
    scenarios: &[CfScenario],
    wrvus: f64,
    fte: f64,
    context: &CfContext<'_>,
) -> EngineResult<Vec<CfScenarioResult>> {
    scenarios
        .iter()
        .map(|scenario| {
            let evaluation = evaluate_cf(&scenario.model, wrvus, fte, context)?;
            let modeled_tcc = context.fixed_compensation + evaluation.clinical_dollars;
            Ok(CfScenarioResult {
                name: scenario.name.clone(),
                tcc_percentile: context
                    .tcc_benchmark
                    .map(|benchmark| estimate_percentile(modeled_tcc, benchmark)),
                modeled_tcc,
                evaluation,
            })
        })
        .collect()
}

/// Solves the flat CF that puts modeled TCC at the target percentile.
fn solve_budget_neutral_cf(
    target_percentile: f64,
    wrvus: f64,
    context: &CfContext<'_>,
) -> EngineResult<f64> {
    let benchmark = context.tcc_benchmark.ok_or_else(|| {
        EngineError::validation(
            "context.tcc_benchmark",
            "budget-neutral models require a TCC benchmark",
        )
    })?;

    let target_tcc = value_at_percentile(target_percentile, benchmark);
    Ok((target_tcc - context.fixed_compensation) / wrvus)
}

/// Scores above 1 are read as a 0-100 scale.
fn normalize_quality(score: f64) -> f64 {
    let normalized = if score > 1.0 { score / 100.0 } else { score };
    normalized.clamp(0.0, 1.0)
}

fn select_fte_tier(tiers: &[FteTier], fte: f64) -> EngineResult<(usize, &FteTier)> {
    let last = tiers.len().saturating_sub(1);
    tiers
        .iter()
        .enumerate()
        .find(|(index, tier)| {
            fte >= tier.fte_min
                && (fte < tier.fte_max || (*index == last && fte <= tier.fte_max))
        })
        .ok_or(EngineError::UnmatchedTier { fte })
}

fn rescale(tiers: &TierLadder, to_wrvus: impl Fn(f64) -> f64) -> Vec<BoundedTier> {
    tiers
        .bounded()
        .iter()
        .map(|tier| BoundedTier {
            threshold: to_wrvus(tier.threshold),
            cf: tier.cf,
        })
        .collect()
}

fn walk(
    wrvus: f64,
    bounded: &[BoundedTier],
    final_cf: f64,
    audit_steps: &mut Vec<AuditStep>,
) -> (f64, Vec<BracketLine>) {
    let lines = marginal_brackets(wrvus, bounded, final_cf);

    for line in lines.iter().filter(|line| line.wrvus > 0.0) {
        let range = match line.upper_bound {
            Some(upper) => format!("{}-{}", line.lower_bound, upper),
            None => format!("above {}", line.lower_bound),
        };
        audit_steps.push(
            AuditStep::new(
                audit_steps.len() as u32 + 1,
                "cf_bracket",
                "Conversion Factor Bracket",
            )
            .with_input(serde_json::json!({
                "tier_index": line.tier_index,
                "lower_bound": line.lower_bound,
                "upper_bound": line.upper_bound,
                "wrvus": line.wrvus,
            }))
            .with_output(serde_json::json!({
                "cf": line.cf,
                "dollars": line.dollars,
            }))
            .with_reasoning(format!(
                "Tier {} ({} wRVUs): {} wRVUs x ${} = ${:.2}",
                line.tier_index + 1,
                range,
                line.wrvus,
                line.cf,
                line.dollars
            )),
        );
    }

    let total = lines.iter().map(|line| line.dollars).sum();
    (total, lines)
}

fn flat_step(step_number: u32, rule_id: &str, rule_name: &str, wrvus: f64, cf: f64) -> AuditStep {
    AuditStep::new(step_number, rule_id, rule_name)
        .with_input(serde_json::json!({ "wrvus": wrvus }))
        .with_output(serde_json::json!({ "cf": cf, "clinical_dollars": wrvus * cf }))
        .with_reasoning(format!(
            "{} wRVUs x ${:.2} = ${:.2}",
            wrvus,
            cf,
            wrvus * cf
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Benchmark, TierSpec};

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn ladder(specs: &[(Option<f64>, f64)]) -> TierLadder {
        TierLadder::from_specs(
            specs
                .iter()
                .map(|(threshold, cf)| TierSpec {
                    threshold: *threshold,
                    cf: *cf,
                })
                .collect(),
        )
        .unwrap()
    }

    fn wrvu_benchmark() -> Benchmark {
        Benchmark {
            id: "fm-wrvu-2024".to_string(),
            specialty: "Family Medicine".to_string(),
            coverage_type: "wRVU".to_string(),
            source: "MGMA".to_string(),
            survey_year: Some(2024),
            p25: Some(3800.0),
            p50: 4800.0,
            p75: Some(5900.0),
            p90: Some(7000.0),
        }
    }

    fn tcc_benchmark() -> Benchmark {
        Benchmark {
            id: "fm-tcc-2024".to_string(),
            specialty: "Family Medicine".to_string(),
            coverage_type: "TCC".to_string(),
            source: "MGMA".to_string(),
            survey_year: Some(2024),
            p25: Some(240_000.0),
            p50: 290_000.0,
            p75: Some(350_000.0),
            p90: Some(420_000.0),
        }
    }

    #[test]
    fn test_single_cf() {
        let result = evaluate_cf(&CfModel::Single { cf: 48.5 }, 4000.0, 1.0, &CfContext::default())
            .unwrap();

        assert_close(result.clinical_dollars, 194_000.0);
        assert!(result.brackets.is_empty());
        assert_eq!(result.audit_steps.last().unwrap().rule_id, "cf_effective");
    }

    #[test]
    fn test_threshold_tiers_are_marginal() {
        let model = CfModel::Tiered {
            tier_type: TierType::Threshold,
            tiers: ladder(&[(Some(4000.0), 45.0), (Some(6000.0), 50.0), (None, 55.0)]),
        };

        let result = evaluate_cf(&model, 7000.0, 1.0, &CfContext::default()).unwrap();

        assert_close(result.clinical_dollars, 335_000.0);
        assert_close(result.effective_cf, 335_000.0 / 7000.0);
        assert_eq!(result.brackets.len(), 3);
        let bracket_steps = result
            .audit_steps
            .iter()
            .filter(|s| s.rule_id == "cf_bracket")
            .count();
        assert_eq!(bracket_steps, 3);
    }

    #[test]
    fn test_percentage_tiers_scale_with_own_wrvus() {
        // First 50% of 6000 wRVUs at 40, next 30% at 50, last 20% at 60.
        let model = CfModel::Tiered {
            tier_type: TierType::Percentage,
            tiers: ladder(&[(Some(50.0), 40.0), (Some(80.0), 50.0), (None, 60.0)]),
        };

        let result = evaluate_cf(&model, 6000.0, 1.0, &CfContext::default()).unwrap();

        assert_close(result.clinical_dollars, 3000.0 * 40.0 + 1800.0 * 50.0 + 1200.0 * 60.0);
        assert_close(result.brackets[1].upper_bound.unwrap(), 4800.0);
    }

    #[test]
    fn test_percentile_tiers_convert_on_benchmark() {
        // p50 = 4800 wRVUs, p75 = 5900 wRVUs.
        let benchmark = wrvu_benchmark();
        let model = CfModel::PercentileTiered {
            tiers: ladder(&[(Some(50.0), 45.0), (Some(75.0), 50.0), (None, 60.0)]),
        };
        let context = CfContext {
            wrvu_benchmark: Some(&benchmark),
            ..CfContext::default()
        };

        let result = evaluate_cf(&model, 6000.0, 1.0, &context).unwrap();

        assert_close(
            result.clinical_dollars,
            4800.0 * 45.0 + 1100.0 * 50.0 + 100.0 * 60.0,
        );
        assert_eq!(result.audit_steps[0].rule_id, "cf_percentile_bounds");
    }

    #[test]
    fn test_percentile_tiers_require_benchmark() {
        let model = CfModel::PercentileTiered {
            tiers: ladder(&[(Some(50.0), 45.0), (None, 60.0)]),
        };

        match evaluate_cf(&model, 5000.0, 1.0, &CfContext::default()) {
            Err(EngineError::Validation { field, .. }) => {
                assert_eq!(field, "context.wrvu_benchmark")
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_budget_neutral_lands_on_target_percentile() {
        let benchmark = tcc_benchmark();
        let model = CfModel::BudgetNeutral {
            target_tcc_percentile: 50.0,
            base_cf: Some(45.0),
        };
        let context = CfContext {
            tcc_benchmark: Some(&benchmark),
            fixed_compensation: 50_000.0,
            ..CfContext::default()
        };

        let result = evaluate_cf(&model, 4800.0, 1.0, &context).unwrap();

        assert_close(result.effective_cf, 50.0);
        assert_close(result.clinical_dollars + 50_000.0, 290_000.0);
        assert!(result.warnings.is_empty());
        assert_eq!(result.audit_steps[0].output["cf_change"], serde_json::json!(5.0));
    }

    #[test]
    fn test_budget_neutral_zero_wrvus_is_degenerate() {
        let benchmark = tcc_benchmark();
        let model = CfModel::BudgetNeutral {
            target_tcc_percentile: 50.0,
            base_cf: None,
        };
        let context = CfContext {
            tcc_benchmark: Some(&benchmark),
            ..CfContext::default()
        };

        let result = evaluate_cf(&model, 0.0, 1.0, &context);
        assert!(matches!(result, Err(EngineError::DegenerateInput { .. })));
    }

    #[test]
    fn test_budget_neutral_negative_wrvus_is_degenerate() {
        let benchmark = tcc_benchmark();
        let model = CfModel::BudgetNeutral {
            target_tcc_percentile: 50.0,
            base_cf: None,
        };
        let context = CfContext {
            tcc_benchmark: Some(&benchmark),
            ..CfContext::default()
        };

        let result = evaluate_cf(&model, -10.0, 1.0, &context);
        assert!(matches!(result, Err(EngineError::DegenerateInput { .. })));

        // Other variants still treat negative wRVUs as a validation failure.
        let single = evaluate_cf(&CfModel::Single { cf: 50.0 }, -10.0, 1.0, &context);
        assert!(matches!(single, Err(EngineError::Validation { .. })));
    }

    #[test]
    fn test_malformed_context_benchmark_is_rejected() {
        let mut benchmark = tcc_benchmark();
        benchmark.p25 = Some(100_000.0);
        benchmark.p50 = 200_000.0;
        benchmark.p75 = Some(150_000.0);
        benchmark.p90 = Some(180_000.0);
        let model = CfModel::BudgetNeutral {
            target_tcc_percentile: 50.0,
            base_cf: None,
        };
        let context = CfContext {
            tcc_benchmark: Some(&benchmark),
            ..CfContext::default()
        };

        match evaluate_cf(&model, 4000.0, 1.0, &context) {
            Err(EngineError::Validation { field, .. }) => {
                assert_eq!(field, "benchmark[fm-tcc-2024].p75")
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_wrvu_benchmark_is_rejected() {
        let mut benchmark = wrvu_benchmark();
        benchmark.p50 = 0.0;
        let model = CfModel::PercentileTiered {
            tiers: ladder(&[(Some(50.0), 45.0), (None, 60.0)]),
        };
        let context = CfContext {
            wrvu_benchmark: Some(&benchmark),
            ..CfContext::default()
        };

        let result = evaluate_cf(&model, 5000.0, 1.0, &context);
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }

    #[test]
    fn test_budget_neutral_negative_cf_warns() {
        let benchmark = tcc_benchmark();
        let model = CfModel::BudgetNeutral {
            target_tcc_percentile: 25.0,
            base_cf: None,
        };
        let context = CfContext {
            tcc_benchmark: Some(&benchmark),
            fixed_compensation: 300_000.0,
            ..CfContext::default()
        };

        let result = evaluate_cf(&model, 4000.0, 1.0, &context).unwrap();

        assert_close(result.effective_cf, -15.0);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_quality_score_on_percent_scale() {
        let model = CfModel::QualityWeighted {
            base_cf: 50.0,
            quality_score: 90.0,
        };

        let result = evaluate_cf(&model, 5000.0, 1.0, &CfContext::default()).unwrap();

        assert_close(result.effective_cf, 45.0);
        assert_close(result.clinical_dollars, 225_000.0);
    }

    #[test]
    fn test_quality_score_on_unit_scale() {
        let model = CfModel::QualityWeighted {
            base_cf: 50.0,
            quality_score: 0.8,
        };

        let result = evaluate_cf(&model, 1000.0, 1.0, &CfContext::default()).unwrap();
        assert_close(result.effective_cf, 40.0);
    }

    #[test]
    fn test_fte_adjusted_selects_band() {
        let model = CfModel::FteAdjusted {
            tiers: vec![
                FteTier { fte_min: 0.5, fte_max: 0.8, cf: 42.0 },
                FteTier { fte_min: 0.8, fte_max: 1.0, cf: 48.0 },
            ],
        };

        let part_time = evaluate_cf(&model, 3000.0, 0.6, &CfContext::default()).unwrap();
        assert_close(part_time.effective_cf, 42.0);

        let boundary = evaluate_cf(&model, 3000.0, 0.8, &CfContext::default()).unwrap();
        assert_close(boundary.effective_cf, 48.0);

        let full_time = evaluate_cf(&model, 3000.0, 1.0, &CfContext::default()).unwrap();
        assert_close(full_time.effective_cf, 48.0);
    }

    #[test]
    fn test_fte_adjusted_unmatched_is_an_error() {
        let model = CfModel::FteAdjusted {
            tiers: vec![FteTier { fte_min: 0.5, fte_max: 1.0, cf: 48.0 }],
        };

        match evaluate_cf(&model, 3000.0, 0.4, &CfContext::default()) {
            Err(EngineError::UnmatchedTier { fte }) => assert_eq!(fte, 0.4),
            other => panic!("Expected UnmatchedTier error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_wrvus_reports_zero_effective_cf() {
        let result =
            evaluate_cf(&CfModel::Single { cf: 50.0 }, 0.0, 1.0, &CfContext::default()).unwrap();

        assert_eq!(result.clinical_dollars, 0.0);
        assert_eq!(result.effective_cf, 0.0);
    }

    #[test]
    fn test_rejects_invalid_fte_and_wrvus() {
        let model = CfModel::Single { cf: 50.0 };
        assert!(evaluate_cf(&model, 100.0, 0.0, &CfContext::default()).is_err());
        assert!(evaluate_cf(&model, -1.0, 1.0, &CfContext::default()).is_err());
    }

    #[test]
    fn test_compare_scenarios_reports_tcc_percentile() {
        let benchmark = tcc_benchmark();
        let context = CfContext {
            tcc_benchmark: Some(&benchmark),
            fixed_compensation: 50_000.0,
            ..CfContext::default()
        };
        let scenarios = vec![
            CfScenario {
                name: "Flat $50".to_string(),
                model: CfModel::Single { cf: 50.0 },
            },
            CfScenario {
                name: "Quality".to_string(),
                model: CfModel::QualityWeighted {
                    base_cf: 50.0,
                    quality_score: 50.0,
                },
            },
        ];

        let results = compare_cf_scenarios(&scenarios, 4800.0, 1.0, &context).unwrap();

        assert_eq!(results.len(), 2);
        assert_close(results[0].modeled_tcc, 290_000.0);
        assert_close(results[0].tcc_percentile.unwrap(), 50.0);
        assert_close(results[1].modeled_tcc, 170_000.0);
        assert!(results[1].tcc_percentile.unwrap() < 0.0);
    }
}
