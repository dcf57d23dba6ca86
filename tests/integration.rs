//! Integration tests for the compensation engine.
//!
//! These tests run against the bundled `config/default` catalog and cover:
//! - Benchmark matching and fallbacks
//! - FMV risk classification with and without burden scores
//! - Conversion-factor models priced on catalog benchmarks
//! - Call-pay arrangements
//! - Call budgets feeding the FMV classifier
//! - Workload fairness

use comp_engine::calculation::{
    PerCallStipendInput, TieredCallPayInput, calculate_call_budget, calculate_expected_burden,
    calculate_fairness_metrics, calculate_per_call_stipend, calculate_tiered_call_pay,
    compare_cf_scenarios, estimate_percentile, evaluate_cf, evaluate_fmv,
    find_best_matching_benchmark, value_at_percentile,
};
use comp_engine::config::ConfigLoader;
use comp_engine::error::EngineError;
use comp_engine::models::{
    CallAssumptions, CallProgram, CallProvider, CallRates, CallTier, CfContext, CfModel,
    CfScenario, EvaluationInput, MatchKind, RiskLevel, TierBurden, TierLadder, TierSpec,
    TierType,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/default").expect("Failed to load config")
}

fn create_input(specialty: &str, coverage_type: &str, observed_value: f64) -> EvaluationInput {
    EvaluationInput {
        specialty: specialty.to_string(),
        coverage_type: coverage_type.to_string(),
        observed_value,
        burden_score: None,
    }
}

fn create_program(rotation_ratio: u32) -> CallProgram {
    CallProgram {
        id: "peds-call".to_string(),
        name: "Pediatric hospitalist call".to_string(),
        specialty: "Pediatrics".to_string(),
        coverage_type: "In-house".to_string(),
        rotation_ratio,
    }
}

fn create_roster(ftes: &[f64]) -> Vec<CallProvider> {
    ftes.iter()
        .enumerate()
        .map(|(i, fte)| CallProvider {
            id: format!("provider_{}", i + 1),
            name: String::new(),
            fte: *fte,
            eligible_for_call: true,
            tier_id: "primary".to_string(),
        })
        .collect()
}

fn create_tier() -> CallTier {
    CallTier {
        id: "primary".to_string(),
        name: "Primary call".to_string(),
        enabled: true,
        rates: CallRates {
            weekday: 1400.0,
            weekend: 2000.0,
            holiday: 2500.0,
        },
        burden: TierBurden::default(),
    }
}

fn create_assumptions() -> CallAssumptions {
    CallAssumptions {
        weekday_calls_per_month: 20.0,
        weekend_calls_per_month: 8.0,
        holidays_per_year: 8.0,
        plan_year: Some(2025),
    }
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
    .expect("valid ladder")
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {}, got {}",
        expected,
        actual
    );
}

// =============================================================================
// Benchmark matching
// =============================================================================

#[test]
fn test_exact_match_prefers_most_recent_survey() {
    let config = load_config();

    let found = find_best_matching_benchmark(
        "Pediatrics",
        "In-house",
        config.catalog().benchmarks(),
    );

    assert_eq!(found.map(|b| b.id.as_str()), Some("ped-inhouse-2024"));
}

#[test]
fn test_unknown_specialty_falls_back_to_generic() {
    let config = load_config();

    let found = find_best_matching_benchmark(
        "Unknown Specialty",
        "In-house",
        config.catalog().benchmarks(),
    );

    assert_eq!(found.map(|b| b.id.as_str()), Some("all-inhouse-2024"));
}

#[test]
fn test_productivity_specialty_matches_call_pay_generic() {
    let config = load_config();

    let found = find_best_matching_benchmark(
        "Family Medicine",
        "In-house",
        config.catalog().benchmarks(),
    );
    assert_eq!(found.map(|b| b.id.as_str()), Some("all-inhouse-2024"));

    let result = evaluate_fmv(
        &create_input("Family Medicine", "In-house", 1400.0),
        config.catalog().benchmarks(),
        &config.policy().fmv,
    )
    .unwrap();

    assert_eq!(
        result.benchmark.as_ref().map(|b| b.id.as_str()),
        Some("all-inhouse-2024")
    );
    assert_eq!(result.match_kind, Some(MatchKind::GenericSpecialty));
    assert_close(result.percentile_estimate.unwrap(), 50.0);
}

#[test]
fn test_unknown_specialty_and_coverage_finds_nothing() {
    let config = load_config();

    let found = find_best_matching_benchmark(
        "Unknown Specialty",
        "Unknown Coverage",
        config.catalog().benchmarks(),
    );

    assert!(found.is_none());
}

// =============================================================================
// FMV risk
// =============================================================================

#[test]
fn test_fmv_low_risk_at_62nd_percentile() {
    let config = load_config();

    let result = evaluate_fmv(
        &create_input("Pediatrics", "In-house", 1700.0),
        config.catalog().benchmarks(),
        &config.policy().fmv,
    )
    .unwrap();

    assert_close(result.percentile_estimate.unwrap(), 62.5);
    assert_eq!(result.risk_level, RiskLevel::Low);
    assert_eq!(result.match_kind, Some(MatchKind::Exact));
    assert!(result.narrative.contains("63rd percentile"));
    assert!(result.narrative.contains("MGMA Provider Compensation 2024"));
}

#[test]
fn test_fmv_moderate_risk_downgraded_by_burden() {
    let config = load_config();
    let mut input = create_input("Pediatrics", "In-house", 2200.0);

    let baseline = evaluate_fmv(&input, config.catalog().benchmarks(), &config.policy().fmv)
        .unwrap();
    assert_close(baseline.percentile_estimate.unwrap(), 84.0);
    assert_eq!(baseline.risk_level, RiskLevel::Moderate);

    input.burden_score = Some(85.0);
    let adjusted = evaluate_fmv(&input, config.catalog().benchmarks(), &config.policy().fmv)
        .unwrap();

    assert_eq!(adjusted.risk_level, RiskLevel::Low);
    assert!(adjusted.burden_adjusted);
    assert!(adjusted.narrative.contains("elevated call demands"));
}

#[test]
fn test_fmv_high_risk_above_p90() {
    let config = load_config();
    let mut input = create_input("Pediatrics", "In-house", 2600.0);

    let result = evaluate_fmv(&input, config.catalog().benchmarks(), &config.policy().fmv)
        .unwrap();
    // 90 + 200 x (15 / 500)
    assert_close(result.percentile_estimate.unwrap(), 96.0);
    assert_eq!(result.risk_level, RiskLevel::High);

    input.burden_score = Some(80.0);
    let adjusted = evaluate_fmv(&input, config.catalog().benchmarks(), &config.policy().fmv)
        .unwrap();
    assert_eq!(adjusted.risk_level, RiskLevel::Moderate);
}

#[test]
fn test_fmv_specialty_only_match_adds_note() {
    let config = load_config();

    let result = evaluate_fmv(
        &create_input("Pediatrics", "Home call", 1500.0),
        config.catalog().benchmarks(),
        &config.policy().fmv,
    )
    .unwrap();

    assert_eq!(result.match_kind, Some(MatchKind::SpecialtyOnly));
    assert_eq!(
        result.benchmark.as_ref().map(|b| b.id.as_str()),
        Some("ped-inhouse-2024")
    );
    assert!(!result.notes.is_empty());
}

#[test]
fn test_fmv_without_benchmark_defaults_to_moderate() {
    let config = load_config();

    let result = evaluate_fmv(
        &create_input("Unknown Specialty", "Unknown Coverage", 1500.0),
        config.catalog().benchmarks(),
        &config.policy().fmv,
    )
    .unwrap();

    assert!(result.benchmark.is_none());
    assert!(result.percentile_estimate.is_none());
    assert_eq!(result.risk_level, RiskLevel::Moderate);
    assert!(result.narrative.contains("professional judgment"));
}

#[test]
fn test_fmv_partial_benchmark_interpolates_present_points() {
    let config = load_config();

    let result = evaluate_fmv(
        &create_input("General Surgery", "In-house", 2300.0),
        config.catalog().benchmarks(),
        &config.policy().fmv,
    )
    .unwrap();

    assert_close(result.percentile_estimate.unwrap(), 62.5);
}

#[test]
fn test_fmv_rejects_negative_observed_value() {
    let config = load_config();

    let result = evaluate_fmv(
        &create_input("Pediatrics", "In-house", -1.0),
        config.catalog().benchmarks(),
        &config.policy().fmv,
    );

    match result {
        Err(EngineError::Validation { field, .. }) => assert_eq!(field, "observed_value"),
        other => panic!("Expected Validation error, got {:?}", other),
    }
}

// =============================================================================
// Conversion-factor models
// =============================================================================

#[test]
fn test_percentile_tiers_on_catalog_wrvu_benchmark() {
    let config = load_config();
    let wrvu = config.productivity_catalog().get("fm-wrvu-2024").unwrap();
    let context = CfContext {
        wrvu_benchmark: Some(wrvu),
        ..CfContext::default()
    };
    let model = CfModel::PercentileTiered {
        tiers: ladder(&[(Some(50.0), 45.0), (Some(75.0), 50.0), (None, 60.0)]),
    };

    let result = evaluate_cf(&model, 6500.0, 1.0, &context).unwrap();

    // 4800 x 45 + 1100 x 50 + 600 x 60
    assert_close(result.clinical_dollars, 307_000.0);
    let bracket_sum: f64 = result.brackets.iter().map(|b| b.dollars).sum();
    assert_close(bracket_sum, result.clinical_dollars);
}

#[test]
fn test_budget_neutral_round_trips_through_tcc_benchmark() {
    let config = load_config();
    let tcc = config.productivity_catalog().get("fm-tcc-2024").unwrap();
    let context = CfContext {
        tcc_benchmark: Some(tcc),
        fixed_compensation: 20_000.0,
        ..CfContext::default()
    };
    let model = CfModel::BudgetNeutral {
        target_tcc_percentile: 60.0,
        base_cf: Some(50.0),
    };

    let result = evaluate_cf(&model, 5200.0, 0.9, &context).unwrap();

    let modeled_tcc = context.fixed_compensation + result.clinical_dollars;
    assert_close(estimate_percentile(modeled_tcc, tcc), 60.0);
    assert_close(modeled_tcc, value_at_percentile(60.0, tcc));
}

#[test]
fn test_scenario_comparison_across_models() {
    let config = load_config();
    let tcc = config.productivity_catalog().get("fm-tcc-2024").unwrap();
    let context = CfContext {
        tcc_benchmark: Some(tcc),
        fixed_compensation: 40_000.0,
        ..CfContext::default()
    };
    let scenarios = vec![
        CfScenario {
            name: "Current flat CF".to_string(),
            model: CfModel::Single { cf: 50.0 },
        },
        CfScenario {
            name: "Threshold tiers".to_string(),
            model: CfModel::Tiered {
                tier_type: TierType::Threshold,
                tiers: ladder(&[(Some(4000.0), 45.0), (None, 55.0)]),
            },
        },
        CfScenario {
            name: "Budget neutral at median".to_string(),
            model: CfModel::BudgetNeutral {
                target_tcc_percentile: 50.0,
                base_cf: Some(50.0),
            },
        },
    ];

    let results = compare_cf_scenarios(&scenarios, 5000.0, 1.0, &context).unwrap();

    assert_eq!(results.len(), 3);
    assert_close(results[0].modeled_tcc, 290_000.0);
    // 4000 x 45 + 1000 x 55 + 40_000
    assert_close(results[1].modeled_tcc, 275_000.0);
    assert_close(results[2].tcc_percentile.unwrap(), 50.0);
}

// =============================================================================
// Call-pay arrangements
// =============================================================================

#[test]
fn test_per_call_stipend_reference_values() {
    let estimate = calculate_per_call_stipend(&PerCallStipendInput {
        weekday_calls_per_month: 10.0,
        weekend_calls_per_month: 5.0,
        weekday_stipend: 500.0,
        weekend_stipend: 750.0,
    })
    .unwrap();

    assert_close(estimate.monthly_pay, 8750.0);
    assert_close(estimate.annual_pay, 105_000.0);
    assert!((estimate.effective_rate - 583.33).abs() < 0.01);
}

#[test]
fn test_tiered_call_pay_reference_values() {
    let mut input = TieredCallPayInput {
        threshold: 10.0,
        rate_below_threshold: 500.0,
        rate_above_threshold: 750.0,
        actual_calls_or_shifts: 15.0,
    };

    let above = calculate_tiered_call_pay(&input).unwrap();
    assert_close(above.monthly_pay, 8750.0);
    assert_close(above.annual_pay, 105_000.0);

    input.actual_calls_or_shifts = 8.0;
    let below = calculate_tiered_call_pay(&input).unwrap();
    assert_close(below.monthly_pay, 4000.0);
}

// =============================================================================
// Call budget and fairness
// =============================================================================

#[test]
fn test_call_budget_feeds_fmv_classifier() {
    let config = load_config();
    let program = create_program(4);

    let budget = calculate_call_budget(
        &program,
        &create_roster(&[1.0, 1.0, 1.0, 1.0]),
        &[create_tier()],
        &create_assumptions(),
        &config.policy().call,
    )
    .unwrap();

    // (5 x 1400 + 2 x 2000) x 12 + 2 x 2500 per provider
    assert_close(budget.per_provider[0].annual_pay, 137_000.0);
    assert_close(budget.total_annual_call_budget, 548_000.0);
    assert_close(budget.effective_per_24h, 548_000.0 / 344.0);
    assert!(budget.warnings.is_empty());

    let evaluation = evaluate_fmv(
        &program.fmv_input(&budget, None),
        config.catalog().benchmarks(),
        &config.policy().fmv,
    )
    .unwrap();

    let percentile = evaluation.percentile_estimate.unwrap();
    assert!(percentile > 50.0 && percentile < 75.0);
    assert_eq!(evaluation.risk_level, RiskLevel::Low);
}

#[test]
fn test_call_budget_rejects_rotation_above_roster() {
    let config = load_config();

    let result = calculate_call_budget(
        &create_program(5),
        &create_roster(&[1.0, 1.0, 1.0, 1.0]),
        &[create_tier()],
        &create_assumptions(),
        &config.policy().call,
    );

    assert!(matches!(result, Err(EngineError::Validation { .. })));
}

#[test]
fn test_equal_fte_roster_is_perfectly_fair() {
    let burdens =
        calculate_expected_burden(&create_roster(&[1.0, 1.0, 1.0]), &create_assumptions())
            .unwrap();

    let summary = calculate_fairness_metrics(&burdens);

    assert_close(summary.fairness_score, 100.0);
    assert_close(summary.min_calls, summary.max_calls);
}

#[test]
fn test_mixed_fte_roster_is_less_fair() {
    let burdens =
        calculate_expected_burden(&create_roster(&[1.0, 1.0, 0.5]), &create_assumptions())
            .unwrap();

    let summary = calculate_fairness_metrics(&burdens);

    assert!(summary.fairness_score < 100.0);
    assert!(summary.max_calls > summary.min_calls);
    let total: f64 = burdens.iter().map(|b| b.annual_calls).sum();
    // 28 x 12 + 8 calls across the group
    assert_close(total, 344.0);
}
