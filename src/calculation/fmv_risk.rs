//! Fair-market-value risk classification.
//!
//! Places an observed compensation metric on the best matching market
//! benchmark and turns the percentile estimate into a LOW / MODERATE / HIGH
//! risk tier, optionally softened by a high call-burden score.
//!
//! ## Benchmark matching
//!
//! The first rule that finds a record wins:
//! 1. exact specialty and exact coverage type
//! 2. exact specialty, any coverage type
//! 3. the generic specialty ("All Specialties") with the exact coverage type
//!
//! Within a rule the most recent survey year wins; ties keep catalog order.

use tracing::{debug, warn};

use crate::config::FmvPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Benchmark, EvaluationInput, EvaluationResult, GENERIC_SPECIALTY, MatchKind, RiskLevel,
};

use super::narrative::build_narrative;
use super::percentile::estimate_percentile;

/// Finds the benchmark to compare a specialty and coverage type against.
///
/// Returns `None` when no rule matches; that is an expected outcome, not an error.
///
/// # Example
///
/// ```
/// use comp_engine::calculation::find_best_matching_benchmark;
/// use comp_engine::models::Benchmark;
///
/// let generic = Benchmark {
///     id: "all-inhouse".to_string(),
///     specialty: "All Specialties".to_string(),
///     coverage_type: "In-house".to_string(),
///     source: "Survey".to_string(),
///     survey_year: Some(2024),
///     p25: None,
///     p50: 1400.0,
///     p75: None,
///     p90: None,
/// };
/// let catalog = vec![generic];
///
/// let found = find_best_matching_benchmark("Urology", "In-house", &catalog);
/// assert_eq!(found.map(|b| b.id.as_str()), Some("all-inhouse"));
/// assert!(find_best_matching_benchmark("Urology", "Home call", &catalog).is_none());
/// ```
pub fn find_best_matching_benchmark<'a>(
    specialty: &str,
    coverage_type: &str,
    catalog: &'a [Benchmark],
) -> Option<&'a Benchmark> {
    match_benchmark(specialty, coverage_type, catalog).map(|(benchmark, _)| benchmark)
}

/// Like [`find_best_matching_benchmark`], also reporting which rule matched.
pub fn match_benchmark<'a>(
    specialty: &str,
    coverage_type: &str,
    catalog: &'a [Benchmark],
) -> Option<(&'a Benchmark, MatchKind)> {
    most_recent(catalog, |b| {
        b.specialty == specialty && b.coverage_type == coverage_type
    })
    .map(|b| (b, MatchKind::Exact))
    .or_else(|| {
        most_recent(catalog, |b| b.specialty == specialty).map(|b| (b, MatchKind::SpecialtyOnly))
    })
    .or_else(|| {
        most_recent(catalog, |b| {
            b.specialty == GENERIC_SPECIALTY && b.coverage_type == coverage_type
        })
        .map(|b| (b, MatchKind::GenericSpecialty))
    })
}

fn most_recent<'a>(
    catalog: &'a [Benchmark],
    matches: impl Fn(&Benchmark) -> bool,
) -> Option<&'a Benchmark> {
    catalog
        .iter()
        .filter(|b| matches(b))
        .fold(None::<&'a Benchmark>, |best, candidate| match best {
            Some(current) if current.survey_year >= candidate.survey_year => Some(current),
            _ => Some(candidate),
        })
}

/// Maps a percentile estimate to a risk level using the policy thresholds.
///
/// # Example
///
/// ```
/// use comp_engine::calculation::classify_percentile;
/// use comp_engine::config::FmvPolicy;
/// use comp_engine::models::RiskLevel;
///
/// let policy = FmvPolicy::default();
/// assert_eq!(classify_percentile(75.0, &policy), RiskLevel::Low);
/// assert_eq!(classify_percentile(75.1, &policy), RiskLevel::Moderate);
/// assert_eq!(classify_percentile(90.0, &policy), RiskLevel::Moderate);
/// assert_eq!(classify_percentile(90.5, &policy), RiskLevel::High);
/// ```
pub fn classify_percentile(percentile: f64, policy: &FmvPolicy) -> RiskLevel {
    if percentile > policy.high_above {
        RiskLevel::High
    } else if percentile > policy.moderate_above {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

/// Evaluates an observed value against the catalog and classifies FMV risk.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] when the observed value is negative or
/// not finite, when the burden score falls outside 0-100, or when the matched
/// benchmark is malformed.
pub fn evaluate_fmv(
    input: &EvaluationInput,
    catalog: &[Benchmark],
    policy: &FmvPolicy,
) -> EngineResult<EvaluationResult> {
    validate_input(input)?;

    let Some((benchmark, match_kind)) =
        match_benchmark(&input.specialty, &input.coverage_type, catalog)
    else {
        warn!(
            specialty = %input.specialty,
            coverage_type = %input.coverage_type,
            "No market benchmark found; defaulting to MODERATE"
        );
        let mut result = EvaluationResult {
            benchmark: None,
            match_kind: None,
            percentile_estimate: None,
            risk_level: RiskLevel::Moderate,
            burden_adjusted: false,
            notes: vec![format!(
                "No market benchmark found for {} ({}); risk defaults to MODERATE.",
                input.specialty, input.coverage_type
            )],
            narrative: String::new(),
        };
        result.narrative = build_narrative(&result, input);
        return Ok(result);
    };

    benchmark.validate()?;

    let percentile = estimate_percentile(input.observed_value, benchmark);
    let base_level = classify_percentile(percentile, policy);
    let mut notes = Vec::new();

    match match_kind {
        MatchKind::Exact => {}
        MatchKind::SpecialtyOnly => notes.push(format!(
            "No {} benchmark for {}; compared against {} coverage data.",
            input.coverage_type, input.specialty, benchmark.coverage_type
        )),
        MatchKind::GenericSpecialty => notes.push(format!(
            "No {} benchmark available; compared against {} data.",
            input.specialty, GENERIC_SPECIALTY
        )),
    }

    if percentile < 0.0 {
        notes.push("Observed value is below the standard benchmark range.".to_string());
    } else if percentile > 100.0 {
        notes.push("Observed value is above the standard benchmark range.".to_string());
    }

    let mut risk_level = base_level;
    let mut burden_adjusted = false;
    if let Some(burden) = input.burden_score.filter(|b| *b >= policy.burden_downgrade_threshold) {
        if base_level == RiskLevel::Low {
            notes.push(format!(
                "Burden score of {} is elevated; risk remains LOW.",
                burden
            ));
        } else {
            risk_level = base_level.downgrade();
            burden_adjusted = true;
            notes.push(format!(
                "Burden score of {} meets the {} threshold; risk reduced from {} to {} because elevated call burden supports above-median pay.",
                burden, policy.burden_downgrade_threshold, base_level, risk_level
            ));
        }
    }

    debug!(
        benchmark_id = %benchmark.id,
        percentile,
        base_level = %base_level,
        risk_level = %risk_level,
        "Evaluated FMV risk"
    );

    let mut result = EvaluationResult {
        benchmark: Some(benchmark.clone()),
        match_kind: Some(match_kind),
        percentile_estimate: Some(percentile),
        risk_level,
        burden_adjusted,
        notes,
        narrative: String::new(),
    };
    result.narrative = build_narrative(&result, input);
    Ok(result)
}

fn validate_input(input: &EvaluationInput) -> EngineResult<()> {
    if !input.observed_value.is_finite() || input.observed_value < 0.0 {
        warn!(observed_value = input.observed_value, "Rejected FMV input");
        return Err(EngineError::validation(
            "observed_value",
            format!("must be a non-negative number, got {}", input.observed_value),
        ));
    }
    if let Some(burden) = input.burden_score.filter(|b| !(0.0..=100.0).contains(b)) {
        warn!(burden_score = burden, "Rejected FMV input");
        return Err(EngineError::validation(
            "burden_score",
            format!("must be within 0-100, got {}", burden),
        ));
    }
    Ok(())
}
