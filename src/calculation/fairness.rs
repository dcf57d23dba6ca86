//! Expected call burden and workload fairness.
//!
//! Group call volume is allocated across eligible providers in proportion to
//! their FTE share, not split evenly. Fairness is scored from the spread of the
//! resulting annual call counts.

use tracing::debug;

use crate::error::EngineResult;
use crate::models::{CallAssumptions, CallProvider, CallTier, FairnessSummary, ProviderBurden};

use super::validation::{validate_assumptions, validate_roster};

/// Allocates the group's call volume to eligible providers by FTE share.
///
/// Uses the program-level assumptions as the whole call load. When tiers carry
/// their own burden overrides, use [`calculate_tiered_burden`] instead.
/// Ineligible providers are left out of the result.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::Validation`] when an FTE is outside
/// `(0, 1]` or a call volume is negative.
pub fn calculate_expected_burden(
    providers: &[CallProvider],
    assumptions: &CallAssumptions,
) -> EngineResult<Vec<ProviderBurden>> {
    validate_roster(providers)?;
    validate_assumptions("assumptions", assumptions)?;

    let group_monthly = assumptions.weekday_calls_per_month + assumptions.weekend_calls_per_month;
    Ok(allocate_by_fte(
        providers,
        group_monthly,
        assumptions.holidays_per_year,
    ))
}

/// Allocates the call volume of every enabled tier by FTE share.
///
/// Each tier's load is its [`crate::models::TierBurden`] resolved against the
/// program-level assumptions, the same load [`super::calculate_call_budget`]
/// prices. The group total therefore equals the sum of the budget's
/// `annual_group_calls` over its tier lines.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::Validation`] when an FTE is outside
/// `(0, 1]` or a resolved call volume is negative.
pub fn calculate_tiered_burden(
    providers: &[CallProvider],
    tiers: &[CallTier],
    assumptions: &CallAssumptions,
) -> EngineResult<Vec<ProviderBurden>> {
    validate_roster(providers)?;
    validate_assumptions("assumptions", assumptions)?;

    let mut group_monthly = 0.0;
    let mut group_holidays = 0.0;
    for tier in tiers.iter().filter(|t| t.enabled) {
        let load = tier.burden.resolve(assumptions);
        validate_assumptions(&format!("tiers[{}].burden", tier.id), &load)?;
        group_monthly += load.weekday_calls_per_month + load.weekend_calls_per_month;
        group_holidays += load.holidays_per_year;
    }

    Ok(allocate_by_fte(providers, group_monthly, group_holidays))
}

fn allocate_by_fte(
    providers: &[CallProvider],
    group_monthly: f64,
    group_holidays: f64,
) -> Vec<ProviderBurden> {
    let eligible: Vec<&CallProvider> = providers.iter().filter(|p| p.eligible_for_call).collect();
    let total_fte: f64 = eligible.iter().map(|p| p.fte).sum();

    let burdens = eligible
        .into_iter()
        .map(|provider| {
            let fte_share = provider.fte / total_fte;
            let monthly_calls = group_monthly * fte_share;
            ProviderBurden {
                provider_id: provider.id.clone(),
                fte: provider.fte,
                fte_share,
                monthly_calls,
                annual_calls: monthly_calls * 12.0 + group_holidays * fte_share,
            }
        })
        .collect::<Vec<_>>();

    debug!(
        eligible = burdens.len(),
        total_fte, group_monthly, group_holidays, "Allocated expected call burden"
    );

    burdens
}

/// Summarizes the spread of annual call counts.
///
/// `fairness_score = clamp(100 - 100 x stddev / mean, 0, 100)` using the
/// population standard deviation. An empty list or a zero mean scores 100.
///
/// # Example
///
/// ```
/// use comp_engine::calculation::calculate_fairness_metrics;
/// use comp_engine::models::ProviderBurden;
///
/// let burden = |id: &str, annual_calls: f64| ProviderBurden {
///     provider_id: id.to_string(),
///     fte: 1.0,
///     fte_share: 0.5,
///     monthly_calls: annual_calls / 12.0,
///     annual_calls,
/// };
///
/// let summary = calculate_fairness_metrics(&[burden("a", 60.0), burden("b", 60.0)]);
/// assert_eq!(summary.fairness_score, 100.0);
/// assert_eq!(summary.standard_deviation, 0.0);
/// ```
pub fn calculate_fairness_metrics(burdens: &[ProviderBurden]) -> FairnessSummary {
    if burdens.is_empty() {
        return FairnessSummary {
            group_average_calls: 0.0,
            min_calls: 0.0,
            max_calls: 0.0,
            standard_deviation: 0.0,
            fairness_score: 100.0,
        };
    }

    let count = burdens.len() as f64;
    let calls = burdens.iter().map(|b| b.annual_calls);

    let mean = calls.clone().sum::<f64>() / count;
    let min_calls = calls.clone().fold(f64::INFINITY, f64::min);
    let max_calls = calls.clone().fold(f64::NEG_INFINITY, f64::max);
    let variance = calls.map(|c| (c - mean).powi(2)).sum::<f64>() / count;
    let standard_deviation = variance.sqrt();

    let fairness_score = if mean == 0.0 {
        100.0
    } else {
        (100.0 - 100.0 * standard_deviation / mean).clamp(0.0, 100.0)
    };

    FairnessSummary {
        group_average_calls: mean,
        min_calls,
        max_calls,
        standard_deviation,
        fairness_score,
    }
}
