//! Annual call-pay budget for an on-call program.
//!
//! Each enabled tier's group volume is split by the program's "1 in N"
//! rotation into a per-provider load. That load is priced at the tier's
//! weekday, weekend, and holiday rates, summed across tiers, and multiplied by
//! the number of eligible providers for the group budget.

use tracing::debug;

use crate::config::CallWarningPolicy;
use crate::error::EngineResult;
use crate::models::{
    AuditStep, BudgetResult, CallAssumptions, CallProgram, CallProvider, CallTier, ProviderPay,
    TierBudgetLine,
};

use super::calendar::capacity_warnings;
use super::validation::validate_call_inputs;

/// Calculates the annual call budget for a program.
///
/// # Arguments
///
/// * `program` - The call program, including its rotation ratio
/// * `providers` - The full roster; ineligible providers are reported with $0
/// * `tiers` - Call tiers; disabled tiers contribute nothing
/// * `assumptions` - Group-level call volumes, overridable per tier
/// * `policy` - Limits that raise advisory warnings
///
/// # Errors
///
/// Returns [`crate::error::EngineError::Validation`] when an FTE is outside
/// `(0, 1]`, a rate or volume is negative, a provider references an unknown
/// tier, or the rotation ratio exceeds the eligible provider count.
///
/// # Example
///
/// ```
/// use comp_engine::calculation::calculate_call_budget;
/// use comp_engine::config::CallWarningPolicy;
/// use comp_engine::models::{
///     CallAssumptions, CallProgram, CallProvider, CallRates, CallTier, TierBurden,
/// };
///
/// let program = CallProgram {
///     id: "peds".to_string(),
///     name: String::new(),
///     specialty: "Pediatrics".to_string(),
///     coverage_type: "In-house".to_string(),
///     rotation_ratio: 2,
/// };
/// let providers: Vec<CallProvider> = ["a", "b"]
///     .iter()
///     .map(|id| CallProvider {
///         id: id.to_string(),
///         name: String::new(),
///         fte: 1.0,
///         eligible_for_call: true,
///         tier_id: "primary".to_string(),
///     })
///     .collect();
/// let tiers = vec![CallTier {
///     id: "primary".to_string(),
///     name: String::new(),
///     enabled: true,
///     rates: CallRates { weekday: 1000.0, weekend: 1000.0, holiday: 1000.0 },
///     burden: TierBurden::default(),
/// }];
/// let assumptions = CallAssumptions {
///     weekday_calls_per_month: 20.0,
///     weekend_calls_per_month: 8.0,
///     holidays_per_year: 0.0,
///     plan_year: None,
/// };
///
/// let budget = calculate_call_budget(
///     &program, &providers, &tiers, &assumptions, &CallWarningPolicy::default(),
/// )
/// .unwrap();
///
/// // Each provider covers 14 calls a month at $1000.
/// assert_eq!(budget.per_provider[0].annual_pay, 168_000.0);
/// assert_eq!(budget.total_annual_call_budget, 336_000.0);
/// assert_eq!(budget.effective_per_24h, 1000.0);
/// ```
pub fn calculate_call_budget(
    program: &CallProgram,
    providers: &[CallProvider],
    tiers: &[CallTier],
    assumptions: &CallAssumptions,
    policy: &CallWarningPolicy,
) -> EngineResult<BudgetResult> {
    let eligible_count = validate_call_inputs(program, providers, tiers, assumptions)?;
    let rotation = f64::from(program.rotation_ratio);

    let mut warnings = Vec::new();
    let mut audit_steps = Vec::new();
    let mut tier_lines = Vec::new();

    for tier in tiers.iter().filter(|t| t.enabled) {
        let load = tier.burden.resolve(assumptions);

        let weekday_calls_per_provider = load.weekday_calls_per_month / rotation;
        let weekend_calls_per_provider = load.weekend_calls_per_month / rotation;
        let holidays_per_provider = load.holidays_per_year / rotation;

        let annual_pay_per_provider = (weekday_calls_per_provider * tier.rates.weekday
            + weekend_calls_per_provider * tier.rates.weekend)
            * 12.0
            + holidays_per_provider * tier.rates.holiday;
        let annual_group_calls =
            (load.weekday_calls_per_month + load.weekend_calls_per_month) * 12.0
                + load.holidays_per_year;

        warnings.extend(capacity_warnings(&format!("Tier '{}'", tier.id), &load));
        if load.holidays_per_year > policy.max_holidays_per_year {
            warnings.push(format!(
                "Tier '{}': holiday calls ({}) exceed the typical {} holidays per year",
                tier.id, load.holidays_per_year, policy.max_holidays_per_year
            ));
        }

        audit_steps.push(
            AuditStep::new(
                audit_steps.len() as u32 + 1,
                "call_tier_pay",
                "Call Tier Pay Per Provider",
            )
            .with_input(serde_json::json!({
                "tier_id": tier.id,
                "rotation_ratio": program.rotation_ratio,
                "weekday_calls_per_month": load.weekday_calls_per_month,
                "weekend_calls_per_month": load.weekend_calls_per_month,
                "holidays_per_year": load.holidays_per_year,
                "rates": tier.rates,
            }))
            .with_output(serde_json::json!({
                "weekday_calls_per_provider": weekday_calls_per_provider,
                "weekend_calls_per_provider": weekend_calls_per_provider,
                "holidays_per_provider": holidays_per_provider,
                "annual_pay_per_provider": annual_pay_per_provider,
            }))
            .with_reasoning(format!(
                "1-in-{} rotation: ({:.2} weekday x ${} + {:.2} weekend x ${}) x 12 + {:.2} holidays x ${} = ${:.2}",
                program.rotation_ratio,
                weekday_calls_per_provider,
                tier.rates.weekday,
                weekend_calls_per_provider,
                tier.rates.weekend,
                holidays_per_provider,
                tier.rates.holiday,
                annual_pay_per_provider
            )),
        );

        tier_lines.push(TierBudgetLine {
            tier_id: tier.id.clone(),
            weekday_calls_per_provider,
            weekend_calls_per_provider,
            holidays_per_provider,
            annual_pay_per_provider,
            annual_group_calls,
        });
    }

    let pay_per_provider: f64 = tier_lines.iter().map(|l| l.annual_pay_per_provider).sum();
    let total_group_calls: f64 = tier_lines.iter().map(|l| l.annual_group_calls).sum();
    let total_annual_call_budget = pay_per_provider * eligible_count as f64;

    let eligible_fte: f64 = providers
        .iter()
        .filter(|p| p.eligible_for_call)
        .map(|p| p.fte)
        .sum();

    let call_pay_per_fte = if eligible_fte > 0.0 {
        total_annual_call_budget / eligible_fte
    } else {
        0.0
    };
    let effective_per_24h = if total_group_calls > 0.0 {
        total_annual_call_budget / total_group_calls
    } else {
        0.0
    };

    let per_provider = providers
        .iter()
        .map(|p| ProviderPay {
            provider_id: p.id.clone(),
            tier_id: p.tier_id.clone(),
            fte: p.fte,
            eligible_for_call: p.eligible_for_call,
            annual_pay: if p.eligible_for_call {
                pay_per_provider
            } else {
                0.0
            },
        })
        .collect();

    audit_steps.push(
        AuditStep::new(
            audit_steps.len() as u32 + 1,
            "call_budget_total",
            "Annual Call Budget",
        )
        .with_input(serde_json::json!({
            "pay_per_provider": pay_per_provider,
            "eligible_providers": eligible_count,
            "eligible_fte": eligible_fte,
            "annual_group_calls": total_group_calls,
        }))
        .with_output(serde_json::json!({
            "total_annual_call_budget": total_annual_call_budget,
            "call_pay_per_fte": call_pay_per_fte,
            "effective_per_24h": effective_per_24h,
        }))
        .with_reasoning(format!(
            "${:.2} per provider x {} eligible providers = ${:.2}",
            pay_per_provider, eligible_count, total_annual_call_budget
        )),
    );

    debug!(
        program_id = %program.id,
        eligible_count,
        total_annual_call_budget,
        effective_per_24h,
        warnings = warnings.len(),
        "Calculated call budget"
    );

    Ok(BudgetResult {
        total_annual_call_budget,
        call_pay_per_fte,
        effective_per_24h,
        per_provider,
        tier_lines,
        warnings,
        audit_steps,
    })
}
