//! Input validation run before any arithmetic.
//!
//! Every check here raises [`EngineError::Validation`]; nothing is coerced.

use std::collections::HashSet;

use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{CallAssumptions, CallProgram, CallProvider, CallTier, CfModel, TierType};

/// Rejects negative or non-finite amounts.
pub fn ensure_non_negative(field: &str, value: f64) -> EngineResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(reject(
            field,
            format!("must be a non-negative number, got {}", value),
        ));
    }
    Ok(())
}

/// Rejects an FTE outside `(0, 1]`.
pub fn ensure_fte(field: &str, fte: f64) -> EngineResult<()> {
    if !(fte > 0.0 && fte <= 1.0) {
        return Err(reject(field, format!("must be in (0, 1], got {}", fte)));
    }
    Ok(())
}

fn ensure_percentile(field: &str, value: f64) -> EngineResult<()> {
    if !(0.0..=100.0).contains(&value) {
        return Err(reject(field, format!("must be within 0-100, got {}", value)));
    }
    Ok(())
}

fn reject(field: &str, message: String) -> EngineError {
    warn!(field, message = %message, "Validation failed");
    EngineError::Validation {
        field: field.to_string(),
        message,
    }
}

/// Checks the variant-specific parameters of a CF model.
///
/// Tier ladders are already ordered by construction; this adds the bounds
/// that depend on the variant.
pub fn validate_cf_model(model: &CfModel) -> EngineResult<()> {
    match model {
        CfModel::Single { cf } => ensure_non_negative("cf", *cf),
        CfModel::Tiered { tier_type, tiers } => match tier_type {
            TierType::Threshold => Ok(()),
            TierType::Percentage => tiers
                .bounded()
                .iter()
                .enumerate()
                .try_for_each(|(i, t)| {
                    ensure_percentile(&format!("tiers[{}].threshold", i), t.threshold)
                }),
        },
        CfModel::PercentileTiered { tiers } => {
            tiers.bounded().iter().enumerate().try_for_each(|(i, t)| {
                ensure_percentile(&format!("tiers[{}].percentile_threshold", i), t.threshold)
            })
        }
        CfModel::BudgetNeutral {
            target_tcc_percentile,
            base_cf,
        } => {
            if !target_tcc_percentile.is_finite() {
                return Err(reject(
                    "target_tcc_percentile",
                    format!("must be a finite number, got {}", target_tcc_percentile),
                ));
            }
            base_cf.map_or(Ok(()), |cf| ensure_non_negative("base_cf", cf))
        }
        CfModel::QualityWeighted {
            base_cf,
            quality_score,
        } => {
            ensure_non_negative("base_cf", *base_cf)?;
            ensure_percentile("quality_score", *quality_score)
        }
        CfModel::FteAdjusted { tiers } => {
            if tiers.is_empty() {
                return Err(reject("tiers", "at least one FTE tier is required".to_string()));
            }
            for (i, tier) in tiers.iter().enumerate() {
                ensure_non_negative(&format!("tiers[{}].fte_min", i), tier.fte_min)?;
                ensure_non_negative(&format!("tiers[{}].cf", i), tier.cf)?;
                if !(tier.fte_max > tier.fte_min) {
                    return Err(reject(
                        &format!("tiers[{}].fte_max", i),
                        format!(
                            "must exceed fte_min ({} <= {})",
                            tier.fte_max, tier.fte_min
                        ),
                    ));
                }
            }
            for (i, pair) in tiers.windows(2).enumerate() {
                if pair[1].fte_min < pair[0].fte_max {
                    return Err(reject(
                        &format!("tiers[{}].fte_min", i + 1),
                        format!(
                            "FTE tiers must ascend without overlap: {} starts before {}",
                            pair[1].fte_min, pair[0].fte_max
                        ),
                    ));
                }
            }
            Ok(())
        }
    }
}

/// Checks a call program, its roster, tiers, and assumptions together.
///
/// Returns the number of eligible providers.
pub fn validate_call_inputs(
    program: &CallProgram,
    providers: &[CallProvider],
    tiers: &[CallTier],
    assumptions: &CallAssumptions,
) -> EngineResult<usize> {
    validate_roster(providers)?;
    validate_assumptions("assumptions", assumptions)?;

    let mut tier_ids = HashSet::new();
    for tier in tiers {
        if !tier_ids.insert(tier.id.as_str()) {
            return Err(reject(
                &format!("tiers[{}].id", tier.id),
                "duplicate tier id".to_string(),
            ));
        }
        let field = |name: &str| format!("tiers[{}].{}", tier.id, name);
        ensure_non_negative(&field("rates.weekday"), tier.rates.weekday)?;
        ensure_non_negative(&field("rates.weekend"), tier.rates.weekend)?;
        ensure_non_negative(&field("rates.holiday"), tier.rates.holiday)?;
        validate_assumptions(&field("burden"), &tier.burden.resolve(assumptions))?;
    }

    for provider in providers {
        if !tier_ids.contains(provider.tier_id.as_str()) {
            return Err(reject(
                &format!("providers[{}].tier_id", provider.id),
                format!("unknown call tier '{}'", provider.tier_id),
            ));
        }
    }

    let eligible = providers.iter().filter(|p| p.eligible_for_call).count();
    if program.rotation_ratio == 0 {
        return Err(reject(
            "program.rotation_ratio",
            "must be at least 1".to_string(),
        ));
    }
    if program.rotation_ratio as usize > eligible {
        return Err(reject(
            "program.rotation_ratio",
            format!(
                "1-in-{} rotation exceeds the {} eligible providers",
                program.rotation_ratio, eligible
            ),
        ));
    }

    Ok(eligible)
}

/// Checks every provider's FTE.
pub fn validate_roster(providers: &[CallProvider]) -> EngineResult<()> {
    providers
        .iter()
        .try_for_each(|p| ensure_fte(&format!("providers[{}].fte", p.id), p.fte))
}

/// Checks the three call volumes, naming fields under `prefix`.
pub(crate) fn validate_assumptions(prefix: &str, assumptions: &CallAssumptions) -> EngineResult<()> {
    ensure_non_negative(
        &format!("{}.weekday_calls_per_month", prefix),
        assumptions.weekday_calls_per_month,
    )?;
    ensure_non_negative(
        &format!("{}.weekend_calls_per_month", prefix),
        assumptions.weekend_calls_per_month,
    )?;
    ensure_non_negative(
        &format!("{}.holidays_per_year", prefix),
        assumptions.holidays_per_year,
    )
}
