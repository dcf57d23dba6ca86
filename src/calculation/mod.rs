//! Calculation logic for the compensation engine.
//!
//! This module contains the pure computations of the engine: percentile
//! estimation against quartile benchmarks, FMV risk classification and its
//! narrative, conversion-factor model evaluation, call-pay arrangements, the
//! annual call budget, and workload fairness.

mod calendar;
mod call_budget;
mod call_pay_models;
mod cf_evaluator;
mod fairness;
mod fmv_risk;
mod narrative;
mod percentile;
mod tier_walk;
mod validation;

pub use calendar::{
    DEFAULT_WEEKDAYS_PER_YEAR, DEFAULT_WEEKEND_DAYS_PER_YEAR, YearCapacity, capacity_warnings,
};
pub use call_budget::calculate_call_budget;
pub use call_pay_models::{
    AnnualStipendInput, CallPayEstimate, DailyRateInput, PerCallStipendInput, TieredCallPayInput,
    calculate_annual_stipend, calculate_daily_rate_pay, calculate_per_call_stipend,
    calculate_tiered_call_pay,
};
pub use cf_evaluator::{compare_cf_scenarios, evaluate_cf};
pub use fairness::{calculate_expected_burden, calculate_fairness_metrics, calculate_tiered_burden};
pub use fmv_risk::{classify_percentile, evaluate_fmv, find_best_matching_benchmark, match_benchmark};
pub use narrative::{build_narrative, ordinal};
pub use percentile::{QuartileCurve, estimate_percentile, value_at_percentile};
pub use tier_walk::marginal_brackets;
pub use validation::{
    ensure_fte, ensure_non_negative, validate_call_inputs, validate_cf_model, validate_roster,
};
