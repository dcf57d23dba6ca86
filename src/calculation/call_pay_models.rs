//! Individual call-pay arrangements.
//!
//! Each arrangement prices one provider's monthly call commitment and reports
//! the monthly and annual pay together with the effective rate per call or
//! shift, so arrangements can be compared on the same footing.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

use super::validation::ensure_non_negative;

/// Pay produced by a call arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CallPayEstimate {
    /// Pay for a typical month.
    pub monthly_pay: f64,
    /// Pay for a year.
    pub annual_pay: f64,
    /// Pay per call or shift; 0 when no calls are worked.
    pub effective_rate: f64,
}

impl CallPayEstimate {
    fn from_annual(annual_pay: f64, annual_calls: f64) -> Self {
        Self {
            monthly_pay: annual_pay / 12.0,
            annual_pay,
            effective_rate: if annual_calls > 0.0 {
                annual_pay / annual_calls
            } else {
                0.0
            },
        }
    }
}

/// A flat stipend for every weekday and weekend call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerCallStipendInput {
    /// Weekday calls per month.
    pub weekday_calls_per_month: f64,
    /// Weekend calls per month.
    pub weekend_calls_per_month: f64,
    /// Stipend per weekday call.
    pub weekday_stipend: f64,
    /// Stipend per weekend call.
    pub weekend_stipend: f64,
}

/// One rate up to a monthly threshold and another beyond it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TieredCallPayInput {
    /// Calls or shifts per month paid at the lower rate.
    pub threshold: f64,
    /// Rate for calls up to the threshold.
    pub rate_below_threshold: f64,
    /// Rate for calls beyond the threshold.
    pub rate_above_threshold: f64,
    /// Calls or shifts actually worked per month.
    pub actual_calls_or_shifts: f64,
}

/// 24-hour shift rates by day type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRateInput {
    /// Weekday 24h shifts per month.
    pub weekday_shifts_per_month: f64,
    /// Weekend 24h shifts per month.
    pub weekend_shifts_per_month: f64,
    /// Holiday 24h shifts per year.
    #[serde(default)]
    pub holidays_per_year: f64,
    /// Rate per weekday shift.
    pub weekday_rate: f64,
    /// Rate per weekend shift.
    pub weekend_rate: f64,
    /// Rate per holiday shift.
    #[serde(default)]
    pub holiday_rate: f64,
}

/// A fixed annual stipend for carrying call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualStipendInput {
    /// The yearly stipend.
    pub annual_stipend: f64,
    /// Expected calls or shifts per month, used for the effective rate.
    #[serde(default)]
    pub expected_calls_per_month: f64,
}

/// Prices calls at a per-call stipend.
///
/// # Example
///
/// ```
/// use comp_engine::calculation::{calculate_per_call_stipend, PerCallStipendInput};
///
/// let estimate = calculate_per_call_stipend(&PerCallStipendInput {
///     weekday_calls_per_month: 10.0,
///     weekend_calls_per_month: 5.0,
///     weekday_stipend: 500.0,
///     weekend_stipend: 750.0,
/// })
/// .unwrap();
///
/// assert_eq!(estimate.monthly_pay, 8750.0);
/// assert_eq!(estimate.annual_pay, 105_000.0);
/// ```
pub fn calculate_per_call_stipend(input: &PerCallStipendInput) -> EngineResult<CallPayEstimate> {
    ensure_non_negative("weekday_calls_per_month", input.weekday_calls_per_month)?;
    ensure_non_negative("weekend_calls_per_month", input.weekend_calls_per_month)?;
    ensure_non_negative("weekday_stipend", input.weekday_stipend)?;
    ensure_non_negative("weekend_stipend", input.weekend_stipend)?;

    let monthly_pay = input.weekday_calls_per_month * input.weekday_stipend
        + input.weekend_calls_per_month * input.weekend_stipend;
    let monthly_calls = input.weekday_calls_per_month + input.weekend_calls_per_month;

    Ok(CallPayEstimate::from_annual(
        monthly_pay * 12.0,
        monthly_calls * 12.0,
    ))
}

/// Prices calls at one rate up to a monthly threshold and another above it.
pub fn calculate_tiered_call_pay(input: &TieredCallPayInput) -> EngineResult<CallPayEstimate> {
    ensure_non_negative("threshold", input.threshold)?;
    ensure_non_negative("rate_below_threshold", input.rate_below_threshold)?;
    ensure_non_negative("rate_above_threshold", input.rate_above_threshold)?;
    ensure_non_negative("actual_calls_or_shifts", input.actual_calls_or_shifts)?;

    let below = input.actual_calls_or_shifts.min(input.threshold);
    let above = (input.actual_calls_or_shifts - input.threshold).max(0.0);
    let monthly_pay = below * input.rate_below_threshold + above * input.rate_above_threshold;

    Ok(CallPayEstimate::from_annual(
        monthly_pay * 12.0,
        input.actual_calls_or_shifts * 12.0,
    ))
}

/// Prices 24-hour shifts at weekday, weekend, and holiday rates.
pub fn calculate_daily_rate_pay(input: &DailyRateInput) -> EngineResult<CallPayEstimate> {
    ensure_non_negative("weekday_shifts_per_month", input.weekday_shifts_per_month)?;
    ensure_non_negative("weekend_shifts_per_month", input.weekend_shifts_per_month)?;
    ensure_non_negative("holidays_per_year", input.holidays_per_year)?;
    ensure_non_negative("weekday_rate", input.weekday_rate)?;
    ensure_non_negative("weekend_rate", input.weekend_rate)?;
    ensure_non_negative("holiday_rate", input.holiday_rate)?;

    let annual_pay = (input.weekday_shifts_per_month * input.weekday_rate
        + input.weekend_shifts_per_month * input.weekend_rate)
        * 12.0
        + input.holidays_per_year * input.holiday_rate;
    let annual_shifts = (input.weekday_shifts_per_month + input.weekend_shifts_per_month) * 12.0
        + input.holidays_per_year;

    Ok(CallPayEstimate::from_annual(annual_pay, annual_shifts))
}

/// Spreads a fixed annual stipend over the expected call volume.
pub fn calculate_annual_stipend(input: &AnnualStipendInput) -> EngineResult<CallPayEstimate> {
    ensure_non_negative("annual_stipend", input.annual_stipend)?;
    ensure_non_negative("expected_calls_per_month", input.expected_calls_per_month)?;

    Ok(CallPayEstimate::from_annual(
        input.annual_stipend,
        input.expected_calls_per_month * 12.0,
    ))
}
