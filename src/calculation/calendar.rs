//! Calendar capacity for call planning.
//!
//! Counts the weekdays and weekend days in a plan year so call assumptions
//! can be checked against the days actually available.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::CallAssumptions;

/// Weekdays in a typical year.
pub const DEFAULT_WEEKDAYS_PER_YEAR: u32 = 261;

/// Weekend days in a typical year.
pub const DEFAULT_WEEKEND_DAYS_PER_YEAR: u32 = 104;

/// Weekday and weekend-day counts for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCapacity {
    /// Monday through Friday.
    pub weekdays: u32,
    /// Saturdays and Sundays.
    pub weekend_days: u32,
}

impl Default for YearCapacity {
    fn default() -> Self {
        Self {
            weekdays: DEFAULT_WEEKDAYS_PER_YEAR,
            weekend_days: DEFAULT_WEEKEND_DAYS_PER_YEAR,
        }
    }
}

impl YearCapacity {
    /// Counts the days of a calendar year.
    ///
    /// Returns `None` for years outside chrono's supported range.
    ///
    /// # Example
    ///
    /// ```
    /// use comp_engine::calculation::YearCapacity;
    ///
    /// // 2024 is a leap year starting on a Monday.
    /// let capacity = YearCapacity::for_year(2024).unwrap();
    /// assert_eq!(capacity.weekdays, 262);
    /// assert_eq!(capacity.weekend_days, 104);
    /// ```
    pub fn for_year(year: i32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let mut capacity = Self {
            weekdays: 0,
            weekend_days: 0,
        };

        for day in first.iter_days().take_while(|d| d.year() == year) {
            match day.weekday() {
                Weekday::Sat | Weekday::Sun => capacity.weekend_days += 1,
                _ => capacity.weekdays += 1,
            }
        }

        Some(capacity)
    }

    /// Capacity for the assumptions' plan year, or the typical year.
    pub fn for_assumptions(assumptions: &CallAssumptions) -> Self {
        assumptions
            .plan_year
            .and_then(Self::for_year)
            .unwrap_or_default()
    }

    /// Average weekdays per month.
    pub fn weekdays_per_month(&self) -> f64 {
        f64::from(self.weekdays) / 12.0
    }

    /// Average weekend days per month.
    pub fn weekend_days_per_month(&self) -> f64 {
        f64::from(self.weekend_days) / 12.0
    }
}

/// Advisory warnings for monthly call volumes the calendar cannot hold.
///
/// `label` names the source of the volumes (e.g. a tier) in the message.
pub fn capacity_warnings(label: &str, assumptions: &CallAssumptions) -> Vec<String> {
    let capacity = YearCapacity::for_assumptions(assumptions);
    let mut warnings = Vec::new();

    if assumptions.weekday_calls_per_month > capacity.weekdays_per_month() {
        warnings.push(format!(
            "{}: weekday calls ({}) exceed typical weekdays per month ({:.1})",
            label,
            assumptions.weekday_calls_per_month,
            capacity.weekdays_per_month()
        ));
    }
    if assumptions.weekend_calls_per_month > capacity.weekend_days_per_month() {
        warnings.push(format!(
            "{}: weekend calls ({}) exceed typical weekend days per month ({:.1})",
            label,
            assumptions.weekend_calls_per_month,
            capacity.weekend_days_per_month()
        ));
    }

    warnings
}
