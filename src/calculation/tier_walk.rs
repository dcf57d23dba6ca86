//! Marginal-bracket evaluation.
//!
//! Works like a progressive tax table: each bracket pays its own conversion
//! factor only on the wRVUs that fall inside it, and the open-ended top
//! bracket absorbs whatever remains.

use crate::models::{BoundedTier, BracketLine};

/// Splits `wrvus` across the brackets and prices each slice.
///
/// `bounded` thresholds must already be expressed in wRVUs. A threshold that
/// does not exceed the previous one yields an empty bracket rather than a
/// negative one.
///
/// # Example
///
/// ```
/// use comp_engine::calculation::marginal_brackets;
/// use comp_engine::models::BoundedTier;
///
/// let lines = marginal_brackets(
///     5000.0,
///     &[BoundedTier { threshold: 4000.0, cf: 45.0 }],
///     55.0,
/// );
///
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines[0].dollars, 180_000.0);
/// assert_eq!(lines[1].wrvus, 1000.0);
/// assert_eq!(lines[1].dollars, 55_000.0);
/// ```
pub fn marginal_brackets(wrvus: f64, bounded: &[BoundedTier], final_cf: f64) -> Vec<BracketLine> {
    let mut lines = Vec::with_capacity(bounded.len() + 1);
    let mut lower = 0.0_f64;
    let mut remaining = wrvus.max(0.0);

    for (tier_index, tier) in bounded.iter().enumerate() {
        let upper = tier.threshold.max(lower);
        let paid = remaining.min(upper - lower);

        lines.push(BracketLine {
            tier_index,
            lower_bound: lower,
            upper_bound: Some(upper),
            wrvus: paid,
            cf: tier.cf,
            dollars: paid * tier.cf,
        });

        remaining -= paid;
        lower = upper;
    }

    lines.push(BracketLine {
        tier_index: bounded.len(),
        lower_bound: lower,
        upper_bound: None,
        wrvus: remaining,
        cf: final_cf,
        dollars: remaining * final_cf,
    });

    lines
}
