//! Plain-language FMV narratives.
//!
//! The narrative is a deterministic template over the evaluation result, so
//! the same input always yields the same text.

use crate::models::{EvaluationInput, EvaluationResult, RiskLevel};

/// Formats an integer with its English ordinal suffix.
///
/// # Example
///
/// ```
/// use comp_engine::calculation::ordinal;
///
/// assert_eq!(ordinal(1), "1st");
/// assert_eq!(ordinal(62), "62nd");
/// assert_eq!(ordinal(113), "113th");
/// ```
pub fn ordinal(n: i64) -> String {
    let suffix = match (n.abs() % 10, n.abs() % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Builds the narrative for an FMV evaluation.
///
/// Cites the benchmark source and survey year, the rounded percentile, a
/// burden clause when a burden score was supplied, and a closing sentence
/// keyed to the final risk level.
pub fn build_narrative(result: &EvaluationResult, input: &EvaluationInput) -> String {
    let (Some(benchmark), Some(percentile)) = (&result.benchmark, result.percentile_estimate)
    else {
        let mut text = format!(
            "No direct market benchmark is available for {} ({}). Use professional judgment and supplementary market data to assess fair market value.",
            input.specialty, input.coverage_type
        );
        if let Some(burden) = input.burden_score {
            text.push_str(&format!(
                " The reported burden score of {} should factor into that judgment.",
                burden
            ));
        }
        return text;
    };

    let source = match benchmark.survey_year {
        Some(year) => format!("{} {}", benchmark.source, year),
        None => benchmark.source.clone(),
    };

    let mut sentences = vec![format!(
        "Compared with {} data for {} ({}), the observed value falls at approximately the {} percentile.",
        source,
        benchmark.specialty,
        benchmark.coverage_type,
        ordinal(percentile.round() as i64)
    )];

    if percentile < 0.0 {
        sentences.push("This is below the published benchmark range.".to_string());
    } else if percentile > 100.0 {
        sentences.push("This is above the published benchmark range.".to_string());
    }

    if let Some(burden) = input.burden_score {
        sentences.push(if result.burden_adjusted {
            format!(
                "The reported burden score of {} reflects elevated call demands, which supports pay above the market median and lowers the risk level by one step.",
                burden
            )
        } else {
            format!(
                "The reported burden score of {} was considered and does not change the assessment.",
                burden
            )
        });
    }

    sentences.push(
        match result.risk_level {
            RiskLevel::Low => "Overall, this compensation appears reasonable relative to market data.",
            RiskLevel::Moderate => {
                "Overall, this compensation may warrant additional review and documentation."
            }
            RiskLevel::High => {
                "Overall, this compensation exceeds typical market ranges and requires formal valuation before approval."
            }
        }
        .to_string(),
    );

    sentences.join(" ")
}
