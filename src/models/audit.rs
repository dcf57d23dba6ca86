//! Audit trail models.
//!
//! Engine results that are assembled from several rule applications carry
//! [`AuditStep`] records so the reporting layer can explain every figure.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
///
/// # Example
///
/// ```
/// use comp_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "cf_single".to_string(),
///     rule_name: "Single Conversion Factor".to_string(),
///     input: serde_json::json!({"wrvus": 5000.0, "cf": 50.0}),
///     output: serde_json::json!({"clinical_dollars": 250000.0}),
///     reasoning: "5000 wRVUs x $50 = $250000".to_string(),
/// };
/// assert_eq!(step.rule_id, "cf_single");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

impl AuditStep {
    /// Creates a step with the given rule identity; input/output default to `null`.
    pub fn new(step_number: u32, rule_id: &str, rule_name: &str) -> Self {
        Self {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            input: serde_json::Value::Null,
            output: serde_json::Value::Null,
            reasoning: String::new(),
        }
    }

    /// Sets the recorded input.
    pub fn with_input(mut self, input: serde_json::Value) -> Self {
        self.input = input;
        self
    }

    /// Sets the recorded output.
    pub fn with_output(mut self, output: serde_json::Value) -> Self {
        self.output = output;
        self
    }

    /// Sets the reasoning text.
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }
}
