//! Core data models for the compensation engine.
//!
//! Every model here is a value object created fresh per evaluation; the
//! engine never mutates or persists them.

mod audit;
mod benchmark;
mod call_program;
mod cf_model;
mod evaluation;

pub use audit::AuditStep;
pub use benchmark::{Benchmark, GENERIC_SPECIALTY};
pub use call_program::{
    BudgetResult, CallAssumptions, CallProgram, CallProvider, CallRates, CallTier,
    FairnessSummary, ProviderBurden, ProviderPay, TierBudgetLine, TierBurden,
};
pub use cf_model::{
    BoundedTier, BracketLine, CfContext, CfEvaluation, CfModel, CfScenario, CfScenarioResult,
    FteTier, TierLadder, TierSpec, TierType,
};
pub use evaluation::{EvaluationInput, EvaluationResult, MatchKind, RiskLevel};
