//! On-call program, roster, and budget result models.

use serde::{Deserialize, Serialize};

use super::{AuditStep, EvaluationInput};

/// An on-call coverage program for one provider group.
///
/// # Example
///
/// ```
/// use comp_engine::models::CallProgram;
///
/// let json = r#"{
///     "id": "peds-call",
///     "name": "Pediatric hospitalist call",
///     "specialty": "Pediatrics",
///     "coverage_type": "In-house",
///     "rotation_ratio": 4
/// }"#;
/// let program: CallProgram = serde_json::from_str(json).unwrap();
/// assert_eq!(program.rotation_ratio, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallProgram {
    /// Unique identifier for the program.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Specialty covered, used to find an FMV benchmark.
    pub specialty: String,
    /// Coverage arrangement, used to find an FMV benchmark.
    pub coverage_type: String,
    /// The "1 in N" rotation: each provider covers 1/N of all calls.
    pub rotation_ratio: u32,
}

impl CallProgram {
    /// Builds the FMV evaluation input for this program's effective per-24h rate.
    pub fn fmv_input(&self, budget: &BudgetResult, burden_score: Option<f64>) -> EvaluationInput {
        EvaluationInput {
            specialty: self.specialty.clone(),
            coverage_type: self.coverage_type.clone(),
            observed_value: budget.effective_per_24h,
            burden_score,
        }
    }
}

/// A provider on the call roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallProvider {
    /// Unique identifier for the provider.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Clinical FTE in `(0, 1]`.
    pub fte: f64,
    /// Whether the provider takes call.
    pub eligible_for_call: bool,
    /// The call tier the provider is assigned to.
    pub tier_id: String,
}

/// Pay rates for a call tier, per call or 24h shift.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CallRates {
    /// Rate for a weekday call.
    pub weekday: f64,
    /// Rate for a weekend call.
    pub weekend: f64,
    /// Rate for a holiday call.
    pub holiday: f64,
}

/// Per-tier overrides of the program-level burden assumptions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TierBurden {
    /// Overrides [`CallAssumptions::weekday_calls_per_month`].
    #[serde(default)]
    pub weekday_calls_per_month: Option<f64>,
    /// Overrides [`CallAssumptions::weekend_calls_per_month`].
    #[serde(default)]
    pub weekend_calls_per_month: Option<f64>,
    /// Overrides [`CallAssumptions::holidays_per_year`].
    #[serde(default)]
    pub holidays_per_year: Option<f64>,
}

impl TierBurden {
    /// Applies the overrides on top of the program-level assumptions.
    pub fn resolve(&self, assumptions: &CallAssumptions) -> CallAssumptions {
        CallAssumptions {
            weekday_calls_per_month: self
                .weekday_calls_per_month
                .unwrap_or(assumptions.weekday_calls_per_month),
            weekend_calls_per_month: self
                .weekend_calls_per_month
                .unwrap_or(assumptions.weekend_calls_per_month),
            holidays_per_year: self.holidays_per_year.unwrap_or(assumptions.holidays_per_year),
            plan_year: assumptions.plan_year,
        }
    }
}

/// A call tier (e.g. primary, backup).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallTier {
    /// Unique identifier for the tier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Disabled tiers contribute nothing to the budget.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Pay rates.
    pub rates: CallRates,
    /// Burden overrides for this tier.
    #[serde(default)]
    pub burden: TierBurden,
}

fn default_enabled() -> bool {
    true
}

/// Group-level call volume assumptions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CallAssumptions {
    /// Weekday calls or shifts the group covers per month.
    pub weekday_calls_per_month: f64,
    /// Weekend calls or shifts the group covers per month.
    pub weekend_calls_per_month: f64,
    /// Holiday calls or shifts the group covers per year.
    pub holidays_per_year: f64,
    /// Calendar year used to count available weekdays and weekend days.
    #[serde(default)]
    pub plan_year: Option<i32>,
}

/// Budget contribution of one enabled tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierBudgetLine {
    /// The tier.
    pub tier_id: String,
    /// Weekday calls per provider per month.
    pub weekday_calls_per_provider: f64,
    /// Weekend calls per provider per month.
    pub weekend_calls_per_provider: f64,
    /// Holiday calls per provider per year.
    pub holidays_per_provider: f64,
    /// Annual pay one provider earns from this tier.
    pub annual_pay_per_provider: f64,
    /// Calls or shifts the whole group covers in this tier per year.
    pub annual_group_calls: f64,
}

/// Annual call pay for one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderPay {
    /// The provider.
    pub provider_id: String,
    /// The provider's assigned tier.
    pub tier_id: String,
    /// The provider's FTE.
    pub fte: f64,
    /// Whether the provider takes call.
    pub eligible_for_call: bool,
    /// Annual call pay; 0 for ineligible providers.
    pub annual_pay: f64,
}

/// The annual call budget for a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetResult {
    /// Total annual call pay across eligible providers.
    pub total_annual_call_budget: f64,
    /// Budget divided by eligible FTE.
    pub call_pay_per_fte: f64,
    /// Budget divided by all calls or shifts covered in the year.
    pub effective_per_24h: f64,
    /// Per-provider annual pay, in roster order.
    pub per_provider: Vec<ProviderPay>,
    /// Per-tier breakdown, in tier order.
    pub tier_lines: Vec<TierBudgetLine>,
    /// Advisory warnings that did not block the calculation.
    pub warnings: Vec<String>,
    /// Audit steps documenting the calculation.
    pub audit_steps: Vec<AuditStep>,
}

/// Expected annual call load allocated to one eligible provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderBurden {
    /// The provider.
    pub provider_id: String,
    /// The provider's FTE.
    pub fte: f64,
    /// The provider's share of total eligible FTE.
    pub fte_share: f64,
    /// Calls or shifts allocated per month.
    pub monthly_calls: f64,
    /// Calls or shifts allocated per year.
    pub annual_calls: f64,
}

/// Dispersion of allocated call load across a provider group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FairnessSummary {
    /// Mean annual calls per provider.
    pub group_average_calls: f64,
    /// Fewest annual calls allocated to any provider.
    pub min_calls: f64,
    /// Most annual calls allocated to any provider.
    pub max_calls: f64,
    /// Population standard deviation of annual calls.
    pub standard_deviation: f64,
    /// 0-100; 100 means perfectly even.
    pub fairness_score: f64,
}
