//! Compensation benchmarking and call-pay budget engine
//!
//! This crate places provider compensation against quartile market
//! benchmarks, classifies fair-market-value risk, evaluates conversion-factor
//! productivity models, and budgets on-call pay with a workload fairness score.
//!
//! Every calculation is a pure function over immutable inputs. Benchmark
//! catalogs and policy thresholds are loaded from YAML by [`config::ConfigLoader`]
//! or built in code.
//!
//! # Example
//!
//! ```
//! use comp_engine::calculation::evaluate_fmv;
//! use comp_engine::config::FmvPolicy;
//! use comp_engine::models::{Benchmark, EvaluationInput, RiskLevel};
//!
//! let benchmarks = vec![Benchmark {
//!     id: "ped-inhouse-2024".to_string(),
//!     specialty: "Pediatrics".to_string(),
//!     coverage_type: "In-house".to_string(),
//!     source: "MGMA".to_string(),
//!     survey_year: Some(2024),
//!     p25: Some(1200.0),
//!     p50: 1500.0,
//!     p75: Some(1900.0),
//!     p90: Some(2400.0),
//! }];
//! let input = EvaluationInput {
//!     specialty: "Pediatrics".to_string(),
//!     coverage_type: "In-house".to_string(),
//!     observed_value: 1500.0,
//!     burden_score: None,
//! };
//!
//! let result = evaluate_fmv(&input, &benchmarks, &FmvPolicy::default()).unwrap();
//! assert_eq!(result.percentile_estimate, Some(50.0));
//! assert_eq!(result.risk_level, RiskLevel::Low);
//! ```

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
