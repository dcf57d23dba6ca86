//! Configuration loading and management for the compensation engine.
//!
//! This module provides functionality to load the engine policy and the
//! market benchmark catalog from YAML files. The engine functions take these
//! values as explicit parameters; nothing here is global state.
//!
//! # Example
//!
//! ```no_run
//! use comp_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("High risk above p{}", config.policy().fmv.high_above);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{BenchmarkCatalog, BenchmarkFile, CallWarningPolicy, EnginePolicy, FmvPolicy};
