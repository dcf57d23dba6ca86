//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine policy,
//! the call-pay benchmark catalog and the productivity catalog from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::Benchmark;

use super::types::{BenchmarkCatalog, BenchmarkFile, EnginePolicy};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── policy.yaml          # FMV thresholds and call warning limits
/// ├── benchmarks/
/// │   └── call_pay_2024.yaml      # call-pay records used for FMV matching
/// └── productivity/               # optional
///     └── productivity_2024.yaml  # wRVU and TCC records used by CF models
/// ```
///
/// Both directories hold `benchmarks:` lists merged in file-name order. The
/// two catalogs are kept apart so that FMV matching never falls through to a
/// wRVU or TCC curve.
///
/// # Example
///
/// ```no_run
/// use comp_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Loaded {} benchmarks", loader.catalog().len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    policy: EnginePolicy,
    catalog: BenchmarkCatalog,
    productivity: BenchmarkCatalog,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `policy.yaml` or the `benchmarks/` directory is missing
    /// - `productivity/` exists but holds no YAML files
    /// - Any file contains invalid YAML
    /// - Any policy threshold or benchmark record fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy = Self::load_yaml::<EnginePolicy>(&path.join("policy.yaml"))?;
        policy.fmv.validate()?;

        let benchmarks = Self::load_benchmarks(&path.join("benchmarks"))?;
        let catalog = BenchmarkCatalog::new(benchmarks)?;

        let productivity_dir = path.join("productivity");
        let productivity = if productivity_dir.is_dir() {
            BenchmarkCatalog::new(Self::load_benchmarks(&productivity_dir)?)?
        } else {
            BenchmarkCatalog::default()
        };

        info!(
            path = %path.display(),
            benchmarks = catalog.len(),
            productivity = productivity.len(),
            "Loaded engine configuration"
        );

        Ok(Self {
            policy,
            catalog,
            productivity,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every benchmark file in the directory, in file-name order.
    fn load_benchmarks(dir: &Path) -> EngineResult<Vec<Benchmark>> {
        let dir_str = dir.display().to_string();

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;
            let path = entry.path();
            if path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
            {
                files.push(path);
            }
        }

        if files.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no benchmark files found)", dir_str),
            });
        }

        files.sort();

        let mut benchmarks = Vec::new();
        for file in files {
            benchmarks.extend(Self::load_yaml::<BenchmarkFile>(&file)?.benchmarks);
        }
        Ok(benchmarks)
    }

    /// Returns the engine policy.
    pub fn policy(&self) -> &EnginePolicy {
        &self.policy
    }

    /// Returns the call-pay benchmark catalog used for FMV matching.
    pub fn catalog(&self) -> &BenchmarkCatalog {
        &self.catalog
    }

    /// Returns the wRVU and TCC catalog used as CF model context.
    ///
    /// Empty when the configuration has no `productivity/` directory.
    pub fn productivity_catalog(&self) -> &BenchmarkCatalog {
        &self.productivity
    }
}
