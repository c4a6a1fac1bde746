//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll rule
//! sets from YAML files.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::PayrollPeriod;

use super::types::{PayrollConfig, RegimeConfig, RegimeMetadata};

/// Loads and provides access to payroll configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory,
/// validates every snapshot, and selects the snapshot in force for a date.
///
/// # Directory Structure
///
/// ```text
/// config/indonesia/
/// ├── regime.yaml          # Rule-set metadata
/// └── rates/
///     └── 2024-01-01.yaml  # Full snapshot effective from this date
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/indonesia").unwrap();
///
/// let date = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
/// let snapshot = loader.snapshot_for(date).unwrap();
/// println!("Health cap: {}", snapshot.contribution_rates.health_max_salary);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: RegimeConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/indonesia")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any snapshot fails validation (`InvalidConfig`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let regime_path = path.join("regime.yaml");
        let metadata = Self::load_yaml::<RegimeMetadata>(&regime_path)?;

        let rates_dir = path.join("rates");
        let snapshots = Self::load_snapshots(&rates_dir)?;

        for snapshot in &snapshots {
            snapshot.validate()?;
        }

        info!(
            regime = %metadata.code,
            version = %metadata.version,
            snapshots = snapshots.len(),
            "Loaded payroll configuration"
        );

        Ok(Self {
            config: RegimeConfig::new(metadata, snapshots),
        })
    }

    /// Creates a loader from already-built snapshots, validating each one.
    pub fn from_snapshots(
        metadata: RegimeMetadata,
        snapshots: Vec<PayrollConfig>,
    ) -> EngineResult<Self> {
        if snapshots.is_empty() {
            return Err(EngineError::InvalidConfig {
                field: "snapshots".to_string(),
                message: "at least one snapshot is required".to_string(),
            });
        }
        for snapshot in &snapshots {
            snapshot.validate()?;
        }
        Ok(Self {
            config: RegimeConfig::new(metadata, snapshots),
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

    /// Loads all snapshot files from the rates directory.
    fn load_snapshots(rates_dir: &Path) -> EngineResult<Vec<PayrollConfig>> {
        let rates_dir_str = rates_dir.display().to_string();

        let entries = fs::read_dir(rates_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rates_dir_str.clone(),
        })?;

        let mut snapshots = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rates_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                snapshots.push(Self::load_yaml::<PayrollConfig>(&path)?);
            }
        }

        if snapshots.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate files found)", rates_dir_str),
            });
        }

        Ok(snapshots)
    }

    /// Returns the underlying rule set.
    pub fn config(&self) -> &RegimeConfig {
        &self.config
    }

    /// Returns the rule-set metadata.
    pub fn metadata(&self) -> &RegimeMetadata {
        self.config.metadata()
    }

    /// Gets the snapshot in force on a given date.
    ///
    /// The most recent snapshot effective on or before the date wins.
    ///
    /// # Returns
    ///
    /// Returns `SnapshotNotFound` if every snapshot starts after `date`.
    pub fn snapshot_for(&self, date: NaiveDate) -> EngineResult<&PayrollConfig> {
        self.config
            .snapshots()
            .iter()
            .rfind(|snapshot| snapshot.effective_date <= date)
            .ok_or(EngineError::SnapshotNotFound { date })
    }

    /// Gets the snapshot in force on the first day of a payroll period.
    pub fn snapshot_for_period(&self, period: &PayrollPeriod) -> EngineResult<&PayrollConfig> {
        self.snapshot_for(period.start_date()?)
    }
}
