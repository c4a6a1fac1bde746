//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load the BPJS and PPh 21 rule set
//! from YAML files, versioned by effective date.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/indonesia").unwrap();
//! println!("Loaded rule set: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ContributionRates, OccupationalCost, PayrollConfig, PtkpTable, RatePair, RegimeConfig,
    RegimeMetadata, TaxBracket,
};
