//! Error types for the payroll calculation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading rule sets and
//! calculating payroll.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the payroll calculation engine.
///
/// Configuration errors (`ConfigNotFound`, `ConfigParseError`, `InvalidConfig`,
/// `SnapshotNotFound`) invalidate a whole payroll run and are returned before
/// any employee is processed. The remaining variants describe a single
/// employee and are captured as issues by the batch layer.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::MissingBasicSalary {
///     employee_id: "emp_001".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Employee 'emp_001' has no active basic salary component"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value is out of range or structurally inconsistent.
    #[error("Invalid configuration '{field}': {message}")]
    InvalidConfig {
        /// The configuration field that failed validation.
        field: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// No configuration snapshot is effective on the requested date.
    #[error("No payroll configuration effective on {date}")]
    SnapshotNotFound {
        /// The date for which a snapshot was requested.
        date: NaiveDate,
    },

    /// A payroll period does not name a valid calendar month.
    #[error("Invalid payroll period {year}-{month:02}")]
    InvalidPeriod {
        /// The period's year.
        year: i32,
        /// The period's month (expected 1-12).
        month: u32,
    },

    /// The PTKP table has no threshold for a taxpayer status.
    #[error("PTKP status not found: {status}")]
    PtkpStatusNotFound {
        /// The taxpayer status code that was not found.
        status: String,
    },

    /// The employee has no active basic salary component.
    #[error("Employee '{employee_id}' has no active basic salary component")]
    MissingBasicSalary {
        /// The ID of the employee.
        employee_id: String,
    },

    /// A salary or variable component was malformed.
    #[error("Invalid component for employee '{employee_id}': {message}")]
    InvalidComponent {
        /// The ID of the employee the component was supplied for.
        employee_id: String,
        /// A description of what made the component invalid.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Returns true for errors that invalidate every result in a run.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            EngineError::ConfigNotFound { .. }
                | EngineError::ConfigParseError { .. }
                | EngineError::InvalidConfig { .. }
                | EngineError::SnapshotNotFound { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/regime.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/regime.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_config_displays_field_and_message() {
        let error = EngineError::InvalidConfig {
            field: "tax_brackets[1].min".to_string(),
            message: "must equal previous bracket max 60000000".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration 'tax_brackets[1].min': must equal previous bracket max 60000000"
        );
    }

    #[test]
    fn test_snapshot_not_found_displays_date() {
        let error = EngineError::SnapshotNotFound {
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "No payroll configuration effective on 2020-01-01"
        );
    }

    #[test]
    fn test_invalid_period_displays_year_and_month() {
        let error = EngineError::InvalidPeriod {
            year: 2024,
            month: 13,
        };
        assert_eq!(error.to_string(), "Invalid payroll period 2024-13");
    }

    #[test]
    fn test_invalid_component_displays_employee_and_message() {
        let error = EngineError::InvalidComponent {
            employee_id: "emp_002".to_string(),
            message: "amount cannot be negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid component for employee 'emp_002': amount cannot be negative"
        );
    }

    #[test]
    fn test_configuration_errors_are_classified() {
        assert!(
            EngineError::InvalidConfig {
                field: "x".to_string(),
                message: "y".to_string(),
            }
            .is_configuration_error()
        );
        assert!(
            !EngineError::MissingBasicSalary {
                employee_id: "emp_001".to_string(),
            }
            .is_configuration_error()
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_missing_basic() -> EngineResult<()> {
            Err(EngineError::MissingBasicSalary {
                employee_id: "emp_001".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_missing_basic()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
