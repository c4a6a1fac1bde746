//! Response types for the payroll engine API.
//!
//! This module defines the payroll run envelope, the error response
//! structures and the mapping from engine errors to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{
    PayrollCalculationResult, PayrollIssue, PayrollPeriod, PayrollRunSummary, PayrollTotals,
};

/// Response body for the `/payroll-runs` endpoint.
///
/// Run metadata lives here only; the per-employee results it wraps are
/// deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRunResponse {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// When the run was calculated.
    pub calculated_at: DateTime<Utc>,
    /// The engine version that produced the run.
    pub engine_version: String,
    /// The month that was paid.
    pub period: PayrollPeriod,
    /// Last day of the paid month.
    pub period_end: NaiveDate,
    /// Effective date of the configuration snapshot used.
    pub config_effective_date: NaiveDate,
    /// Headline counts for the run.
    pub summary: RunSummary,
    /// Successfully calculated employees, in request order.
    pub results: Vec<PayrollCalculationResult>,
    /// Issues recorded during the run.
    pub issues: Vec<PayrollIssue>,
    /// Totals across all results.
    pub totals: PayrollTotals,
    /// Time taken in microseconds.
    pub duration_us: u64,
}

/// Headline counts for a payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Employees submitted.
    pub total_employees: usize,
    /// Employees successfully calculated.
    pub processed: usize,
    /// Number of issues recorded.
    pub issue_count: usize,
    /// Status line, e.g. "2 of 3 employees processed, 1 issues".
    pub message: String,
}

impl PayrollRunResponse {
    /// Wraps a run summary with fresh run metadata.
    pub fn new(
        summary: PayrollRunSummary,
        period: PayrollPeriod,
        period_end: NaiveDate,
        config_effective_date: NaiveDate,
        duration_us: u64,
    ) -> Self {
        let headline = RunSummary {
            total_employees: summary.total_employees,
            processed: summary.processed_count(),
            issue_count: summary.issues.len(),
            message: summary.status_message(),
        };

        Self {
            run_id: Uuid::new_v4(),
            calculated_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            period,
            period_end,
            config_effective_date,
            summary: headline,
            results: summary.results,
            issues: summary.issues,
            totals: summary.totals,
            duration_us,
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates a 400 response for a request body that could not be used.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidConfig { .. }
            | EngineError::PtkpStatusNotFound { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    message,
                ),
            },
            EngineError::SnapshotNotFound { date } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "CONFIG_NOT_EFFECTIVE",
                    message,
                    format!("No rate snapshot takes effect on or before {}", date),
                ),
            },
            EngineError::InvalidPeriod { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::validation_error(message),
            },
            EngineError::MissingBasicSalary { .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "MISSING_BASIC_SALARY",
                    message,
                    "At least one active basic_salary component is required",
                ),
            },
            EngineError::InvalidComponent { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_COMPONENT",
                    message,
                    "The salary or variable components contain invalid information",
                ),
            },
            EngineError::CalculationError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CALCULATION_ERROR",
                    "Calculation failed",
                    message,
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_missing_basic_salary_maps_to_422() {
        let response: ApiErrorResponse = EngineError::MissingBasicSalary {
            employee_id: "emp_002".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.error.code, "MISSING_BASIC_SALARY");
        assert!(response.error.message.contains("emp_002"));
    }

    #[test]
    fn test_snapshot_not_found_maps_to_config_not_effective() {
        let response: ApiErrorResponse = EngineError::SnapshotNotFound {
            date: NaiveDate::from_ymd_opt(2019, 12, 1).unwrap(),
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "CONFIG_NOT_EFFECTIVE");
    }

    #[test]
    fn test_invalid_config_maps_to_500() {
        let response: ApiErrorResponse = EngineError::InvalidConfig {
            field: "tax_brackets".to_string(),
            message: "must not be empty".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error.code, "CONFIG_ERROR");
        assert!(response.error.details.unwrap().contains("tax_brackets"));
    }

    #[test]
    fn test_invalid_period_maps_to_validation_error() {
        let response: ApiErrorResponse = EngineError::InvalidPeriod {
            year: 2024,
            month: 0,
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "VALIDATION_ERROR");
    }

    #[test]
    fn test_run_response_summarises_counts() {
        let summary = PayrollRunSummary {
            total_employees: 3,
            results: vec![],
            issues: vec![],
            totals: PayrollTotals::default(),
        };
        let response = PayrollRunResponse::new(
            summary,
            PayrollPeriod {
                year: 2024,
                month: 2,
            },
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            42,
        );

        assert_eq!(response.summary.total_employees, 3);
        assert_eq!(response.summary.processed, 0);
        assert_eq!(
            response.summary.message,
            "0 of 3 employees processed, 0 issues"
        );
        assert_eq!(response.engine_version, env!("CARGO_PKG_VERSION"));
        assert_eq!(response.period.to_string(), "2024-02");
        assert_eq!(response.period_end.to_string(), "2024-02-29");
    }
}
