//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{calculate_employee, run_payroll};
use crate::error::EngineError;

use super::request::{CalculationRequest, PayrollRunRequest};
use super::response::{ApiError, ApiErrorResponse, PayrollRunResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/payroll-runs", post(payroll_run_handler))
        .with_state(state)
}

/// Handler for POST /calculate endpoint.
///
/// Calculates one employee's payroll for the requested period.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let period = request.period;
    let config = match state.config().snapshot_for_period(&period) {
        Ok(config) => config,
        Err(err) => return engine_error_response(correlation_id, err),
    };

    let (input, variables) = request.into_input();
    let employee = &input.employee;
    if !input.has_active_basic_salary() {
        let err = EngineError::MissingBasicSalary {
            employee_id: employee.id.clone(),
        };
        return engine_error_response(correlation_id, err);
    }

    let start_time = Instant::now();
    match calculate_employee(employee, &input.salary_components, &variables, config) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee.id,
                period = %period,
                gross_salary = %result.gross_salary,
                net_salary = %result.net_salary,
                duration_us = start_time.elapsed().as_micros() as u64,
                "Calculation completed successfully"
            );
            json_response(StatusCode::OK, &result)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /payroll-runs endpoint.
///
/// Runs payroll for every employee in the request. Per-employee problems are
/// reported in the response's `issues`; only request and configuration
/// errors fail the whole request.
async fn payroll_run_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRunRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll run request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let period = request.period;
    let config = match state.config().snapshot_for_period(&period) {
        Ok(config) => config.clone(),
        Err(err) => return engine_error_response(correlation_id, err),
    };
    let period_end = match period.end_date() {
        Ok(date) => date,
        Err(err) => return engine_error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    let effective_date = config.effective_date;
    let run = tokio::task::spawn_blocking(move || {
        run_payroll(&request.employees, &request.variable_components, &config)
    })
    .await
    .unwrap_or_else(|err| {
        Err(EngineError::CalculationError {
            message: format!("payroll run task failed: {}", err),
        })
    });

    match run {
        Ok(summary) => {
            let duration_us = start_time.elapsed().as_micros() as u64;
            info!(
                correlation_id = %correlation_id,
                employees = summary.total_employees,
                processed = summary.processed_count(),
                issues = summary.issues.len(),
                duration_us,
                "Payroll run request completed"
            );
            let response = PayrollRunResponse::new(
                summary,
                period,
                period_end,
                effective_date,
                duration_us,
            );
            json_response(StatusCode::OK, &response)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request rejected"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, &api_error.error)
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error).into_response()
}
