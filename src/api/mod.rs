//! HTTP API module for the payroll engine.
//!
//! This module provides the REST API endpoints for calculating a single
//! employee's payroll and for running payroll over a batch of employees.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CalculationRequest, PayrollRunRequest};
pub use response::{ApiError, PayrollRunResponse, RunSummary};
pub use state::AppState;
