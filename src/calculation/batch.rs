//! Payroll runs over many employees.
//!
//! Each employee is calculated independently on the rayon thread pool. A
//! failure is captured as a [`PayrollIssue`] in that employee's outcome and
//! never aborts the run. Totals are reduced in parallel.

use std::collections::HashMap;
use std::ops::Add;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    EmployeeOutcome, EmployeePayrollInput, IssueKind, PayrollCalculationResult, PayrollIssue,
    PayrollRunSummary, PayrollTotals, VariableComponents,
};

use super::calculate_employee;

/// Calculates every employee in a batch.
///
/// Employees without an active basic salary component are skipped with a
/// `missing_basic_salary` issue. Any other failure, including a panic inside
/// the arithmetic, is recorded as a `calculation_error` issue. Outcomes are
/// returned in input order. Employees absent from `variables` get zero
/// variable pay.
///
/// The configuration is not validated here; use [`run_payroll`] for the
/// fail-fast entry point.
pub fn calculate_batch(
    inputs: &[EmployeePayrollInput],
    variables: &HashMap<String, VariableComponents>,
    config: &PayrollConfig,
) -> Vec<EmployeeOutcome> {
    let no_variables = VariableComponents::default();

    inputs
        .par_iter()
        .map(|input| {
            let employee_variables = variables.get(&input.employee.id).unwrap_or(&no_variables);
            calculate_outcome(input, employee_variables, config)
        })
        .collect()
}

fn calculate_outcome(
    input: &EmployeePayrollInput,
    variables: &VariableComponents,
    config: &PayrollConfig,
) -> EmployeeOutcome {
    let employee = &input.employee;

    if !input.has_active_basic_salary() {
        let error = EngineError::MissingBasicSalary {
            employee_id: employee.id.clone(),
        };
        return EmployeeOutcome::Failed(PayrollIssue::new(
            &employee.id,
            &employee.name,
            IssueKind::MissingBasicSalary,
            error.to_string(),
        ));
    }

    // Backstop for panics the checked arithmetic does not cover.
    let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
        calculate_employee(employee, &input.salary_components, variables, config)
    }));

    let error = match attempt {
        Ok(Ok(result)) => return EmployeeOutcome::Calculated(result),
        Ok(Err(error)) => error,
        Err(payload) => EngineError::CalculationError {
            message: panic_message(payload.as_ref()),
        },
    };

    EmployeeOutcome::Failed(PayrollIssue::new(
        &employee.id,
        &employee.name,
        IssueKind::CalculationError,
        error.to_string(),
    ))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "calculation panicked".to_string()
    }
}

/// Flags every result whose net salary is zero or negative.
///
/// Flagged results remain valid and stay in the totals.
pub fn flag_zero_net_salary(results: &[PayrollCalculationResult]) -> Vec<PayrollIssue> {
    results
        .iter()
        .filter(|result| result.has_non_positive_net())
        .map(|result| {
            PayrollIssue::new(
                &result.employee_id,
                &result.employee_name,
                IssueKind::ZeroNetSalary,
                format!("Net salary is {}", result.net_salary.normalize()),
            )
        })
        .collect()
}

/// Reduces results into run totals.
///
/// The reduction is associative and commutative, so the result does not
/// depend on the order of `results`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::reduce_totals;
/// use payroll_engine::models::PayrollTotals;
///
/// assert_eq!(reduce_totals(&[]), PayrollTotals::default());
/// ```
pub fn reduce_totals(results: &[PayrollCalculationResult]) -> PayrollTotals {
    results
        .par_iter()
        .map(PayrollTotals::from)
        .reduce(PayrollTotals::default, Add::add)
}

/// Runs payroll for a whole batch of employees.
///
/// The configuration is validated before any employee is touched; an
/// invalid configuration is returned as an error. Per-employee problems are
/// collected into the summary's issues: errors for skipped employees first
/// (in input order), then `zero_net_salary` warnings.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use payroll_engine::calculation::run_payroll;
/// use payroll_engine::config::PayrollConfig;
///
/// let summary = run_payroll(&[], &HashMap::new(), &PayrollConfig::reference()).unwrap();
/// assert_eq!(summary.status_message(), "0 of 0 employees processed, 0 issues");
/// ```
pub fn run_payroll(
    inputs: &[EmployeePayrollInput],
    variables: &HashMap<String, VariableComponents>,
    config: &PayrollConfig,
) -> EngineResult<PayrollRunSummary> {
    config.validate()?;

    let start_time = Instant::now();
    info!(
        employees = inputs.len(),
        effective_date = %config.effective_date,
        "Starting payroll run"
    );

    let outcomes = calculate_batch(inputs, variables, config);

    let mut results = Vec::with_capacity(outcomes.len());
    let mut issues = Vec::new();
    for outcome in outcomes {
        match outcome {
            EmployeeOutcome::Calculated(result) => results.push(result),
            EmployeeOutcome::Failed(issue) => issues.push(issue),
        }
    }
    issues.extend(flag_zero_net_salary(&results));

    for issue in &issues {
        warn!(
            employee_id = %issue.employee_id,
            kind = ?issue.kind,
            message = %issue.message,
            "Payroll issue recorded"
        );
    }

    let totals = reduce_totals(&results);
    let summary = PayrollRunSummary {
        total_employees: inputs.len(),
        results,
        issues,
        totals,
    };

    info!(
        processed = summary.processed_count(),
        employees = summary.total_employees,
        issues = summary.issues.len(),
        total_gross = %summary.totals.total_gross,
        total_net = %summary.totals.total_net,
        duration_us = start_time.elapsed().as_micros() as u64,
        "Payroll run completed"
    );

    Ok(summary)
}
