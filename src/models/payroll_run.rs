//! Payroll run models.
//!
//! This module contains the per-employee [`EmployeeOutcome`] of a batch, the
//! [`PayrollIssue`] recorded when an employee cannot be paid cleanly, and the
//! run-level [`PayrollTotals`] and [`PayrollRunSummary`].

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayrollCalculationResult;

/// The kind of issue recorded for an employee during a payroll run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// The employee has no active basic salary component and was skipped.
    MissingBasicSalary,
    /// The employee's calculation failed and was skipped.
    CalculationError,
    /// The employee was paid but the net salary is zero or negative.
    ZeroNetSalary,
}

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    /// The employee was excluded from the run.
    Error,
    /// The employee was included but needs human review.
    Warning,
}

impl IssueKind {
    /// Returns the severity of this kind of issue.
    pub fn severity(&self) -> IssueSeverity {
        match self {
            IssueKind::MissingBasicSalary | IssueKind::CalculationError => IssueSeverity::Error,
            IssueKind::ZeroNetSalary => IssueSeverity::Warning,
        }
    }
}

/// An issue recorded against one employee in a payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollIssue {
    /// The ID of the affected employee.
    pub employee_id: String,
    /// The affected employee's display name.
    pub employee_name: String,
    /// The kind of issue.
    pub kind: IssueKind,
    /// The severity derived from the kind.
    pub severity: IssueSeverity,
    /// A human-readable description.
    pub message: String,
}

impl PayrollIssue {
    /// Creates a new issue; the severity follows from `kind`.
    pub fn new(
        employee_id: impl Into<String>,
        employee_name: impl Into<String>,
        kind: IssueKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            employee_name: employee_name.into(),
            kind,
            severity: kind.severity(),
            message: message.into(),
        }
    }
}

/// The outcome of calculating one employee within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EmployeeOutcome {
    /// The calculation succeeded.
    Calculated(PayrollCalculationResult),
    /// The employee was skipped.
    Failed(PayrollIssue),
}

impl EmployeeOutcome {
    /// The ID of the employee this outcome belongs to.
    pub fn employee_id(&self) -> &str {
        match self {
            EmployeeOutcome::Calculated(result) => &result.employee_id,
            EmployeeOutcome::Failed(issue) => &issue.employee_id,
        }
    }

    /// Returns the successful result, if any.
    pub fn result(&self) -> Option<&PayrollCalculationResult> {
        match self {
            EmployeeOutcome::Calculated(result) => Some(result),
            EmployeeOutcome::Failed(_) => None,
        }
    }

    /// Returns the recorded issue, if any.
    pub fn issue(&self) -> Option<&PayrollIssue> {
        match self {
            EmployeeOutcome::Calculated(_) => None,
            EmployeeOutcome::Failed(issue) => Some(issue),
        }
    }
}

/// Run-level totals across all successfully calculated employees.
///
/// Totals form a commutative monoid under `+` with `PayrollTotals::default()`
/// as identity, so they can be reduced in any order or in parallel.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollTotals;
/// use rust_decimal::Decimal;
///
/// let a = PayrollTotals { employee_count: 1, total_gross: Decimal::from(100), ..Default::default() };
/// let b = PayrollTotals { employee_count: 2, total_gross: Decimal::from(250), ..Default::default() };
///
/// assert_eq!(a.clone() + b.clone(), b + a);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollTotals {
    /// Number of employees included.
    pub employee_count: usize,
    /// Sum of gross salaries.
    pub total_gross: Decimal,
    /// Sum of monthly PPh 21.
    pub total_tax: Decimal,
    /// Sum of employee BPJS contributions.
    pub total_bpjs_employee: Decimal,
    /// Sum of employer BPJS contributions.
    pub total_bpjs_employer: Decimal,
    /// Sum of net salaries.
    pub total_net: Decimal,
}

impl From<&PayrollCalculationResult> for PayrollTotals {
    fn from(result: &PayrollCalculationResult) -> Self {
        Self {
            employee_count: 1,
            total_gross: result.gross_salary,
            total_tax: result.tax.tax_monthly,
            total_bpjs_employee: result.bpjs.total_employee_contribution,
            total_bpjs_employer: result.bpjs.total_employer_contribution,
            total_net: result.net_salary,
        }
    }
}

impl Add for PayrollTotals {
    type Output = PayrollTotals;

    fn add(mut self, rhs: PayrollTotals) -> PayrollTotals {
        self += rhs;
        self
    }
}

impl AddAssign for PayrollTotals {
    fn add_assign(&mut self, rhs: PayrollTotals) {
        self.employee_count += rhs.employee_count;
        self.total_gross += rhs.total_gross;
        self.total_tax += rhs.total_tax;
        self.total_bpjs_employee += rhs.total_bpjs_employee;
        self.total_bpjs_employer += rhs.total_bpjs_employer;
        self.total_net += rhs.total_net;
    }
}

impl Sum for PayrollTotals {
    fn sum<I: Iterator<Item = PayrollTotals>>(iter: I) -> Self {
        iter.fold(PayrollTotals::default(), Add::add)
    }
}

/// The complete outcome of a payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRunSummary {
    /// Number of employees submitted to the run.
    pub total_employees: usize,
    /// Successful per-employee results, in input order.
    pub results: Vec<PayrollCalculationResult>,
    /// Errors for skipped employees followed by warnings for paid ones.
    pub issues: Vec<PayrollIssue>,
    /// Totals across `results`.
    pub totals: PayrollTotals,
}

impl PayrollRunSummary {
    /// Number of employees with a successful result.
    pub fn processed_count(&self) -> usize {
        self.results.len()
    }

    /// Issues that excluded an employee from the run.
    pub fn errors(&self) -> impl Iterator<Item = &PayrollIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Error)
    }

    /// Issues on employees that were still paid.
    pub fn warnings(&self) -> impl Iterator<Item = &PayrollIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Warning)
    }

    /// A one-line status such as "9 of 10 employees processed, 2 issues".
    pub fn status_message(&self) -> String {
        format!(
            "{} of {} employees processed, {} issues",
            self.processed_count(),
            self.total_employees,
            self.issues.len()
        )
    }
}
