//! Core data models for the payroll calculation engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calculation_result;
mod employee;
mod payroll_period;
mod payroll_run;
mod salary_component;

pub use calculation_result::{
    CalculationStep, ContributionResult, PayrollCalculationResult, TaxResult,
};
pub use employee::{Employee, PtkpStatus};
pub use payroll_period::PayrollPeriod;
pub use payroll_run::{
    EmployeeOutcome, IssueKind, IssueSeverity, PayrollIssue, PayrollRunSummary, PayrollTotals,
};
pub use salary_component::{
    ComponentType, EmployeePayrollInput, SalaryComponent, VariableComponents,
};
