//! Request types for the payroll engine API.
//!
//! This module defines the JSON request structures for the `/calculate` and
//! `/payroll-runs` endpoints.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{
    Employee, EmployeePayrollInput, PayrollPeriod, SalaryComponent, VariableComponents,
};

/// Request body for the `/calculate` endpoint.
///
/// Contains everything needed to calculate one employee's payroll for a
/// single month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The month being paid; selects the effective configuration.
    pub period: PayrollPeriod,
    /// The employee being paid.
    pub employee: Employee,
    /// The employee's fixed salary components.
    #[serde(default)]
    pub salary_components: Vec<SalaryComponent>,
    /// Variable pay for this month.
    #[serde(default)]
    pub variable_components: VariableComponents,
}

impl CalculationRequest {
    /// Splits the request into the batch input shape.
    pub fn into_input(self) -> (EmployeePayrollInput, VariableComponents) {
        (
            EmployeePayrollInput {
                employee: self.employee,
                salary_components: self.salary_components,
            },
            self.variable_components,
        )
    }
}

/// Request body for the `/payroll-runs` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRunRequest {
    /// The month being paid; selects the effective configuration.
    pub period: PayrollPeriod,
    /// Every employee in the run with their salary components.
    pub employees: Vec<EmployeePayrollInput>,
    /// Variable pay keyed by employee ID.
    #[serde(default)]
    pub variable_components: HashMap<String, VariableComponents>,
}
