//! Salary component and variable pay models.
//!
//! Salary components are the recurring, persisted pay elements of an
//! employee. Variable components are supplied fresh for every payroll run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Employee;

/// The kind of a recurring salary component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    /// Basic monthly salary (gaji pokok).
    BasicSalary,
    /// Fixed monthly allowance (tunjangan tetap).
    FixedAllowance,
    /// Recurring deduction; rendered on the payslip, not used by the engine.
    Deduction,
}

/// A recurring salary component belonging to one employee.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{ComponentType, SalaryComponent};
/// use rust_decimal::Decimal;
///
/// let component = SalaryComponent {
///     id: "sc_001".to_string(),
///     employee_id: "emp_001".to_string(),
///     name: "Gaji Pokok".to_string(),
///     component_type: ComponentType::BasicSalary,
///     amount: Decimal::from(8_000_000),
///     is_active: true,
/// };
///
/// assert!(component.contributes_to_gross());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryComponent {
    /// Unique identifier for the component.
    pub id: String,
    /// The ID of the employee this component belongs to.
    pub employee_id: String,
    /// Human-readable name (e.g. "Tunjangan Transport").
    #[serde(default)]
    pub name: String,
    /// The kind of component.
    pub component_type: ComponentType,
    /// Monthly amount in Rupiah.
    pub amount: Decimal,
    /// Inactive components are ignored by every calculation.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl SalaryComponent {
    /// Returns true if this component is active and is basic salary or a fixed allowance.
    pub fn contributes_to_gross(&self) -> bool {
        self.is_active
            && matches!(
                self.component_type,
                ComponentType::BasicSalary | ComponentType::FixedAllowance
            )
    }

    /// Returns true if this component is an active basic salary component.
    pub fn is_active_basic_salary(&self) -> bool {
        self.is_active && self.component_type == ComponentType::BasicSalary
    }
}

/// Per-period variable pay for one employee.
///
/// All fields default to zero so callers only supply what applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableComponents {
    /// One-off bonus paid this period.
    #[serde(default)]
    pub bonus: Decimal,
    /// Overtime pay for this period.
    #[serde(default)]
    pub overtime_pay: Decimal,
    /// Non-recurring allowances for this period.
    #[serde(default)]
    pub other_allowances: Decimal,
    /// Non-recurring deductions; applied to net salary only, never to gross.
    #[serde(default)]
    pub other_deductions: Decimal,
}

impl VariableComponents {
    /// The variable amounts that count towards gross salary.
    pub fn gross_additions(&self) -> [Decimal; 3] {
        [self.bonus, self.overtime_pay, self.other_allowances]
    }
}

/// An employee together with their recurring salary components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePayrollInput {
    /// The employee being paid.
    pub employee: Employee,
    /// The employee's salary components (active and inactive).
    #[serde(default)]
    pub salary_components: Vec<SalaryComponent>,
}

impl EmployeePayrollInput {
    /// Returns true if at least one active basic salary component exists.
    pub fn has_active_basic_salary(&self) -> bool {
        self.salary_components
            .iter()
            .any(SalaryComponent::is_active_basic_salary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn component(component_type: ComponentType, is_active: bool) -> SalaryComponent {
        SalaryComponent {
            id: "sc_001".to_string(),
            employee_id: "emp_001".to_string(),
            name: "Component".to_string(),
            component_type,
            amount: dec("1000000"),
            is_active,
        }
    }

    #[test]
    fn test_component_type_serialization() {
        assert_eq!(
            serde_json::to_string(&ComponentType::BasicSalary).unwrap(),
            "\"basic_salary\""
        );
        assert_eq!(
            serde_json::to_string(&ComponentType::FixedAllowance).unwrap(),
            "\"fixed_allowance\""
        );
        assert_eq!(
            serde_json::to_string(&ComponentType::Deduction).unwrap(),
            "\"deduction\""
        );
    }

    #[test]
    fn test_only_active_earnings_contribute_to_gross() {
        assert!(component(ComponentType::BasicSalary, true).contributes_to_gross());
        assert!(component(ComponentType::FixedAllowance, true).contributes_to_gross());
        assert!(!component(ComponentType::Deduction, true).contributes_to_gross());
        assert!(!component(ComponentType::BasicSalary, false).contributes_to_gross());
    }

    #[test]
    fn test_is_active_defaults_to_true() {
        let json = r#"{
            "id": "sc_002",
            "employee_id": "emp_001",
            "component_type": "fixed_allowance",
            "amount": "750000"
        }"#;

        let component: SalaryComponent = serde_json::from_str(json).unwrap();
        assert!(component.is_active);
        assert_eq!(component.amount, dec("750000"));
    }

    #[test]
    fn test_variable_components_default_to_zero() {
        let variables: VariableComponents = serde_json::from_str("{}").unwrap();
        assert_eq!(variables, VariableComponents::default());
        assert_eq!(variables.gross_additions(), [Decimal::ZERO; 3]);
    }

    #[test]
    fn test_gross_additions_exclude_other_deductions() {
        let variables = VariableComponents {
            bonus: dec("500000"),
            overtime_pay: dec("250000"),
            other_allowances: dec("100000"),
            other_deductions: dec("75000"),
        };
        assert_eq!(
            variables.gross_additions(),
            [dec("500000"), dec("250000"), dec("100000")]
        );
    }
}
