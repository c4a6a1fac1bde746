//! Single-employee payroll calculation.
//!
//! This module assembles gross salary from salary components and variable
//! pay, runs the BPJS and PPh 21 calculators, and derives net salary with a
//! four-step calculation trail.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CalculationStep, ComponentType, Employee, PayrollCalculationResult, SalaryComponent,
    VariableComponents,
};

use super::rounding::checked;
use super::{calculate_contributions, calculate_income_tax, contribution_step, tax_step};

/// Calculates one employee's payroll for one period.
///
/// Gross salary is the sum of active basic salary and fixed allowance
/// components plus bonus, overtime pay and other allowances. Other
/// deductions reduce net salary only. Net salary may be zero or negative;
/// flagging that is left to the batch layer.
///
/// # Arguments
///
/// * `employee` - The employee being paid
/// * `components` - The employee's salary components
/// * `variables` - Variable pay for the period
/// * `config` - The configuration snapshot in force
///
/// # Returns
///
/// Returns the [`PayrollCalculationResult`], or an error if:
/// - A component belongs to a different employee (`InvalidComponent`)
/// - A component or variable amount is negative (`InvalidComponent`)
/// - The PTKP table has no entry for the employee (`PtkpStatusNotFound`)
/// - An amount is too large to sum or annualise (`CalculationError`)
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_employee;
/// use payroll_engine::config::PayrollConfig;
/// use payroll_engine::models::{
///     ComponentType, Employee, PtkpStatus, SalaryComponent, VariableComponents,
/// };
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     name: "Budi".to_string(),
///     ptkp_status: PtkpStatus::Tk0,
///     bpjs_health_enrolled: true,
///     bpjs_manpower_enrolled: true,
/// };
/// let components = vec![SalaryComponent {
///     id: "sc_001".to_string(),
///     employee_id: "emp_001".to_string(),
///     name: "Gaji Pokok".to_string(),
///     component_type: ComponentType::BasicSalary,
///     amount: Decimal::from(10_000_000),
///     is_active: true,
/// }];
///
/// let result = calculate_employee(
///     &employee,
///     &components,
///     &VariableComponents::default(),
///     &PayrollConfig::reference(),
/// )
/// .unwrap();
///
/// assert_eq!(result.net_salary, Decimal::from(9_241_400));
/// assert_eq!(result.calculation_steps.len(), 4);
/// ```
pub fn calculate_employee(
    employee: &Employee,
    components: &[SalaryComponent],
    variables: &VariableComponents,
    config: &PayrollConfig,
) -> EngineResult<PayrollCalculationResult> {
    validate_components(employee, components)?;
    validate_variables(employee, variables)?;

    let basic_salary = sum_active(components, ComponentType::BasicSalary)?;
    let fixed_allowances = sum_active(components, ComponentType::FixedAllowance)?;
    let gross_salary = checked(
        std::iter::once(fixed_allowances)
            .chain(variables.gross_additions())
            .try_fold(basic_salary, Decimal::checked_add),
        "gross_salary",
    )?;

    let bpjs = calculate_contributions(
        gross_salary,
        employee.bpjs_health_enrolled,
        employee.bpjs_manpower_enrolled,
        &config.contribution_rates,
    );

    let tax = calculate_income_tax(
        gross_salary,
        employee.ptkp_status,
        &bpjs,
        &config.occupational_cost,
        &config.ptkp,
        &config.tax_brackets,
    )?;

    let total_deductions = checked(
        bpjs.total_employee_contribution
            .checked_add(tax.tax_monthly)
            .and_then(|sum| sum.checked_add(variables.other_deductions)),
        "total_deductions",
    )?;
    let net_salary = checked(gross_salary.checked_sub(total_deductions), "net_salary")?;

    let calculation_steps = vec![
        gross_step(basic_salary, fixed_allowances, variables, gross_salary, 1),
        contribution_step(gross_salary, &bpjs, 2),
        tax_step(employee.ptkp_status, &tax, 3),
        net_step(
            gross_salary,
            bpjs.total_employee_contribution,
            tax.tax_monthly,
            variables,
            net_salary,
            4,
        ),
    ];

    debug!(
        employee_id = %employee.id,
        gross_salary = %gross_salary,
        tax_monthly = %tax.tax_monthly,
        net_salary = %net_salary,
        "Calculated employee payroll"
    );

    Ok(PayrollCalculationResult {
        employee_id: employee.id.clone(),
        employee_name: employee.name.clone(),
        ptkp_status: employee.ptkp_status,
        basic_salary,
        fixed_allowances,
        variable_components: variables.clone(),
        gross_salary,
        bpjs,
        tax,
        total_deductions,
        net_salary,
        calculation_steps,
    })
}

fn sum_active(
    components: &[SalaryComponent],
    component_type: ComponentType,
) -> EngineResult<Decimal> {
    let total = components
        .iter()
        .filter(|c| c.contributes_to_gross() && c.component_type == component_type)
        .try_fold(Decimal::ZERO, |sum, c| sum.checked_add(c.amount));
    checked(total, "component total")
}

fn validate_components(employee: &Employee, components: &[SalaryComponent]) -> EngineResult<()> {
    for component in components {
        if component.employee_id != employee.id {
            return Err(EngineError::InvalidComponent {
                employee_id: employee.id.clone(),
                message: format!(
                    "component '{}' belongs to employee '{}'",
                    component.id, component.employee_id
                ),
            });
        }
        if component.amount < Decimal::ZERO {
            return Err(EngineError::InvalidComponent {
                employee_id: employee.id.clone(),
                message: format!(
                    "component '{}' has negative amount {}",
                    component.id, component.amount
                ),
            });
        }
    }
    Ok(())
}

fn validate_variables(employee: &Employee, variables: &VariableComponents) -> EngineResult<()> {
    let fields = [
        ("bonus", variables.bonus),
        ("overtime_pay", variables.overtime_pay),
        ("other_allowances", variables.other_allowances),
        ("other_deductions", variables.other_deductions),
    ];

    match fields.iter().find(|(_, amount)| *amount < Decimal::ZERO) {
        Some((field, amount)) => Err(EngineError::InvalidComponent {
            employee_id: employee.id.clone(),
            message: format!("variable component '{}' has negative amount {}", field, amount),
        }),
        None => Ok(()),
    }
}

fn gross_step(
    basic_salary: Decimal,
    fixed_allowances: Decimal,
    variables: &VariableComponents,
    gross_salary: Decimal,
    step_number: u32,
) -> CalculationStep {
    CalculationStep {
        step_number,
        rule_id: "gross_salary".to_string(),
        label: "Gross Salary".to_string(),
        formula: "basic_salary + fixed_allowances + bonus + overtime_pay + other_allowances"
            .to_string(),
        inputs: serde_json::json!({
            "basic_salary": basic_salary.normalize().to_string(),
            "fixed_allowances": fixed_allowances.normalize().to_string(),
            "bonus": variables.bonus.normalize().to_string(),
            "overtime_pay": variables.overtime_pay.normalize().to_string(),
            "other_allowances": variables.other_allowances.normalize().to_string()
        }),
        result: gross_salary,
        reasoning: format!(
            "Basic {} + fixed allowances {} + bonus {} + overtime {} + other allowances {} = {}",
            basic_salary.normalize(),
            fixed_allowances.normalize(),
            variables.bonus.normalize(),
            variables.overtime_pay.normalize(),
            variables.other_allowances.normalize(),
            gross_salary.normalize()
        ),
    }
}

fn net_step(
    gross_salary: Decimal,
    bpjs_employee: Decimal,
    tax_monthly: Decimal,
    variables: &VariableComponents,
    net_salary: Decimal,
    step_number: u32,
) -> CalculationStep {
    CalculationStep {
        step_number,
        rule_id: "net_salary".to_string(),
        label: "Net Salary".to_string(),
        formula: "gross_salary - (bpjs_employee + pph21_monthly + other_deductions)".to_string(),
        inputs: serde_json::json!({
            "gross_salary": gross_salary.normalize().to_string(),
            "bpjs_employee": bpjs_employee.normalize().to_string(),
            "pph21_monthly": tax_monthly.normalize().to_string(),
            "other_deductions": variables.other_deductions.normalize().to_string()
        }),
        result: net_salary,
        reasoning: format!(
            "{} - (BPJS {} + PPh 21 {} + other deductions {}) = {}",
            gross_salary.normalize(),
            bpjs_employee.normalize(),
            tax_monthly.normalize(),
            variables.other_deductions.normalize(),
            net_salary.normalize()
        ),
    }
}
