//! Calculation result models for the payroll engine.
//!
//! This module contains the [`PayrollCalculationResult`] type and the
//! structures it is made of: the BPJS [`ContributionResult`], the PPh 21
//! [`TaxResult`] and the [`CalculationStep`] audit trail.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PtkpStatus, VariableComponents};

/// The BPJS contributions for one employee for one month.
///
/// Every amount is rounded independently; the totals are sums of the
/// rounded amounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionResult {
    /// BPJS Kesehatan paid by the employee.
    pub health_employee: Decimal,
    /// BPJS Kesehatan paid by the employer.
    pub health_employer: Decimal,
    /// Jaminan Hari Tua (old-age savings) paid by the employee.
    pub jht_employee: Decimal,
    /// Jaminan Hari Tua paid by the employer.
    pub jht_employer: Decimal,
    /// Jaminan Pensiun (pension) paid by the employee.
    pub jp_employee: Decimal,
    /// Jaminan Pensiun paid by the employer.
    pub jp_employer: Decimal,
    /// Jaminan Kecelakaan Kerja (workplace accident), employer only.
    pub jkk_employer: Decimal,
    /// Jaminan Kematian (death benefit), employer only.
    pub jkm_employer: Decimal,
    /// Health + JHT + JP employee amounts.
    pub total_employee_contribution: Decimal,
    /// Health + JHT + JP employer amounts plus JKK and JKM.
    pub total_employer_contribution: Decimal,
}

impl ContributionResult {
    /// The employee contributions that reduce taxable income (JHT + JP).
    pub fn tax_deductible_employee_contribution(&self) -> Decimal {
        self.jht_employee + self.jp_employee
    }
}

/// The audit trail of one PPh 21 computation.
///
/// All yearly figures are the monthly figures annualised before the tax
/// brackets are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    /// Monthly gross salary times twelve.
    pub gross_yearly: Decimal,
    /// Employer-paid BPJS times twelve, added back as a taxable benefit.
    pub employer_bpjs_yearly: Decimal,
    /// Occupational cost deduction for one month, after the cap.
    pub occupational_cost_monthly: Decimal,
    /// Occupational cost deduction for the year.
    pub occupational_cost_yearly: Decimal,
    /// Employee JHT + JP contributions for the year.
    pub employee_bpjs_deduction_yearly: Decimal,
    /// Taxable base less occupational cost and employee BPJS deduction.
    pub net_before_ptkp_yearly: Decimal,
    /// The PTKP threshold for the taxpayer status.
    pub ptkp_amount: Decimal,
    /// Taxable income (PKP), never negative.
    pub pkp_yearly: Decimal,
    /// Progressive tax on PKP, rounded once.
    pub tax_yearly: Decimal,
    /// Yearly tax divided by twelve, rounded.
    pub tax_monthly: Decimal,
}

/// A single step in the calculation trail.
///
/// Each step records the formula applied, the named inputs, the resulting
/// figure and a rendered line for payslips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationStep {
    /// The sequential step number, starting at 1.
    pub step_number: u32,
    /// Stable identifier of the step (e.g. "gross_salary").
    pub rule_id: String,
    /// Human-readable label of the step.
    pub label: String,
    /// Description of the formula applied.
    pub formula: String,
    /// Named inputs as decimal strings.
    pub inputs: serde_json::Value,
    /// The figure produced by this step.
    pub result: Decimal,
    /// The step rendered as one line of text.
    pub reasoning: String,
}

/// One employee's full payroll breakdown for one period.
///
/// This is the unit persisted per employee per payroll run. It contains no
/// timestamps or generated identifiers, so identical inputs produce equal
/// results.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{
///     ContributionResult, PayrollCalculationResult, PtkpStatus, TaxResult, VariableComponents,
/// };
/// use rust_decimal::Decimal;
///
/// let result = PayrollCalculationResult {
///     employee_id: "emp_001".to_string(),
///     employee_name: "Budi".to_string(),
///     ptkp_status: PtkpStatus::Tk0,
///     basic_salary: Decimal::ZERO,
///     fixed_allowances: Decimal::ZERO,
///     variable_components: VariableComponents::default(),
///     gross_salary: Decimal::ZERO,
///     bpjs: ContributionResult::default(),
///     tax: TaxResult::default(),
///     total_deductions: Decimal::ZERO,
///     net_salary: Decimal::ZERO,
///     calculation_steps: vec![],
/// };
///
/// assert!(result.has_non_positive_net());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollCalculationResult {
    /// The ID of the employee the calculation is for.
    pub employee_id: String,
    /// The employee's display name.
    pub employee_name: String,
    /// The taxpayer status applied.
    pub ptkp_status: PtkpStatus,
    /// Sum of active basic salary components.
    pub basic_salary: Decimal,
    /// Sum of active fixed allowance components.
    pub fixed_allowances: Decimal,
    /// The variable pay supplied for this period.
    pub variable_components: VariableComponents,
    /// Basic salary + fixed allowances + bonus + overtime + other allowances.
    pub gross_salary: Decimal,
    /// BPJS contributions.
    pub bpjs: ContributionResult,
    /// PPh 21 computation.
    pub tax: TaxResult,
    /// Employee BPJS + monthly PPh 21 + other deductions.
    pub total_deductions: Decimal,
    /// Gross salary less total deductions; may be zero or negative.
    pub net_salary: Decimal,
    /// The four-step calculation trail.
    pub calculation_steps: Vec<CalculationStep>,
}

impl PayrollCalculationResult {
    /// Returns true if the net salary is zero or negative.
    pub fn has_non_positive_net(&self) -> bool {
        self.net_salary <= Decimal::ZERO
    }
}
