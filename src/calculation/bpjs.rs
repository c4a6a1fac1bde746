//! BPJS contribution calculation.
//!
//! This module computes the employee and employer shares of BPJS Kesehatan
//! (Health) and BPJS Ketenagakerjaan (JHT, JP, JKK, JKM) for one month.

use rust_decimal::Decimal;

use crate::config::ContributionRates;
use crate::models::{CalculationStep, ContributionResult};

use super::round_money;

/// Calculates BPJS contributions for a monthly gross salary.
///
/// The Health base is capped at `rates.health_max_salary`; every other
/// program uses the full gross salary. Each of the amounts is rounded to
/// whole Rupiah on its own before the totals are summed.
///
/// # Arguments
///
/// * `gross_salary` - Monthly gross salary (non-negative)
/// * `health_enrolled` - Whether the employee participates in BPJS Kesehatan
/// * `manpower_enrolled` - Whether the employee participates in BPJS Ketenagakerjaan
/// * `rates` - The contribution rates in force
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_contributions;
/// use payroll_engine::config::PayrollConfig;
/// use rust_decimal::Decimal;
///
/// let config = PayrollConfig::reference();
/// let result = calculate_contributions(
///     Decimal::from(10_000_000),
///     true,
///     true,
///     &config.contribution_rates,
/// );
///
/// assert_eq!(result.total_employee_contribution, Decimal::from(400_000));
/// assert_eq!(result.total_employer_contribution, Decimal::from(1_024_000));
/// ```
pub fn calculate_contributions(
    gross_salary: Decimal,
    health_enrolled: bool,
    manpower_enrolled: bool,
    rates: &ContributionRates,
) -> ContributionResult {
    let (health_employee, health_employer) = if health_enrolled {
        let health_base = gross_salary.min(rates.health_max_salary);
        (
            round_money(health_base * rates.health.employee),
            round_money(health_base * rates.health.employer),
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let (jht_employee, jht_employer, jp_employee, jp_employer, jkk_employer, jkm_employer) =
        if manpower_enrolled {
            (
                round_money(gross_salary * rates.jht.employee),
                round_money(gross_salary * rates.jht.employer),
                round_money(gross_salary * rates.jp.employee),
                round_money(gross_salary * rates.jp.employer),
                round_money(gross_salary * rates.jkk),
                round_money(gross_salary * rates.jkm),
            )
        } else {
            (
                Decimal::ZERO,
                Decimal::ZERO,
                Decimal::ZERO,
                Decimal::ZERO,
                Decimal::ZERO,
                Decimal::ZERO,
            )
        };

    ContributionResult {
        health_employee,
        health_employer,
        jht_employee,
        jht_employer,
        jp_employee,
        jp_employer,
        jkk_employer,
        jkm_employer,
        total_employee_contribution: health_employee + jht_employee + jp_employee,
        total_employer_contribution: health_employer
            + jht_employer
            + jp_employer
            + jkk_employer
            + jkm_employer,
    }
}

/// Builds the calculation step describing the BPJS composition.
pub fn contribution_step(
    gross_salary: Decimal,
    contributions: &ContributionResult,
    step_number: u32,
) -> CalculationStep {
    CalculationStep {
        step_number,
        rule_id: "bpjs_contributions".to_string(),
        label: "BPJS Contributions".to_string(),
        formula: "health_employee + jht_employee + jp_employee".to_string(),
        inputs: serde_json::json!({
            "gross_salary": gross_salary.normalize().to_string(),
            "health_employee": contributions.health_employee.to_string(),
            "health_employer": contributions.health_employer.to_string(),
            "jht_employee": contributions.jht_employee.to_string(),
            "jht_employer": contributions.jht_employer.to_string(),
            "jp_employee": contributions.jp_employee.to_string(),
            "jp_employer": contributions.jp_employer.to_string(),
            "jkk_employer": contributions.jkk_employer.to_string(),
            "jkm_employer": contributions.jkm_employer.to_string(),
            "total_employer_contribution": contributions.total_employer_contribution.to_string()
        }),
        result: contributions.total_employee_contribution,
        reasoning: format!(
            "Health {} + JHT {} + JP {} = {} paid by employee; employer pays {}",
            contributions.health_employee,
            contributions.jht_employee,
            contributions.jp_employee,
            contributions.total_employee_contribution,
            contributions.total_employer_contribution
        ),
    }
}
