//! PPh 21 income tax calculation.
//!
//! This module annualises a monthly salary, applies the occupational cost,
//! employee BPJS and PTKP deductions, runs the progressive brackets and
//! converts the yearly tax back into a monthly withholding.

use rust_decimal::Decimal;

use crate::config::{OccupationalCost, PtkpTable, TaxBracket};
use crate::error::EngineResult;
use crate::models::{CalculationStep, ContributionResult, PtkpStatus, TaxResult};

use super::round_money;
use super::rounding::checked;

/// Months in a tax year.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Calculates monthly PPh 21 withholding.
///
/// Employer-paid BPJS is added to the taxable base as a benefit. Only the
/// employee's JHT and JP contributions are deductible; the employee's Health
/// contribution is not. Taxable income (PKP) is clamped at zero.
///
/// # Arguments
///
/// * `gross_monthly` - Monthly gross salary
/// * `ptkp_status` - The employee's taxpayer status
/// * `contributions` - The BPJS result for the same gross salary
/// * `occupational_cost` - Occupational cost rate and monthly cap
/// * `ptkp_table` - PTKP thresholds
/// * `brackets` - Progressive brackets, validated and ascending
///
/// # Returns
///
/// Returns the full [`TaxResult`], `PtkpStatusNotFound` if the table has
/// no threshold for `ptkp_status`, or `CalculationError` if annualising
/// overflows.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{calculate_contributions, calculate_income_tax};
/// use payroll_engine::config::PayrollConfig;
/// use payroll_engine::models::PtkpStatus;
/// use rust_decimal::Decimal;
///
/// let config = PayrollConfig::reference();
/// let gross = Decimal::from(10_000_000);
/// let bpjs = calculate_contributions(gross, true, true, &config.contribution_rates);
/// let tax = calculate_income_tax(
///     gross,
///     PtkpStatus::Tk0,
///     &bpjs,
///     &config.occupational_cost,
///     &config.ptkp,
///     &config.tax_brackets,
/// )
/// .unwrap();
///
/// assert_eq!(tax.pkp_yearly, Decimal::from(68_688_000));
/// assert_eq!(tax.tax_monthly, Decimal::from(358_600));
/// ```
pub fn calculate_income_tax(
    gross_monthly: Decimal,
    ptkp_status: PtkpStatus,
    contributions: &ContributionResult,
    occupational_cost: &OccupationalCost,
    ptkp_table: &PtkpTable,
    brackets: &[TaxBracket],
) -> EngineResult<TaxResult> {
    let months = Decimal::from(MONTHS_PER_YEAR);

    let gross_yearly = checked(gross_monthly.checked_mul(months), "gross_yearly")?;
    let employer_bpjs_yearly = checked(
        contributions
            .total_employer_contribution
            .checked_mul(months),
        "employer_bpjs_yearly",
    )?;
    let taxable_base = checked(
        gross_yearly.checked_add(employer_bpjs_yearly),
        "taxable_base",
    )?;

    let occupational_cost_monthly = checked(
        gross_monthly.checked_mul(occupational_cost.rate),
        "occupational_cost_monthly",
    )?
    .min(occupational_cost.monthly_cap);
    let occupational_cost_yearly = checked(
        occupational_cost_monthly.checked_mul(months),
        "occupational_cost_yearly",
    )?;

    let employee_bpjs_deduction_yearly = checked(
        contributions
            .tax_deductible_employee_contribution()
            .checked_mul(months),
        "employee_bpjs_deduction_yearly",
    )?;

    let net_before_ptkp_yearly = checked(
        taxable_base
            .checked_sub(occupational_cost_yearly)
            .and_then(|base| base.checked_sub(employee_bpjs_deduction_yearly)),
        "net_before_ptkp_yearly",
    )?;

    let ptkp_amount = ptkp_table.amount_for(ptkp_status)?;
    let pkp_yearly = checked(
        net_before_ptkp_yearly.checked_sub(ptkp_amount),
        "pkp_yearly",
    )?
    .max(Decimal::ZERO);

    let tax_yearly = progressive_tax(pkp_yearly, brackets);
    let tax_monthly = round_money(tax_yearly / months);

    Ok(TaxResult {
        gross_yearly,
        employer_bpjs_yearly,
        occupational_cost_monthly,
        occupational_cost_yearly,
        employee_bpjs_deduction_yearly,
        net_before_ptkp_yearly,
        ptkp_amount,
        pkp_yearly,
        tax_yearly,
        tax_monthly,
    })
}

/// Applies progressive brackets to yearly taxable income.
///
/// Brackets are walked in ascending order; each taxes the part of the
/// remaining income that fits inside its width. The sum is rounded once at
/// the end. Income of zero or less yields zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::progressive_tax;
/// use payroll_engine::config::PayrollConfig;
/// use rust_decimal::Decimal;
///
/// let brackets = PayrollConfig::reference().tax_brackets;
///
/// // 60,000,000 x 5% + 40,000,000 x 15%
/// assert_eq!(progressive_tax(Decimal::from(100_000_000), &brackets), Decimal::from(9_000_000));
/// assert_eq!(progressive_tax(Decimal::ZERO, &brackets), Decimal::ZERO);
/// ```
pub fn progressive_tax(taxable_income: Decimal, brackets: &[TaxBracket]) -> Decimal {
    let mut remaining = taxable_income.max(Decimal::ZERO);
    let mut tax = Decimal::ZERO;

    for bracket in brackets {
        if remaining <= Decimal::ZERO {
            break;
        }

        let portion = match bracket.max {
            Some(max) => remaining.min(max - bracket.min),
            None => remaining,
        };

        tax += portion * bracket.rate;
        remaining -= portion;
    }

    round_money(tax)
}

/// Builds the calculation step describing the PPh 21 derivation.
pub fn tax_step(ptkp_status: PtkpStatus, tax: &TaxResult, step_number: u32) -> CalculationStep {
    CalculationStep {
        step_number,
        rule_id: "pph21".to_string(),
        label: "PPh 21".to_string(),
        formula: "round(progressive_tax(max(0, gross_yearly + employer_bpjs_yearly \
                  - occupational_cost_yearly - employee_bpjs_deduction_yearly - ptkp)) / 12)"
            .to_string(),
        inputs: serde_json::json!({
            "ptkp_status": ptkp_status.code(),
            "gross_yearly": tax.gross_yearly.normalize().to_string(),
            "employer_bpjs_yearly": tax.employer_bpjs_yearly.normalize().to_string(),
            "occupational_cost_yearly": tax.occupational_cost_yearly.normalize().to_string(),
            "employee_bpjs_deduction_yearly": tax.employee_bpjs_deduction_yearly.normalize().to_string(),
            "net_before_ptkp_yearly": tax.net_before_ptkp_yearly.normalize().to_string(),
            "ptkp_amount": tax.ptkp_amount.normalize().to_string(),
            "pkp_yearly": tax.pkp_yearly.normalize().to_string(),
            "tax_yearly": tax.tax_yearly.normalize().to_string()
        }),
        result: tax.tax_monthly,
        reasoning: format!(
            "PKP {} = max(0, {} - PTKP {} ({})); yearly tax {} / 12 = {}",
            tax.pkp_yearly.normalize(),
            tax.net_before_ptkp_yearly.normalize(),
            tax.ptkp_amount.normalize(),
            ptkp_status,
            tax.tax_yearly.normalize(),
            tax.tax_monthly
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::calculate_contributions;
    use crate::config::PayrollConfig;
    use crate::error::EngineError;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tax_for(gross: &str, status: PtkpStatus, health: bool, manpower: bool) -> TaxResult {
        let config = PayrollConfig::reference();
        let gross = dec(gross);
        let bpjs = calculate_contributions(gross, health, manpower, &config.contribution_rates);
        calculate_income_tax(
            gross,
            status,
            &bpjs,
            &config.occupational_cost,
            &config.ptkp,
            &config.tax_brackets,
        )
        .unwrap()
    }

    /// PPH-001: canonical 10,000,000 TK/0 fixture
    #[test]
    fn test_canonical_fixture() {
        let tax = tax_for("10000000", PtkpStatus::Tk0, true, true);

        assert_eq!(tax.gross_yearly, dec("120000000"));
        assert_eq!(tax.employer_bpjs_yearly, dec("12288000"));
        assert_eq!(tax.occupational_cost_monthly, dec("500000"));
        assert_eq!(tax.occupational_cost_yearly, dec("6000000"));
        assert_eq!(tax.employee_bpjs_deduction_yearly, dec("3600000"));
        assert_eq!(tax.net_before_ptkp_yearly, dec("122688000"));
        assert_eq!(tax.ptkp_amount, dec("54000000"));
        assert_eq!(tax.pkp_yearly, dec("68688000"));
        // 60,000,000 x 5% + 8,688,000 x 15% = 3,000,000 + 1,303,200
        assert_eq!(tax.tax_yearly, dec("4303200"));
        assert_eq!(tax.tax_monthly, dec("358600"));
    }

    /// PPH-002: zero salary
    #[test]
    fn test_zero_salary_yields_zero_tax() {
        let tax = tax_for("0", PtkpStatus::Tk0, true, true);
        assert_eq!(tax.pkp_yearly, Decimal::ZERO);
        assert_eq!(tax.tax_yearly, Decimal::ZERO);
        assert_eq!(tax.tax_monthly, Decimal::ZERO);
    }

    /// PPH-003: income below PTKP clamps to zero
    #[test]
    fn test_income_below_ptkp_clamps_to_zero() {
        let tax = tax_for("4000000", PtkpStatus::K3, true, true);

        assert!(tax.net_before_ptkp_yearly <= tax.ptkp_amount);
        assert_eq!(tax.pkp_yearly, Decimal::ZERO);
        assert_eq!(tax.tax_monthly, Decimal::ZERO);
    }

    /// PPH-004: occupational cost below cap
    #[test]
    fn test_occupational_cost_below_cap_uses_rate() {
        let tax = tax_for("6000000", PtkpStatus::Tk0, true, true);
        assert_eq!(tax.occupational_cost_monthly, dec("300000"));
        assert_eq!(tax.occupational_cost_yearly, dec("3600000"));
    }

    /// PPH-005: health contribution is not deductible
    #[test]
    fn test_health_contribution_is_not_deducted() {
        let with_health = tax_for("10000000", PtkpStatus::Tk0, true, true);
        assert_eq!(with_health.employee_bpjs_deduction_yearly, dec("3600000"));

        let without_manpower = tax_for("10000000", PtkpStatus::Tk0, true, false);
        assert_eq!(without_manpower.employee_bpjs_deduction_yearly, Decimal::ZERO);
    }

    /// PPH-006: larger dependents reduce PKP
    #[test]
    fn test_married_with_dependents_uses_larger_ptkp() {
        let single = tax_for("10000000", PtkpStatus::Tk0, true, true);
        let family = tax_for("10000000", PtkpStatus::K3, true, true);

        assert_eq!(family.ptkp_amount, dec("72000000"));
        assert_eq!(family.pkp_yearly, dec("50688000"));
        // 50,688,000 x 5% = 2,534,400 -> 211,200 per month
        assert_eq!(family.tax_yearly, dec("2534400"));
        assert_eq!(family.tax_monthly, dec("211200"));
        assert!(family.tax_monthly < single.tax_monthly);
    }

    #[test]
    fn test_missing_ptkp_entry_returns_error() {
        let config = PayrollConfig::reference();
        let table = PtkpTable::new([(PtkpStatus::Tk0, dec("54000000"))]);
        let bpjs = ContributionResult::default();

        let result = calculate_income_tax(
            dec("5000000"),
            PtkpStatus::K1,
            &bpjs,
            &config.occupational_cost,
            &table,
            &config.tax_brackets,
        );

        match result {
            Err(EngineError::PtkpStatusNotFound { status }) => assert_eq!(status, "K/1"),
            other => panic!("Expected PtkpStatusNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_annualising_huge_salary_returns_error() {
        let config = PayrollConfig::reference();
        let result = calculate_income_tax(
            Decimal::MAX,
            PtkpStatus::Tk0,
            &ContributionResult::default(),
            &config.occupational_cost,
            &config.ptkp,
            &config.tax_brackets,
        );

        match result {
            Err(EngineError::CalculationError { message }) => {
                assert!(message.contains("gross_yearly"))
            }
            other => panic!("Expected CalculationError, got {:?}", other),
        }
    }

    #[test]
    fn test_progressive_tax_spans_all_brackets() {
        let brackets = PayrollConfig::reference().tax_brackets;
        // 3,000,000 + 28,500,000 + 62,500,000 + 1,350,000,000 + 350,000,000
        let tax = progressive_tax(dec("6000000000"), &brackets);
        assert_eq!(tax, dec("1794000000"));
    }

    #[test]
    fn test_progressive_tax_rounds_once_at_end() {
        let brackets = vec![
            TaxBracket {
                min: Decimal::ZERO,
                max: Some(dec("3")),
                rate: dec("0.25"),
            },
            TaxBracket {
                min: dec("3"),
                max: None,
                rate: dec("0.25"),
            },
        ];
        // 0.75 + 0.5 = 1.25 -> 1; rounding per bracket would give 1 + 1 = 2.
        assert_eq!(progressive_tax(dec("5"), &brackets), dec("1"));
        assert_eq!(progressive_tax(dec("6"), &brackets), dec("2"));
    }

    #[test]
    fn test_progressive_tax_of_negative_income_is_zero() {
        let brackets = PayrollConfig::reference().tax_brackets;
        assert_eq!(progressive_tax(dec("-1000"), &brackets), Decimal::ZERO);
    }

    #[test]
    fn test_tax_step_records_derivation() {
        let tax = tax_for("10000000", PtkpStatus::Tk0, true, true);
        let step = tax_step(PtkpStatus::Tk0, &tax, 3);

        assert_eq!(step.step_number, 3);
        assert_eq!(step.rule_id, "pph21");
        assert_eq!(step.result, dec("358600"));
        assert_eq!(step.inputs["pkp_yearly"].as_str().unwrap(), "68688000");
        assert_eq!(step.inputs["ptkp_status"].as_str().unwrap(), "TK/0");
        assert!(step.reasoning.contains("TK/0"));
    }

    proptest! {
        #[test]
        fn prop_tax_is_monotonic_in_pkp(a in 0i64..10_000_000_000, b in 0i64..10_000_000_000) {
            let brackets = PayrollConfig::reference().tax_brackets;
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                progressive_tax(Decimal::from(low), &brackets)
                    <= progressive_tax(Decimal::from(high), &brackets)
            );
        }

        #[test]
        fn prop_tax_is_continuous_at_boundaries(index in 1usize..5) {
            let brackets = PayrollConfig::reference().tax_brackets;
            let boundary = brackets[index].min;
            let below = progressive_tax(boundary - Decimal::ONE, &brackets);
            let at = progressive_tax(boundary, &brackets);
            // One Rupiah of income can add at most one Rupiah of tax (rates <= 100%).
            prop_assert!(at - below <= Decimal::ONE);
            prop_assert!(at >= below);
        }

        #[test]
        fn prop_income_below_ptkp_pays_no_tax(gross in 0i64..4_000_000) {
            let tax = tax_for(&gross.to_string(), PtkpStatus::Tk0, true, true);
            prop_assert_eq!(tax.pkp_yearly, Decimal::ZERO);
            prop_assert_eq!(tax.tax_monthly, Decimal::ZERO);
        }
    }
}
