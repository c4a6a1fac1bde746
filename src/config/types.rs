//! Configuration types for payroll calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, and the validation that
//! rejects a malformed rule set before any employee is calculated.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::PtkpStatus;

/// Metadata about the rule set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeMetadata {
    /// Short code of the rule set (e.g., "ID-PPH21-TER").
    pub code: String,
    /// The human-readable name of the rule set.
    pub name: String,
    /// The version of the rule set.
    pub version: String,
    /// URL to the governing regulation.
    pub source_url: String,
}

/// An employee/employer rate pair for one BPJS program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatePair {
    /// Share paid by the employee.
    pub employee: Decimal,
    /// Share paid by the employer.
    pub employer: Decimal,
}

/// BPJS contribution rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRates {
    /// BPJS Kesehatan rates.
    pub health: RatePair,
    /// Salary ceiling for the Health contribution base.
    pub health_max_salary: Decimal,
    /// Jaminan Hari Tua rates.
    pub jht: RatePair,
    /// Jaminan Pensiun rates.
    pub jp: RatePair,
    /// Jaminan Kecelakaan Kerja rate, employer only.
    pub jkk: Decimal,
    /// Jaminan Kematian rate, employer only.
    pub jkm: Decimal,
}

/// The occupational cost (biaya jabatan) deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupationalCost {
    /// Share of monthly gross salary.
    pub rate: Decimal,
    /// Maximum monthly deduction.
    pub monthly_cap: Decimal,
}

/// Yearly non-taxable income (PTKP) per taxpayer status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PtkpTable(BTreeMap<PtkpStatus, Decimal>);

impl PtkpTable {
    /// Creates a table from status/threshold pairs.
    pub fn new(entries: impl IntoIterator<Item = (PtkpStatus, Decimal)>) -> Self {
        Self(entries.into_iter().collect())
    }

    /// Looks up the yearly threshold for a status.
    pub fn amount_for(&self, status: PtkpStatus) -> EngineResult<Decimal> {
        self.0
            .get(&status)
            .copied()
            .ok_or_else(|| EngineError::PtkpStatusNotFound {
                status: status.to_string(),
            })
    }

    /// Iterates over all entries in status order.
    pub fn iter(&self) -> impl Iterator<Item = (&PtkpStatus, &Decimal)> {
        self.0.iter()
    }
}

/// One progressive tax bracket covering `[min, max)`.
///
/// `max` is `None` for the final, unbounded bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Lower bound of yearly taxable income (inclusive).
    pub min: Decimal,
    /// Upper bound of yearly taxable income (exclusive); `None` if unbounded.
    #[serde(default)]
    pub max: Option<Decimal>,
    /// Marginal rate for income inside the bracket.
    pub rate: Decimal,
}

/// A complete rule-set snapshot, effective from a given date.
///
/// A snapshot is read-only for the duration of a payroll run and can be shared
/// across concurrent calculations by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollConfig {
    /// The first date these figures apply to.
    pub effective_date: NaiveDate,
    /// BPJS contribution rates.
    pub contribution_rates: ContributionRates,
    /// Occupational cost deduction.
    pub occupational_cost: OccupationalCost,
    /// PTKP thresholds.
    pub ptkp: PtkpTable,
    /// Progressive PPh 21 brackets, ascending.
    pub tax_brackets: Vec<TaxBracket>,
}

impl PayrollConfig {
    /// The published 2024 Indonesian figures.
    ///
    /// This is a named reference value for tests, tooling and seeding
    /// configuration stores. The calculators never fall back to it.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::config::PayrollConfig;
    ///
    /// let config = PayrollConfig::reference();
    /// assert!(config.validate().is_ok());
    /// assert_eq!(config.tax_brackets.len(), 5);
    /// ```
    pub fn reference() -> Self {
        let rate = |units: i64, scale: u32| Decimal::new(units, scale);

        Self {
            effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            contribution_rates: ContributionRates {
                health: RatePair {
                    employee: rate(1, 2),
                    employer: rate(4, 2),
                },
                health_max_salary: Decimal::from(12_000_000),
                jht: RatePair {
                    employee: rate(2, 2),
                    employer: rate(37, 3),
                },
                jp: RatePair {
                    employee: rate(1, 2),
                    employer: rate(2, 2),
                },
                jkk: rate(24, 4),
                jkm: rate(30, 4),
            },
            occupational_cost: OccupationalCost {
                rate: rate(5, 2),
                monthly_cap: Decimal::from(500_000),
            },
            ptkp: PtkpTable::new([
                (PtkpStatus::Tk0, Decimal::from(54_000_000)),
                (PtkpStatus::Tk1, Decimal::from(58_500_000)),
                (PtkpStatus::Tk2, Decimal::from(63_000_000)),
                (PtkpStatus::Tk3, Decimal::from(67_500_000)),
                (PtkpStatus::K0, Decimal::from(58_500_000)),
                (PtkpStatus::K1, Decimal::from(63_000_000)),
                (PtkpStatus::K2, Decimal::from(67_500_000)),
                (PtkpStatus::K3, Decimal::from(72_000_000)),
            ]),
            tax_brackets: vec![
                TaxBracket {
                    min: Decimal::ZERO,
                    max: Some(Decimal::from(60_000_000)),
                    rate: rate(5, 2),
                },
                TaxBracket {
                    min: Decimal::from(60_000_000),
                    max: Some(Decimal::from(250_000_000)),
                    rate: rate(15, 2),
                },
                TaxBracket {
                    min: Decimal::from(250_000_000),
                    max: Some(Decimal::from(500_000_000)),
                    rate: rate(25, 2),
                },
                TaxBracket {
                    min: Decimal::from(500_000_000),
                    max: Some(Decimal::from(5_000_000_000_i64)),
                    rate: rate(30, 2),
                },
                TaxBracket {
                    min: Decimal::from(5_000_000_000_i64),
                    max: None,
                    rate: rate(35, 2),
                },
            ],
        }
    }

    /// Checks that every rate, cap, threshold and bracket is usable.
    ///
    /// # Returns
    ///
    /// Returns `InvalidConfig` naming the first offending field if:
    /// - any rate is outside `[0, 1]`
    /// - any cap or PTKP threshold is negative
    /// - the PTKP table is missing one of the eight statuses
    /// - the brackets are empty, do not start at 0, leave a gap or overlap,
    ///   or do not end with a single unbounded bracket
    pub fn validate(&self) -> EngineResult<()> {
        let rates = &self.contribution_rates;
        check_rate("contribution_rates.health.employee", rates.health.employee)?;
        check_rate("contribution_rates.health.employer", rates.health.employer)?;
        check_rate("contribution_rates.jht.employee", rates.jht.employee)?;
        check_rate("contribution_rates.jht.employer", rates.jht.employer)?;
        check_rate("contribution_rates.jp.employee", rates.jp.employee)?;
        check_rate("contribution_rates.jp.employer", rates.jp.employer)?;
        check_rate("contribution_rates.jkk", rates.jkk)?;
        check_rate("contribution_rates.jkm", rates.jkm)?;
        check_non_negative(
            "contribution_rates.health_max_salary",
            rates.health_max_salary,
        )?;

        check_rate("occupational_cost.rate", self.occupational_cost.rate)?;
        check_non_negative(
            "occupational_cost.monthly_cap",
            self.occupational_cost.monthly_cap,
        )?;

        for status in PtkpStatus::ALL {
            let field = format!("ptkp.{}", status);
            let amount = self.ptkp.amount_for(status).map_err(|_| invalid(&field, "missing"))?;
            check_non_negative(&field, amount)?;
        }

        validate_brackets(&self.tax_brackets)
    }
}

fn validate_brackets(brackets: &[TaxBracket]) -> EngineResult<()> {
    let Some(first) = brackets.first() else {
        return Err(invalid("tax_brackets", "at least one bracket is required"));
    };
    if first.min != Decimal::ZERO {
        return Err(invalid("tax_brackets[0].min", "first bracket must start at 0"));
    }

    let last_index = brackets.len() - 1;
    for (i, bracket) in brackets.iter().enumerate() {
        check_rate(&format!("tax_brackets[{}].rate", i), bracket.rate)?;

        match bracket.max {
            Some(max) => {
                if max <= bracket.min {
                    return Err(invalid(
                        &format!("tax_brackets[{}].max", i),
                        &format!("must be greater than min {}", bracket.min),
                    ));
                }
                let Some(next) = brackets.get(i + 1) else {
                    return Err(invalid(
                        &format!("tax_brackets[{}].max", i),
                        "final bracket must be unbounded",
                    ));
                };
                if next.min != max {
                    return Err(invalid(
                        &format!("tax_brackets[{}].min", i + 1),
                        &format!("must equal previous bracket max {}", max),
                    ));
                }
            }
            None if i != last_index => {
                return Err(invalid(
                    &format!("tax_brackets[{}].max", i),
                    "only the final bracket may be unbounded",
                ));
            }
            None => {}
        }
    }

    Ok(())
}

fn check_rate(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(invalid(field, &format!("rate {} must be between 0 and 1", value)));
    }
    Ok(())
}

fn check_non_negative(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(invalid(field, &format!("{} cannot be negative", value)));
    }
    Ok(())
}

fn invalid(field: &str, message: &str) -> EngineError {
    EngineError::InvalidConfig {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// The complete rule set loaded from a configuration directory.
///
/// Holds every snapshot, sorted oldest first.
#[derive(Debug, Clone)]
pub struct RegimeConfig {
    metadata: RegimeMetadata,
    snapshots: Vec<PayrollConfig>,
}

impl RegimeConfig {
    /// Creates a new RegimeConfig, sorting snapshots by effective date.
    pub fn new(metadata: RegimeMetadata, snapshots: Vec<PayrollConfig>) -> Self {
        let mut sorted = snapshots;
        sorted.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
        Self {
            metadata,
            snapshots: sorted,
        }
    }

    /// Returns the rule-set metadata.
    pub fn metadata(&self) -> &RegimeMetadata {
        &self.metadata
    }

    /// Returns all snapshots, oldest first.
    pub fn snapshots(&self) -> &[PayrollConfig] {
        &self.snapshots
    }
}
