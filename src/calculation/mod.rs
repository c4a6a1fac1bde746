//! Calculation logic for the payroll engine.
//!
//! This module contains the BPJS contribution calculator, the progressive
//! PPh 21 income tax calculator, the per-employee gross-to-net aggregation,
//! and the batch layer that runs payroll for many employees in parallel.

mod batch;
mod bpjs;
mod payroll;
mod pph21;
mod rounding;

pub use batch::{calculate_batch, flag_zero_net_salary, reduce_totals, run_payroll};
pub use bpjs::{calculate_contributions, contribution_step};
pub use payroll::calculate_employee;
pub use pph21::{MONTHS_PER_YEAR, calculate_income_tax, progressive_tax, tax_step};
pub use rounding::round_money;
