//! Payroll engine for Indonesian employees
//!
//! This crate calculates monthly BPJS social-security contributions and
//! PPh 21 income tax withholding, aggregates them into gross-to-net payroll
//! results with a step-by-step calculation trail, and runs payroll for whole
//! batches of employees.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
