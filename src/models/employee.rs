//! Employee model and related types.
//!
//! This module defines the Employee struct and the PTKP taxpayer status
//! used to select an employee's non-taxable income threshold.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The taxpayer status that determines an employee's PTKP threshold.
///
/// `TK` is unmarried (tidak kawin), `K` is married (kawin); the number is the
/// count of dependents, capped at three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PtkpStatus {
    /// Unmarried, no dependents.
    #[serde(rename = "TK/0")]
    Tk0,
    /// Unmarried, one dependent.
    #[serde(rename = "TK/1")]
    Tk1,
    /// Unmarried, two dependents.
    #[serde(rename = "TK/2")]
    Tk2,
    /// Unmarried, three dependents.
    #[serde(rename = "TK/3")]
    Tk3,
    /// Married, no dependents.
    #[serde(rename = "K/0")]
    K0,
    /// Married, one dependent.
    #[serde(rename = "K/1")]
    K1,
    /// Married, two dependents.
    #[serde(rename = "K/2")]
    K2,
    /// Married, three dependents.
    #[serde(rename = "K/3")]
    K3,
}

impl PtkpStatus {
    /// All eight statuses, in table order.
    pub const ALL: [PtkpStatus; 8] = [
        PtkpStatus::Tk0,
        PtkpStatus::Tk1,
        PtkpStatus::Tk2,
        PtkpStatus::Tk3,
        PtkpStatus::K0,
        PtkpStatus::K1,
        PtkpStatus::K2,
        PtkpStatus::K3,
    ];

    /// Returns the status code as it appears on tax forms (e.g. "TK/0").
    pub fn code(&self) -> &'static str {
        match self {
            PtkpStatus::Tk0 => "TK/0",
            PtkpStatus::Tk1 => "TK/1",
            PtkpStatus::Tk2 => "TK/2",
            PtkpStatus::Tk3 => "TK/3",
            PtkpStatus::K0 => "K/0",
            PtkpStatus::K1 => "K/1",
            PtkpStatus::K2 => "K/2",
            PtkpStatus::K3 => "K/3",
        }
    }
}

impl fmt::Display for PtkpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PtkpStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PtkpStatus::ALL
            .into_iter()
            .find(|status| status.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::PtkpStatusNotFound {
                status: s.to_string(),
            })
    }
}

/// Represents an employee whose pay is being calculated.
///
/// Employees are owned by the employee-management system; the engine only
/// reads the fields that affect tax and social-security treatment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employee's display name.
    #[serde(default)]
    pub name: String,
    /// The taxpayer status used for the PTKP lookup.
    pub ptkp_status: PtkpStatus,
    /// Whether the employee is enrolled in BPJS Kesehatan (Health).
    pub bpjs_health_enrolled: bool,
    /// Whether the employee is enrolled in BPJS Ketenagakerjaan (Manpower).
    pub bpjs_manpower_enrolled: bool,
}
