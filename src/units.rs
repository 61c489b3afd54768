//! Reporting units and rounding rules
//!
//! Every value the estimator reports is converted from raw bytes into a
//! caller-chosen unit. The divisor/precision pairing is owned by this module
//! and must not be reimplemented elsewhere: MiB divides by 2^20 and keeps
//! whole numbers, GiB divides by 2^30 and keeps three decimals.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reporting unit for estimated memory values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum Unit {
    /// Mebibytes (2^20 bytes), rounded to whole numbers
    #[serde(rename = "MiB")]
    #[value(name = "MiB", alias = "mib")]
    MiB,
    /// Gibibytes (2^30 bytes), rounded to three decimals
    #[default]
    #[serde(rename = "GiB")]
    #[value(name = "GiB", alias = "gib")]
    GiB,
}

impl Unit {
    /// Bytes per unit
    pub fn divisor(self) -> f64 {
        match self {
            Unit::MiB => (1u64 << 20) as f64,
            Unit::GiB => (1u64 << 30) as f64,
        }
    }

    /// Decimal places kept after conversion
    pub fn decimals(self) -> u32 {
        match self {
            Unit::MiB => 0,
            Unit::GiB => 3,
        }
    }

    /// Convert a raw byte count into this unit and round it
    pub fn from_bytes(self, bytes: f64) -> f64 {
        round_to(bytes / self.divisor(), self.decimals())
    }

    /// Round an already-converted value to this unit's precision
    pub fn round(self, value: f64) -> f64 {
        round_to(value, self.decimals())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::MiB => write!(f, "MiB"),
            Unit::GiB => write!(f, "GiB"),
        }
    }
}

/// Round a value to a fixed number of decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
