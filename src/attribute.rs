/*
 * This file is part of tpmpoll.
 *
 * Copyright (C) 2025 tpmpoll contributors
 *
 * tpmpoll is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * tpmpoll is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with tpmpoll. If not, see <https://www.gnu.org/licenses/>.
 */

//! Per-attribute knowledge: where to read, what counts as a good value.
//!
//! Everything else in the crate is attribute-agnostic and takes a
//! `&'static AttributeDescriptor`.

use serde::Serialize;

use crate::source::Reading;

pub const TPM_OWNED: i64 = 0x0;

pub const TPM_IDLE: i64 = 0x80;
pub const TPM_IN_USE: i64 = 0xA0;
/// Not documented as a state, but reported by some firmware and tolerated.
pub const TPM_LEGACY: i64 = 0x01;

/// Integer width of the value exposed by the attribute.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueWidth {
    I32,
    U16,
}

impl ValueWidth {
    pub fn fits(self, value: i64) -> bool {
        match self {
            ValueWidth::I32 => i32::try_from(value).is_ok(),
            ValueWidth::U16 => u16::try_from(value).is_ok(),
        }
    }

    /// Hex digits needed to show any value of this width.
    pub fn hex_digits(self) -> usize {
        match self {
            ValueWidth::I32 => 8,
            ValueWidth::U16 => 4,
        }
    }

    /// Render as `<dec> (0x<hex>)`; negative values show their two's complement bits.
    pub fn display(self, value: i64) -> String {
        let bits = match self {
            ValueWidth::I32 => (value as i32 as u32) as u64,
            ValueWidth::U16 => (value as u16) as u64,
        };
        format!("{} (0x{:0width$x})", value, bits, width = self.hex_digits())
    }
}

#[derive(Debug)]
pub struct AttributeDescriptor {
    pub name: &'static str,
    pub source_path: &'static str,
    pub log_path: &'static str,
    pub width: ValueWidth,
    /// Reported in timeout stanzas when no value was obtained.
    pub seed: i64,
    pub expected: fn(i64) -> bool,
    pub usage: &'static [&'static str],
}

impl AttributeDescriptor {
    pub fn classify(&self, value: i64) -> SampleOutcome {
        if (self.expected)(value) {
            SampleOutcome::Success(value)
        } else {
            SampleOutcome::UnexpectedValue(value)
        }
    }

    /// Turns a raw read into the outcome of one sample.
    pub fn outcome(&self, reading: Reading) -> SampleOutcome {
        match reading {
            Reading::Value(value) => self.classify(value),
            Reading::Unreadable(os_error) => SampleOutcome::Unreadable(os_error),
        }
    }
}

/// Result of one read-and-classify pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SampleOutcome {
    Success(i64),
    UnexpectedValue(i64),
    Unreadable(Option<i32>),
}

fn owned_expected(value: i64) -> bool {
    value == TPM_OWNED
}

fn status_expected(value: i64) -> bool {
    matches!(value, TPM_IDLE | TPM_IN_USE | TPM_LEGACY)
}

pub static OWNED: AttributeDescriptor = AttributeDescriptor {
    name: "owned",
    source_path: "/sys/class/tpm/tpm0/owned",
    log_path: "/tmp/log-owned.txt",
    width: ValueWidth::I32,
    seed: 0xDEAD,
    expected: owned_expected,
    usage: &[
        "This programs read /sys/class/tpm/tpm0/owned",
        "This value will always return 0x0",
    ],
};

pub static REVID: AttributeDescriptor = AttributeDescriptor {
    name: "revid",
    source_path: "/sys/class/tpm/tpm0/revid",
    log_path: "/tmp/log-revid.txt",
    width: ValueWidth::U16,
    seed: 0xDD,
    expected: status_expected,
    usage: &[
        "This programs read /sys/class/tpm/tpm0/revid (8byte value)",
        "If the TPM is ready, this value will always return 0x80",
        "If the TPM is in use, this value will always return 0xA0",
    ],
};
