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

//! tpmpoll - long-running stress poller for TPM sysfs status attributes
//!
//! Repeatedly samples one scalar from a driver status file, classifies every
//! sample as success, unexpected value or unreadable, keeps running totals and
//! halts only when the configured stop policy says so.

pub mod attribute;
pub mod cli;
pub mod config;
pub mod counters;
pub mod error;
pub mod logger;
pub mod monitor;
pub mod policy;
pub mod report;
pub mod source;

#[cfg(test)]
pub mod test_utils;
