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

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::attribute::ValueWidth;
use crate::error::{PollError, Result};

/// sysfs attributes never exceed one page.
const MAX_READ: u64 = 4096;

/// Raw outcome of one read, before classification.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Reading {
    Value(i64),
    /// No integer could be obtained. Carries the OS error code when the
    /// failure came from the read itself.
    Unreadable(Option<i32>),
}

/// Anything the poll loop can sample.
///
/// An `Err` is fatal for the whole run; a glitchy read must be reported as
/// `Ok(Reading::Unreadable(_))` instead.
#[cfg_attr(test, mockall::automock)]
pub trait SampleSource {
    fn sample(&mut self) -> Result<Reading>;
}

/// Reads a sysfs attribute with a fresh open/read/close on every sample.
#[derive(Debug, Clone)]
pub struct SysfsSource {
    path: PathBuf,
    width: ValueWidth,
}

impl SysfsSource {
    pub fn new<P: AsRef<Path>>(path: P, width: ValueWidth) -> Self {
        Self { path: path.as_ref().to_path_buf(), width }
    }
}

impl SampleSource for SysfsSource {
    fn sample(&mut self) -> Result<Reading> {
        // The handle is dropped at the end of this scope on every path.
        let file = File::open(&self.path).map_err(|source| PollError::SourceOpen {
            path: self.path.clone(),
            source,
        })?;
        let mut content = String::new();
        match file.take(MAX_READ).read_to_string(&mut content) {
            Ok(_) => Ok(parse_reading(&content, self.width)),
            Err(e) => Ok(Reading::Unreadable(e.raw_os_error())),
        }
    }
}

/// Parse the first whitespace-delimited token as an integer of `width`.
pub fn parse_reading(content: &str, width: ValueWidth) -> Reading {
    content
        .split_whitespace()
        .next()
        .and_then(|tok| tok.parse::<i64>().ok())
        .filter(|v| width.fits(*v))
        .map_or(Reading::Unreadable(None), Reading::Value)
}
