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

use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use serde::{Serialize, Serializer};

use crate::attribute::AttributeDescriptor;
use crate::error::{PollError, Result};
use crate::policy::StopPolicy;

/// Everything a run needs, fixed before the first sample.
#[derive(Debug, Clone, Serialize)]
pub struct RunConfig {
    #[serde(serialize_with = "serialize_attribute")]
    pub attribute: &'static AttributeDescriptor,
    pub policy: StopPolicy,
    pub source_path: PathBuf,
    pub log_path: PathBuf,
    /// Stop cleanly after this many samples; unbounded when absent.
    pub max_reads: Option<u64>,
    pub diagnostics: bool,
}

fn serialize_attribute<S: Serializer>(
    attribute: &&'static AttributeDescriptor,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(attribute.name)
}

impl RunConfig {
    /// Defaults for `attribute`: its fixed paths, no stop flags.
    pub fn for_attribute(attribute: &'static AttributeDescriptor) -> Self {
        Self {
            attribute,
            policy: StopPolicy::default(),
            source_path: PathBuf::from(attribute.source_path),
            log_path: PathBuf::from(attribute.log_path),
            max_reads: None,
            diagnostics: false,
        }
    }

    /// Create (truncating) the event log for this run.
    pub fn open_log(&self) -> Result<File> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.log_path)
            .map_err(|source| PollError::LogOpen { path: self.log_path.clone(), source })
    }
}
