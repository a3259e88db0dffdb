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

//! Console progress line and the append-only event log.

use std::io::{self, Write};
use std::path::PathBuf;

use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};

use crate::attribute::ValueWidth;
use crate::counters::RunCounters;
use crate::error::{PollError, Result};
use crate::policy::HaltReason;

/// One anomaly worth a stanza in the event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    Failure {
        iteration: u64,
        value: i64,
        timeouts: u32,
    },
    Timeout {
        iteration: u64,
        seed: i64,
        timeouts: u32,
        os_error: Option<i32>,
    },
}

impl LogEvent {
    pub fn render(&self, width: ValueWidth) -> String {
        match self {
            LogEvent::Failure { iteration, value, timeouts } => format!(
                "spi read8 failure event:\n - iterations : {}\n - value read : {}\n - timeouts   : {}\n",
                iteration,
                width.display(*value),
                timeouts
            ),
            LogEvent::Timeout { iteration, seed, timeouts, os_error } => {
                let error = match os_error {
                    Some(code) => code.to_string(),
                    None => "none".to_string(),
                };
                format!(
                    "spi read8 timeout event:\n - iterations : {}\n - value read : {} (not obtained)\n - timeouts   : {}\n - error      : {}\n",
                    iteration, seed, timeouts, error
                )
            }
        }
    }
}

pub fn format_progress(counters: &RunCounters, secs: u64) -> String {
    format!(
        "reads: {:010}, timeouts: {:04}, errors: {:04}, secs: {:04}",
        counters.iterations, counters.timeouts, counters.errors, secs
    )
}

/// Writes the live progress line to `console` and event stanzas to `log`.
///
/// Every log write is flushed before returning so an external `tail` always
/// sees the last completed sample.
pub struct Reporter<C: Write, L: Write> {
    console: C,
    log: L,
    log_path: PathBuf,
    width: ValueWidth,
}

impl<C: Write, L: Write> Reporter<C, L> {
    pub fn new(console: C, log: L, log_path: PathBuf, width: ValueWidth) -> Self {
        Self { console, log, log_path, width }
    }

    /// Redraw the progress line in place. Console failures are ignored.
    pub fn progress(&mut self, counters: &RunCounters) {
        let line = format_progress(counters, counters.elapsed_secs());
        let _ = queue!(
            self.console,
            Print(line),
            Clear(ClearType::UntilNewLine),
            MoveToColumn(0)
        );
        let _ = self.console.flush();
    }

    pub fn event(&mut self, event: &LogEvent) -> Result<()> {
        let stanza = event.render(self.width);
        self.write_log(&stanza)
    }

    pub fn stopping(&mut self, reason: HaltReason) -> Result<()> {
        let _ = write!(self.console, "\nstopping on {}!\n", reason.as_str());
        let _ = self.console.flush();
        self.write_log(&format!("stopping on {}\n", reason.as_str()))
    }

    /// Move the console past the progress line at the end of a bounded run.
    pub fn finish(&mut self) {
        let _ = writeln!(self.console);
        let _ = self.console.flush();
    }

    fn write_log(&mut self, text: &str) -> Result<()> {
        self.log
            .write_all(text.as_bytes())
            .and_then(|_| self.log.flush())
            .map_err(|source| self.log_error(source))
    }

    fn log_error(&self, source: io::Error) -> PollError {
        PollError::LogWrite { path: self.log_path.clone(), source }
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn log(&self) -> &L {
        &self.log
    }
}
