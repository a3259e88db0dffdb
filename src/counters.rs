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

use std::time::Instant;

use crate::attribute::SampleOutcome;
use crate::report::LogEvent;

/// Running totals for one session. Owned by the poll loop; never shared.
#[derive(Debug, Clone)]
pub struct RunCounters {
    pub iterations: u64,
    pub timeouts: u32,
    pub errors: u32,
    pub start: Instant,
}

impl RunCounters {
    pub fn new() -> Self {
        Self { iterations: 0, timeouts: 0, errors: 0, start: Instant::now() }
    }

    /// Account for one sample and return the event to log, if any.
    ///
    /// `seed` is the placeholder reported as "value read" when nothing was read.
    pub fn record(&mut self, outcome: &SampleOutcome, seed: i64) -> Option<LogEvent> {
        self.iterations = self.iterations.saturating_add(1);
        match *outcome {
            SampleOutcome::Success(_) => None,
            SampleOutcome::UnexpectedValue(value) => {
                self.errors = self.errors.saturating_add(1);
                Some(LogEvent::Failure {
                    iteration: self.iterations,
                    value,
                    timeouts: self.timeouts,
                })
            }
            SampleOutcome::Unreadable(os_error) => {
                self.timeouts = self.timeouts.saturating_add(1);
                Some(LogEvent::Timeout {
                    iteration: self.iterations,
                    seed,
                    timeouts: self.timeouts,
                    os_error,
                })
            }
        }
    }

    /// Whole seconds of wall-clock time since the run started.
    pub fn elapsed_secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }
}

impl Default for RunCounters {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_counters_are_zero() {
        let c = RunCounters::new();
        assert_eq!(c.iterations, 0);
        assert_eq!(c.timeouts, 0);
        assert_eq!(c.errors, 0);
        assert_eq!(c.elapsed_secs(), 0);
    }

    #[test]
    fn test_success_is_silent() {
        let mut c = RunCounters::new();
        assert_eq!(c.record(&SampleOutcome::Success(0), 0xDEAD), None);
        assert_eq!((c.iterations, c.timeouts, c.errors), (1, 0, 0));
    }

    #[test]
    fn test_unexpected_value_counts_error() {
        let mut c = RunCounters::new();
        c.record(&SampleOutcome::Unreadable(None), 0xDEAD);
        let event = c.record(&SampleOutcome::UnexpectedValue(5), 0xDEAD);
        assert_eq!(event, Some(LogEvent::Failure { iteration: 2, value: 5, timeouts: 1 }));
        assert_eq!((c.iterations, c.timeouts, c.errors), (2, 1, 1));
    }

    #[test]
    fn test_unreadable_counts_timeout_not_error() {
        let mut c = RunCounters::new();
        let event = c.record(&SampleOutcome::Unreadable(Some(libc::EIO)), 0xDD);
        assert_eq!(
            event,
            Some(LogEvent::Timeout { iteration: 1, seed: 0xDD, timeouts: 1, os_error: Some(libc::EIO) })
        );
        assert_eq!((c.iterations, c.timeouts, c.errors), (1, 1, 0));
    }

    #[test]
    fn test_counters_saturate() {
        let mut c = RunCounters::new();
        c.errors = u32::MAX;
        c.timeouts = u32::MAX;
        c.record(&SampleOutcome::UnexpectedValue(1), 0);
        c.record(&SampleOutcome::Unreadable(None), 0);
        assert_eq!(c.errors, u32::MAX);
        assert_eq!(c.timeouts, u32::MAX);
        assert_eq!(c.iterations, 2);
    }
}
