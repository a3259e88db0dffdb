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

//! The poll loop: read, classify, account, report, decide.

use std::io::Write;

use crate::attribute::{AttributeDescriptor, SampleOutcome};
use crate::counters::RunCounters;
use crate::error::Result;
use crate::policy::{HaltReason, RunState, StopPolicy};
use crate::report::Reporter;
use crate::source::SampleSource;

/// How a run that did not hit a fatal error ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunExit {
    Halted(HaltReason),
    /// The configured read limit was reached.
    Completed,
}

pub struct Monitor<S: SampleSource, C: Write, L: Write> {
    attribute: &'static AttributeDescriptor,
    policy: StopPolicy,
    source: S,
    reporter: Reporter<C, L>,
    counters: RunCounters,
    state: RunState,
    max_reads: Option<u64>,
}

impl<S: SampleSource, C: Write, L: Write> Monitor<S, C, L> {
    pub fn new(
        attribute: &'static AttributeDescriptor,
        policy: StopPolicy,
        source: S,
        reporter: Reporter<C, L>,
    ) -> Self {
        Self {
            attribute,
            policy,
            source,
            reporter,
            counters: RunCounters::new(),
            state: RunState::Running,
            max_reads: None,
        }
    }

    pub fn with_max_reads(mut self, max_reads: Option<u64>) -> Self {
        self.max_reads = max_reads;
        self
    }

    /// One sample. A source `Err` is fatal and is returned before any
    /// accounting happens for this pass.
    pub fn step(&mut self) -> Result<RunState> {
        if let RunState::Halted(_) = self.state {
            return Ok(self.state);
        }

        let reading = self.source.sample()?;
        let outcome = self.attribute.outcome(reading);
        self.apply(&outcome)?;
        Ok(self.state)
    }

    fn apply(&mut self, outcome: &SampleOutcome) -> Result<()> {
        let event = self.counters.record(outcome, self.attribute.seed);
        self.reporter.progress(&self.counters);
        if let Some(event) = event {
            self.reporter.event(&event)?;
        }

        self.state = self.state.next(outcome, &self.policy);
        if let RunState::Halted(reason) = self.state {
            self.reporter.stopping(reason)?;
        }
        Ok(())
    }

    /// Sample until the policy halts the run or the read limit is reached.
    ///
    /// A fatal source error returns immediately: no final log entry is
    /// written and the log is left as of the last completed sample.
    pub fn run(&mut self) -> Result<RunExit> {
        loop {
            if self.max_reads.is_some_and(|max| self.counters.iterations >= max) {
                self.reporter.finish();
                return Ok(RunExit::Completed);
            }
            if let RunState::Halted(reason) = self.step()? {
                return Ok(RunExit::Halted(reason));
            }
        }
    }

    pub fn counters(&self) -> &RunCounters {
        &self.counters
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn reporter(&self) -> &Reporter<C, L> {
        &self.reporter
    }
}
