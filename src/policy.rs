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

//! Stop policy: decides after every sample whether the run goes on.

use serde::Serialize;

use crate::attribute::SampleOutcome;
use crate::error::codes;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StopPolicy {
    pub stop_on_errors: bool,
    pub stop_on_timeouts: bool,
    /// ORed with both of the above.
    pub stop_on_all: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HaltReason {
    Error,
    Timeout,
}

impl HaltReason {
    pub fn as_str(self) -> &'static str {
        match self {
            HaltReason::Error => "error",
            HaltReason::Timeout => "timeout",
        }
    }

    pub fn exit_code(self) -> i32 {
        codes::IO_FAILURE
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunState {
    Running,
    Halted(HaltReason),
}

impl StopPolicy {
    pub fn halts_on_errors(&self) -> bool {
        self.stop_on_errors || self.stop_on_all
    }

    pub fn halts_on_timeouts(&self) -> bool {
        self.stop_on_timeouts || self.stop_on_all
    }

    pub fn decide(&self, outcome: &SampleOutcome) -> RunState {
        match outcome {
            SampleOutcome::UnexpectedValue(_) if self.halts_on_errors() => {
                RunState::Halted(HaltReason::Error)
            }
            SampleOutcome::Unreadable(_) if self.halts_on_timeouts() => {
                RunState::Halted(HaltReason::Timeout)
            }
            _ => RunState::Running,
        }
    }
}

impl RunState {
    /// `Halted` is terminal; `Running` moves per the policy.
    pub fn next(self, outcome: &SampleOutcome, policy: &StopPolicy) -> RunState {
        match self {
            RunState::Running => policy.decide(outcome),
            halted @ RunState::Halted(_) => halted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNEXPECTED: SampleOutcome = SampleOutcome::UnexpectedValue(1);
    const UNREADABLE: SampleOutcome = SampleOutcome::Unreadable(None);
    const SUCCESS: SampleOutcome = SampleOutcome::Success(0);

    fn policy(e: bool, t: bool, a: bool) -> StopPolicy {
        StopPolicy { stop_on_errors: e, stop_on_timeouts: t, stop_on_all: a }
    }

    #[test]
    fn test_no_flags_never_halts() {
        let p = StopPolicy::default();
        assert!(!p.halts_on_errors() && !p.halts_on_timeouts());
        for o in [UNEXPECTED, UNREADABLE, SUCCESS] {
            assert_eq!(p.decide(&o), RunState::Running);
        }
    }

    #[test]
    fn test_stop_on_errors_ignores_timeouts() {
        let p = policy(true, false, false);
        assert_eq!(p.decide(&UNEXPECTED), RunState::Halted(HaltReason::Error));
        assert_eq!(p.decide(&UNREADABLE), RunState::Running);
        assert_eq!(p.decide(&SUCCESS), RunState::Running);
    }

    #[test]
    fn test_stop_on_timeouts_ignores_errors() {
        let p = policy(false, true, false);
        assert_eq!(p.decide(&UNREADABLE), RunState::Halted(HaltReason::Timeout));
        assert_eq!(p.decide(&UNEXPECTED), RunState::Running);
    }

    #[test]
    fn test_stop_on_all() {
        let p = policy(false, false, true);
        assert_eq!(p.decide(&UNEXPECTED), RunState::Halted(HaltReason::Error));
        assert_eq!(p.decide(&UNREADABLE), RunState::Halted(HaltReason::Timeout));
        assert_eq!(p.decide(&SUCCESS), RunState::Running);
    }

    #[test]
    fn test_halted_is_terminal() {
        let p = StopPolicy::default();
        let halted = RunState::Halted(HaltReason::Timeout);
        assert_eq!(halted.next(&SUCCESS, &p), halted);
        assert_eq!(RunState::Running.next(&UNEXPECTED, &policy(true, false, false)),
                   RunState::Halted(HaltReason::Error));
    }

    #[test]
    fn test_halt_exit_code_is_io_failure() {
        assert_eq!(HaltReason::Error.exit_code(), codes::IO_FAILURE);
        assert_eq!(HaltReason::Timeout.exit_code(), codes::IO_FAILURE);
        assert_eq!(HaltReason::Error.as_str(), "error");
    }
}
