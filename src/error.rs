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

//! Errors that end a run, and the exit statuses they map to.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Exit statuses as seen by the shell. The negative errno values the tool
/// reports are truncated to the low byte by the OS.
pub mod codes {
    pub const SUCCESS: i32 = 0;
    /// Source or log file could not be opened (`-EINVAL`).
    pub const INVALID: i32 = -libc::EINVAL & 0xff;
    /// Halted by the stop policy, or the event log became unwritable (`-EIO`).
    pub const IO_FAILURE: i32 = -libc::EIO & 0xff;
}

#[derive(Error, Debug)]
pub enum PollError {
    #[error("cannot open monitored source {path}: {source}")]
    SourceOpen {
        path: PathBuf,
        source: io::Error,
    },
    #[error("cannot create log file {path}: {source}")]
    LogOpen {
        path: PathBuf,
        source: io::Error,
    },
    #[error("cannot write log file {path}: {source}")]
    LogWrite {
        path: PathBuf,
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PollError>;

pub fn exit_code(error: &PollError) -> i32 {
    match error {
        PollError::SourceOpen { .. } | PollError::LogOpen { .. } => codes::INVALID,
        PollError::LogWrite { .. } => codes::IO_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_err() -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, "test")
    }

    #[test]
    fn test_codes_match_truncated_errno() {
        assert_eq!(codes::INVALID, 256 - libc::EINVAL);
        assert_eq!(codes::IO_FAILURE, 256 - libc::EIO);
        assert_ne!(codes::INVALID, codes::IO_FAILURE);
    }

    #[test]
    fn test_exit_code_open_failures() {
        let e = PollError::SourceOpen { path: "/sys/x".into(), source: io_err() };
        assert_eq!(exit_code(&e), codes::INVALID);
        let e = PollError::LogOpen { path: "/tmp/x".into(), source: io_err() };
        assert_eq!(exit_code(&e), codes::INVALID);
    }

    #[test]
    fn test_exit_code_log_write() {
        let e = PollError::LogWrite { path: "/tmp/x".into(), source: io_err() };
        assert_eq!(exit_code(&e), codes::IO_FAILURE);
    }

    #[test]
    fn test_error_display() {
        let e = PollError::SourceOpen { path: "/sys/class/tpm/tpm0/owned".into(), source: io_err() };
        assert_eq!(
            e.to_string(),
            "cannot open monitored source /sys/class/tpm/tpm0/owned: test"
        );
    }
}
