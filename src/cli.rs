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

//! Command-line surface shared by the per-attribute binaries.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;
use serde_json::json;

use crate::attribute::AttributeDescriptor;
use crate::config::RunConfig;
use crate::error::{codes, exit_code, Result};
use crate::logger;
use crate::monitor::{Monitor, RunExit};
use crate::policy::StopPolicy;
use crate::report::Reporter;
use crate::source::SysfsSource;

/// Poll a TPM sysfs attribute and log every read anomaly.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version, args_override_self = true)]
pub struct Args {
    /// Stop on errors (unexpected values)
    #[arg(short = 'e')]
    pub stop_on_errors: bool,

    /// Stop on timeouts (unreadable samples)
    #[arg(short = 't')]
    pub stop_on_timeouts: bool,

    /// Stop on errors or timeouts
    #[arg(short = 'a')]
    pub stop_on_all: bool,

    /// Run without stopping
    #[arg(short = 'r')]
    pub run: bool,

    /// Monitored attribute path
    #[arg(long, env = "TPMPOLL_SOURCE")]
    pub source: Option<PathBuf>,

    /// Event log path (truncated at startup)
    #[arg(long, env = "TPMPOLL_LOG")]
    pub log: Option<PathBuf>,

    /// Exit normally after this many reads
    #[arg(long)]
    pub max_reads: Option<u64>,

    /// Write JSON diagnostics to /var/log/tpmpoll/events.json
    #[arg(long)]
    pub logging: bool,
}

impl Args {
    /// Whether any of `-e -t -a -r` was given. Long options alone do not count.
    pub fn has_run_option(&self) -> bool {
        self.stop_on_errors || self.stop_on_timeouts || self.stop_on_all || self.run
    }

    pub fn policy(&self) -> StopPolicy {
        StopPolicy {
            stop_on_errors: self.stop_on_errors,
            stop_on_timeouts: self.stop_on_timeouts,
            stop_on_all: self.stop_on_all,
        }
    }

    pub fn acknowledgements(&self) -> Vec<&'static str> {
        let mut lines = Vec::new();
        if self.stop_on_errors {
            lines.push("Program will stop on errors");
        }
        if self.stop_on_timeouts {
            lines.push("Program will stop on timeouts");
        }
        if self.stop_on_all {
            lines.push("Program will stop on all issues");
        }
        if self.run {
            lines.push("Program will not stop on issues");
        }
        lines
    }

    pub fn into_config(self, attribute: &'static AttributeDescriptor) -> RunConfig {
        let mut config = RunConfig::for_attribute(attribute);
        config.policy = self.policy();
        if let Some(source) = self.source {
            config.source_path = source;
        }
        if let Some(log) = self.log {
            config.log_path = log;
        }
        config.max_reads = self.max_reads;
        config.diagnostics = self.logging;
        config
    }
}

pub fn parse_from<I, T>(iter: I) -> std::result::Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Args::try_parse_from(iter)
}

pub fn write_usage<W: Write>(out: &mut W, attribute: &AttributeDescriptor) -> io::Result<()> {
    for line in attribute.usage {
        writeln!(out, "{}", line)?;
    }
    writeln!(out, "The program will log errors reading the value")?;
    writeln!(out)?;
    writeln!(out, "  tpm -[e|t|a|r]:")?;
    writeln!(out, "                e: stop on errors")?;
    writeln!(out, "                t: stop on timeouts")?;
    writeln!(out, "                a: stop on errors or timeouts")?;
    writeln!(out, "                r: run (will not stop)")?;
    writeln!(out)?;
    writeln!(out, "notice:: logs are captured to {}", attribute.log_path)?;
    out.flush()
}

/// Open the event log and poll until the run ends.
pub fn run<W: Write>(config: &RunConfig, console: W) -> Result<RunExit> {
    let log = config.open_log()?;
    let source = SysfsSource::new(&config.source_path, config.attribute.width);
    let reporter = Reporter::new(console, log, config.log_path.clone(), config.attribute.width);
    let mut monitor = Monitor::new(config.attribute, config.policy, source, reporter)
        .with_max_reads(config.max_reads);
    monitor.run()
}

/// Full program: parse `args`, run, and return the process exit status.
pub fn run_with_args<I, T, W>(attribute: &'static AttributeDescriptor, args: I, mut console: W) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
{
    let args = match parse_from(args) {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = write!(console, "{}", e.render());
            return codes::SUCCESS;
        }
        Err(_) => {
            let _ = write_usage(&mut console, attribute);
            return codes::SUCCESS;
        }
    };
    if !args.has_run_option() {
        let _ = write_usage(&mut console, attribute);
        return codes::SUCCESS;
    }

    for line in args.acknowledgements() {
        let _ = writeln!(console, "{}", line);
    }
    let config = args.into_config(attribute);
    if config.diagnostics {
        logger::init_logging();
        logger::log_event("startup", serde_json::to_value(&config).unwrap_or_default());
    }

    let diagnostics = config.diagnostics;
    match run(&config, &mut console) {
        Ok(RunExit::Completed) => {
            if diagnostics {
                logger::log_event("completed", json!({ "attribute": attribute.name }));
            }
            codes::SUCCESS
        }
        Ok(RunExit::Halted(reason)) => {
            if diagnostics {
                logger::log_event("halt", json!({ "attribute": attribute.name, "reason": reason }));
            }
            reason.exit_code()
        }
        Err(e) => {
            // A missing source ends the run on the spot: the event log keeps
            // whatever was flushed and gets no closing entry.
            let _ = writeln!(console);
            eprintln!("{}: {}", attribute.name, e);
            if diagnostics {
                logger::log_event("fatal_error", json!({ "error": e.to_string() }));
            }
            exit_code(&e)
        }
    }
}

/// Entry point for the binaries.
pub fn main_with(attribute: &'static AttributeDescriptor) -> i32 {
    run_with_args(attribute, std::env::args_os(), io::stdout().lock())
}
