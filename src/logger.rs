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

//! Opt-in JSON-lines diagnostics log (`--logging`), separate from the
//! per-run event log.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use lazy_static::lazy_static;
use serde_json::{json, Value};

const DEFAULT_LOG_PATH: &str = "/var/log/tpmpoll/events.json";
const FALLBACK_LOG_PATH: &str = "/tmp/tpmpoll_events.json";

lazy_static! {
    static ref LOG_FILE: Mutex<Option<File>> = Mutex::new(None);
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

fn open_append(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Open the default diagnostics file. Keeps a file that is already open.
pub fn init_logging() {
    if LOG_FILE.lock().map(|g| g.is_some()).unwrap_or(false) {
        return;
    }
    // Fall back to /tmp silently when /var/log is not writable
    let file = open_append(Path::new(DEFAULT_LOG_PATH))
        .or_else(|| open_append(Path::new(FALLBACK_LOG_PATH)));
    if let Some(f) = file {
        if let Ok(mut guard) = LOG_FILE.lock() {
            *guard = Some(f);
        }
    }
}

/// Route diagnostics to `path` instead of the default location.
pub fn init_logging_at<P: AsRef<Path>>(path: P) -> bool {
    match open_append(path.as_ref()) {
        Some(f) => {
            if let Ok(mut guard) = LOG_FILE.lock() {
                *guard = Some(f);
                return true;
            }
            false
        }
        None => false,
    }
}

pub fn shutdown_logging() {
    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = None;
    }
}

/// No-op unless logging was initialized. Never fails the caller.
pub fn log_event(event: &str, data: Value) {
    let Ok(mut guard) = LOG_FILE.lock() else { return };
    let Some(f) = guard.as_mut() else { return };

    let line = json!({
        "ts_ms": now_millis(),
        "event": event,
        "data": data,
    })
    .to_string();
    let _ = writeln!(f, "{}", line);
    let _ = f.flush();
}
