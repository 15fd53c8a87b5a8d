// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Â® John Hauger Mitander <john@on1.no>

use std::time::{SystemTime, UNIX_EPOCH};

/// Return the current UNIX timestamp in seconds.
pub fn current_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// UNIX deadline `window_secs` from now, as passed to router calls.
pub fn deadline_after(window_secs: u64) -> u64 {
    current_unix().saturating_add(window_secs)
}
