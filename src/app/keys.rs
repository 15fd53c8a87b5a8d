// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::parsing::is_prefixed_private_key;
use crate::domain::error::AppError;
use std::fs;
use std::path::Path;
use zeroize::Zeroizing;

pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Pick the key from the environment value if present, else the first
/// non-empty line of the key file. Neither source is echoed in errors.
pub fn select_key(
    env_value: Option<&str>,
    file_contents: Option<&str>,
    source: &str,
) -> Result<Zeroizing<String>, AppError> {
    let (candidate, origin) = match env_value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => (Some(value), PRIVATE_KEY_ENV),
        None => (
            file_contents.and_then(|body| body.lines().map(str::trim).find(|l| !l.is_empty())),
            source,
        ),
    };

    let key = candidate.ok_or_else(|| {
        AppError::Config(format!(
            "No private key found: set {PRIVATE_KEY_ENV} or write it to {source}"
        ))
    })?;
    if !is_prefixed_private_key(key) {
        return Err(AppError::Config(format!(
            "Private key from {origin} must be 0x followed by 64 hex characters"
        )));
    }
    Ok(Zeroizing::new(key.to_string()))
}

pub fn load_private_key(path: &str) -> Result<Zeroizing<String>, AppError> {
    let env_value = std::env::var(PRIVATE_KEY_ENV).ok().map(Zeroizing::new);
    let file_contents = if env_value.as_ref().is_some_and(|v| !v.trim().is_empty()) {
        None
    } else if Path::new(path).exists() {
        let body = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read key file {path}: {e}")))?;
        Some(Zeroizing::new(body))
    } else {
        None
    };
    select_key(
        env_value.as_deref().map(String::as_str),
        file_contents.as_deref().map(String::as_str),
        path,
    )
}
