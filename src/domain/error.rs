// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::primitives::B256;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection failed to endpoint: {0}")]
    Connection(String),

    #[error("Transaction rejected by node: {0}")]
    Submission(String),

    #[error("Transaction {hash:#x} not mined within {waited_secs}s")]
    ConfirmationTimeout { hash: B256, waited_secs: u64 },

    #[error("Transaction {hash:#x} reverted in block {block}")]
    TransactionReverted { hash: B256, block: u64 },

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
}

impl AppError {
    /// Stable name of the failure class, used in the final log line.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Config(_) => "ConfigurationError",
            AppError::Connection(_) => "ConnectionError",
            AppError::Submission(_) => "SubmissionError",
            AppError::ConfirmationTimeout { .. } => "ConfirmationTimeout",
            AppError::TransactionReverted { .. } => "TransactionReverted",
            AppError::InvalidTransaction(_) => "InvalidTransaction",
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
