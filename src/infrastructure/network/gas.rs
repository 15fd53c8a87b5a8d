// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::constants::{DEFAULT_MAX_FEE_GWEI, DEFAULT_PRIORITY_FEE_GWEI, GWEI};
use crate::common::error::AppError;

/// EIP-1559 fee pair attached to every transaction of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasFees {
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

impl GasFees {
    /// Fixed fee for test networks: no fee-history sampling, no estimation.
    pub fn fixed_gwei(max_fee_gwei: u64, priority_fee_gwei: u64) -> Result<Self, AppError> {
        if max_fee_gwei == 0 {
            return Err(AppError::Config("max_fee_gwei must be positive".into()));
        }
        if priority_fee_gwei > max_fee_gwei {
            return Err(AppError::Config(format!(
                "priority_fee_gwei ({priority_fee_gwei}) exceeds max_fee_gwei ({max_fee_gwei})"
            )));
        }
        Ok(Self {
            max_fee_per_gas: u128::from(max_fee_gwei).saturating_mul(GWEI),
            max_priority_fee_per_gas: u128::from(priority_fee_gwei).saturating_mul(GWEI),
        })
    }
}

impl Default for GasFees {
    fn default() -> Self {
        Self {
            max_fee_per_gas: u128::from(DEFAULT_MAX_FEE_GWEI) * GWEI,
            max_priority_fee_per_gas: u128::from(DEFAULT_PRIORITY_FEE_GWEI) * GWEI,
        }
    }
}
