// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::primitives::{Address, B256, Bytes, U256};

/// Transaction descriptor produced by the action builders. Nonce, fees and
/// chain id stay `None` until the run context fills them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub from: Address,
    pub to: Option<Address>,
    pub value: U256,
    pub input: Bytes,
    pub gas_limit: u64,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    pub nonce: Option<u64>,
    pub chain_id: Option<u64>,
}

impl UnsignedTransaction {
    pub fn call(from: Address, to: Address, input: Bytes, gas_limit: u64) -> Self {
        Self {
            from,
            to: Some(to),
            value: U256::ZERO,
            input,
            gas_limit,
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
            nonce: None,
            chain_id: None,
        }
    }

    pub fn value_transfer(from: Address, to: Address, value: U256, gas_limit: u64) -> Self {
        Self {
            value,
            ..Self::call(from, to, Bytes::new(), gas_limit)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub raw: Bytes,
    pub hash: B256,
    pub nonce: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub block_number: u64,
    pub success: bool,
}
