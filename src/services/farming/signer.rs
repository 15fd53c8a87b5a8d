// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::error::AppError;
use crate::domain::transaction::{SignedTransaction, UnsignedTransaction};
use alloy::consensus::{SignableTransaction, TxEip1559, TxEnvelope};
use alloy::eips::eip2718::Encodable2718;
use alloy::eips::eip2930::AccessList;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, TxKind};
use alloy::signers::local::PrivateKeySigner;
use std::fmt;

/// Holds the run's only private key. Signing is deterministic (RFC 6979).
pub struct TxSigner {
    signer: PrivateKeySigner,
}

impl TxSigner {
    pub fn new(signer: PrivateKeySigner) -> Self {
        Self { signer }
    }

    pub fn from_private_key(key: &str) -> Result<Self, AppError> {
        let signer = key
            .trim()
            .parse::<PrivateKeySigner>()
            .map_err(|e| AppError::Config(format!("Invalid wallet key: {}", e)))?;
        Ok(Self::new(signer))
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn sign(&self, request: &UnsignedTransaction) -> Result<SignedTransaction, AppError> {
        if request.from != self.address() {
            return Err(AppError::InvalidTransaction(format!(
                "sender {:#x} is not the loaded account {:#x}",
                request.from,
                self.address()
            )));
        }
        let nonce = request
            .nonce
            .ok_or_else(|| AppError::InvalidTransaction("Missing nonce in tx request".into()))?;
        let chain_id = request
            .chain_id
            .ok_or_else(|| AppError::InvalidTransaction("Missing chain_id in tx request".into()))?;
        let max_fee_per_gas = request.max_fee_per_gas.ok_or_else(|| {
            AppError::InvalidTransaction("Missing max_fee_per_gas in tx request".into())
        })?;
        let max_priority_fee_per_gas = request.max_priority_fee_per_gas.ok_or_else(|| {
            AppError::InvalidTransaction("Missing max_priority_fee_per_gas in tx request".into())
        })?;

        let mut tx = TxEip1559 {
            chain_id,
            nonce,
            max_priority_fee_per_gas,
            max_fee_per_gas,
            gas_limit: request.gas_limit,
            to: request.to.map(TxKind::Call).unwrap_or(TxKind::Create),
            value: request.value,
            access_list: AccessList::default(),
            input: request.input.clone(),
        };

        let sig = TxSignerSync::sign_transaction_sync(&self.signer, &mut tx)
            .map_err(|e| AppError::InvalidTransaction(format!("Sign tx failed: {}", e)))?;
        let signed: TxEnvelope = tx.into_signed(sig).into();
        let raw = signed.encoded_2718();
        Ok(SignedTransaction {
            raw: raw.into(),
            hash: *signed.tx_hash(),
            nonce,
        })
    }
}

impl fmt::Debug for TxSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TxSigner")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
