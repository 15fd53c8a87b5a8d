// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::constants::APPROVE_GAS_LIMIT;
use crate::common::error::AppError;
use crate::data::abi::ERC20;
use crate::domain::token::Token;
use crate::domain::transaction::UnsignedTransaction;
use crate::network::client::ChainClient;
use crate::services::farming::context::{ActionKind, RunContext};
use alloy::primitives::{Address, B256, U256};
use alloy::sol_types::SolCall;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// Native coin; nothing to approve.
    NotRequired,
    AlreadySufficient { allowance: U256 },
    Approved { hash: B256, block_number: u64 },
}

/// Unlimited `approve(spender, 2^256-1)` from `owner` on `token`.
pub fn approval_transaction(owner: Address, token: Token, spender: Address) -> UnsignedTransaction {
    let calldata = ERC20::approveCall {
        spender,
        amount: U256::MAX,
    }
    .abi_encode();
    UnsignedTransaction::call(owner, token.address(), calldata.into(), APPROVE_GAS_LIMIT)
}

/// Makes sure `spender` may move at least `required` of a token before the
/// dependent spend is built. Allowances are read fresh on every call.
pub struct ApprovalGuard<'a, C: ?Sized> {
    client: &'a C,
}

impl<'a, C> ApprovalGuard<'a, C>
where
    C: ChainClient + ?Sized,
{
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    pub async fn allowance(
        &self,
        token: Token,
        owner: Address,
        spender: Address,
    ) -> Result<U256, AppError> {
        let calldata = ERC20::allowanceCall { owner, spender }.abi_encode();
        let raw = self.client.call(token.address(), calldata.into()).await?;
        ERC20::allowanceCall::abi_decode_returns(&raw).map_err(|e| {
            AppError::Connection(format!("Undecodable allowance from {token}: {e}"))
        })
    }

    pub async fn ensure_approved(
        &self,
        ctx: &mut RunContext,
        token: Token,
        spender: Address,
        required: U256,
    ) -> Result<ApprovalOutcome, AppError> {
        if token.is_native() {
            return Ok(ApprovalOutcome::NotRequired);
        }

        let owner = ctx.address();
        let allowance = self.allowance(token, owner, spender).await?;
        if allowance >= required {
            tracing::debug!(
                target: "approval",
                token = %token,
                spender = %format!("{:#x}", spender),
                %allowance,
                "Allowance sufficient"
            );
            return Ok(ApprovalOutcome::AlreadySufficient { allowance });
        }

        tracing::info!(
            target: "approval",
            token = %token,
            spender = %format!("{:#x}", spender),
            %allowance,
            %required,
            "Allowance short; approving max"
        );
        let request = approval_transaction(owner, token, spender);
        let receipt = ctx
            .execute(self.client, request, ActionKind::Approval(token))
            .await?;
        Ok(ApprovalOutcome::Approved {
            hash: receipt.transaction_hash,
            block_number: receipt.block_number,
        })
    }
}
