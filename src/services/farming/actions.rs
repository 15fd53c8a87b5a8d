// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::constants::{
    ADD_LIQUIDITY_GAS_LIMIT, DEADLINE_WINDOW_SECS, LIQUIDITY_MIN_AMOUNT, NATIVE_DECIMALS,
    SWAP_GAS_LIMIT, TRANSFER_GAS_LIMIT,
};
use crate::common::error::AppError;
use crate::common::time_utils::deadline_after;
use crate::data::abi::UniV2Router;
use crate::domain::token::{Token, TokenAmount};
use crate::domain::transaction::UnsignedTransaction;
use crate::network::client::ChainClient;
use crate::services::farming::approval::ApprovalGuard;
use crate::services::farming::context::{ActionKind, RunContext};
use alloy::primitives::{Address, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolCall;
use rand::Rng;
use rand::seq::IndexedRandom;

/// A fully described action, ready for the run context to execute.
#[derive(Debug, Clone)]
pub struct BuiltAction {
    pub kind: ActionKind,
    pub request: UnsignedTransaction,
    pub summary: String,
}

/// Address of a throwaway key; unrelated to any existing wallet.
pub fn fresh_recipient() -> Address {
    PrivateKeySigner::random().address()
}

/// Two distinct tokens, sampled uniformly without replacement.
pub fn pick_distinct_pair<R>(tokens: &[Token], rng: &mut R) -> Result<(Token, Token), AppError>
where
    R: Rng + ?Sized,
{
    let picked: Vec<Token> = tokens.choose_multiple(rng, 2).copied().collect();
    match picked.as_slice() {
        [a, b] if a != b => Ok((*a, *b)),
        _ => Err(AppError::Config(
            "At least two distinct tokens are required for swaps and liquidity".into(),
        )),
    }
}

pub fn swap_calldata(
    amount_in: U256,
    token_in: Token,
    token_out: Token,
    recipient: Address,
    deadline: u64,
) -> Vec<u8> {
    UniV2Router::swapExactTokensForTokensCall {
        amountIn: amount_in,
        amountOutMin: U256::ZERO,
        path: vec![token_in.address(), token_out.address()],
        to: recipient,
        deadline: U256::from(deadline),
    }
    .abi_encode()
}

pub fn add_liquidity_calldata(
    token_a: Token,
    token_b: Token,
    amount_a: U256,
    amount_b: U256,
    recipient: Address,
    deadline: u64,
) -> Vec<u8> {
    UniV2Router::addLiquidityCall {
        tokenA: token_a.address(),
        tokenB: token_b.address(),
        amountADesired: amount_a,
        amountBDesired: amount_b,
        amountAMin: U256::from(LIQUIDITY_MIN_AMOUNT),
        amountBMin: U256::from(LIQUIDITY_MIN_AMOUNT),
        to: recipient,
        deadline: U256::from(deadline),
    }
    .abi_encode()
}

/// Turns semantic parameters into unsigned transactions. Swap and
/// liquidity builds run the approval guard first, so the router deadline is
/// taken only after any approval has been mined.
pub struct ActionBuilder<'a, C: ?Sized> {
    client: &'a C,
    router: Address,
    tokens: &'a [Token],
}

impl<'a, C> ActionBuilder<'a, C>
where
    C: ChainClient + ?Sized,
{
    pub fn new(client: &'a C, router: Address, tokens: &'a [Token]) -> Self {
        Self {
            client,
            router,
            tokens,
        }
    }

    pub fn transfer(&self, ctx: &RunContext, amount: &TokenAmount) -> Result<BuiltAction, AppError> {
        let value = amount.to_base_units(NATIVE_DECIMALS)?;
        let destination = fresh_recipient();
        Ok(BuiltAction {
            kind: ActionKind::Transfer,
            request: UnsignedTransaction::value_transfer(
                ctx.address(),
                destination,
                value,
                TRANSFER_GAS_LIMIT,
            ),
            summary: format!(
                "Transferred {amount} {} to {}",
                Token::Native,
                short_address(destination)
            ),
        })
    }

    pub async fn swap<R>(
        &self,
        ctx: &mut RunContext,
        rng: &mut R,
        amount: &TokenAmount,
    ) -> Result<BuiltAction, AppError>
    where
        R: Rng + ?Sized,
    {
        let (token_in, token_out) = pick_distinct_pair(self.tokens, rng)?;
        let amount_in = amount.to_base_units(token_in.decimals())?;

        ApprovalGuard::new(self.client)
            .ensure_approved(ctx, token_in, self.router, amount_in)
            .await?;

        let calldata = swap_calldata(
            amount_in,
            token_in,
            token_out,
            ctx.address(),
            deadline_after(DEADLINE_WINDOW_SECS),
        );
        Ok(BuiltAction {
            kind: ActionKind::Swap,
            request: UnsignedTransaction::call(
                ctx.address(),
                self.router,
                calldata.into(),
                SWAP_GAS_LIMIT,
            ),
            summary: format!(
                "Swapped {amount} {token_in} -> {token_out} via {}",
                short_address(self.router)
            ),
        })
    }

    pub async fn add_liquidity<R>(
        &self,
        ctx: &mut RunContext,
        rng: &mut R,
        amount: &TokenAmount,
    ) -> Result<BuiltAction, AppError>
    where
        R: Rng + ?Sized,
    {
        let (token_a, token_b) = pick_distinct_pair(self.tokens, rng)?;
        let amount_a = amount.to_base_units(token_a.decimals())?;
        let amount_b = amount.to_base_units(token_b.decimals())?;

        let guard = ApprovalGuard::new(self.client);
        guard
            .ensure_approved(ctx, token_a, self.router, amount_a)
            .await?;
        guard
            .ensure_approved(ctx, token_b, self.router, amount_b)
            .await?;

        let calldata = add_liquidity_calldata(
            token_a,
            token_b,
            amount_a,
            amount_b,
            ctx.address(),
            deadline_after(DEADLINE_WINDOW_SECS),
        );
        Ok(BuiltAction {
            kind: ActionKind::AddLiquidity,
            request: UnsignedTransaction::call(
                ctx.address(),
                self.router,
                calldata.into(),
                ADD_LIQUIDITY_GAS_LIMIT,
            ),
            summary: format!(
                "Added LP {token_a}-{token_b} with {amount} each via {}",
                short_address(self.router)
            ),
        })
    }
}

fn short_address(address: Address) -> String {
    let full = format!("{:#x}", address);
    format!("{}…", &full[..10])
}
