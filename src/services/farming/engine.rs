// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::AppError;
use crate::domain::token::{Token, TokenAmount};
use crate::network::client::{ChainClient, ReceiptPolicy};
use crate::network::nonce::NonceCounter;
use crate::services::farming::actions::{ActionBuilder, BuiltAction};
use crate::services::farming::context::{ActionKind, RunContext};
use crate::services::farming::signer::TxSigner;
use alloy::primitives::Address;
use rand::rngs::StdRng;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Initializing,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Transfers,
    Swaps,
    LiquidityAdds,
}

impl Phase {
    pub const ORDER: [Phase; 3] = [Phase::Transfers, Phase::Swaps, Phase::LiquidityAdds];
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Transfers => f.write_str("transfers"),
            Phase::Swaps => f.write_str("swaps"),
            Phase::LiquidityAdds => f.write_str("liquidity-adds"),
        }
    }
}

/// Validated parameters for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParameters {
    pub router: Address,
    pub transfer_count: u32,
    pub swap_count: u32,
    pub liquidity_count: u32,
    pub native_amount: TokenAmount,
    pub token_amount: TokenAmount,
    pub delay: Duration,
    pub tokens: Vec<Token>,
}

impl RunParameters {
    pub fn count_for(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Transfers => self.transfer_count,
            Phase::Swaps => self.swap_count,
            Phase::LiquidityAdds => self.liquidity_count,
        }
    }

    pub fn total_actions(&self) -> u64 {
        Phase::ORDER
            .iter()
            .map(|phase| u64::from(self.count_for(*phase)))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub transfers: u32,
    pub swaps: u32,
    pub liquidity_adds: u32,
    pub approvals: u32,
    pub start_nonce: u64,
    pub next_nonce: u64,
    pub first_block: Option<u64>,
    pub last_block: Option<u64>,
}

impl RunReport {
    fn from_context(ctx: &RunContext) -> Self {
        let mut report = RunReport {
            start_nonce: ctx.nonce_counter().start(),
            next_nonce: ctx.next_nonce(),
            ..Default::default()
        };
        for tx in ctx.confirmed() {
            match tx.kind {
                ActionKind::Approval(_) => report.approvals += 1,
                ActionKind::Transfer => report.transfers += 1,
                ActionKind::Swap => report.swaps += 1,
                ActionKind::AddLiquidity => report.liquidity_adds += 1,
            }
            report.first_block = Some(
                report
                    .first_block
                    .map_or(tx.block_number, |b| b.min(tx.block_number)),
            );
            report.last_block = Some(
                report
                    .last_block
                    .map_or(tx.block_number, |b| b.max(tx.block_number)),
            );
        }
        report
    }
}

/// Sequential driver: transfers, then swaps, then liquidity adds. The first
/// error stops the run; nothing is retried or skipped.
pub struct Engine<C: ChainClient> {
    client: C,
    ctx: RunContext,
    params: RunParameters,
    rng: StdRng,
    state: RunState,
}

impl<C: ChainClient> Engine<C> {
    /// Reads the starting nonce; the only nonce query of the run.
    pub async fn initialize(
        client: C,
        signer: TxSigner,
        chain_id: u64,
        receipt_policy: ReceiptPolicy,
        params: RunParameters,
        rng: StdRng,
    ) -> Result<Self, AppError> {
        let nonce = NonceCounter::initialize(&client, signer.address()).await?;
        let ctx = RunContext::new(signer, chain_id, receipt_policy, nonce);
        Ok(Self {
            client,
            ctx,
            params,
            rng,
            state: RunState::Initializing,
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn parameters(&self) -> &RunParameters {
        &self.params
    }

    pub async fn run(&mut self) -> Result<RunReport, AppError> {
        if self.state != RunState::Initializing {
            return Err(AppError::Config(format!(
                "Run already finished in state {:?}",
                self.state
            )));
        }
        self.state = RunState::Running;
        tracing::info!(
            target: "engine",
            address = %format!("{:#x}", self.ctx.address()),
            chain_id = self.ctx.chain_id(),
            transfers = self.params.transfer_count,
            swaps = self.params.swap_count,
            liquidity_adds = self.params.liquidity_count,
            start_nonce = self.ctx.next_nonce(),
            "Run started"
        );

        match self.run_phases().await {
            Ok(()) => {
                self.state = RunState::Completed;
                let report = RunReport::from_context(&self.ctx);
                tracing::info!(
                    target: "engine",
                    transfers = report.transfers,
                    swaps = report.swaps,
                    liquidity_adds = report.liquidity_adds,
                    approvals = report.approvals,
                    start_nonce = report.start_nonce,
                    next_nonce = report.next_nonce,
                    last_block = ?report.last_block,
                    "All actions completed"
                );
                Ok(report)
            }
            Err(e) => {
                self.state = RunState::Failed;
                tracing::error!(
                    target: "engine",
                    kind = e.kind(),
                    error = %e,
                    confirmed = self.ctx.confirmed().len(),
                    pending_nonce = self.ctx.next_nonce(),
                    "Run failed"
                );
                Err(e)
            }
        }
    }

    async fn run_phases(&mut self) -> Result<(), AppError> {
        for phase in Phase::ORDER {
            let count = self.params.count_for(phase);
            if count == 0 {
                continue;
            }
            tracing::debug!(target: "engine", %phase, count, "Phase started");
            for index in 1..=count {
                let action = self.build(phase).await?;
                self.ctx
                    .execute(&self.client, action.request, action.kind)
                    .await?;
                tracing::info!(
                    target: "engine",
                    %phase,
                    index,
                    count,
                    "{}",
                    action.summary
                );
                if !self.params.delay.is_zero() {
                    tokio::time::sleep(self.params.delay).await;
                }
            }
        }
        Ok(())
    }

    async fn build(&mut self, phase: Phase) -> Result<BuiltAction, AppError> {
        let builder = ActionBuilder::new(&self.client, self.params.router, &self.params.tokens);
        match phase {
            Phase::Transfers => builder.transfer(&self.ctx, &self.params.native_amount),
            Phase::Swaps => {
                builder
                    .swap(&mut self.ctx, &mut self.rng, &self.params.token_amount)
                    .await
            }
            Phase::LiquidityAdds => {
                builder
                    .add_liquidity(&mut self.ctx, &mut self.rng, &self.params.token_amount)
                    .await
            }
        }
    }
}
