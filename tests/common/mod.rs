#![allow(dead_code)]

use alloy::consensus::{Transaction, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{Address, B256, Bytes, U256, address};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use oxidity_farmer::data::abi::ERC20;
use oxidity_farmer::domain::error::AppError;
use oxidity_farmer::domain::token::Token;
use oxidity_farmer::domain::transaction::{SignedTransaction, TransactionReceipt};
use oxidity_farmer::network::client::{ChainClient, ReceiptPolicy};
use oxidity_farmer::network::gas::GasFees;
use oxidity_farmer::services::farming::{Engine, RunParameters, TxSigner};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

pub const TEST_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
pub const CHAIN_ID: u64 = 688_688;
pub const ROUTER: Address = address!("7777777777777777777777777777777777777777");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptMode {
    Mined,
    Never,
    /// The n-th submission (0-based) is mined with a failure status.
    RevertAt(usize),
}

#[derive(Debug, Clone)]
pub struct SubmittedTx {
    pub hash: B256,
    pub nonce: u64,
    pub chain_id: Option<u64>,
    pub to: Option<Address>,
    pub value: U256,
    pub input: Bytes,
    pub gas_limit: u64,
    pub max_fee_per_gas: u128,
}

impl SubmittedTx {
    pub fn is_approval(&self) -> bool {
        ERC20::approveCall::abi_decode(&self.input).is_ok()
    }
}

#[derive(Debug)]
pub struct MockState {
    pub start_nonce: u64,
    pub native_balance: U256,
    /// (token, spender) -> allowance for the single test account.
    pub allowances: HashMap<(Address, Address), U256>,
    pub token_balances: HashMap<Address, U256>,
    pub submitted: Vec<SubmittedTx>,
    pub receipts: HashMap<B256, TransactionReceipt>,
    pub nonce_reads: usize,
    pub allowance_reads: usize,
    pub fail_submit_at: Option<usize>,
    pub receipt_mode: ReceiptMode,
    pub block: u64,
}

/// In-memory chain: decodes every submitted envelope, mines it instantly
/// (or never), and applies `approve` calls to its allowance table.
pub struct MockChain {
    state: Mutex<MockState>,
    fees: GasFees,
}

impl MockChain {
    pub fn new(start_nonce: u64) -> Self {
        Self {
            state: Mutex::new(MockState {
                start_nonce,
                native_balance: U256::from(10u64).pow(U256::from(20u64)),
                allowances: HashMap::new(),
                token_balances: HashMap::new(),
                submitted: Vec::new(),
                receipts: HashMap::new(),
                nonce_reads: 0,
                allowance_reads: 0,
                fail_submit_at: None,
                receipt_mode: ReceiptMode::Mined,
                block: 1_000,
            }),
            fees: GasFees::default(),
        }
    }

    pub fn with_allowance(self, token: Token, spender: Address, amount: U256) -> Self {
        self.state()
            .allowances
            .insert((token.address(), spender), amount);
        self
    }

    pub fn failing_submit_at(self, index: usize) -> Self {
        self.state().fail_submit_at = Some(index);
        self
    }

    pub fn with_receipts(self, mode: ReceiptMode) -> Self {
        self.state().receipt_mode = mode;
        self
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn submitted(&self) -> Vec<SubmittedTx> {
        self.state().submitted.clone()
    }
}

fn word(value: U256) -> Bytes {
    Bytes::from(value.to_be_bytes::<32>().to_vec())
}

#[async_trait]
impl ChainClient for MockChain {
    fn suggest_fee(&self) -> GasFees {
        self.fees
    }

    async fn current_nonce(&self, _address: Address) -> Result<u64, AppError> {
        let mut state = self.state();
        state.nonce_reads += 1;
        Ok(state.start_nonce)
    }

    async fn native_balance(&self, _address: Address) -> Result<U256, AppError> {
        Ok(self.state().native_balance)
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, AppError> {
        let mut state = self.state();
        if let Ok(call) = ERC20::allowanceCall::abi_decode(&data) {
            state.allowance_reads += 1;
            let value = state
                .allowances
                .get(&(to, call.spender))
                .copied()
                .unwrap_or_default();
            return Ok(word(value));
        }
        if ERC20::balanceOfCall::abi_decode(&data).is_ok() {
            return Ok(word(state.token_balances.get(&to).copied().unwrap_or_default()));
        }
        Err(AppError::Connection(format!("mock: unsupported call to {to:#x}")))
    }

    async fn submit(&self, tx: &SignedTransaction) -> Result<B256, AppError> {
        let mut state = self.state();
        let index = state.submitted.len();
        if state.fail_submit_at == Some(index) {
            return Err(AppError::Submission(format!(
                "nonce {}: mock rejected",
                tx.nonce
            )));
        }

        let envelope = TxEnvelope::decode_2718(&mut tx.raw.as_ref())
            .map_err(|e| AppError::Submission(format!("undecodable raw tx: {e}")))?;
        let hash = *envelope.tx_hash();
        let record = SubmittedTx {
            hash,
            nonce: envelope.nonce(),
            chain_id: envelope.chain_id(),
            to: envelope.to(),
            value: envelope.value(),
            input: envelope.input().clone(),
            gas_limit: envelope.gas_limit(),
            max_fee_per_gas: envelope.max_fee_per_gas(),
        };

        let success = match state.receipt_mode {
            ReceiptMode::Never => None,
            ReceiptMode::Mined => Some(true),
            ReceiptMode::RevertAt(n) => Some(n != index),
        };
        if let Some(success) = success {
            state.block += 1;
            let block_number = state.block;
            state.receipts.insert(
                hash,
                TransactionReceipt {
                    transaction_hash: hash,
                    block_number,
                    success,
                },
            );
            if success
                && let (Some(token), Ok(call)) =
                    (record.to, ERC20::approveCall::abi_decode(&record.input))
            {
                state.allowances.insert((token, call.spender), call.amount);
            }
        }
        state.submitted.push(record);
        Ok(hash)
    }

    async fn get_receipt(&self, hash: B256) -> Result<Option<TransactionReceipt>, AppError> {
        Ok(self.state().receipts.get(&hash).copied())
    }
}

pub fn signer() -> TxSigner {
    TxSigner::from_private_key(TEST_KEY).expect("test key")
}

pub fn policy() -> ReceiptPolicy {
    ReceiptPolicy::new(Duration::from_secs(10), Duration::from_millis(200))
}

pub fn params(transfers: u32, swaps: u32, adds: u32, tokens: &[Token]) -> RunParameters {
    RunParameters {
        router: ROUTER,
        transfer_count: transfers,
        swap_count: swaps,
        liquidity_count: adds,
        native_amount: "0.001".parse().expect("amount"),
        token_amount: "1".parse().expect("amount"),
        delay: Duration::ZERO,
        tokens: tokens.to_vec(),
    }
}

pub async fn engine(chain: MockChain, params: RunParameters, seed: u64) -> Engine<MockChain> {
    Engine::initialize(
        chain,
        signer(),
        CHAIN_ID,
        policy(),
        params,
        StdRng::seed_from_u64(seed),
    )
    .await
    .expect("engine init")
}
