mod common;

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;
use common::{CHAIN_ID, MockChain, ROUTER, ReceiptMode, engine, params, signer};
use oxidity_farmer::common::constants::{
    ADD_LIQUIDITY_GAS_LIMIT, APPROVE_GAS_LIMIT, SWAP_GAS_LIMIT, TRANSFER_GAS_LIMIT,
};
use oxidity_farmer::common::time_utils::current_unix;
use oxidity_farmer::data::abi::{ERC20, UniV2Router};
use oxidity_farmer::domain::error::AppError;
use oxidity_farmer::domain::token::Token;
use oxidity_farmer::services::farming::RunState;

const STABLES: [Token; 2] = [Token::Usdc, Token::Usdt];

#[tokio::test(start_paused = true)]
async fn single_transfer_sends_milli_native_to_fresh_address() {
    let mut engine = engine(MockChain::new(7), params(1, 0, 0, &Token::ALL), 1).await;
    let report = engine.run().await.expect("run completes");

    assert_eq!(engine.state(), RunState::Completed);
    assert_eq!(report.transfers, 1);
    assert_eq!(report.start_nonce, 7);
    assert_eq!(report.next_nonce, 8);
    assert_eq!(engine.context().chain_id(), CHAIN_ID);

    let sent = engine.client().submitted();
    assert_eq!(sent.len(), 1);
    let tx = &sent[0];
    assert_eq!(tx.nonce, 7);
    assert_eq!(tx.chain_id, Some(CHAIN_ID));
    assert_eq!(tx.value, U256::from(10u64).pow(U256::from(15u64)));
    assert_eq!(tx.gas_limit, TRANSFER_GAS_LIMIT);
    assert!(tx.input.is_empty());
    let to = tx.to.expect("recipient");
    assert_ne!(to, signer().address());
    assert_ne!(to, Address::ZERO);
    assert_eq!(engine.client().state().nonce_reads, 1);
}

#[tokio::test(start_paused = true)]
async fn transfers_go_to_distinct_recipients() {
    let mut engine = engine(MockChain::new(0), params(3, 0, 0, &Token::ALL), 1).await;
    engine.run().await.expect("run completes");

    let recipients: Vec<_> = engine
        .client()
        .submitted()
        .iter()
        .map(|tx| tx.to.expect("recipient"))
        .collect();
    assert_eq!(recipients.len(), 3);
    assert_ne!(recipients[0], recipients[1]);
    assert_ne!(recipients[1], recipients[2]);
    assert_ne!(recipients[0], recipients[2]);
}

#[tokio::test(start_paused = true)]
async fn swap_with_short_allowance_approves_first() {
    let mut engine = engine(MockChain::new(3), params(0, 1, 0, &STABLES), 9).await;
    let report = engine.run().await.expect("run completes");

    let sent = engine.client().submitted();
    assert_eq!(sent.len(), 2);
    assert_eq!(report.approvals, 1);
    assert_eq!(report.swaps, 1);
    assert_eq!(report.next_nonce, 5);

    let approval = &sent[0];
    assert!(approval.is_approval());
    assert_eq!(approval.nonce, 3);
    assert_eq!(approval.gas_limit, APPROVE_GAS_LIMIT);
    let approve = ERC20::approveCall::abi_decode(&approval.input).unwrap();
    assert_eq!(approve.spender, ROUTER);
    assert_eq!(approve.amount, U256::MAX);

    let swap = &sent[1];
    assert_eq!(swap.nonce, 4);
    assert_eq!(swap.to, Some(ROUTER));
    assert_eq!(swap.gas_limit, SWAP_GAS_LIMIT);
    let call = UniV2Router::swapExactTokensForTokensCall::abi_decode(&swap.input).unwrap();
    assert_eq!(call.path.len(), 2);
    assert_ne!(call.path[0], call.path[1]);
    assert_eq!(Some(call.path[0]), approval.to, "approval is for the input token");
    assert_eq!(call.amountIn, U256::from(1_000_000u64));
    assert_eq!(call.amountOutMin, U256::ZERO);
    assert_eq!(call.to, signer().address());
    assert!(call.deadline > U256::from(current_unix()));
}

#[tokio::test(start_paused = true)]
async fn swap_with_sufficient_allowance_sends_one_transaction() {
    let chain = MockChain::new(0)
        .with_allowance(Token::Usdc, ROUTER, U256::MAX)
        .with_allowance(Token::Usdt, ROUTER, U256::MAX);
    let mut engine = engine(chain, params(0, 1, 0, &STABLES), 4).await;
    let report = engine.run().await.expect("run completes");

    let sent = engine.client().submitted();
    assert_eq!(sent.len(), 1);
    assert!(!sent[0].is_approval());
    assert_eq!(report.approvals, 0);
    assert_eq!(report.next_nonce, 1);
    assert_eq!(engine.client().state().allowance_reads, 1);
}

#[tokio::test(start_paused = true)]
async fn liquidity_add_approves_both_sides_once() {
    let tokens = [Token::WrappedNative, Token::Usdc];
    let mut engine = engine(MockChain::new(10), params(0, 0, 2, &tokens), 5).await;
    let report = engine.run().await.expect("run completes");

    // Two approvals on the first add, none on the second.
    assert_eq!(report.approvals, 2);
    assert_eq!(report.liquidity_adds, 2);
    let sent = engine.client().submitted();
    assert_eq!(sent.len(), 4);
    assert!(sent[0].is_approval() && sent[1].is_approval());
    assert!(!sent[2].is_approval() && !sent[3].is_approval());

    let call = UniV2Router::addLiquidityCall::abi_decode(&sent[2].input).unwrap();
    assert_ne!(call.tokenA, call.tokenB);
    assert_eq!(call.amountAMin, U256::from(1u64));
    assert_eq!(call.amountBMin, U256::from(1u64));
    assert_eq!(sent[2].gas_limit, ADD_LIQUIDITY_GAS_LIMIT);
    let (weth_amount, usdc_amount) = if call.tokenA == Token::WrappedNative.address() {
        (call.amountADesired, call.amountBDesired)
    } else {
        (call.amountBDesired, call.amountADesired)
    };
    assert_eq!(weth_amount, U256::from(10u64).pow(U256::from(18u64)));
    assert_eq!(usdc_amount, U256::from(1_000_000u64));
}

#[tokio::test(start_paused = true)]
async fn native_input_swaps_skip_the_approval_guard() {
    let tokens = [Token::Native, Token::Usdc];
    let (mut native_inputs, mut usdc_inputs) = (0, 0);

    for seed in 0..16 {
        let mut engine = engine(MockChain::new(0), params(0, 1, 0, &tokens), seed).await;
        let report = engine.run().await.expect("run completes");
        assert_eq!(report.swaps, 1);

        let sent = engine.client().submitted();
        let swap = sent.last().expect("swap sent");
        let call = UniV2Router::swapExactTokensForTokensCall::abi_decode(&swap.input).unwrap();
        let reads = engine.client().state().allowance_reads;

        if call.path[0] == Token::Native.address() {
            native_inputs += 1;
            assert_eq!(call.path[1], Token::Usdc.address());
            assert_eq!(call.amountIn, U256::from(10u64).pow(U256::from(18u64)));
            assert_eq!(sent.len(), 1, "seed {seed}: no approval for native input");
            assert_eq!(reads, 0, "seed {seed}: native allowance is never read");
            assert_eq!(report.approvals, 0);
        } else {
            usdc_inputs += 1;
            assert_eq!(call.path[0], Token::Usdc.address());
            assert_eq!(call.amountIn, U256::from(1_000_000u64));
            assert_eq!(sent.len(), 2);
            assert_eq!(sent[0].to, Some(Token::Usdc.address()));
            assert_eq!(reads, 1);
        }
    }
    assert!(native_inputs > 0 && usdc_inputs > 0);
}

#[tokio::test(start_paused = true)]
async fn native_side_of_liquidity_add_is_never_approved() {
    let tokens = [Token::Native, Token::Usdc];
    let mut engine = engine(MockChain::new(0), params(0, 0, 2, &tokens), 3).await;
    let report = engine.run().await.expect("run completes");

    assert_eq!(report.liquidity_adds, 2);
    assert_eq!(report.approvals, 1);
    let sent = engine.client().submitted();
    assert_eq!(sent.len(), 3);
    assert!(sent[0].is_approval());
    assert_eq!(sent[0].to, Some(Token::Usdc.address()));
    assert!(sent.iter().all(|tx| tx.to != Some(Token::Native.address())));
    // One Usdc read per add; the native side is skipped both times.
    assert_eq!(engine.client().state().allowance_reads, 2);

    let call = UniV2Router::addLiquidityCall::abi_decode(&sent[1].input).unwrap();
    let native_amount = if call.tokenA == Token::Native.address() {
        call.amountADesired
    } else {
        assert_eq!(call.tokenB, Token::Native.address());
        call.amountBDesired
    };
    assert_eq!(native_amount, U256::from(10u64).pow(U256::from(18u64)));
}

#[tokio::test(start_paused = true)]
async fn nonces_are_contiguous_across_phases_and_approvals() {
    let tokens = [Token::WrappedNative, Token::Usdc, Token::Usdt];
    let mut engine = engine(MockChain::new(42), params(2, 3, 2, &tokens), 77).await;
    let report = engine.run().await.expect("run completes");

    let sent = engine.client().submitted();
    let nonces: Vec<u64> = sent.iter().map(|tx| tx.nonce).collect();
    let expected: Vec<u64> = (42..42 + sent.len() as u64).collect();
    assert_eq!(nonces, expected);
    assert_eq!(report.next_nonce, 42 + sent.len() as u64);
    assert_eq!(
        report.transfers + report.swaps + report.liquidity_adds + report.approvals,
        sent.len() as u32
    );
    // Each ERC-20 is approved at most once: the first approval is unlimited.
    assert!(report.approvals <= 3);
    assert_eq!(engine.client().state().nonce_reads, 1);

    // Phase order: transfers first, then router calls.
    assert!(sent[0].value > U256::ZERO && sent[1].value > U256::ZERO);
    assert!(sent[2..].iter().all(|tx| tx.value.is_zero()));
}

#[tokio::test(start_paused = true)]
async fn submission_failure_stops_before_anything_else() {
    let chain = MockChain::new(5).failing_submit_at(0);
    let mut engine = engine(chain, params(3, 2, 1, &Token::ALL), 1).await;
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, AppError::Submission(_)));
    assert_eq!(err.kind(), "SubmissionError");
    assert_eq!(engine.state(), RunState::Failed);
    assert!(engine.client().submitted().is_empty());
    assert!(engine.client().state().receipts.is_empty());
    assert_eq!(engine.context().next_nonce(), 5);
    assert!(engine.context().confirmed().is_empty());
}

#[tokio::test(start_paused = true)]
async fn confirmation_timeout_leaves_nonce_at_pending_transaction() {
    let chain = MockChain::new(11).with_receipts(ReceiptMode::Never);
    let mut engine = engine(chain, params(2, 0, 0, &Token::ALL), 1).await;
    let err = engine.run().await.unwrap_err();

    match err {
        AppError::ConfirmationTimeout { hash, waited_secs } => {
            assert_eq!(waited_secs, 10);
            assert_eq!(hash, engine.client().submitted()[0].hash);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(engine.state(), RunState::Failed);
    assert_eq!(engine.client().submitted().len(), 1);
    assert_eq!(engine.context().next_nonce(), 11);
}

#[tokio::test(start_paused = true)]
async fn reverted_approval_blocks_dependent_swap() {
    let chain = MockChain::new(0).with_receipts(ReceiptMode::RevertAt(0));
    let mut engine = engine(chain, params(0, 1, 0, &STABLES), 2).await;
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, AppError::TransactionReverted { .. }));
    let sent = engine.client().submitted();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].is_approval());
    assert_eq!(engine.context().next_nonce(), 0);
}

#[tokio::test(start_paused = true)]
async fn failure_mid_run_keeps_earlier_confirmations() {
    let chain = MockChain::new(0).failing_submit_at(2);
    let mut engine = engine(chain, params(4, 0, 0, &Token::ALL), 1).await;
    assert!(engine.run().await.is_err());

    assert_eq!(engine.client().submitted().len(), 2);
    assert_eq!(engine.context().confirmed().len(), 2);
    assert_eq!(engine.context().next_nonce(), 2);
}

#[tokio::test(start_paused = true)]
async fn zero_counts_complete_without_transactions() {
    let mut engine = engine(MockChain::new(9), params(0, 0, 0, &Token::ALL), 1).await;
    let report = engine.run().await.expect("empty run completes");
    assert_eq!(engine.state(), RunState::Completed);
    assert!(engine.client().submitted().is_empty());
    assert_eq!(report.start_nonce, 9);
    assert_eq!(report.next_nonce, 9);
    assert_eq!(report.last_block, None);
}

#[tokio::test(start_paused = true)]
async fn finished_engine_refuses_to_run_again() {
    let mut engine = engine(MockChain::new(0), params(1, 0, 0, &Token::ALL), 1).await;
    engine.run().await.expect("first run");
    assert!(matches!(engine.run().await, Err(AppError::Config(_))));
    assert_eq!(engine.client().submitted().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn delay_is_applied_after_each_action() {
    let mut p = params(2, 0, 0, &Token::ALL);
    p.delay = std::time::Duration::from_secs(3);
    let mut engine = engine(MockChain::new(0), p, 1).await;

    let started = tokio::time::Instant::now();
    engine.run().await.expect("run completes");
    assert!(started.elapsed() >= std::time::Duration::from_secs(6));
}
