// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::primitives::{Address, address};

// =============================================================================
// NETWORK CONSTANTS
// =============================================================================

pub const PHAROS_TESTNET_CHAIN_ID: u64 = 688_688;
pub const DEFAULT_RPC_URL: &str = "https://testnet.dplabs-internal.com";

// =============================================================================
// TOKENS (Pharos testnet)
// =============================================================================

/// Pseudo-address standing in for the native coin. Never has bytecode.
pub const NATIVE_SENTINEL: Address = address!("EeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");
pub const WPHRS_PHAROS: Address = address!("3019B247381c850ab53Dc0EE53bCe7A07Ea9155f");
pub const USDC_PHAROS: Address = address!("72df0bcd7276f2dFbAc900D1CE63c272C4BCcCED");
pub const USDT_PHAROS: Address = address!("D4071393f8716661958F766DF660033b3d35fD29");

// Uniswap-V2 style routers
pub const FAROSWAP_ROUTER: Address = address!("3541423f25A1Ca5C98fdBCf478405d3f0aaD1164");

// =============================================================================
// GAS & TRANSACTION CONSTANTS
// =============================================================================

pub const TRANSFER_GAS_LIMIT: u64 = 21_000;
pub const APPROVE_GAS_LIMIT: u64 = 80_000;
pub const SWAP_GAS_LIMIT: u64 = 300_000;
pub const ADD_LIQUIDITY_GAS_LIMIT: u64 = 400_000;

pub const GWEI: u128 = 1_000_000_000;
pub const DEFAULT_PRIORITY_FEE_GWEI: u64 = 1;
pub const DEFAULT_MAX_FEE_GWEI: u64 = 1;

/// Router calls expire this many seconds after they are built.
pub const DEADLINE_WINDOW_SECS: u64 = 120;
/// Floor passed as `amountAMin`/`amountBMin` to `addLiquidity`.
pub const LIQUIDITY_MIN_AMOUNT: u64 = 1;

pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 240;
pub const DEFAULT_RECEIPT_POLL_MS: u64 = 1_000;

pub const NATIVE_DECIMALS: u8 = 18;
