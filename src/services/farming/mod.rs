// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

pub mod actions;
pub mod approval;
pub mod context;
pub mod engine;
pub mod preflight;
pub mod signer;

pub use approval::{ApprovalGuard, ApprovalOutcome};
pub use context::{ActionKind, RunContext};
pub use engine::{Engine, RunParameters, RunReport, RunState};
pub use signer::TxSigner;
