// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

pub mod client;
pub mod gas;
pub mod nonce;
pub mod provider;
