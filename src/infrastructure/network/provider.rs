// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::common::error::AppError;
use alloy::network::Ethereum;
use alloy::providers::{Provider, RootProvider};
use url::Url;

pub type HttpProvider = RootProvider<Ethereum>;

pub struct ConnectionFactory;

impl ConnectionFactory {
    pub fn http(rpc_url: &str) -> Result<HttpProvider, AppError> {
        let url =
            Url::parse(rpc_url).map_err(|e| AppError::Config(format!("Invalid RPC URL: {}", e)))?;

        let provider = RootProvider::new_http(url);
        Ok(provider)
    }

    /// Build an HTTP provider and prove the node answers before anything else
    /// is wired up. Returns the provider with the chain id the node reports.
    pub async fn connect_checked(rpc_url: &str) -> Result<(HttpProvider, u64), AppError> {
        let provider = Self::http(rpc_url)?;
        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| AppError::Connection(format!("{rpc_url} unreachable: {e}")))?;
        tracing::debug!(target: "rpc", rpc = %rpc_url, chain_id, "RPC endpoint reachable");
        Ok((provider, chain_id))
    }
}
