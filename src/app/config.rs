// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::app::logging::LogOptions;
use crate::domain::constants;
use crate::domain::error::AppError;
use crate::domain::token::{Token, TokenAmount};
use crate::network::client::ReceiptPolicy;
use crate::network::gas::GasFees;
use crate::services::farming::engine::RunParameters;
use alloy::primitives::Address;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RouterChoice {
    #[default]
    Faroswap,
    Zenithswap,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GlobalSettings {
    // General
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub log_json: bool,
    /// Seeds token selection; unset draws from the OS.
    pub seed: Option<u64>,

    // Network
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    // Identity
    #[serde(default = "default_private_key_path")]
    pub private_key_path: String,

    // Routers
    #[serde(default)]
    pub router: RouterChoice,
    #[serde(default = "default_faroswap_router")]
    pub faroswap_router: Address,
    pub zenithswap_router: Option<Address>,

    // Run
    #[serde(default = "default_transfer_count")]
    pub transfer_count: u32,
    #[serde(default = "default_swap_count")]
    pub swap_count: u32,
    #[serde(default = "default_liquidity_count")]
    pub liquidity_count: u32,
    #[serde(default = "default_native_amount")]
    pub native_amount: TokenAmount,
    #[serde(default = "default_token_amount")]
    pub token_amount: TokenAmount,
    #[serde(default = "default_delay_secs")]
    pub delay_secs: f64,
    /// Comma-separated symbols or a list; swap and liquidity pairs are drawn from it.
    #[serde(default = "default_tokens", deserialize_with = "deserialize_token_list")]
    pub tokens: Vec<Token>,

    // Transaction
    #[serde(default = "default_priority_fee_gwei")]
    pub priority_fee_gwei: u64,
    #[serde(default = "default_max_fee_gwei")]
    pub max_fee_gwei: u64,
    #[serde(default = "default_receipt_timeout_secs")]
    pub receipt_timeout_secs: u64,
    #[serde(default = "default_receipt_poll_ms")]
    pub receipt_poll_ms: u64,
}

// Defaults
fn default_rpc_url() -> String {
    constants::DEFAULT_RPC_URL.to_string()
}
fn default_chain_id() -> u64 {
    constants::PHAROS_TESTNET_CHAIN_ID
}
fn default_private_key_path() -> String {
    "privatekey.txt".to_string()
}
fn default_faroswap_router() -> Address {
    constants::FAROSWAP_ROUTER
}
fn default_transfer_count() -> u32 {
    1
}
fn default_swap_count() -> u32 {
    1
}
fn default_liquidity_count() -> u32 {
    1
}
fn default_native_amount() -> TokenAmount {
    TokenAmount::from_static("0.001")
}
fn default_token_amount() -> TokenAmount {
    TokenAmount::from_static("0.1")
}
fn default_delay_secs() -> f64 {
    5.0
}
fn default_tokens() -> Vec<Token> {
    Token::ALL.to_vec()
}
fn default_priority_fee_gwei() -> u64 {
    constants::DEFAULT_PRIORITY_FEE_GWEI
}
fn default_max_fee_gwei() -> u64 {
    constants::DEFAULT_MAX_FEE_GWEI
}
fn default_receipt_timeout_secs() -> u64 {
    constants::DEFAULT_RECEIPT_TIMEOUT_SECS
}
fn default_receipt_poll_ms() -> u64 {
    constants::DEFAULT_RECEIPT_POLL_MS
}

pub fn parse_token_list(raw: &str) -> Result<Vec<Token>, AppError> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<Token>)
        .collect()
}

fn deserialize_token_list<'de, D>(deserializer: D) -> Result<Vec<Token>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{Error, SeqAccess, Visitor};
    use std::fmt;

    struct TokenListVisitor;

    impl<'de> Visitor<'de> for TokenListVisitor {
        type Value = Vec<Token>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a sequence of token symbols or a comma-separated string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            parse_token_list(v).map_err(E::custom)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut out = Vec::new();
            while let Some(elem) = seq.next_element::<Token>()? {
                out.push(elem);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_any(TokenListVisitor)
}

impl GlobalSettings {
    pub fn load_with_path(path: Option<&str>) -> Result<Self, AppError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();
        if let Some(selected_path) = path {
            builder = builder.add_source(File::from(Path::new(selected_path)).required(true));
        } else {
            builder = builder.add_source(File::with_name("config").required(false));
        }
        // Precedence: CLI (in main) > PHAROS_RPC > env/.env > config file.
        builder = builder.add_source(Environment::default());

        let mut settings = Self::from_builder(builder)?;
        if let Ok(rpc) = std::env::var("PHAROS_RPC") {
            let trimmed = rpc.trim();
            if !trimmed.is_empty() {
                settings.rpc_url = trimmed.to_string();
            }
        }
        Ok(settings)
    }

    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            debug: self.debug,
            json: self.log_json,
        }
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, AppError> {
        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn validated_rpc_url(&self) -> Result<Url, AppError> {
        let url = Url::parse(self.rpc_url.trim())
            .map_err(|e| AppError::Config(format!("Invalid rpc_url '{}': {}", self.rpc_url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(AppError::Config(format!(
                "rpc_url must be http(s), got scheme '{other}'"
            ))),
        }
    }

    pub fn router_address(&self) -> Result<Address, AppError> {
        let address = match self.router {
            RouterChoice::Faroswap => self.faroswap_router,
            RouterChoice::Zenithswap => self.zenithswap_router.ok_or_else(|| {
                AppError::Config(
                    "zenithswap selected but ZENITHSWAP_ROUTER / zenithswap_router is not set"
                        .into(),
                )
            })?,
        };
        if address == Address::ZERO {
            return Err(AppError::Config(format!(
                "{:?} router address is the zero address",
                self.router
            )));
        }
        Ok(address)
    }

    pub fn gas_fees(&self) -> Result<GasFees, AppError> {
        GasFees::fixed_gwei(self.max_fee_gwei, self.priority_fee_gwei)
    }

    pub fn receipt_policy(&self) -> Result<ReceiptPolicy, AppError> {
        if self.receipt_timeout_secs == 0 {
            return Err(AppError::Config(
                "receipt_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(ReceiptPolicy::new(
            Duration::from_secs(self.receipt_timeout_secs),
            Duration::from_millis(self.receipt_poll_ms),
        ))
    }

    pub fn delay(&self) -> Result<Duration, AppError> {
        if !self.delay_secs.is_finite() || self.delay_secs < 0.0 {
            return Err(AppError::Config(format!(
                "delay_secs must be a non-negative number, got {}",
                self.delay_secs
            )));
        }
        Ok(Duration::from_secs_f64(self.delay_secs))
    }

    /// Token set with duplicates removed, order kept.
    pub fn token_set(&self) -> Vec<Token> {
        let mut out: Vec<Token> = Vec::with_capacity(self.tokens.len());
        for token in &self.tokens {
            if !out.contains(token) {
                out.push(*token);
            }
        }
        out
    }

    /// Everything the engine needs, checked before any chain interaction.
    pub fn run_parameters(&self) -> Result<RunParameters, AppError> {
        if self.chain_id == 0 {
            return Err(AppError::Config("chain_id must be non-zero".into()));
        }
        self.validated_rpc_url()?;
        let router = self.router_address()?;
        let delay = self.delay()?;
        let tokens = self.token_set();

        self.native_amount
            .to_base_units(constants::NATIVE_DECIMALS)
            .map_err(|e| AppError::Config(format!("native_amount: {e}")))?;

        if self.swap_count > 0 || self.liquidity_count > 0 {
            if tokens.len() < 2 {
                return Err(AppError::Config(format!(
                    "tokens must list at least two distinct tokens, got {}",
                    tokens.len()
                )));
            }
            for token in &tokens {
                self.token_amount
                    .to_base_units(token.decimals())
                    .map_err(|e| AppError::Config(format!("token_amount for {token}: {e}")))?;
            }
        }

        Ok(RunParameters {
            router,
            transfer_count: self.transfer_count,
            swap_count: self.swap_count,
            liquidity_count: self.liquidity_count,
            native_amount: self.native_amount.clone(),
            token_amount: self.token_amount.clone(),
            delay,
            tokens,
        })
    }
}
