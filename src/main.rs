// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use clap::Parser;
use oxidity_farmer::app::config::{GlobalSettings, RouterChoice};
use oxidity_farmer::app::keys::load_private_key;
use oxidity_farmer::app::logging::{LogOptions, setup_logging};
use oxidity_farmer::common::parsing::parse_address_hex;
use oxidity_farmer::domain::error::AppError;
use oxidity_farmer::domain::token::TokenAmount;
use oxidity_farmer::network::client::RpcChainClient;
use oxidity_farmer::services::farming::preflight::preflight;
use oxidity_farmer::services::farming::{Engine, TxSigner};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Sequential testnet activity runner")]
struct Cli {
    /// Path to config file (default: config.{toml,yaml,...})
    #[arg(long)]
    config: Option<String>,

    /// DEX router to use for swaps and liquidity
    #[arg(long, value_enum)]
    router: Option<RouterChoice>,

    /// Zenithswap router address (overrides config/env)
    #[arg(long)]
    zenithswap_router: Option<String>,

    /// Number of native transfers
    #[arg(long)]
    transfers: Option<u32>,

    /// Number of swaps
    #[arg(long)]
    swaps: Option<u32>,

    /// Number of liquidity adds
    #[arg(long)]
    liquidity_adds: Option<u32>,

    /// Native amount per transfer, e.g. 0.001
    #[arg(long)]
    native_amount: Option<TokenAmount>,

    /// Token amount per swap / liquidity side
    #[arg(long)]
    token_amount: Option<TokenAmount>,

    /// Seconds to wait after each action
    #[arg(long)]
    delay: Option<f64>,

    /// JSON-RPC endpoint (overrides PHAROS_RPC and config)
    #[arg(long)]
    rpc_url: Option<String>,

    /// Seed for token selection
    #[arg(long)]
    seed: Option<u64>,

    /// Emit JSON log lines
    #[arg(long, default_value_t = false)]
    log_json: bool,

    /// Debug-level logging
    #[arg(long, default_value_t = false)]
    debug: bool,
}

impl Cli {
    fn apply(&self, settings: &mut GlobalSettings) -> Result<(), AppError> {
        if let Some(router) = self.router {
            settings.router = router;
        }
        if let Some(raw) = &self.zenithswap_router {
            let address = parse_address_hex(raw).ok_or_else(|| {
                AppError::Config(format!("Invalid --zenithswap-router address: {raw}"))
            })?;
            settings.zenithswap_router = Some(address);
        }
        if let Some(n) = self.transfers {
            settings.transfer_count = n;
        }
        if let Some(n) = self.swaps {
            settings.swap_count = n;
        }
        if let Some(n) = self.liquidity_adds {
            settings.liquidity_count = n;
        }
        if let Some(amount) = &self.native_amount {
            settings.native_amount = amount.clone();
        }
        if let Some(amount) = &self.token_amount {
            settings.token_amount = amount.clone();
        }
        if let Some(delay) = self.delay {
            settings.delay_secs = delay;
        }
        if let Some(url) = &self.rpc_url {
            settings.rpc_url = url.clone();
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let loaded = GlobalSettings::load_with_path(cli.config.as_deref());

    // A config that fails to load still gets its error logged with the CLI switches.
    let mut log = LogOptions {
        debug: cli.debug,
        json: cli.log_json,
    };
    if let Ok(settings) = &loaded {
        log = log.merge(settings.log_options());
    }
    setup_logging(log.level(), log.json);

    match run(cli, loaded).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(target: "engine", kind = e.kind(), "{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, loaded: Result<GlobalSettings, AppError>) -> Result<(), AppError> {
    let mut settings = loaded?;
    cli.apply(&mut settings)?;

    let params = settings.run_parameters()?;
    let fees = settings.gas_fees()?;
    let receipt_policy = settings.receipt_policy()?;
    tracing::info!(
        target: "config",
        router = ?settings.router,
        router_address = %format!("{:#x}", params.router),
        transfers = params.transfer_count,
        swaps = params.swap_count,
        liquidity_adds = params.liquidity_count,
        delay_secs = params.delay.as_secs_f64(),
        "Run parameters loaded"
    );

    let signer = {
        let key = load_private_key(&settings.private_key_path)?;
        TxSigner::from_private_key(&key)?
    };
    tracing::info!(
        target: "config",
        address = %format!("{:#x}", signer.address()),
        "Using account"
    );

    let client = RpcChainClient::connect(&settings.rpc_url, settings.chain_id, fees).await?;

    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let address = signer.address();
    let mut engine = Engine::initialize(
        client,
        signer,
        settings.chain_id,
        receipt_policy,
        params,
        rng,
    )
    .await?;
    preflight(engine.client(), address, engine.parameters()).await;
    engine.run().await?;
    Ok(())
}
