use std::{net::SocketAddr, sync::Arc};

use clap::{Parser, Subcommand};
use log::{error, info};
use tokio::signal;
use wallet::HdWallet;

mod biz;
mod config;
mod data;
mod error;
mod network;
mod schema;

use biz::{ChainQuery, SessionOptions, SessionStorage, SessionStore, WalletAdapter, TEST_MNEMONIC};
use config::Config;
use data::{HeadlessHost, MemoryStorage, RestQuery, SledStorage};
use error::Error;
use network::http;

/// The command of tinydapp
#[derive(Debug, Parser)]
struct Opts {
    #[command(subcommand)]
    subcmd: SubCommand,
}

#[derive(Debug, Subcommand)]
enum SubCommand {
    /// Run the wallet session server
    Run {
        /// the config file path, default is `config.toml`
        #[arg(short, long, default_value_t = String::from("config.toml"))]
        config: String,
    },
    /// List the wallets available in this environment
    Wallets {
        /// the config file path, default is `config.toml`
        #[arg(short, long, default_value_t = String::from("config.toml"))]
        config: String,
    },
    /// Print the address of the built-in test wallet
    TestAccount {
        /// the bech32 prefix, default is `myblockchain`
        #[arg(short, long, default_value_t = String::from("myblockchain"))]
        prefix: String,
    },
    /// Create a new account with a fresh 24-word mnemonic
    NewAccount {
        /// the bech32 prefix, default is `myblockchain`
        #[arg(short, long, default_value_t = String::from("myblockchain"))]
        prefix: String,
    },
    /// Query the balance of an address
    Balance {
        /// the config file path, default is `config.toml`
        #[arg(short, long, default_value_t = String::from("config.toml"))]
        config: String,
        /// the bech32 address to query
        address: String,
    },
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    let opts = Opts::parse();

    let res = match opts.subcmd {
        SubCommand::Run { config } => run(&config).await,
        SubCommand::Wallets { config } => list_wallets(&config),
        SubCommand::TestAccount { prefix } => test_account(&prefix),
        SubCommand::NewAccount { prefix } => new_account(&prefix),
        SubCommand::Balance { config, address } => balance(&config, &address).await,
    };

    if let Err(e) = res {
        error!("❌ {e}");
        std::process::exit(1);
    }
}

fn new_adapter(config: &Config) -> WalletAdapter<RestQuery> {
    let query = RestQuery::new(&config.chain.rest, config.session.query_timeout());
    WalletAdapter::new(config.chain.clone(), query, Arc::new(HeadlessHost))
}

fn list_wallets(config_file: &str) -> Result<(), Error> {
    let config = Config::load(config_file)?;

    for wallet in new_adapter(&config).discover_wallets() {
        info!("📣 {}: {}", wallet.name, wallet.description);
    }
    Ok(())
}

fn test_account(prefix: &str) -> Result<(), Error> {
    let wallet = HdWallet::from_mnemonic(TEST_MNEMONIC, prefix)?;
    info!("📣 Test account: {}", wallet.address());
    Ok(())
}

fn new_account(prefix: &str) -> Result<(), Error> {
    let (mnemonic, wallet) = HdWallet::generate(prefix)?;
    info!("📣 New account: {}", wallet.address());
    info!("📣 Mnemonic (keep it secret): {mnemonic}");
    Ok(())
}

async fn balance(config_file: &str, address: &str) -> Result<(), Error> {
    let config = Config::load(config_file)?;
    let adapter = new_adapter(&config);

    let amount = adapter.query_balance(address).await?;
    info!(
        "📣 {address}: {} {}",
        schema::format_amount(&amount, config.chain.coin_decimals),
        config.chain.display_denom()
    );
    Ok(())
}

async fn run(config_file: &str) -> Result<(), Error> {
    let config = Config::load(config_file)?;
    let http_addr: SocketAddr = config.http_addr.parse()?;
    let adapter = new_adapter(&config);
    let options = SessionOptions::from(&config);

    if config.data_dir.is_empty() {
        serve(http_addr, adapter, MemoryStorage::new(), options).await;
    } else {
        let storage = SledStorage::new(&config.data_dir)?;
        serve(http_addr, adapter, storage, options).await;
    }
    Ok(())
}

async fn serve<Q: ChainQuery, K: SessionStorage>(
    http_addr: SocketAddr,
    adapter: WalletAdapter<Q>,
    storage: K,
    options: SessionOptions,
) {
    let decimals = adapter.chain().coin_decimals;
    let denom = adapter.chain().display_denom();
    let store = SessionStore::open(adapter, storage, options).await;

    match store.connected_wallet() {
        Some(wallet) => info!(
            "📣 Resumed {} session: {} ({} {denom})",
            wallet.name,
            wallet.short_address(8, 6),
            wallet.display_balance(decimals)
        ),
        None => info!("📣 No wallet connected"),
    }

    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ Failed to listen for shutdown signal: {e}");
        }
    };
    http::run(http_addr, store.clone(), shutdown).await;

    store.close();
    info!("📣 Bye");
}
