//! Pocket wallet command line.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use pocket_horizon::HorizonClient;
use pocket_store_lmdb::LmdbStore;
use pocket_types::{AssetKind, NetworkId, SystemClock};
use pocket_utils::LogFormat;
use pocket_wallet_core::{
    AccountSnapshot, PaymentRequest, Receipt, Settings, Wallet, WalletConfig, WalletError,
};

#[derive(Parser)]
#[command(name = "pocket", about = "Pocket custodial wallet")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "POCKET_CONFIG")]
    config: Option<PathBuf>,

    /// Network: "testnet" or "mainnet".
    #[arg(long, env = "POCKET_NETWORK")]
    network: Option<NetworkId>,

    /// Directory holding the wallet store.
    #[arg(long, env = "POCKET_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Horizon endpoint (defaults to the network's public server).
    #[arg(long, env = "POCKET_HORIZON_URL")]
    horizon_url: Option<String>,

    /// Network request timeout in seconds.
    #[arg(long, env = "POCKET_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Log format: "human" or "json".
    #[arg(long, env = "POCKET_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "POCKET_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Create a new wallet and print its backup phrase.
    Create {
        #[arg(long, env = "POCKET_PIN")]
        pin: String,
        /// Skip the faucet request on testnet.
        #[arg(long)]
        no_fund: bool,
    },
    /// Restore a wallet from its 12-word backup phrase.
    Restore {
        #[arg(long)]
        phrase: String,
        #[arg(long, env = "POCKET_PIN")]
        pin: String,
    },
    /// Print the stored wallet's address (no PIN needed).
    Address,
    /// Show balances and account state.
    Balance {
        #[arg(long, env = "POCKET_PIN")]
        pin: String,
    },
    /// List recent transactions.
    History {
        #[arg(long, env = "POCKET_PIN")]
        pin: String,
    },
    /// Fund the account from the testnet faucet.
    Fund {
        #[arg(long, env = "POCKET_PIN")]
        pin: String,
    },
    /// Enable the issued asset (add a trustline).
    Trust {
        #[arg(long, env = "POCKET_PIN")]
        pin: String,
    },
    /// Remove the (empty) issued-asset trustline.
    Untrust {
        #[arg(long, env = "POCKET_PIN")]
        pin: String,
    },
    /// Send a payment.
    Send {
        #[arg(long, env = "POCKET_PIN")]
        pin: String,
        #[command(flatten)]
        payment: PaymentArgs,
    },
    /// Try the wallet with simulated funds; nothing is stored or sent.
    Demo {
        /// Make a simulated payment to this destination before printing the balance.
        #[arg(long, requires = "amount")]
        to: Option<String>,
        #[arg(long, requires = "to")]
        amount: Option<String>,
        #[arg(long, default_value = "XLM")]
        asset: AssetKind,
    },
    /// Show or change stored settings.
    Settings {
        /// Replace the displayed token list (comma-separated codes).
        #[arg(long, value_delimiter = ',')]
        tokens: Option<Vec<String>>,
    },
    /// Delete the wallet from this device.
    Wipe {
        /// Confirm the irreversible deletion.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(clap::Args)]
struct PaymentArgs {
    /// Destination account id.
    #[arg(long)]
    to: String,
    /// Decimal amount, e.g. "2.5".
    #[arg(long)]
    amount: String,
    /// "XLM" or "USDC".
    #[arg(long, default_value = "XLM")]
    asset: AssetKind,
    #[arg(long)]
    memo: Option<String>,
}

impl PaymentArgs {
    fn request(&self) -> PaymentRequest {
        let request = PaymentRequest::new(&self.to, &self.amount, self.asset);
        match &self.memo {
            Some(memo) => request.with_memo(memo),
            None => request,
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<WalletConfig> {
    let mut config = match &cli.config {
        Some(path) => WalletConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => WalletConfig::default(),
    };

    if let Some(network) = cli.network {
        config.network = network;
    }
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(url) = &cli.horizon_url {
        config.horizon_url = Some(url.clone());
    }
    if let Some(secs) = cli.timeout_secs {
        config.request_timeout_secs = secs;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config.validate()?;
    Ok(config)
}

fn open_wallet(config: WalletConfig) -> anyhow::Result<Wallet> {
    let store = LmdbStore::open(&config.data_dir)
        .with_context(|| format!("opening wallet store in {}", config.data_dir.display()))?;
    let friendbot = config.network.friendbot_url().map(str::to_string);
    let ledger = HorizonClient::new(config.horizon_url(), friendbot, config.request_timeout())?;
    Ok(Wallet::new(
        config,
        Arc::new(store),
        Arc::new(ledger),
        Arc::new(SystemClock),
    ))
}

fn print_snapshot(snapshot: &AccountSnapshot) {
    println!("address: {}", snapshot.address);
    println!("state:   {:?}", snapshot.state());
    println!("XLM:     {}", snapshot.native_balance);
    match snapshot.issued_balance {
        Some(balance) => println!("USDC:    {balance}"),
        None => println!("USDC:    not enabled"),
    }
}

fn print_receipt(receipt: &Receipt) {
    if receipt.simulated {
        println!("simulated payment {}", receipt.id);
    } else {
        println!("confirmed {} in ledger {}", receipt.id, receipt.ledger);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    pocket_utils::init_logging(config.log_format, &config.log_level)?;

    tracing::debug!(
        network = %config.network,
        horizon = config.horizon_url(),
        data_dir = %config.data_dir.display(),
        "configuration loaded"
    );

    let network = config.network;
    let mut wallet = open_wallet(config)?;

    match cli.command {
        Command::Create { pin, no_fund } => {
            let created = wallet.create_wallet(&pin)?;
            println!("address: {}", created.public_key);
            println!("backup phrase (write it down, it is shown once):");
            for (i, word) in created.backup_phrase_words.iter().enumerate() {
                println!("{:>2}. {word}", i + 1);
            }
            if network == NetworkId::Test && !no_fund {
                match wallet.fund().await {
                    Ok(snapshot) => println!("funded with {} XLM", snapshot.native_balance),
                    Err(e) => tracing::warn!(error = %e, "testnet funding failed"),
                }
            }
        }
        Command::Restore { phrase, pin } => {
            let address = wallet.restore_wallet(&phrase, &pin)?;
            println!("restored {address}");
        }
        Command::Address => match wallet.record()? {
            Some(record) => println!("{}", record.public_key),
            None => return Err(WalletError::NoWalletFound.into()),
        },
        Command::Balance { pin } => {
            wallet.unlock(&pin)?;
            print_snapshot(&wallet.refresh_snapshot().await?);
        }
        Command::History { pin } => {
            wallet.unlock(&pin)?;
            for tx in wallet.recent_transactions().await? {
                let status = if tx.successful { "ok" } else { "failed" };
                println!(
                    "{}  {}  {:<6}  {}",
                    tx.created_at.format("%Y-%m-%d %H:%M"),
                    &tx.id[..tx.id.len().min(12)],
                    status,
                    tx.memo.unwrap_or_default()
                );
            }
        }
        Command::Fund { pin } => {
            wallet.unlock(&pin)?;
            print_snapshot(&wallet.fund().await?);
        }
        Command::Trust { pin } => {
            wallet.unlock(&pin)?;
            print_receipt(&wallet.add_trustline().await?);
        }
        Command::Untrust { pin } => {
            wallet.unlock(&pin)?;
            print_receipt(&wallet.remove_trustline().await?);
        }
        Command::Send { pin, payment } => {
            wallet.unlock(&pin)?;
            print_receipt(&wallet.send(&payment.request()).await?);
        }
        Command::Demo { to, amount, asset } => {
            wallet.start_demo();
            if let (Some(to), Some(amount)) = (to, amount) {
                let request = PaymentRequest::new(to, amount, asset);
                print_receipt(&wallet.send(&request).await?);
            }
            if let Some(snapshot) = wallet.snapshot() {
                print_snapshot(snapshot);
            }
            wallet.exit_demo();
        }
        Command::Settings { tokens } => {
            let mut settings: Settings = wallet.settings()?;
            if let Some(tokens) = tokens {
                settings.tokens = tokens;
                wallet.save_settings(&settings)?;
            }
            println!("network: {}", settings.network);
            println!("tokens:  {}", settings.tokens.join(", "));
        }
        Command::Wipe { yes } => {
            if !yes {
                bail!("refusing to wipe without --yes");
            }
            wallet.wipe()?;
            println!("wallet deleted");
        }
    }

    wallet.logout();
    Ok(())
}
