//! Wallet configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use pocket_types::{Amount, NetworkId};
use pocket_utils::LogFormat;

use crate::WalletError;

/// Configuration for a wallet process.
///
/// Can be loaded from a TOML file via [`WalletConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default, so an
/// empty file is a valid configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Which network to use; fixes passphrase, Horizon URL and issuer.
    #[serde(default = "default_network")]
    pub network: NetworkId,

    /// Directory holding the local wallet store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Overrides the network's public Horizon endpoint.
    #[serde(default)]
    pub horizon_url: Option<String>,

    /// Upper bound on every network call, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Number of recent transactions fetched on refresh.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    #[serde(default)]
    pub kdf: KdfConfig,

    #[serde(default)]
    pub demo: DemoConfig,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter (e.g. "info", "debug,pocket_wallet_core=trace").
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Argon2id cost parameters for new wallets.
///
/// Existing wallets always unlock with the parameters recorded in their blob.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfConfig {
    #[serde(default = "default_kdf_memory_kib")]
    pub memory_kib: u32,
    #[serde(default = "default_kdf_iterations")]
    pub iterations: u32,
    #[serde(default = "default_kdf_parallelism")]
    pub parallelism: u32,
}

/// Demo-mode fixture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Artificial confirmation delay for simulated sends, in milliseconds.
    #[serde(default = "default_demo_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_demo_native_balance")]
    pub native_balance: Amount,
    #[serde(default = "default_demo_issued_balance")]
    pub issued_balance: Amount,
}

fn default_network() -> NetworkId {
    NetworkId::Test
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./pocket-data")
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_history_limit() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_kdf_memory_kib() -> u32 {
    64 * 1024
}

fn default_kdf_iterations() -> u32 {
    3
}

fn default_kdf_parallelism() -> u32 {
    1
}

fn default_demo_delay_ms() -> u64 {
    1500
}

fn default_demo_native_balance() -> Amount {
    Amount::from_stroops(105_000_000)
}

fn default_demo_issued_balance() -> Amount {
    Amount::from_units(15)
}

impl WalletConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, WalletError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| WalletError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, WalletError> {
        let config: Self = toml::from_str(s).map_err(|e| WalletError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, WalletError> {
        toml::to_string_pretty(self).map_err(|e| WalletError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), WalletError> {
        if self.request_timeout_secs == 0 {
            return Err(WalletError::Config("request_timeout_secs must be > 0".into()));
        }
        if self.kdf.iterations == 0 || self.kdf.parallelism == 0 {
            return Err(WalletError::Config(
                "kdf iterations and parallelism must be > 0".into(),
            ));
        }
        if self.kdf.memory_kib < 8 * self.kdf.parallelism {
            return Err(WalletError::Config(
                "kdf memory_kib must be at least 8 × parallelism".into(),
            ));
        }
        if self.demo.native_balance.stroops() < 0 || self.demo.issued_balance.stroops() < 0 {
            return Err(WalletError::Config("demo balances must not be negative".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Horizon endpoint: the override if set, else the network's default.
    pub fn horizon_url(&self) -> &str {
        self.horizon_url
            .as_deref()
            .unwrap_or_else(|| self.network.horizon_url())
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            data_dir: default_data_dir(),
            horizon_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            history_limit: default_history_limit(),
            kdf: KdfConfig::default(),
            demo: DemoConfig::default(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_kdf_memory_kib(),
            iterations: default_kdf_iterations(),
            parallelism: default_kdf_parallelism(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_demo_delay_ms(),
            native_balance: default_demo_native_balance(),
            issued_balance: default_demo_issued_balance(),
        }
    }
}

impl DemoConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
