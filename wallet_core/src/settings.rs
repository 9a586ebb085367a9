//! Persisted user settings.

use std::sync::Arc;

use pocket_store::KeyValueStore;
use pocket_types::NetworkId;
use serde::{Deserialize, Serialize};

use crate::WalletError;

/// Store key of the settings record.
pub const SETTINGS_KEY: &str = "pocket_wallet_settings";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_network")]
    pub network: NetworkId,
    /// Asset codes shown on the home screen.
    #[serde(default = "default_tokens")]
    pub tokens: Vec<String>,
}

fn default_network() -> NetworkId {
    NetworkId::Test
}

fn default_tokens() -> Vec<String> {
    vec!["XLM".to_string()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            network: default_network(),
            tokens: default_tokens(),
        }
    }
}

pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored settings, or the defaults when none (or unreadable ones) are stored.
    pub fn load(&self) -> Result<Settings, WalletError> {
        let Some(raw) = self.store.get(SETTINGS_KEY)? else {
            return Ok(Settings::default());
        };
        match serde_json::from_str(&raw) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!(error = %e, "stored settings unreadable, using defaults");
                Ok(Settings::default())
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<(), WalletError> {
        let raw = serde_json::to_string(settings)
            .map_err(|e| WalletError::StorageFailure(format!("encode settings: {e}")))?;
        self.store.put(SETTINGS_KEY, &raw)?;
        Ok(())
    }
}
