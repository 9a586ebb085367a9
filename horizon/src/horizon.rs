//! Horizon REST implementation of [`LedgerClient`].

use std::time::Duration;

use async_trait::async_trait;
use pocket_types::{AccountAddress, NetworkId};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::client::LedgerClient;
use crate::failure;
use crate::types::{AccountRecord, Order, SubmitResponse, TransactionRecord};
use crate::LedgerError;

/// HTTP client for a Horizon server.
///
/// Wraps `reqwest::Client` with the server's base URL and, on test networks,
/// the faucet URL.
#[derive(Clone, Debug)]
pub struct HorizonClient {
    http: reqwest::Client,
    base_url: String,
    friendbot_url: Option<String>,
}

#[derive(Deserialize)]
struct Page<T> {
    #[serde(rename = "_embedded")]
    embedded: Embedded<T>,
}

#[derive(Deserialize)]
struct Embedded<T> {
    records: Vec<T>,
}

impl HorizonClient {
    /// Create a client for `base_url` (e.g. `https://horizon-testnet.stellar.org`).
    pub fn new(
        base_url: impl Into<String>,
        friendbot_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| LedgerError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            friendbot_url,
        })
    }

    /// A client for the network's public Horizon endpoint.
    pub fn for_network(network: NetworkId, timeout: Duration) -> Result<Self, LedgerError> {
        Self::new(
            network.horizon_url(),
            network.friendbot_url().map(str::to_string),
            timeout,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, LedgerError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| LedgerError::Transport(format!("request failed: {e}")))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(LedgerError::NotFound),
            status if !status.is_success() => {
                return Err(LedgerError::Transport(format!("horizon returned HTTP {status}")))
            }
            _ => {}
        }

        response
            .json()
            .await
            .map_err(|e| LedgerError::InvalidResponse(format!("invalid JSON response: {e}")))
    }
}

#[async_trait]
impl LedgerClient for HorizonClient {
    async fn load_account(&self, account: &AccountAddress) -> Result<AccountRecord, LedgerError> {
        let url = format!("{}/accounts/{}", self.base_url, account);
        tracing::debug!(%url, "loading account");
        self.get_json(&url).await
    }

    async fn submit_transaction(&self, envelope_xdr: &str) -> Result<SubmitResponse, LedgerError> {
        let url = format!("{}/transactions", self.base_url);
        let response = self
            .http
            .post(&url)
            .form(&[("tx", envelope_xdr)])
            .send()
            .await
            .map_err(|e| LedgerError::Transport(format!("request failed: {e}")))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(LedgerError::Transport(format!("horizon returned HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LedgerError::Transport(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            let reason = failure::from_response_body(&body);
            tracing::debug!(%status, %reason, "submission rejected");
            return Err(LedgerError::Rejected(reason));
        }

        let accepted: SubmitResponse = serde_json::from_str(&body)
            .map_err(|e| LedgerError::InvalidResponse(format!("invalid submit response: {e}")))?;
        if !accepted.successful {
            return Err(LedgerError::Rejected(failure::from_response_body(&body)));
        }
        Ok(accepted)
    }

    async fn list_transactions(
        &self,
        account: &AccountAddress,
        limit: u32,
        order: Order,
    ) -> Result<Vec<TransactionRecord>, LedgerError> {
        let url = format!(
            "{}/accounts/{}/transactions?limit={}&order={}",
            self.base_url,
            account,
            limit,
            order.as_str()
        );
        let page: Page<TransactionRecord> = self.get_json(&url).await?;
        Ok(page.embedded.records)
    }

    async fn fund_account(&self, account: &AccountAddress) -> Result<(), LedgerError> {
        let Some(friendbot) = &self.friendbot_url else {
            return Err(LedgerError::FundingRefused(
                "no faucet on this network".to_string(),
            ));
        };

        let response = self
            .http
            .get(friendbot)
            .query(&[("addr", account.as_str())])
            .send()
            .await
            .map_err(|e| LedgerError::Transport(format!("request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status.is_server_error() {
            return Err(LedgerError::Transport(format!("faucet returned HTTP {status}")));
        }
        let body = response.text().await.unwrap_or_default();
        Err(LedgerError::FundingRefused(format!("HTTP {status}: {body}")))
    }
}
