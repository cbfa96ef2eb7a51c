use crate::error::WalletError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Wallet id recorded when the service confirms the link without naming the wallet.
pub const PLACEHOLDER_WALLET_ID: &str = "wallet_id_placeholder";

#[derive(Debug, Serialize)]
pub struct ConnectWalletRequest {
    pub user_id: i64,
}

#[derive(Debug, Default, Deserialize)]
struct ConnectWalletResponse {
    #[serde(default)]
    wallet_id: Option<String>,
}

/// Outcome of a successful connect call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletLink {
    pub wallet_id: String,
}

#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Single attempt, no retry. Anything other than HTTP 200 is a failure.
    async fn connect(&self, user_id: i64) -> Result<WalletLink, WalletError>;
}

pub struct WalletClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl WalletClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl WalletConnector for WalletClient {
    async fn connect(&self, user_id: i64) -> Result<WalletLink, WalletError> {
        let url = format!("{}/connect_wallet", self.base_url);
        debug!("Wallet connect request URL: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&ConnectWalletRequest { user_id })
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(WalletError::UnexpectedStatus(response.status()));
        }

        let body = response.text().await?;
        let parsed: ConnectWalletResponse = serde_json::from_str(&body).unwrap_or_default();

        Ok(WalletLink {
            wallet_id: parsed
                .wallet_id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_WALLET_ID.to_string()),
        })
    }
}
