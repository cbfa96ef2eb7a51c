use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_token: String,
    pub database_url: String,
    pub wallet_connect_url: String,
    pub wallet_connect_api_key: String,
    pub channel_id: i64,
    pub channel_link: String,
    pub social_link: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let channel_id = env::var("CHANNEL_ID")
            .context("CHANNEL_ID environment variable is required")?;

        Ok(Self {
            telegram_token: env::var("TELEGRAM_BOT_TOKEN")
                .context("TELEGRAM_BOT_TOKEN environment variable is required")?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://onboarding.db".to_string()),
            wallet_connect_url: env::var("WALLET_CONNECT_URL")
                .unwrap_or_else(|_| "https://example.com/tonconnect-manifest.json".to_string()),
            wallet_connect_api_key: env::var("WALLET_CONNECT_API_KEY").unwrap_or_default(),
            channel_id: channel_id
                .trim()
                .parse()
                .with_context(|| format!("CHANNEL_ID must be a numeric chat id, got {:?}", channel_id))?,
            channel_link: env::var("CHANNEL_LINK")
                .unwrap_or_else(|_| "https://web.telegram.org/k/#-2214927764".to_string()),
            social_link: env::var("SOCIAL_LINK")
                .unwrap_or_else(|_| "https://twitter.com/yourTwitterHandle".to_string()),
        })
    }
}
