use anyhow::Result;
use onboarding_bot::bot;
use onboarding_bot::config::Config;
use teloxide::prelude::*;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting onboarding bot...");
    info!("Database URL: {}", config.database_url);
    info!("Wallet connect URL: {}", config.wallet_connect_url);

    let bot = Bot::new(&config.telegram_token);

    bot::start_bot(bot, config).await?;

    Ok(())
}
