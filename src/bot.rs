use crate::config::Config;
use crate::handlers::{OnboardingHandler, OnboardingSettings};
use crate::storage::SqliteStorage;
use crate::transport::TelegramTransport;
use crate::utils::parse_command;
use crate::wallet_client::WalletClient;
use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Message};
use tracing::{info, warn};

pub async fn start_bot(bot: Bot, config: Config) -> Result<()> {
    info!("Bot is starting...");

    let storage = SqliteStorage::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    info!("Connected to database");

    let handler = Arc::new(OnboardingHandler::new(
        Arc::new(storage),
        Arc::new(TelegramTransport::new(bot.clone())),
        Arc::new(WalletClient::new(
            config.wallet_connect_url.clone(),
            config.wallet_connect_api_key.clone(),
        )),
        OnboardingSettings {
            channel_id: config.channel_id,
            channel_link: config.channel_link.clone(),
            social_link: config.social_link.clone(),
        },
    ));

    let handler_clone1 = handler.clone();
    let handler_clone2 = handler.clone();
    let update_handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter(|msg: Message| msg.text().is_some())
                .endpoint(move |msg: Message| {
                    let handler = handler_clone1.clone();
                    async move { handle_messages(msg, handler).await }
                }),
        )
        .branch(
            Update::filter_callback_query()
                .endpoint(move |bot: Bot, q: CallbackQuery| {
                    let handler = handler_clone2.clone();
                    async move { handle_callback(bot, q, handler).await }
                }),
        );

    Dispatcher::builder(bot, update_handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_messages(msg: Message, handler: Arc<OnboardingHandler>) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;
    let text = msg.text().unwrap_or_default();

    match parse_command(text) {
        Some("/start") => {
            if let Some(user) = msg.from() {
                info!("/start from user {} in chat {}", user.id.0, chat_id);
                handler.handle_start(user.id.0 as i64, chat_id).await;
            }
        }
        _ => handler.handle_unknown_command(chat_id).await,
    }

    Ok(())
}

async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    handler: Arc<OnboardingHandler>,
) -> ResponseResult<()> {
    // Stops the loading indicator on the pressed button.
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        warn!("Failed to answer callback query: {}", e);
    }

    let Some(data) = q.data else {
        return Ok(());
    };

    let user_id = q.from.id.0 as i64;
    let chat_id = q
        .message
        .as_ref()
        .map(|m| m.chat.id.0)
        .unwrap_or(user_id);

    info!("Callback {:?} from user {} in chat {}", data, user_id, chat_id);
    handler.handle_callback(&data, user_id, chat_id).await;

    Ok(())
}
