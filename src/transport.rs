//! Outbound side of the chat platform: sending messages and checking
//! channel membership.

use crate::error::TransportError;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, UserId};

/// Inline keyboard: ordered rows of `(label, action)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<(String, String)>>,
}

impl Keyboard {
    pub fn single_row<I, L, A>(buttons: I) -> Self
    where
        I: IntoIterator<Item = (L, A)>,
        L: Into<String>,
        A: Into<String>,
    {
        let row: Vec<(String, String)> = buttons
            .into_iter()
            .map(|(label, action)| (label.into(), action.into()))
            .collect();

        if row.is_empty() {
            Self::default()
        } else {
            Self { rows: vec![row] }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.is_empty())
    }

    pub fn actions(&self) -> Vec<&str> {
        self.rows
            .iter()
            .flatten()
            .map(|(_, action)| action.as_str())
            .collect()
    }
}

impl From<&Keyboard> for InlineKeyboardMarkup {
    fn from(keyboard: &Keyboard) -> Self {
        InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
            row.iter()
                .map(|(label, action)| InlineKeyboardButton::callback(label.clone(), action.clone()))
                .collect::<Vec<_>>()
        }))
    }
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError>;

    /// Whether `user_id` is currently a member, administrator or owner of `chat_id`.
    async fn is_chat_member(&self, chat_id: i64, user_id: i64) -> Result<bool, TransportError>;
}

#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError> {
        let mut message = self.bot.send_message(ChatId(chat_id), text);

        if let Some(kb) = keyboard.filter(|kb| !kb.is_empty()) {
            message = message.reply_markup(InlineKeyboardMarkup::from(kb));
        }

        message.await?;
        Ok(())
    }

    async fn is_chat_member(&self, chat_id: i64, user_id: i64) -> Result<bool, TransportError> {
        let member = self
            .bot
            .get_chat_member(ChatId(chat_id), UserId(user_id as u64))
            .await?;

        Ok(member.is_owner() || member.is_administrator() || member.is_member())
    }
}
