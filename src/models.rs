//! Row types persisted by [`crate::storage::SqliteStorage`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const CHANNEL_BUTTON: &str = "Channel";
pub const SOCIAL_BUTTON: &str = "Social";
pub const WALLET_BUTTON: &str = "Wallet";

/// Buttons registered when the database is first created.
pub const DEFAULT_BUTTONS: [&str; 3] = [CHANNEL_BUTTON, SOCIAL_BUTTON, WALLET_BUTTON];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub telegram_id: i64,
    pub join_date: DateTime<Utc>,
    pub channel_subscribed: bool,
    pub social_subscribed: bool,
    pub wallet_connected: bool,
}

impl User {
    /// A not-yet-persisted user with every requirement unmet.
    pub fn new(telegram_id: i64) -> Self {
        Self {
            id: 0,
            telegram_id,
            join_date: Utc::now(),
            channel_subscribed: false,
            social_subscribed: false,
            wallet_connected: false,
        }
    }

    pub fn is_fully_subscribed(&self) -> bool {
        self.channel_subscribed && self.social_subscribed
    }

    pub fn is_fully_onboarded(&self) -> bool {
        self.is_fully_subscribed() && self.wallet_connected
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Button {
    pub id: i64,
    pub name: String,
    pub flag: bool,
}

impl Button {
    pub fn is_subscription(&self) -> bool {
        self.name == CHANNEL_BUTTON || self.name == SOCIAL_BUTTON
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ButtonPress {
    pub id: i64,
    pub telegram_id: i64,
    pub button_name: String,
    pub pressed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WalletConnection {
    pub id: i64,
    pub telegram_id: i64,
    pub wallet_id: String,
    pub connected_at: DateTime<Utc>,
}
