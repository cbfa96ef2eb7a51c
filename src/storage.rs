//! Persistence gateway: users, buttons and the append-only audit tables.
//!
//! [`Storage`] is the surface the handler consumes; [`SqliteStorage`] backs it
//! with SQLite via sqlx and creates its schema on startup.

use crate::error::StorageError;
use crate::models::{Button, ButtonPress, User, WalletConnection, DEFAULT_BUTTONS, WALLET_BUTTON};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Returns [`StorageError::NotFound`] when no user has this Telegram id.
    async fn get_user(&self, telegram_id: i64) -> Result<User, StorageError>;
    async fn create_user(&self, user: &User) -> Result<User, StorageError>;
    /// Flags are only ever raised: a `false` in `user` leaves the stored value as is.
    async fn update_user(&self, user: &User) -> Result<(), StorageError>;

    /// Returns [`StorageError::NotFound`] when no button has this name. Names match ignoring case.
    async fn get_button(&self, name: &str) -> Result<Button, StorageError>;
    async fn update_button(&self, button: &Button) -> Result<(), StorageError>;
    async fn list_buttons(&self) -> Result<Vec<Button>, StorageError>;

    async fn record_button_press(&self, telegram_id: i64, button_name: &str) -> Result<(), StorageError>;
    async fn record_wallet_connection(&self, telegram_id: i64, wallet_id: &str) -> Result<(), StorageError>;

    /// Appends the wallet connection, flags the wallet button and marks the
    /// user as connected in one transaction. Returns the updated user.
    async fn complete_wallet_connection(&self, telegram_id: i64, wallet_id: &str) -> Result<User, StorageError>;
}

#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Opens (creating if missing) the database at `database_url`, creates the
    /// tables and registers the default buttons.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        info!("Initializing SQLite pool: {}", database_url);

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Every connection to an in-memory database sees its own empty schema.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let storage = Self { pool };
        storage.init().await?;
        Ok(storage)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating database tables if not exist");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                telegram_id INTEGER NOT NULL UNIQUE,
                join_date TEXT NOT NULL,
                channel_subscribed BOOLEAN NOT NULL DEFAULT 0,
                social_subscribed BOOLEAN NOT NULL DEFAULT 0,
                wallet_connected BOOLEAN NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS buttons (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE COLLATE NOCASE,
                flag BOOLEAN NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS button_presses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                telegram_id INTEGER NOT NULL,
                button_name TEXT NOT NULL,
                pressed_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS wallet_connections (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                telegram_id INTEGER NOT NULL,
                wallet_id TEXT NOT NULL,
                connected_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_button_presses_telegram_id ON button_presses(telegram_id);
            CREATE INDEX IF NOT EXISTS idx_wallet_connections_telegram_id ON wallet_connections(telegram_id);
            "#,
        )
        .execute(&self.pool)
        .await?;

        for name in DEFAULT_BUTTONS {
            self.create_button(name).await?;
        }

        info!("Database tables created successfully");
        Ok(())
    }

    /// Registers a button with `flag = false`. An existing button is left untouched.
    pub async fn create_button(&self, name: &str) -> Result<(), StorageError> {
        sqlx::query("INSERT OR IGNORE INTO buttons (name, flag) VALUES (?, 0)")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn button_presses(&self, telegram_id: i64) -> Result<Vec<ButtonPress>, StorageError> {
        let presses = sqlx::query_as::<_, ButtonPress>(
            "SELECT * FROM button_presses WHERE telegram_id = ? ORDER BY id",
        )
        .bind(telegram_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(presses)
    }

    pub async fn wallet_connections(
        &self,
        telegram_id: i64,
    ) -> Result<Vec<WalletConnection>, StorageError> {
        let connections = sqlx::query_as::<_, WalletConnection>(
            "SELECT * FROM wallet_connections WHERE telegram_id = ? ORDER BY id",
        )
        .bind(telegram_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(connections)
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn get_user(&self, telegram_id: i64) -> Result<User, StorageError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE telegram_id = ?")
            .bind(telegram_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("user {}", telegram_id)))
    }

    async fn create_user(&self, user: &User) -> Result<User, StorageError> {
        sqlx::query(
            r#"
            INSERT INTO users (telegram_id, join_date, channel_subscribed, social_subscribed, wallet_connected)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.telegram_id)
        .bind(user.join_date)
        .bind(user.channel_subscribed)
        .bind(user.social_subscribed)
        .bind(user.wallet_connected)
        .execute(&self.pool)
        .await?;

        info!("Created user: telegram_id={}", user.telegram_id);
        self.get_user(user.telegram_id).await
    }

    async fn update_user(&self, user: &User) -> Result<(), StorageError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET channel_subscribed = channel_subscribed OR ?,
                social_subscribed = social_subscribed OR ?,
                wallet_connected = wallet_connected OR ?
            WHERE telegram_id = ?
            "#,
        )
        .bind(user.channel_subscribed)
        .bind(user.social_subscribed)
        .bind(user.wallet_connected)
        .bind(user.telegram_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("user {}", user.telegram_id)));
        }
        Ok(())
    }

    async fn get_button(&self, name: &str) -> Result<Button, StorageError> {
        sqlx::query_as::<_, Button>("SELECT * FROM buttons WHERE name = ? COLLATE NOCASE")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("button {}", name)))
    }

    async fn update_button(&self, button: &Button) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE buttons SET flag = flag OR ? WHERE name = ? COLLATE NOCASE")
            .bind(button.flag)
            .bind(&button.name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("button {}", button.name)));
        }
        Ok(())
    }

    async fn list_buttons(&self) -> Result<Vec<Button>, StorageError> {
        let buttons = sqlx::query_as::<_, Button>("SELECT * FROM buttons ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(buttons)
    }

    async fn record_button_press(&self, telegram_id: i64, button_name: &str) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO button_presses (telegram_id, button_name, pressed_at) VALUES (?, ?, ?)")
            .bind(telegram_id)
            .bind(button_name)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn record_wallet_connection(&self, telegram_id: i64, wallet_id: &str) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO wallet_connections (telegram_id, wallet_id, connected_at) VALUES (?, ?, ?)")
            .bind(telegram_id)
            .bind(wallet_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn complete_wallet_connection(&self, telegram_id: i64, wallet_id: &str) -> Result<User, StorageError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO wallet_connections (telegram_id, wallet_id, connected_at) VALUES (?, ?, ?)")
            .bind(telegram_id)
            .bind(wallet_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        let flagged = sqlx::query("UPDATE buttons SET flag = 1 WHERE name = ?")
            .bind(WALLET_BUTTON)
            .execute(&mut *tx)
            .await?;
        if flagged.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("button {}", WALLET_BUTTON)));
        }

        let connected = sqlx::query("UPDATE users SET wallet_connected = 1 WHERE telegram_id = ?")
            .bind(telegram_id)
            .execute(&mut *tx)
            .await?;
        if connected.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("user {}", telegram_id)));
        }

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE telegram_id = ?")
            .bind(telegram_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            "Recorded wallet connection: telegram_id={}, wallet_id={}",
            telegram_id, wallet_id
        );
        Ok(user)
    }
}
