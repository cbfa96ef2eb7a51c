//! Error types for the onboarding bot.
//!
//! Each collaborator of the handler has its own error enum so call sites
//! match on the kind instead of comparing against sentinel values.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the persistence layer.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

/// Errors returned by the chat transport (message send, membership lookup).
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Telegram request failed: {0}")]
    Telegram(#[from] teloxide::RequestError),
}

/// Errors returned by the wallet-connect service client.
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Failed to send request to wallet service: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unexpected wallet service status: {0}")]
    UnexpectedStatus(StatusCode),
}

/// Failure of a single inbound event. Logged and dropped by the handler.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Wallet(#[from] WalletError),
}
