//! Telegram onboarding bot: walks users through a channel subscription, a
//! social subscription and a wallet connection, tracking progress in SQLite.

pub mod bot;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod storage;
pub mod transport;
pub mod utils;
pub mod wallet_client;

pub use error::{HandlerError, StorageError, TransportError, WalletError};
pub use handlers::{OnboardingHandler, OnboardingSettings};
pub use storage::{SqliteStorage, Storage};
pub use transport::{ChatTransport, Keyboard, TelegramTransport};
pub use wallet_client::{WalletClient, WalletConnector, WalletLink};
