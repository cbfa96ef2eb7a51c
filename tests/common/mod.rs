//! Shared fixtures: temp-file SQLite storage, a recording chat transport and a
//! scripted wallet connector.

#![allow(dead_code)]

use async_trait::async_trait;
use onboarding_bot::{
    ChatTransport, Keyboard, OnboardingHandler, OnboardingSettings, SqliteStorage,
    TransportError, WalletConnector, WalletError, WalletLink,
};
use reqwest::StatusCode;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use teloxide::{ApiError, RequestError};
use tempfile::TempDir;

pub const CHANNEL_ID: i64 = -1002214927764;
pub const CHANNEL_LINK: &str = "https://t.me/test_channel";
pub const SOCIAL_LINK: &str = "https://twitter.com/test_handle";

/// Opens a fresh database in a temp dir. Keep the `TempDir` alive for the test.
pub async fn new_storage() -> (SqliteStorage, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}", dir.path().join("test.db").display());
    let storage = SqliteStorage::new(&url)
        .await
        .expect("Failed to create storage");
    (storage, dir)
}

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<SentMessage>>,
    is_member: AtomicBool,
    membership_checks: AtomicUsize,
    fail_sends: AtomicBool,
    fail_membership: AtomicBool,
}

fn bot_blocked() -> TransportError {
    TransportError::Telegram(RequestError::Api(ApiError::BotBlocked))
}

impl RecordingTransport {
    pub fn set_member(&self, is_member: bool) {
        self.is_member.store(is_member, Ordering::SeqCst);
    }

    /// Every send is attempted and recorded, then reported as failed.
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_membership(&self, fail: bool) {
        self.fail_membership.store(fail, Ordering::SeqCst);
    }

    pub fn membership_checks(&self) -> usize {
        self.membership_checks.load(Ordering::SeqCst)
    }

    /// Returns and clears everything sent so far.
    pub fn take_sent(&self) -> Vec<SentMessage> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }

    pub fn take_texts(&self) -> Vec<String> {
        self.take_sent().into_iter().map(|m| m.text).collect()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(bot_blocked());
        }
        Ok(())
    }

    async fn is_chat_member(&self, _chat_id: i64, _user_id: i64) -> Result<bool, TransportError> {
        self.membership_checks.fetch_add(1, Ordering::SeqCst);
        if self.fail_membership.load(Ordering::SeqCst) {
            return Err(bot_blocked());
        }
        Ok(self.is_member.load(Ordering::SeqCst))
    }
}

pub struct ScriptedWallet {
    wallet_id: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedWallet {
    pub fn succeeding(wallet_id: &str) -> Self {
        Self {
            wallet_id: Some(wallet_id.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            wallet_id: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletConnector for ScriptedWallet {
    async fn connect(&self, _user_id: i64) -> Result<WalletLink, WalletError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.wallet_id {
            Some(wallet_id) => Ok(WalletLink {
                wallet_id: wallet_id.clone(),
            }),
            None => Err(WalletError::UnexpectedStatus(StatusCode::INTERNAL_SERVER_ERROR)),
        }
    }
}

pub struct Harness {
    pub handler: OnboardingHandler,
    pub storage: Arc<SqliteStorage>,
    pub transport: Arc<RecordingTransport>,
    pub wallet: Arc<ScriptedWallet>,
    _dir: TempDir,
}

pub async fn harness(wallet: ScriptedWallet) -> Harness {
    let (storage, dir) = new_storage().await;
    let storage = Arc::new(storage);
    let transport = Arc::new(RecordingTransport::default());
    let wallet = Arc::new(wallet);

    let handler = OnboardingHandler::new(
        storage.clone(),
        transport.clone(),
        wallet.clone(),
        OnboardingSettings {
            channel_id: CHANNEL_ID,
            channel_link: CHANNEL_LINK.to_string(),
            social_link: SOCIAL_LINK.to_string(),
        },
    );

    Harness {
        handler,
        storage,
        transport,
        wallet,
        _dir: dir,
    }
}
