//! Onboarding flow: `/start`, callback buttons and unknown commands.
//!
//! Each public method handles one inbound event start to finish. Failures are
//! logged and swallowed here; nothing propagates back to the dispatcher.

use crate::error::HandlerError;
use crate::models::{User, CHANNEL_BUTTON, SOCIAL_BUTTON, WALLET_BUTTON};
use crate::storage::Storage;
use crate::transport::{ChatTransport, Keyboard};
use crate::utils::{self, connected_user_keyboard, subscription_keyboard, subscription_link};
use crate::wallet_client::WalletConnector;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Where the subscription requirements point users to.
#[derive(Debug, Clone)]
pub struct OnboardingSettings {
    pub channel_id: i64,
    pub channel_link: String,
    pub social_link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Channel,
    Social,
    Wallet,
}

impl Action {
    fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case(CHANNEL_BUTTON) {
            Some(Action::Channel)
        } else if name.eq_ignore_ascii_case(SOCIAL_BUTTON) {
            Some(Action::Social)
        } else if name.eq_ignore_ascii_case(WALLET_BUTTON) {
            Some(Action::Wallet)
        } else {
            None
        }
    }
}

pub struct OnboardingHandler {
    storage: Arc<dyn Storage>,
    transport: Arc<dyn ChatTransport>,
    wallet: Arc<dyn WalletConnector>,
    settings: OnboardingSettings,
}

impl OnboardingHandler {
    pub fn new(
        storage: Arc<dyn Storage>,
        transport: Arc<dyn ChatTransport>,
        wallet: Arc<dyn WalletConnector>,
        settings: OnboardingSettings,
    ) -> Self {
        Self {
            storage,
            transport,
            wallet,
            settings,
        }
    }

    pub async fn handle_start(&self, user_id: i64, chat_id: i64) {
        if let Err(e) = self.start(user_id, chat_id).await {
            error!("Failed to handle /start for user {}: {}", user_id, e);
        }
    }

    pub async fn handle_callback(&self, action: &str, user_id: i64, chat_id: i64) {
        if let Err(e) = self.callback(action, user_id, chat_id).await {
            error!(
                "Failed to handle callback {:?} for user {}: {}",
                action, user_id, e
            );
        }
    }

    pub async fn handle_unknown_command(&self, chat_id: i64) {
        self.send(chat_id, utils::UNKNOWN_COMMAND, None).await;
    }

    async fn start(&self, user_id: i64, chat_id: i64) -> Result<(), HandlerError> {
        let user = match self.storage.get_user(user_id).await {
            Ok(user) => user,
            Err(e) if e.is_not_found() => {
                let user = self.storage.create_user(&User::new(user_id)).await?;
                info!("New user joined: {}", user_id);
                self.send(chat_id, utils::WELCOME, None).await;
                user
            }
            Err(e) => return Err(e.into()),
        };

        if !user.channel_subscribed {
            self.send(chat_id, utils::CHANNEL_REMINDER, None).await;
        }
        if !user.social_subscribed {
            self.send(chat_id, utils::SOCIAL_REMINDER, None).await;
        }

        if user.is_fully_subscribed() {
            let keyboard = self.connected_user_keyboard().await;
            self.send(chat_id, utils::FULLY_SUBSCRIBED, Some(&keyboard)).await;
        } else {
            self.send(chat_id, utils::CHOOSE_ACTION, Some(&subscription_keyboard()))
                .await;
        }

        Ok(())
    }

    async fn callback(&self, action: &str, user_id: i64, chat_id: i64) -> Result<(), HandlerError> {
        let button = match self.storage.get_button(action).await {
            Ok(button) => button,
            Err(e) if e.is_not_found() => {
                warn!("Callback for unregistered button {:?} from user {}", action, user_id);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if button.flag {
            self.send(chat_id, utils::ALREADY_DONE, None).await;
            return Ok(());
        }

        self.storage.record_button_press(user_id, &button.name).await?;

        match Action::from_name(&button.name) {
            Some(Action::Channel) => self.check_channel(user_id, chat_id).await,
            Some(Action::Social) => self.check_social(user_id, chat_id).await,
            Some(Action::Wallet) => self.connect_wallet(user_id, chat_id).await,
            None => {
                warn!("Unknown callback data: {}", button.name);
                Ok(())
            }
        }
    }

    async fn check_channel(&self, user_id: i64, chat_id: i64) -> Result<(), HandlerError> {
        let user = self.storage.get_user(user_id).await?;

        let is_member = match self
            .transport
            .is_chat_member(self.settings.channel_id, user_id)
            .await
        {
            Ok(is_member) => is_member,
            Err(e) => {
                warn!("Failed to check channel membership for user {}: {}", user_id, e);
                false
            }
        };

        if !is_member {
            self.send(chat_id, utils::CHANNEL_PROMPT, None).await;
            self.send(chat_id, &subscription_link(&self.settings.channel_link), None)
                .await;
            return Ok(());
        }

        if !user.channel_subscribed {
            let user = User {
                channel_subscribed: true,
                ..user
            };
            self.storage.update_user(&user).await?;
            info!("User {} subscribed to the channel", user_id);
        }

        self.send(chat_id, utils::CHANNEL_CONFIRMED, None).await;
        Ok(())
    }

    // The social requirement has no external check; the stored flag is authoritative.
    async fn check_social(&self, user_id: i64, chat_id: i64) -> Result<(), HandlerError> {
        let user = self.storage.get_user(user_id).await?;

        if user.social_subscribed {
            self.send(chat_id, utils::SOCIAL_CONFIRMED, None).await;
        } else {
            self.send(chat_id, utils::SOCIAL_PROMPT, None).await;
            self.send(chat_id, &subscription_link(&self.settings.social_link), None)
                .await;
        }
        Ok(())
    }

    async fn connect_wallet(&self, user_id: i64, chat_id: i64) -> Result<(), HandlerError> {
        self.storage.get_user(user_id).await?;

        let link = self.wallet.connect(user_id).await?;
        let user = self
            .storage
            .complete_wallet_connection(user_id, &link.wallet_id)
            .await?;

        if user.is_fully_onboarded() {
            let keyboard = self.connected_user_keyboard().await;
            self.send(chat_id, utils::WALLET_ALL_DONE, Some(&keyboard)).await;
        } else {
            self.send(chat_id, utils::WALLET_PARTIAL, None).await;
        }
        Ok(())
    }

    async fn connected_user_keyboard(&self) -> Keyboard {
        match self.storage.list_buttons().await {
            Ok(buttons) => connected_user_keyboard(&buttons),
            Err(e) => {
                error!("Failed to get buttons from database: {}", e);
                Keyboard::default()
            }
        }
    }

    async fn send(&self, chat_id: i64, text: &str, keyboard: Option<&Keyboard>) {
        if let Err(e) = self.transport.send_message(chat_id, text, keyboard).await {
            error!("Failed to send message to chat {}: {}", chat_id, e);
        }
    }
}
