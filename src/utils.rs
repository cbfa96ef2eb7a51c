use crate::models::{Button, CHANNEL_BUTTON, SOCIAL_BUTTON};
use crate::transport::Keyboard;

pub const WELCOME: &str = "Добро пожаловать! Пожалуйста, проверьте подписки и подключите кошелек.";
pub const CHANNEL_REMINDER: &str = "Пожалуйста, подпишитесь на наш Telegram канал.";
pub const SOCIAL_REMINDER: &str = "Пожалуйста, подпишитесь на наш Twitter.";
pub const CHOOSE_ACTION: &str = "Выберите действие:";
pub const FULLY_SUBSCRIBED: &str = "Поздравляем! Вы подписаны на все каналы. Выберите действие:";
pub const ALREADY_DONE: &str = "Действие уже выполнено.";

pub const CHANNEL_CONFIRMED: &str = "Вы уже подписаны на канал!";
pub const CHANNEL_PROMPT: &str = "Пожалуйста, подпишитесь на наш канал и нажмите кнопку снова.";
pub const SOCIAL_CONFIRMED: &str = "Вы уже подписаны на Twitter!";
pub const SOCIAL_PROMPT: &str = "Пожалуйста, подпишитесь на наш Twitter и нажмите кнопку снова.";

pub const WALLET_ALL_DONE: &str =
    "Поздравляем! Вы подписаны на все каналы и подключили кошелек. Выберите другую кнопку.";
pub const WALLET_PARTIAL: &str = "Подключение завершено! Проверьте подписки и подключение кошелька.";

pub const UNKNOWN_COMMAND: &str = "Команда не распознана. Пожалуйста, используйте команду /start.";

pub fn subscription_link(link: &str) -> String {
    format!("Перейдите по ссылке для подписки: {}", link)
}

/// The two subscription actions shown until both subscriptions are confirmed.
pub fn subscription_keyboard() -> Keyboard {
    Keyboard::single_row([
        ("Подписка на Telegram", CHANNEL_BUTTON),
        ("Подписка на Twitter", SOCIAL_BUTTON),
    ])
}

/// Every registered button except the subscription ones, labelled by name.
pub fn connected_user_keyboard(buttons: &[Button]) -> Keyboard {
    Keyboard::single_row(
        buttons
            .iter()
            .filter(|button| !button.is_subscription())
            .map(|button| (button.name.clone(), button.name.clone())),
    )
}

/// Extracts the command from message text: `/start@my_bot payload` -> `/start`.
pub fn parse_command(text: &str) -> Option<&str> {
    let first = text.split_whitespace().next()?;
    if !first.starts_with('/') {
        return None;
    }
    Some(first.split('@').next().unwrap_or(first))
}
