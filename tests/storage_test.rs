//! Integration tests for [`onboarding_bot::SqliteStorage`] on a temp-file database.

mod common;

use common::new_storage;
use onboarding_bot::models::{Button, User, DEFAULT_BUTTONS, WALLET_BUTTON};
use onboarding_bot::{SqliteStorage, Storage, StorageError};

#[tokio::test]
async fn test_new_registers_default_buttons() {
    let (storage, _dir) = new_storage().await;

    let buttons = storage.list_buttons().await.expect("Failed to list buttons");
    let names: Vec<&str> = buttons.iter().map(|b| b.name.as_str()).collect();

    assert_eq!(names, DEFAULT_BUTTONS.to_vec());
    assert!(buttons.iter().all(|b| !b.flag));
}

/// **Test: Reopening an existing database keeps button flags.**
#[tokio::test]
async fn test_reopen_does_not_reset_flags() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("reopen.db").display());

    {
        let storage = SqliteStorage::new(&url).await.unwrap();
        let mut button = storage.get_button(WALLET_BUTTON).await.unwrap();
        button.flag = true;
        storage.update_button(&button).await.unwrap();
    }

    let storage = SqliteStorage::new(&url).await.unwrap();
    assert!(storage.get_button(WALLET_BUTTON).await.unwrap().flag);
    assert_eq!(storage.list_buttons().await.unwrap().len(), DEFAULT_BUTTONS.len());
}

#[tokio::test]
async fn test_missing_user_and_button_are_not_found() {
    let (storage, _dir) = new_storage().await;

    let user = storage.get_user(1).await;
    assert!(matches!(user, Err(StorageError::NotFound(_))));

    let button = storage.get_button("Nope").await;
    assert!(matches!(button, Err(StorageError::NotFound(_))));
}

#[tokio::test]
async fn test_create_and_get_user() {
    let (storage, _dir) = new_storage().await;

    let created = storage.create_user(&User::new(42)).await.unwrap();
    let fetched = storage.get_user(42).await.unwrap();

    assert_eq!(created, fetched);
    assert!(fetched.id > 0);
    assert_eq!(fetched.telegram_id, 42);
    assert!(!fetched.channel_subscribed);
    assert!(!fetched.social_subscribed);
    assert!(!fetched.wallet_connected);
}

#[tokio::test]
async fn test_duplicate_user_is_rejected() {
    let (storage, _dir) = new_storage().await;

    storage.create_user(&User::new(42)).await.unwrap();
    let second = storage.create_user(&User::new(42)).await;

    assert!(matches!(second, Err(StorageError::Database(_))));
}

/// **Test: Flags are only ever raised by updates.**
#[tokio::test]
async fn test_update_user_never_lowers_flags() {
    let (storage, _dir) = new_storage().await;
    let user = storage.create_user(&User::new(7)).await.unwrap();

    storage
        .update_user(&User {
            channel_subscribed: true,
            wallet_connected: true,
            ..user.clone()
        })
        .await
        .unwrap();

    storage
        .update_user(&User {
            social_subscribed: true,
            ..user
        })
        .await
        .unwrap();

    let stored = storage.get_user(7).await.unwrap();
    assert!(stored.channel_subscribed);
    assert!(stored.social_subscribed);
    assert!(stored.wallet_connected);
}

#[tokio::test]
async fn test_update_button_never_lowers_flag() {
    let (storage, _dir) = new_storage().await;
    let mut button = storage.get_button(WALLET_BUTTON).await.unwrap();

    button.flag = true;
    storage.update_button(&button).await.unwrap();
    button.flag = false;
    storage.update_button(&button).await.unwrap();

    assert!(storage.get_button(WALLET_BUTTON).await.unwrap().flag);
}

#[tokio::test]
async fn test_updates_of_missing_rows_are_not_found() {
    let (storage, _dir) = new_storage().await;

    let user = storage.update_user(&User::new(99)).await;
    assert!(matches!(user, Err(StorageError::NotFound(_))));

    let button = storage
        .update_button(&Button {
            id: 0,
            name: "Nope".to_string(),
            flag: true,
        })
        .await;
    assert!(matches!(button, Err(StorageError::NotFound(_))));
}

#[tokio::test]
async fn test_audit_rows_are_appended() {
    let (storage, _dir) = new_storage().await;

    storage.record_button_press(5, "Channel").await.unwrap();
    storage.record_button_press(5, "Channel").await.unwrap();
    storage.record_button_press(6, "Social").await.unwrap();
    storage.record_wallet_connection(5, "EQone").await.unwrap();

    let presses = storage.button_presses(5).await.unwrap();
    assert_eq!(presses.len(), 2);
    assert!(presses.iter().all(|p| p.button_name == "Channel"));
    assert_eq!(storage.button_presses(6).await.unwrap().len(), 1);

    let connections = storage.wallet_connections(5).await.unwrap();
    assert_eq!(connections.len(), 1);
    assert_eq!(connections[0].wallet_id, "EQone");
}

#[tokio::test]
async fn test_complete_wallet_connection_updates_everything() {
    let (storage, _dir) = new_storage().await;
    storage.create_user(&User::new(11)).await.unwrap();

    let user = storage.complete_wallet_connection(11, "EQtx").await.unwrap();

    assert!(user.wallet_connected);
    assert!(storage.get_button(WALLET_BUTTON).await.unwrap().flag);
    assert_eq!(storage.wallet_connections(11).await.unwrap().len(), 1);
}

/// **Test: A failed wallet completion rolls back the appended connection.**
#[tokio::test]
async fn test_complete_wallet_connection_for_missing_user_rolls_back() {
    let (storage, _dir) = new_storage().await;

    let result = storage.complete_wallet_connection(12, "EQtx").await;

    assert!(matches!(result, Err(StorageError::NotFound(_))));
    assert!(storage.wallet_connections(12).await.unwrap().is_empty());
    assert!(!storage.get_button(WALLET_BUTTON).await.unwrap().flag);
}

#[tokio::test]
async fn test_button_names_ignore_case() {
    let (storage, _dir) = new_storage().await;

    let button = storage.get_button("wallet").await.unwrap();
    assert_eq!(button.name, WALLET_BUTTON);

    storage.create_button("WALLET").await.unwrap();
    assert_eq!(storage.list_buttons().await.unwrap().len(), DEFAULT_BUTTONS.len());

    storage
        .update_button(&Button {
            id: 0,
            name: "wallet".to_string(),
            flag: true,
        })
        .await
        .unwrap();
    assert!(storage.get_button(WALLET_BUTTON).await.unwrap().flag);
}
