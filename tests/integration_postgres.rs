#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc, unreachable_pub, clippy::print_stdout)]
use homechat_server::domain::message::NewMessage;
use homechat_server::storage::{MessageStore, PgStore, StorageError};
use reqwest::StatusCode;
use std::sync::Arc;
use uuid::Uuid;

mod common;

async fn test_store() -> Option<PgStore> {
    let Ok(url) = std::env::var("HOMECHAT_TEST_DATABASE_URL") else {
        println!("HOMECHAT_TEST_DATABASE_URL not set, skipping");
        return None;
    };

    common::setup_tracing();
    let store = PgStore::connect(&url, 5).await.expect("Failed to connect to DB. Is Postgres running?");
    store.migrate().await.expect("Failed to run migrations");
    Some(store)
}

// One test owns the shared database so nothing races on the message table.
#[tokio::test]
async fn test_postgres_store_end_to_end() {
    let Some(store) = test_store().await else {
        return;
    };

    // Users
    let name = format!("pg_user_{}", &Uuid::new_v4().simple().to_string()[..8]);
    assert!(store.get_user_by_username(&name).await.unwrap().is_none());
    let created = store.create_user(&name).await.unwrap();
    assert_eq!(store.get_user_by_username(&name).await.unwrap(), Some(created));
    assert!(matches!(store.create_user(&name).await, Err(StorageError::UserExists(_))));

    // Messages keep insertion order and survive a round trip verbatim.
    store.delete_all_messages().await.unwrap();
    for i in 0..5 {
        store.create_message(NewMessage { sender: "akshu".into(), text: format!("  pg {i}\n") }).await.unwrap();
    }
    let texts: Vec<String> = store.get_all_messages().await.unwrap().into_iter().map(|m| m.text).collect();
    let expected: Vec<String> = (0..5).map(|i| format!("  pg {i}\n")).collect();
    assert_eq!(texts, expected);

    store.delete_all_messages().await.unwrap();
    store.delete_all_messages().await.unwrap();
    assert!(store.get_all_messages().await.unwrap().is_empty());
    store.ping().await.unwrap();

    // Same behaviour through the HTTP surface.
    let app = common::TestApp::spawn_with_store(common::get_test_config(), Arc::new(store)).await;
    assert_eq!(app.login("akshu").await.status(), StatusCode::OK);
    assert_eq!(app.login("akshu").await.status(), StatusCode::OK);
    assert_eq!(app.send("paru", "hi").await.status(), StatusCode::OK);
    assert_eq!(app.messages().await.len(), 1);
    assert_eq!(app.delete_all().await.status(), StatusCode::OK);
    assert!(app.messages().await.is_empty());
}
