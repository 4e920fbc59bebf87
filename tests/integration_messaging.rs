#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc, unreachable_pub)]
use futures::future::join_all;
use reqwest::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_login_send_list_clear_flow() {
    let app = common::TestApp::spawn().await;

    assert_eq!(app.login("akshu").await.status(), StatusCode::OK);
    assert_eq!(app.login("random").await.status(), StatusCode::FORBIDDEN);

    let resp = app.send("akshu", "hi").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let sent: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(sent["message"]["sender"], "akshu");
    assert_eq!(sent["message"]["text"], "hi");

    let messages = app.messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["sender"], "akshu");
    assert_eq!(messages[0]["text"], "hi");
    assert_eq!(messages[0]["id"], sent["message"]["id"]);
    assert!(messages[0]["timestamp"].as_str().is_some());

    let resp = app.delete_all().await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "All messages deleted");

    assert!(app.messages().await.is_empty());
}

#[tokio::test]
async fn test_messages_keep_creation_order() {
    let app = common::TestApp::spawn().await;

    for i in 0..10 {
        let sender = if i % 2 == 0 { "akshu" } else { "paru" };
        assert_eq!(app.send(sender, &format!("message {i}")).await.status(), StatusCode::OK);
    }

    let messages = app.messages().await;
    let texts: Vec<&str> = messages.iter().map(|m| m["text"].as_str().unwrap()).collect();
    let expected: Vec<String> = (0..10).map(|i| format!("message {i}")).collect();
    assert_eq!(texts, expected);
}

#[tokio::test]
async fn test_concurrent_sends_all_land() {
    let app = common::TestApp::spawn().await;

    let texts: Vec<String> = (0..20).map(|i| format!("burst {i}")).collect();
    let sends = texts.iter().map(|text| app.send("paru", text));
    let responses = join_all(sends).await;
    assert!(responses.iter().all(|r| r.status() == StatusCode::OK));

    let messages = app.messages().await;
    assert_eq!(messages.len(), 20);

    let mut ids: Vec<&str> = messages.iter().map(|m| m["id"].as_str().unwrap()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 20);
}

#[tokio::test]
async fn test_text_is_stored_verbatim() {
    let app = common::TestApp::spawn().await;
    let text = "  line one\nline two  ✨ <b>not html</b>";

    assert_eq!(app.send("akshu", text).await.status(), StatusCode::OK);

    let messages = app.messages().await;
    assert_eq!(messages[0]["text"], text);
}

#[tokio::test]
async fn test_unknown_sender_is_forbidden() {
    let app = common::TestApp::spawn().await;

    let resp = app.send("mallory", "let me in").await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Unauthorized sender");

    assert!(app.messages().await.is_empty());
}

#[tokio::test]
async fn test_invalid_message_shapes() {
    let app = common::TestApp::spawn().await;
    let url = format!("{}/api/messages", app.server_url);

    assert_eq!(app.send("akshu", "").await.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.send("", "hi").await.status(), StatusCode::BAD_REQUEST);

    let missing_text = app.client.post(&url).json(&json!({ "sender": "akshu" })).send().await.unwrap();
    assert_eq!(missing_text.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = missing_text.json().await.unwrap();
    assert_eq!(body["message"], "Invalid message data");

    let wrong_type = app.client.post(&url).json(&json!({ "sender": "akshu", "text": 5 })).send().await.unwrap();
    assert_eq!(wrong_type.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = wrong_type.json().await.unwrap();
    assert_eq!(body["message"], "Invalid message data");

    // Shape errors win over authorization.
    assert_eq!(app.send("mallory", "").await.status(), StatusCode::BAD_REQUEST);

    assert!(app.messages().await.is_empty());
}

#[tokio::test]
async fn test_whitespace_only_text_is_stored() {
    let app = common::TestApp::spawn().await;

    // Only an empty string is invalid; content is never trimmed.
    assert_eq!(app.send("akshu", "   \n ").await.status(), StatusCode::OK);

    let messages = app.messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["text"], "   \n ");
}

#[tokio::test]
async fn test_message_length_limit() {
    let mut config = common::get_test_config();
    config.chat.max_message_chars = 10;
    let app = common::TestApp::spawn_with_config(config).await;

    assert_eq!(app.send("akshu", "éééééééééé").await.status(), StatusCode::OK);
    assert_eq!(app.send("akshu", "12345678901").await.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.messages().await.len(), 1);
}

#[tokio::test]
async fn test_delete_all_is_idempotent() {
    let app = common::TestApp::spawn().await;

    app.send("paru", "one").await;
    app.send("akshu", "two").await;

    assert_eq!(app.delete_all().await.status(), StatusCode::OK);
    assert_eq!(app.delete_all().await.status(), StatusCode::OK);
    assert!(app.messages().await.is_empty());

    // The conversation keeps working after a clear.
    assert_eq!(app.send("paru", "three").await.status(), StatusCode::OK);
    assert_eq!(app.messages().await.len(), 1);
}

#[tokio::test]
async fn test_send_does_not_require_login() {
    let app = common::TestApp::spawn().await;

    // Sender identity is checked against the allow-list only.
    assert_eq!(app.send("paru", "no session").await.status(), StatusCode::OK);
}
