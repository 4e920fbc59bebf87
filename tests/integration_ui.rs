#![allow(clippy::unwrap_used, clippy::missing_panics_doc, unreachable_pub)]
use homechat_server::client::formulas::SECTIONS;
use reqwest::StatusCode;

mod common;

async fn index_page(app: &common::TestApp) -> String {
    let resp = app.client.get(format!("{}/", app.server_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.text().await.unwrap()
}

#[tokio::test]
async fn test_index_serves_browser_client() {
    let app = common::TestApp::spawn().await;

    let resp = app.client.get(format!("{}/", app.server_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let body = resp.text().await.unwrap();
    assert!(body.contains("/api/messages"));
    assert!(body.contains("sessionStorage"));
}

#[tokio::test]
async fn test_index_keeps_polling_hooks() {
    let app = common::TestApp::spawn().await;
    let body = index_page(&app).await;

    assert!(body.contains("setInterval(refetch, POLL_MS)"));
    assert!(body.contains(r#"addEventListener("focus", refetch)"#));
    assert!(body.contains(r#"addEventListener("pagehide", stopPolling)"#));
    // Polling must come back when the page returns from the back/forward cache.
    assert!(body.contains(r#"addEventListener("pageshow""#));
    assert!(body.contains("Are you sure you want to delete all messages? This cannot be undone."));
}

#[tokio::test]
async fn test_index_carries_physics_reference() {
    let app = common::TestApp::spawn().await;
    let body = index_page(&app).await;

    assert!(body.contains(r#"id="open-physics""#));
    for section in SECTIONS {
        assert!(body.contains(&format!("title: \"{}\"", section.title)), "missing section {}", section.title);
        for formula in section.formulas {
            assert!(body.contains(&format!("\"{}\"", formula.name)), "missing {}", formula.name);
            assert!(body.contains(&format!("\"{}\"", formula.formula)), "missing {}", formula.formula);
            assert!(body.contains(&format!("\"{}\"", formula.description)), "missing {}", formula.description);
        }
    }
}

#[tokio::test]
async fn test_index_has_theme_toggle() {
    let app = common::TestApp::spawn().await;
    let body = index_page(&app).await;

    assert!(body.contains(r#"id="theme-toggle""#));
    assert!(body.contains(r#":root[data-theme="dark"]"#));
    assert!(body.contains(r#"THEME_KEY = "homechatTheme""#));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = common::TestApp::spawn().await;

    let resp = app.client.get(format!("{}/api/nope", app.server_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
