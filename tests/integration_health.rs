#![allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::missing_panics_doc,
    missing_debug_implementations,
    unreachable_pub,
)]
use reqwest::StatusCode;
use serde_json::Value;
use starcast_server::config::DeployMode;

mod common;

#[tokio::test]
async fn test_livez() {
    let app = common::TestApp::spawn().await;

    let resp = app.client.get(format!("{}/livez", app.mgmt_url)).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readyz_with_configured_provider() {
    let app = common::TestApp::spawn().await;

    let resp = app.client.get(format!("{}/readyz", app.mgmt_url)).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["mode"], "production");
    assert_eq!(body["providers"]["primary"], "configured");
    assert_eq!(body["localStore"], "disabled");
}

#[tokio::test]
async fn test_readyz_fails_without_credentials_in_production() {
    let app = common::TestApp::spawn_with_config(common::get_test_config()).await;

    let resp = app.client.get(format!("{}/readyz", app.mgmt_url)).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["providers"]["resend"], "missing");
    assert_eq!(body["providers"]["smtp"], "missing");
}

#[tokio::test]
async fn test_readyz_preview_needs_only_the_local_store() {
    let mut config = common::get_test_config();
    config.mode = DeployMode::Preview;
    let app = common::TestApp::spawn_with_config(config).await;

    let resp = app.client.get(format!("{}/readyz", app.mgmt_url)).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["mode"], "preview");
    assert_eq!(body["localStore"], "ok");
}

#[tokio::test]
async fn test_readyz_preview_reports_corrupt_store() {
    let mut config = common::get_test_config();
    config.mode = DeployMode::Preview;
    std::fs::write(&config.local_store.path, b"{ not json").unwrap();
    let app = common::TestApp::spawn_with_config(config).await;

    let resp = app.client.get(format!("{}/readyz", app.mgmt_url)).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["localStore"], "error");

    app.cleanup();
}
