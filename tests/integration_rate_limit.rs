#![allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::missing_panics_doc,
    missing_debug_implementations,
    unreachable_pub,
)]
use axum::http::StatusCode;

mod common;

fn throttled_config() -> starcast_server::config::Config {
    let mut config = common::get_test_config();
    config.rate_limit.per_second = 1;
    config.rate_limit.burst = 2;
    // The test client connects over loopback, acting as the proxy.
    config.server.trusted_proxies = vec!["127.0.0.0/8".parse().unwrap()];
    config
}

async fn submit_as(app: &common::TestApp, forwarded_for: &str) -> reqwest::Response {
    app.client
        .post(format!("{}/v1/submissions", app.server_url))
        .header("X-Forwarded-For", forwarded_for)
        .json(&common::valid_payload())
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_rate_limit_isolation() {
    let app = common::TestApp::spawn_with(throttled_config(), vec![common::MockProvider::working("primary")]).await;

    for i in 1..=2 {
        let resp = submit_as(&app, "1.1.1.1").await;
        assert_eq!(resp.status(), StatusCode::OK, "Submission {i} from client A should pass");
    }

    let resp_a = submit_as(&app, "1.1.1.1").await;
    assert_eq!(resp_a.status(), StatusCode::TOO_MANY_REQUESTS, "Client A should now be throttled");
    assert!(resp_a.headers().contains_key("retry-after"));

    let resp_b = submit_as(&app, "2.2.2.2").await;
    assert_eq!(resp_b.status(), StatusCode::OK, "Client B has its own bucket");
}

#[tokio::test]
async fn test_rate_limit_proxy_chain() {
    let app = common::TestApp::spawn_with(throttled_config(), vec![common::MockProvider::working("primary")]).await;

    for _ in 0..2 {
        let resp = submit_as(&app, "9.9.9.9, 3.3.3.3").await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    // Spoofed left-hand entries do not change the rightmost untrusted hop.
    let resp = submit_as(&app, "spoofed, 4.4.4.4, 3.3.3.3").await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_local_store_routes_are_not_throttled() {
    let mut config = throttled_config();
    config.mode = starcast_server::config::DeployMode::Preview;
    let app = common::TestApp::spawn_with(config, vec![common::MockProvider::working("primary")]).await;

    for _ in 0..5 {
        let resp = app
            .client
            .get(format!("{}/v1/submissions/local", app.server_url))
            .header("X-Forwarded-For", "5.5.5.5")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    app.cleanup();
}
