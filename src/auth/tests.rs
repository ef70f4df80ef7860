//! Tests for the auth module

use super::*;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn authenticator(config: AuthConfig) -> Authenticator {
    Authenticator::with_client(config, reqwest::Client::new())
}

fn oauth(server: &MockServer, client_id: &str, client_secret: &str) -> AuthConfig {
    AuthConfig::Oauth2ClientCredentials {
        token_url: format!("{}/oauth/token", server.uri()),
        client_id: client_id.to_string(),
        client_secret: client_secret.to_string(),
        scopes: vec!["vanta-api.all:read".to_string()],
    }
}

#[tokio::test]
async fn test_bearer_auth() {
    let auth = authenticator(AuthConfig::Bearer {
        token: "my-bearer-token".to_string(),
    });

    let client = reqwest::Client::new();
    let req = client.get("https://example.com/api");
    let built = auth.apply(req).await.unwrap().build().unwrap();

    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        "Bearer my-bearer-token"
    );
    assert!(!auth.can_refresh());
}

#[tokio::test]
async fn test_empty_bearer_token_is_rejected() {
    let auth = authenticator(AuthConfig::Bearer {
        token: String::new(),
    });
    let client = reqwest::Client::new();
    let err = auth
        .apply(client.get("https://example.com/api"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no auth token present"));
}

#[tokio::test]
async fn test_oauth2_client_credentials_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "client_id": "my-client",
            "client_secret": "my-secret",
            "scope": "vanta-api.all:read",
            "grant_type": "client_credentials"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "oauth-token-123",
            "expires_in": 3600,
            "token_type": "Bearer",
            "scope": "vanta-api.all:read"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = authenticator(oauth(&mock_server, "my-client", "my-secret"));
    assert!(auth.can_refresh());

    let client = reqwest::Client::new();
    let built = auth
        .apply(client.get("https://example.com/api"))
        .await
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        "Bearer oauth-token-123"
    );
}

#[tokio::test]
async fn test_oauth2_uses_returned_token_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tok",
            "token_type": "MAC",
            "expires_in": 3600
        })))
        .mount(&mock_server)
        .await;

    let auth = authenticator(oauth(&mock_server, "c", "s"));
    let token = auth.get_or_refresh_token().await.unwrap();
    assert_eq!(token.header_value(), "MAC tok");
}

#[tokio::test]
async fn test_oauth2_token_caching() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "cached-token",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = authenticator(oauth(&mock_server, "client", "secret"));
    let client = reqwest::Client::new();

    for _ in 0..3 {
        let _ = auth.apply(client.get("https://example.com/api")).await.unwrap();
    }
}

#[tokio::test]
async fn test_concurrent_callers_share_one_token_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "access_token": "shared",
                    "expires_in": 3600
                }))
                .set_delay(std::time::Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = Arc::new(authenticator(oauth(&mock_server, "client", "secret")));
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let auth = Arc::clone(&auth);
            tokio::spawn(async move { auth.get_or_refresh_token().await })
        })
        .collect();

    for task in futures::future::join_all(tasks).await {
        assert_eq!(task.unwrap().unwrap().token, "shared");
    }
}

#[tokio::test]
async fn test_expired_token_is_refreshed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "short-lived",
            "expires_in": 5
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let auth = authenticator(oauth(&mock_server, "client", "secret"));
    // 5s lifetime is inside the 30s buffer, so every call refreshes
    auth.get_or_refresh_token().await.unwrap();
    auth.get_or_refresh_token().await.unwrap();
}

#[tokio::test]
async fn test_clear_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "token",
            "expires_in": 3600
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let auth = authenticator(oauth(&mock_server, "client", "secret"));
    let client = reqwest::Client::new();

    let _ = auth.apply(client.get("https://example.com/api")).await.unwrap();
    auth.clear_cache().await;
    let _ = auth.apply(client.get("https://example.com/api")).await.unwrap();
}

#[tokio::test]
async fn test_oauth2_error_handling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_client"
        })))
        .mount(&mock_server)
        .await;

    let auth = authenticator(oauth(&mock_server, "bad-client", "bad-secret"));
    let client = reqwest::Client::new();
    let err = auth
        .apply(client.get("https://example.com/api"))
        .await
        .unwrap_err();

    assert!(matches!(err, crate::Error::OAuth2 { .. }));
    assert!(err.to_string().contains("401"));
    assert!(err.to_string().contains("invalid_client"));
}

#[tokio::test]
async fn test_oauth2_empty_credentials_skip_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let auth = authenticator(oauth(&mock_server, "", "secret"));
    let err = auth.get_or_refresh_token().await.unwrap_err();
    assert!(matches!(err, crate::Error::Auth { .. }));
}
