mod common;

use std::collections::HashMap;

use common::{CLIENT_ID, FakeSpotify, GOOD_CODE, REDIRECT_URI, test_config};
use reqwest::{Client, Url};
use tastelist::{
    ErrorKind,
    spotify::auth::{AuthClient, REFRESH_MARGIN_SECS, token_from_response},
    types::{Token, TokenResponse},
    utils,
};

fn token_expiring_at(expires_at: i64) -> Token {
    Token {
        access_token: "access-old".to_string(),
        refresh_token: "refresh-old".to_string(),
        scope: String::new(),
        expires_at,
    }
}

fn auth_client(base_url: &str) -> AuthClient {
    AuthClient::new(&test_config(base_url), Client::new()).unwrap()
}

#[test]
fn test_token_freshness_margin() {
    let now = 1_700_000_000;

    // 30 seconds left is inside the refresh margin
    assert!(!token_expiring_at(now + 30).is_fresh_at(now));
    assert!(token_expiring_at(now + 120).is_fresh_at(now));

    assert!(!token_expiring_at(now + REFRESH_MARGIN_SECS).is_fresh_at(now));
    assert!(token_expiring_at(now + REFRESH_MARGIN_SECS + 1).is_fresh_at(now));
    assert!(!token_expiring_at(now - 10).is_fresh_at(now));
}

#[test]
fn test_token_from_response_keeps_previous_refresh_token() {
    let response = TokenResponse {
        access_token: "access-2".to_string(),
        refresh_token: None,
        scope: None,
        expires_in: Some(1800),
    };

    let token = token_from_response(response, Some("refresh-old"), 1_000).unwrap();

    assert_eq!(token.access_token, "access-2");
    assert_eq!(token.refresh_token, "refresh-old");
    assert_eq!(token.expires_at, 2_800);
}

#[test]
fn test_token_from_response_defaults_lifetime() {
    let response = TokenResponse {
        access_token: "access-1".to_string(),
        refresh_token: Some("refresh-1".to_string()),
        scope: Some("user-top-read".to_string()),
        expires_in: None,
    };

    let token = token_from_response(response, None, 1_000).unwrap();

    assert_eq!(token.expires_at, 4_600);
    assert_eq!(token.scope, "user-top-read");
}

#[test]
fn test_token_from_response_requires_some_refresh_token() {
    let response = TokenResponse {
        access_token: "access-1".to_string(),
        refresh_token: None,
        scope: None,
        expires_in: Some(3600),
    };

    let err = token_from_response(response, None, 0).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Auth);
}

#[test]
fn test_build_login_url() {
    let auth = auth_client("https://accounts.example.com");

    let url = auth.build_login_url("state-123");
    let parsed = Url::parse(&url).unwrap();
    let params: HashMap<String, String> = parsed.query_pairs().into_owned().collect();

    assert_eq!(parsed.path(), "/authorize");
    assert_eq!(params["response_type"], "code");
    assert_eq!(params["client_id"], CLIENT_ID);
    assert_eq!(
        params["scope"],
        "user-top-read user-library-read playlist-modify-public playlist-modify-private"
    );
    assert_eq!(params["redirect_uri"], REDIRECT_URI);
    assert_eq!(params["state"], "state-123");
    assert_eq!(params["show_dialog"], "false");

    // deterministic for the same state
    assert_eq!(url, auth.build_login_url("state-123"));
}

#[test]
fn test_generate_state_is_url_safe() {
    let state = utils::generate_state();

    assert_eq!(state.len(), 32);
    assert!(
        state
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
    assert_ne!(state, utils::generate_state());
}

#[tokio::test]
async fn test_exchange_code_for_token() {
    let fake = FakeSpotify::default();
    let base = fake.spawn().await;
    let auth = auth_client(&base);

    let before = utils::now_epoch();
    let token = auth.exchange_code_for_token(GOOD_CODE).await.unwrap();

    assert_eq!(token.access_token, "access-1");
    assert_eq!(token.refresh_token, "refresh-1");
    assert!(token.expires_at >= before + 3600);
    assert!(token.expires_at <= utils::now_epoch() + 3600);
    assert_eq!(
        fake.hits(),
        vec!["POST /api/token authorization_code".to_string()]
    );
}

#[tokio::test]
async fn test_exchange_code_rejected() {
    let fake = FakeSpotify::default();
    let auth = auth_client(&fake.spawn().await);

    let err = auth.exchange_code_for_token("bad-code").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Auth);
    assert!(err.to_string().contains("400"));
}

#[tokio::test]
async fn test_refresh_without_rotation_keeps_refresh_token() {
    let fake = FakeSpotify::default();
    let auth = auth_client(&fake.spawn().await);

    let token = auth.refresh_access_token("refresh-old").await.unwrap();

    assert_eq!(token.access_token, "access-2");
    assert_eq!(token.refresh_token, "refresh-old");
}

#[tokio::test]
async fn test_refresh_with_rotation_uses_new_refresh_token() {
    let fake = FakeSpotify {
        rotate_refresh_token: true,
        ..FakeSpotify::default()
    };
    let auth = auth_client(&fake.spawn().await);

    let token = auth.refresh_access_token("refresh-old").await.unwrap();

    assert_eq!(token.refresh_token, "refresh-2");
}

#[tokio::test]
async fn test_refresh_failure_is_auth_error() {
    let fake = FakeSpotify {
        token_status: 400,
        ..FakeSpotify::default()
    };
    let auth = auth_client(&fake.spawn().await);

    let err = auth.refresh_access_token("refresh-old").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Auth);
}

#[tokio::test]
async fn test_ensure_valid_only_refreshes_stale_tokens() {
    let fake = FakeSpotify::default();
    let auth = auth_client(&fake.spawn().await);
    let now = utils::now_epoch();

    let fresh = token_expiring_at(now + 120);
    assert_eq!(auth.ensure_valid(fresh.clone()).await.unwrap(), fresh);
    assert!(fake.hits().is_empty());

    let refreshed = auth.ensure_valid(token_expiring_at(now + 30)).await.unwrap();
    assert_eq!(refreshed.access_token, "access-2");
    assert_eq!(refreshed.refresh_token, "refresh-old");
    assert_eq!(fake.hits(), vec!["POST /api/token refresh_token".to_string()]);
}
