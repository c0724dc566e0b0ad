#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Extension, Form, Json, Router,
    body::Bytes,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::post,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Value, json};
use tastelist::{Error, Res, config::Config, spotify::client::SpotifyApi};

pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";
pub const REDIRECT_URI: &str = "http://127.0.0.1:8080/callback";
pub const GOOD_CODE: &str = "good-code";

pub fn test_config(base_url: &str) -> Config {
    Config {
        client_id: CLIENT_ID.to_string(),
        client_secret: CLIENT_SECRET.to_string(),
        redirect_uri: REDIRECT_URI.to_string(),
        default_public: false,
        server_address: "127.0.0.1:0".to_string(),
        cookie_secure: false,
        auth_url: format!("{}/authorize", base_url),
        token_url: format!("{}/api/token", base_url),
        api_url: format!("{}/v1", base_url),
        request_timeout: Duration::from_secs(5),
    }
}

pub fn track_uris(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("spotify:track:{:05}", i))
        .collect()
}

fn query_param(query: &[(&str, String)], name: &str) -> usize {
    query
        .iter()
        .find(|(key, _)| *key == name)
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(0)
}

/// One request seen by [`FakeApi`].
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Call {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn uris(&self) -> Vec<String> {
        self.body
            .as_ref()
            .and_then(|b| b["uris"].as_array())
            .map(|uris| {
                uris.iter()
                    .filter_map(|u| u.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// In-memory stand-in for the Spotify Web API.
///
/// Liked entries of `None` are returned as `{"track": null}`.
#[derive(Debug, Default)]
pub struct FakeApi {
    pub liked: Vec<Option<String>>,
    pub top: Vec<String>,
    /// 1-based index of the add-tracks call that fails with a 500.
    pub fail_add_call: Option<usize>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn with_liked(uris: Vec<String>) -> Self {
        Self {
            liked: uris.into_iter().map(Some).collect(),
            ..Self::default()
        }
    }

    pub fn with_top(uris: Vec<String>) -> Self {
        Self {
            top: uris,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str, path: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path == path)
            .collect()
    }

    fn record(&self, method: &'static str, path: &str, query: &[(&str, String)], body: Option<&Value>) {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            body: body.cloned(),
        });
    }
}

impl SpotifyApi for FakeApi {
    async fn get(&self, _access_token: &str, path: &str, query: &[(&str, String)]) -> Res<Value> {
        self.record("GET", path, query, None);

        let offset = query_param(query, "offset");
        let limit = query_param(query, "limit");

        match path {
            "/me" => Ok(json!({ "id": "user-1", "display_name": "Test User" })),
            "/me/tracks" => {
                let items: Vec<Value> = self
                    .liked
                    .iter()
                    .skip(offset)
                    .take(limit)
                    .map(|uri| match uri {
                        Some(uri) => json!({ "track": { "uri": uri } }),
                        None => json!({ "track": null }),
                    })
                    .collect();
                Ok(json!({ "items": items }))
            }
            "/me/top/tracks" => {
                let items: Vec<Value> = self
                    .top
                    .iter()
                    .skip(offset)
                    .take(limit)
                    .map(|uri| json!({ "uri": uri }))
                    .collect();
                Ok(json!({ "items": items }))
            }
            _ => Err(Error::Api {
                method: "GET",
                path: path.to_string(),
                status: 404,
                body: "not found".to_string(),
            }),
        }
    }

    async fn post(&self, _access_token: &str, path: &str, body: &Value) -> Res<Value> {
        self.record("POST", path, &[], Some(body));

        if path.starts_with("/users/") {
            return Ok(json!({
                "id": "playlist-1",
                "external_urls": { "spotify": "https://open.spotify.com/playlist/playlist-1" }
            }));
        }

        if path.ends_with("/tracks") {
            let attempt = self
                .calls()
                .iter()
                .filter(|c| c.method == "POST" && c.path.ends_with("/tracks"))
                .count();
            if self.fail_add_call == Some(attempt) {
                return Err(Error::Api {
                    method: "POST",
                    path: path.to_string(),
                    status: 500,
                    body: "{\"error\":\"server_error\"}".to_string(),
                });
            }
            return Ok(json!({ "snapshot_id": format!("snapshot-{}", attempt) }));
        }

        Err(Error::Api {
            method: "POST",
            path: path.to_string(),
            status: 404,
            body: "not found".to_string(),
        })
    }
}

/// Request received by [`FakeSpotify`], as `"METHOD /path?query"`.
pub type Hits = Arc<Mutex<Vec<String>>>;

/// Behaviour switches of the HTTP fake of the accounts service and Web API.
#[derive(Debug, Clone)]
pub struct FakeSpotify {
    pub hits: Hits,
    /// Status the token endpoint answers with.
    pub token_status: u16,
    /// Whether refresh responses carry a new refresh token.
    pub rotate_refresh_token: bool,
    /// Number of saved tracks in the fake library.
    pub liked_count: usize,
}

impl Default for FakeSpotify {
    fn default() -> Self {
        Self {
            hits: Arc::new(Mutex::new(Vec::new())),
            token_status: 200,
            rotate_refresh_token: false,
            liked_count: 0,
        }
    }
}

impl FakeSpotify {
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hits_starting_with(&self, prefix: &str) -> Vec<String> {
        self.hits()
            .into_iter()
            .filter(|h| h.starts_with(prefix))
            .collect()
    }

    /// Serves the fake on an ephemeral port and returns its base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/api/token", post(token_endpoint))
            .fallback(web_api)
            .layer(Extension(self.clone()));
        spawn_app(app).await
    }
}

pub async fn spawn_app(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn token_endpoint(
    Extension(fake): Extension<FakeSpotify>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let grant = form.get("grant_type").cloned().unwrap_or_default();
    fake.hits
        .lock()
        .unwrap()
        .push(format!("POST /api/token {}", grant));

    let expected = format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", CLIENT_ID, CLIENT_SECRET))
    );
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(expected.as_str());
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "invalid_client").into_response();
    }

    if fake.token_status != 200 {
        let status = StatusCode::from_u16(fake.token_status).unwrap();
        return (status, "{\"error\":\"invalid_grant\"}").into_response();
    }

    match grant.as_str() {
        "authorization_code" => {
            if form.get("code").map(String::as_str) != Some(GOOD_CODE)
                || form.get("redirect_uri").map(String::as_str) != Some(REDIRECT_URI)
            {
                return (StatusCode::BAD_REQUEST, "{\"error\":\"invalid_grant\"}").into_response();
            }
            Json(json!({
                "access_token": "access-1",
                "token_type": "Bearer",
                "refresh_token": "refresh-1",
                "expires_in": 3600,
                "scope": "user-top-read user-library-read"
            }))
            .into_response()
        }
        "refresh_token" => {
            let mut body = json!({
                "access_token": "access-2",
                "token_type": "Bearer",
                "expires_in": 3600,
                "scope": "user-top-read user-library-read"
            });
            if fake.rotate_refresh_token {
                body["refresh_token"] = json!("refresh-2");
            }
            Json(body).into_response()
        }
        _ => (StatusCode::BAD_REQUEST, "{\"error\":\"unsupported_grant_type\"}").into_response(),
    }
}

fn parse_query(uri: &Uri) -> HashMap<String, String> {
    uri.query()
        .unwrap_or_default()
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

async fn web_api(
    Extension(fake): Extension<FakeSpotify>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    _body: Bytes,
) -> Response {
    let target = match uri.query() {
        Some(q) => format!("{} {}?{}", method, uri.path(), q),
        None => format!("{} {}", method, uri.path()),
    };
    fake.hits.lock().unwrap().push(target);

    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !bearer.starts_with("Bearer ") {
        return (StatusCode::UNAUTHORIZED, "missing bearer token").into_response();
    }

    let query = parse_query(&uri);
    let number = |name: &str| -> usize {
        query
            .get(name)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    };

    match (method.as_str(), uri.path()) {
        ("GET", "/v1/me") => Json(json!({ "id": "user-1", "display_name": "Test User" })).into_response(),
        ("GET", "/v1/me/tracks") => {
            let offset = number("offset");
            let end = (offset + number("limit")).min(fake.liked_count);
            let items: Vec<Value> = (offset.min(end)..end)
                .map(|i| json!({ "track": { "uri": format!("spotify:track:{:05}", i) } }))
                .collect();
            Json(json!({ "items": items })).into_response()
        }
        ("POST", "/v1/users/user-1/playlists") => (
            StatusCode::CREATED,
            Json(json!({
                "id": "playlist-1",
                "external_urls": { "spotify": "https://open.spotify.com/playlist/playlist-1" }
            })),
        )
            .into_response(),
        ("POST", "/v1/playlists/playlist-1/tracks") => {
            (StatusCode::CREATED, Json(json!({ "snapshot_id": "snapshot" }))).into_response()
        }
        _ => (StatusCode::NOT_FOUND, "{\"error\":\"not found\"}").into_response(),
    }
}
