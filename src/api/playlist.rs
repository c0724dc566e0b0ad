use axum::{
    Extension, Json,
    body::Bytes,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    Error, ErrorKind, api::AppState, error::error_body, generator, management, success,
    types::CreatePlaylistPayload, warning,
};

/// `POST /api/create_playlist`
///
/// Validation happens before the token is touched, so a bad request never
/// reaches Spotify. An authentication failure logs the session out.
pub async fn create_playlist(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(session_id) = management::session_id(&headers) else {
        return not_logged_in();
    };
    let Some(token) = state.sessions.token(&session_id).await else {
        return not_logged_in();
    };

    let payload: CreatePlaylistPayload = if body.iter().all(u8::is_ascii_whitespace) {
        CreatePlaylistPayload::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(payload) => payload,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(error_body("invalid_payload", Some(e.to_string()))),
                )
                    .into_response();
            }
        }
    };

    let request = match generator::validate(&payload, state.config.default_public) {
        Ok(request) => request,
        Err(e) => return Error::from(e).into_response(),
    };

    let token = match state.auth.ensure_valid(token).await {
        Ok(token) => token,
        Err(e) => {
            if e.kind() == ErrorKind::Auth {
                state.sessions.clear(&session_id).await;
            }
            warning!("Could not obtain a valid access token: {}", e);
            return e.into_response();
        }
    };
    state.sessions.set_token(&session_id, token.clone()).await;

    match generator::generate(&*state.api, &token.access_token, &request).await {
        Ok(result) => {
            success!(
                "Created playlist {} with {} tracks",
                result.playlist_id,
                result.tracks_added
            );
            Json(json!({
                "ok": true,
                "source": result.source,
                "time_range": result.time_range,
                "playlist_id": result.playlist_id,
                "playlist_url": result.playlist_url,
                "tracks_added": result.tracks_added,
            }))
            .into_response()
        }
        Err(e) => {
            warning!("Playlist creation failed: {}", e);
            e.into_response()
        }
    }
}

fn not_logged_in() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(error_body("not_logged_in", None)),
    )
        .into_response()
}
