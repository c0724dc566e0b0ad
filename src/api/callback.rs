use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension,
    extract::Query,
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use tokio::sync::Mutex;

use crate::{
    api::AppState, management, spotify::auth::AuthClient, success, types::PendingLogin, utils,
    warning,
};

/// Completes the login of a browser session.
///
/// The `state` query parameter must match the one stored by `/login` for the
/// same session, otherwise the request is rejected without contacting Spotify.
/// A successful login is moved to a new session id, sent back as a cookie.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Response {
    if let Some(err) = params.get("error") {
        return (
            StatusCode::BAD_REQUEST,
            Html(format!(
                "<h4>Spotify login error: {}</h4>",
                utils::escape_html(err)
            )),
        )
            .into_response();
    }

    let Some(session_id) = management::session_id(&headers) else {
        return invalid_state();
    };
    let expected = state
        .sessions
        .get(&session_id)
        .await
        .and_then(|s| s.oauth_state);

    let (Some(code), Some(returned), Some(expected)) =
        (params.get("code"), params.get("state"), expected)
    else {
        return invalid_state();
    };
    if *returned != expected {
        return invalid_state();
    }

    match state.auth.exchange_code_for_token(code).await {
        Ok(token) => {
            let new_id = state.sessions.complete_login(&session_id, token).await;
            let cookie = management::session_cookie(&new_id, state.config.cookie_secure);
            ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            (e.status(), Html("<h4>Login failed.</h4>")).into_response()
        }
    }
}

/// Callback of the temporary server started by `tastelist create`.
///
/// Either outcome is written to the [`PendingLogin`] so the waiting command
/// can stop polling. Requests with a foreign state are rejected and leave it
/// untouched.
pub async fn cli_callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(pending): Extension<Arc<Mutex<Option<PendingLogin>>>>,
    Extension(auth): Extension<Arc<AuthClient>>,
) -> Response {
    let expected = pending.lock().await.as_ref().map(|p| p.state.clone());
    if expected.is_none() || params.get("state") != expected.as_ref() {
        return invalid_state();
    }

    if let Some(err) = params.get("error") {
        warning!("Spotify login error: {}", err);
        fail_pending(&pending, format!("Spotify login error: {}", err)).await;
        return (StatusCode::BAD_REQUEST, Html("<h4>Login failed.</h4>")).into_response();
    }

    let Some(code) = params.get("code") else {
        fail_pending(&pending, "missing authorization code".to_string()).await;
        return (StatusCode::BAD_REQUEST, Html("<h4>Missing authorization code.</h4>"))
            .into_response();
    };

    match auth.exchange_code_for_token(code).await {
        Ok(token) => {
            if let Some(login) = pending.lock().await.as_mut() {
                login.token = Some(token);
            }
            success!("Authorization received.");
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>").into_response()
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            let status = e.status();
            fail_pending(&pending, e.to_string()).await;
            (status, Html("<h4>Login failed.</h4>")).into_response()
        }
    }
}

async fn fail_pending(pending: &Mutex<Option<PendingLogin>>, reason: String) {
    if let Some(login) = pending.lock().await.as_mut() {
        login.error = Some(reason);
    }
}

fn invalid_state() -> Response {
    (StatusCode::BAD_REQUEST, Html("<h4>Invalid OAuth state</h4>")).into_response()
}
