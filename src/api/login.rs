use axum::{
    Extension,
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect, Response},
};

use crate::{api::AppState, management, utils};

/// Starts a new session holding a fresh anti-CSRF state and sends the
/// browser to Spotify's authorize page. A session the browser already had is
/// dropped.
pub async fn login(Extension(state): Extension<AppState>, headers: HeaderMap) -> Response {
    if let Some(old) = management::session_id(&headers) {
        state.sessions.clear(&old).await;
    }
    let session_id = state.sessions.start().await;

    let oauth_state = utils::generate_state();
    state
        .sessions
        .set_state(&session_id, oauth_state.clone())
        .await;

    let cookie = management::session_cookie(&session_id, state.config.cookie_secure);
    (
        [(header::SET_COOKIE, cookie)],
        Redirect::to(&state.auth.build_login_url(&oauth_state)),
    )
        .into_response()
}

pub async fn logout(Extension(state): Extension<AppState>, headers: HeaderMap) -> Response {
    if let Some(id) = management::session_id(&headers) {
        state.sessions.clear(&id).await;
    }

    let cookie = management::expired_session_cookie(state.config.cookie_secure);
    ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}
