use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;

use crate::{
    Error, Res,
    config::Config,
    info, server,
    spotify::auth::AuthClient,
    types::{PendingLogin, Token},
    utils, warning,
};

/// How long the command waits for the browser to come back.
const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs the authorization code flow for a command-line user.
///
/// Starts a temporary HTTP server on the configured address, opens the
/// authorize URL in the default browser and waits until the callback has
/// exchanged the code. The server is shut down before returning.
pub async fn browser_login(config: &Config, auth: Arc<AuthClient>) -> Res<Token> {
    let state = utils::generate_state();
    let pending = Arc::new(Mutex::new(Some(PendingLogin {
        state: state.clone(),
        token: None,
        error: None,
    })));

    let app = server::login_router(&config.redirect_uri, Arc::clone(&auth), Arc::clone(&pending))?;
    // bind before the browser opens so the redirect cannot arrive early
    let listener = server::bind(&config.server_address).await?;
    let handle = tokio::spawn(async move { axum::serve(listener, app).await });

    let auth_url = auth.build_login_url(&state);
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    } else {
        info!("Waiting for authorization in the browser...");
    }

    let token = wait_for_token(pending, LOGIN_TIMEOUT).await;
    handle.abort();

    token
}

/// Polls `pending` until the callback stored a token or a failure, or until
/// `timeout` has passed.
pub async fn wait_for_token(
    pending: Arc<Mutex<Option<PendingLogin>>>,
    timeout: Duration,
) -> Res<Token> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < timeout {
        let lock = pending.lock().await;
        if let Some(login) = lock.as_ref() {
            if let Some(token) = &login.token {
                return Ok(token.clone());
            }
            if let Some(reason) = &login.error {
                return Err(Error::Auth(reason.clone()));
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    Err(Error::Auth("authorization timed out".into()))
}
