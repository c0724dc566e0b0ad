use axum::{
    Extension, Router,
    routing::{get, post},
};
use reqwest::Url;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{
    Error, Res,
    api::{self, AppState},
    info,
    spotify::auth::AuthClient,
    types::PendingLogin,
};

/// Routes of the web application.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/logout", post(api::logout))
        .route("/api/create_playlist", post(api::create_playlist))
        .route("/health", get(api::health))
        .layer(Extension(state))
}

/// Routes of the temporary server that receives the command-line login.
///
/// The callback is mounted on the path of the configured redirect URI.
pub fn login_router(
    redirect_uri: &str,
    auth: Arc<AuthClient>,
    pending: Arc<Mutex<Option<PendingLogin>>>,
) -> Res<Router> {
    let redirect = Url::parse(redirect_uri)
        .map_err(|e| Error::Config(format!("invalid redirect uri '{}': {}", redirect_uri, e)))?;

    Ok(Router::new()
        .route("/health", get(api::health))
        .route(redirect.path(), get(api::cli_callback))
        .layer(Extension(pending))
        .layer(Extension(auth)))
}

pub async fn bind(address: &str) -> Res<TcpListener> {
    let addr = SocketAddr::from_str(address)
        .map_err(|e| Error::Config(format!("invalid server address '{}': {}", address, e)))?;
    Ok(TcpListener::bind(&addr).await?)
}

pub async fn start_web_server(state: AppState) -> Res<()> {
    let listener = bind(&state.config.server_address).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
