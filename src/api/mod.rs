//! # API Module
//!
//! HTTP endpoints of the web application. Handlers are thin: they read the
//! session, call into [`crate::spotify`] and [`crate::generator`], and turn
//! the outcome into a response.
//!
//! ## Endpoints
//!
//! - [`index`] - `GET /`, landing page greeting the logged-in user
//! - [`login`] - `GET /login`, redirects to Spotify's authorize page
//! - [`callback`] - `GET /callback`, completes the login of a browser session
//! - [`cli_callback`] - callback used by the temporary login server of `tastelist create`
//! - [`create_playlist`] - `POST /api/create_playlist`, JSON create-playlist contract
//! - [`logout`] - `POST /logout`, drops the session
//! - [`health`] - `GET /health`, status and version
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use tastelist::{api::AppState, server};
//!
//! let state = AppState::new(config)?;
//! let app = server::router(state);
//! ```

mod callback;
mod health;
mod index;
mod login;
mod playlist;

use std::sync::Arc;

pub use callback::callback;
pub use callback::cli_callback;
pub use health::health;
pub use index::index;
pub use login::login;
pub use login::logout;
pub use playlist::create_playlist;

use crate::{
    Res,
    config::Config,
    management::SessionManager,
    spotify::{
        auth::AuthClient,
        client::{self, ApiClient},
    },
};

/// Everything a request handler needs, shared through an axum `Extension`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: Arc<AuthClient>,
    pub api: Arc<ApiClient>,
    pub sessions: SessionManager,
}

impl AppState {
    pub fn new(config: Config) -> Res<Self> {
        let http = client::http_client(&config)?;
        let auth = AuthClient::new(&config, http.clone())?;
        let api = ApiClient::new(&config, http);

        Ok(Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
            api: Arc::new(api),
            sessions: SessionManager::new(),
        })
    }
}
