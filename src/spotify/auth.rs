use reqwest::{Client, StatusCode, Url};

use crate::{
    Error, Res,
    config::Config,
    types::{Token, TokenResponse},
    utils,
};

/// Permissions requested during authorization.
pub const SCOPES: [&str; 4] = [
    "user-top-read",
    "user-library-read",
    "playlist-modify-public",
    "playlist-modify-private",
];

/// Tokens closer than this to their expiry are refreshed before use.
pub const REFRESH_MARGIN_SECS: i64 = 60;

/// Lifetime assumed when the token endpoint omits `expires_in`.
const DEFAULT_EXPIRES_IN: i64 = 3600;

impl Token {
    /// Returns `true` while `now` is more than [`REFRESH_MARGIN_SECS`] before
    /// the expiry.
    pub fn is_fresh_at(&self, now: i64) -> bool {
        now < self.expires_at - REFRESH_MARGIN_SECS
    }

    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(utils::now_epoch())
    }
}

/// Client side of the Spotify authorization code flow.
///
/// Holds the application credentials and the endpoints of the accounts
/// service. The client never stores a user token itself: tokens are passed in
/// and handed back as values, and the caller keeps them wherever the user's
/// session lives.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    authorize_url: Url,
    token_url: String,
}

impl AuthClient {
    /// Creates an auth client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configured authorize URL cannot be parsed.
    pub fn new(config: &Config, http: Client) -> Res<Self> {
        let authorize_url = Url::parse(&config.auth_url).map_err(|e| {
            Error::Config(format!("invalid authorize url '{}': {}", config.auth_url, e))
        })?;

        Ok(Self {
            http,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            authorize_url,
            token_url: config.token_url.clone(),
        })
    }

    /// Builds the URL the user is sent to for granting access.
    ///
    /// The query carries `response_type=code`, the client id, the space-joined
    /// [`SCOPES`], the redirect URI, the caller's anti-CSRF `state` and
    /// `show_dialog=false`. The same input always yields the same URL.
    ///
    /// # Example
    ///
    /// ```
    /// let state = utils::generate_state();
    /// let url = auth.build_login_url(&state);
    /// // https://accounts.spotify.com/authorize?response_type=code&client_id=...
    /// ```
    pub fn build_login_url(&self, state: &str) -> String {
        let mut url = self.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("scope", &SCOPES.join(" "))
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("state", state)
            .append_pair("show_dialog", "false");
        url.to_string()
    }

    /// Exchanges an authorization code for a token pair.
    ///
    /// Sends a single form-encoded `authorization_code` grant to the token
    /// endpoint, authenticated with HTTP Basic client credentials. The
    /// server's relative `expires_in` is converted into an absolute
    /// `expires_at`.
    ///
    /// # Errors
    ///
    /// - [`Error::Auth`] when the token endpoint answers with anything but 200
    ///   or returns a body without the expected fields
    /// - [`Error::Transport`] when the request cannot be sent
    pub async fn exchange_code_for_token(&self, code: &str) -> Res<Token> {
        let response = self
            .request_token(
                &[
                    ("grant_type", "authorization_code"),
                    ("code", code),
                    ("redirect_uri", &self.redirect_uri),
                ],
                "token exchange",
            )
            .await?;

        token_from_response(response, None, utils::now_epoch())
    }

    /// Mints a new access token from a refresh token.
    ///
    /// Spotify does not always rotate refresh tokens. When the response omits
    /// one, the returned token keeps `refresh_token`.
    ///
    /// # Errors
    ///
    /// Same as [`AuthClient::exchange_code_for_token`].
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Res<Token> {
        let response = self
            .request_token(
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", refresh_token),
                ],
                "token refresh",
            )
            .await?;

        token_from_response(response, Some(refresh_token), utils::now_epoch())
    }

    /// Returns `token` unchanged while it is fresh, otherwise the refreshed
    /// token. The caller is responsible for storing the returned value.
    pub async fn ensure_valid(&self, token: Token) -> Res<Token> {
        if token.is_fresh() {
            return Ok(token);
        }

        self.refresh_access_token(&token.refresh_token).await
    }

    async fn request_token(&self, form: &[(&str, &str)], action: &str) -> Res<TokenResponse> {
        let res = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(form)
            .send()
            .await?;

        let status = res.status();
        if status != StatusCode::OK {
            let body = res.text().await.unwrap_or_default();
            return Err(Error::Auth(format!(
                "{} failed: {} {}",
                action,
                status.as_u16(),
                body
            )));
        }

        res.json::<TokenResponse>()
            .await
            .map_err(|e| Error::Auth(format!("{} returned an unreadable token: {}", action, e)))
    }
}

/// Turns a token endpoint response into a [`Token`] issued at `now`.
///
/// `previous_refresh_token` is used when the response carries no refresh
/// token of its own.
pub fn token_from_response(
    response: TokenResponse,
    previous_refresh_token: Option<&str>,
    now: i64,
) -> Res<Token> {
    let refresh_token = response
        .refresh_token
        .filter(|t| !t.is_empty())
        .or_else(|| previous_refresh_token.map(str::to_string))
        .ok_or_else(|| Error::Auth("token response did not contain a refresh token".into()))?;

    Ok(Token {
        access_token: response.access_token,
        refresh_token,
        scope: response.scope.unwrap_or_default(),
        expires_at: now + response.expires_in.unwrap_or(DEFAULT_EXPIRES_IN),
    })
}
