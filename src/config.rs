//! Configuration management for the playlist generator.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Values are read once into a [`Config`] which is then
//! handed to the components that need it, so nothing below `main` touches the
//! process environment.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the working directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use crate::{Error, Res};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Fixed per-call network timeout for every request sent to Spotify.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Loads environment variables from `.env` files.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `tastelist/.env`, followed by a `.env` in the
/// current working directory. Missing files are not an error; variables that
/// are already set in the environment are never overridden.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/tastelist/.env`
/// - macOS: `~/Library/Application Support/tastelist/.env`
/// - Windows: `%LOCALAPPDATA%/tastelist/.env`
///
/// # Errors
///
/// Returns [`Error::Config`] if the data directory cannot be created.
///
/// # Example
///
/// ```
/// use tastelist::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Res<()> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tastelist/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::Config(e.to_string()))?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| Error::Config(e.to_string()))?;
    }
    dotenv::dotenv().ok();
    Ok(())
}

/// Runtime configuration of the application.
///
/// Built by [`Config::from_env`] in production and constructed directly in
/// tests, where the Spotify URLs point at local fakes.
#[derive(Debug, Clone)]
pub struct Config {
    /// Client identifier from the Spotify developer dashboard.
    pub client_id: String,
    /// Client secret, sent as HTTP Basic credentials to the token endpoint.
    pub client_secret: String,
    /// Callback URL registered with the Spotify application.
    pub redirect_uri: String,
    /// Visibility used when a request does not say whether the playlist is public.
    pub default_public: bool,
    /// Address the web server (or the temporary login server) binds to.
    pub server_address: String,
    /// Whether the session cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub request_timeout: Duration,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Required Variables
    ///
    /// - `SPOTIFY_CLIENT_ID`
    /// - `SPOTIFY_CLIENT_SECRET`
    /// - `SPOTIFY_REDIRECT_URI` (e.g. `http://127.0.0.1:8080/callback`)
    ///
    /// # Optional Variables
    ///
    /// - `DEFAULT_PLAYLIST_PUBLIC` - `true` to create public playlists by default (default `false`)
    /// - `SERVER_ADDRESS` - bind address (default `127.0.0.1:8080`)
    /// - `SESSION_COOKIE_SECURE` - `false` to allow the session cookie over plain HTTP (default `true`)
    /// - `SPOTIFY_API_AUTH_URL`, `SPOTIFY_API_TOKEN_URL`, `SPOTIFY_API_URL` - endpoint overrides
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first missing required variable.
    pub fn from_env() -> Res<Self> {
        Ok(Self {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: required("SPOTIFY_REDIRECT_URI")?,
            default_public: flag("DEFAULT_PLAYLIST_PUBLIC", false),
            server_address: optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            cookie_secure: flag("SESSION_COOKIE_SECURE", true),
            auth_url: optional("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: optional("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url: optional("SPOTIFY_API_URL", DEFAULT_API_URL),
            request_timeout: REQUEST_TIMEOUT,
        })
    }
}

fn required(name: &str) -> Res<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config(format!("{} must be set", name))),
    }
}

fn optional(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => parse_flag(&value).unwrap_or(default),
        Err(_) => default,
    }
}

/// Parses a boolean environment value. Accepts `true`/`false`, `1`/`0` and
/// `yes`/`no` in any case.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
