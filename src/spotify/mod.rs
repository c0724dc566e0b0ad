//! # Spotify Integration Module
//!
//! This module is the integration layer between the playlist generator and
//! Spotify's accounts service and Web API. It owns all HTTP communication with
//! Spotify; higher layers only see typed results and [`crate::Error`] values.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (generator, web handlers, CLI)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorization code flow, token refresh)
//!     ├── API Client (bearer GET/POST, SpotifyApi trait)
//!     ├── Track Fetcher (liked and top tracks, pagination)
//!     ├── Playlist Builder (create, add tracks in batches)
//!     └── User Profile
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! [`auth`] - Authorization code flow with a client secret:
//! - **Login URL**: Deterministic authorize URL carrying a caller-supplied state
//! - **Code Exchange**: Authorization code to token pair via HTTP Basic credentials
//! - **Token Refresh**: Refresh grant that keeps the old refresh token when Spotify does not rotate it
//! - **Freshness**: Tokens within 60 seconds of expiry are refreshed before use
//!
//! [`client`] - The [`client::SpotifyApi`] trait and its reqwest implementation.
//!
//! [`tracks`] - Offset pagination over `/me/tracks` and `/me/top/tracks`:
//! - **Page Size**: At most 50 items per request
//! - **Limit**: Clamped to 10 000 tracks
//! - **Deduplication**: First occurrence of a URI wins, order is kept
//!
//! [`playlist`] - Playlist creation and batched track insertion (100 per call).
//!
//! [`user`] - Current user profile lookup.
//!
//! ## API Coverage
//!
//! - `GET /me` - Current user profile
//! - `GET /me/top/tracks` - Top tracks for a time range
//! - `GET /me/tracks` - Saved tracks
//! - `POST /users/{user_id}/playlists` - Create new playlists
//! - `POST /playlists/{playlist_id}/tracks` - Add tracks to playlists
//! - `POST /api/token` - Token exchange and refresh operations
//!
//! ## Error Handling
//!
//! Nothing in this module retries. Non-success answers become
//! [`crate::Error::Api`] (or [`crate::Error::Auth`] for the token endpoint) and
//! are returned to the caller immediately.
//!
//! ## Usage Patterns
//!
//! ```rust
//! let http = client::http_client(&config)?;
//! let auth = auth::AuthClient::new(&config, http.clone())?;
//! let api = client::ApiClient::new(&config, http);
//!
//! let token = auth.ensure_valid(token).await?;
//! let uris = tracks::get_liked_tracks(&api, &token.access_token, 120).await?;
//! ```

pub mod auth;
pub mod client;
pub mod playlist;
pub mod tracks;
pub mod user;
