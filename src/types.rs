use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// OAuth token pair held for one user session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    /// Absolute expiry in epoch seconds.
    pub expires_at: i64,
}

/// Raw body of the token endpoint for both grants.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Login started by the command line, completed by the local callback server.
#[derive(Debug, Clone)]
pub struct PendingLogin {
    pub state: String,
    pub token: Option<Token>,
    /// Why the login failed, once the callback knows.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short_term" => Ok(TimeRange::ShortTerm),
            "medium_term" => Ok(TimeRange::MediumTerm),
            "long_term" => Ok(TimeRange::LongTerm),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the tracks of a new playlist come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSource {
    Liked,
    Top(TimeRange),
}

impl TrackSource {
    pub fn name(&self) -> &'static str {
        match self {
            TrackSource::Liked => "liked",
            TrackSource::Top(_) => "top",
        }
    }

    pub fn time_range(&self) -> Option<TimeRange> {
        match self {
            TrackSource::Liked => None,
            TrackSource::Top(range) => Some(*range),
        }
    }
}

/// Create-playlist input exactly as a caller sent it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePlaylistPayload {
    pub source: Option<String>,
    pub time_range: Option<String>,
    pub limit: Option<RawLimit>,
    pub name: Option<String>,
    pub public: Option<bool>,
    pub description: Option<String>,
}

/// A `limit` as a client sent it.
///
/// Whole numbers are taken as they are, fractional numbers are truncated and
/// numeric strings are parsed. Anything else is kept so validation can report
/// it as an invalid limit instead of a malformed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawLimit {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawLimit {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RawLimit::Int(n) => Some(*n),
            RawLimit::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            RawLimit::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<i64> for RawLimit {
    fn from(n: i64) -> Self {
        RawLimit::Int(n)
    }
}

impl fmt::Display for RawLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawLimit::Int(n) => write!(f, "{}", n),
            RawLimit::Float(n) => write!(f, "{}", n),
            RawLimit::Text(text) => write!(f, "{:?}", text),
            RawLimit::Other(value) => write!(f, "{}", value),
        }
    }
}

/// A validated create-playlist request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRequest {
    pub source: TrackSource,
    pub limit: usize,
    pub name: String,
    pub public: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistResult {
    pub playlist_id: String,
    pub playlist_url: Option<String>,
    pub tracks_added: usize,
    pub source: &'static str,
    pub time_range: Option<TimeRange>,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub source: String,
    pub tracks: usize,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTracksResponse {
    #[serde(default)]
    pub items: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrack {
    #[serde(default)]
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTracksResponse {
    #[serde(default)]
    pub items: Vec<SavedTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

/// A playlist as the rest of the crate sees it after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub external_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}
