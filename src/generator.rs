//! One playlist-creation request from validated input to populated playlist.
//!
//! The request moves through `TokenValid → TracksFetched → PlaylistCreated →
//! TracksAdded`. Token handling happens before [`generate`] is called; every
//! later step either succeeds or ends the request with its error. A failure
//! while adding tracks leaves the already created playlist in place.

use crate::{
    Error, Res, ValidationError, info,
    spotify::{client::SpotifyApi, playlist, tracks, user},
    types::{CreatePlaylistPayload, PlaylistRequest, PlaylistResult, TimeRange, TrackSource},
    warning,
};

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = tracks::MAX_TRACKS as i64;
pub const MAX_NAME_CHARS: usize = 100;
pub const DEFAULT_NAME: &str = "My Favorite Songs";
pub const LIKED_DESCRIPTION: &str = "Automatically created from your Spotify Liked Songs";
pub const TOP_DESCRIPTION: &str = "Automatically created from your Spotify Top Tracks";

/// Checks a raw payload and fills in defaults.
///
/// Checks run in the order source, time range, limit, name, and the first
/// failure is returned. `time_range` is only looked at for the `top` source,
/// where it is required.
pub fn validate(
    payload: &CreatePlaylistPayload,
    default_public: bool,
) -> Result<PlaylistRequest, ValidationError> {
    let source = match payload.source.as_deref().unwrap_or("liked") {
        "liked" => TrackSource::Liked,
        "top" => {
            let range = payload
                .time_range
                .as_deref()
                .and_then(|r| r.parse::<TimeRange>().ok())
                .ok_or_else(|| ValidationError::InvalidTimeRange(payload.time_range.clone()))?;
            TrackSource::Top(range)
        }
        other => return Err(ValidationError::InvalidSource(other.to_string())),
    };

    let limit = match &payload.limit {
        None => DEFAULT_LIMIT,
        Some(raw) => raw
            .as_i64()
            .filter(|limit| (1..=MAX_LIMIT).contains(limit))
            .ok_or_else(|| ValidationError::InvalidLimit(raw.to_string()))?,
    };

    let name = payload.name.as_deref().unwrap_or(DEFAULT_NAME);
    if name.is_empty() || name.chars().count() > MAX_NAME_CHARS {
        return Err(ValidationError::InvalidName);
    }

    let description = payload.description.clone().unwrap_or_else(|| {
        match source {
            TrackSource::Liked => LIKED_DESCRIPTION,
            TrackSource::Top(_) => TOP_DESCRIPTION,
        }
        .to_string()
    });

    Ok(PlaylistRequest {
        source,
        limit: limit as usize,
        name: name.to_string(),
        public: payload.public.unwrap_or(default_public),
        description,
    })
}

pub async fn fetch_tracks<A: SpotifyApi>(
    api: &A,
    access_token: &str,
    source: TrackSource,
    limit: usize,
) -> Res<Vec<String>> {
    match source {
        TrackSource::Liked => tracks::get_liked_tracks(api, access_token, limit).await,
        TrackSource::Top(range) => tracks::get_top_tracks(api, access_token, range, limit).await,
    }
}

/// Creates and fills a playlist for `request` using a valid access token.
///
/// # Errors
///
/// - [`Error::EmptyResult`] when the source yields no tracks; no playlist is created
/// - [`Error::Api`] / [`Error::Transport`] from any remote call
pub async fn generate<A: SpotifyApi>(
    api: &A,
    access_token: &str,
    request: &PlaylistRequest,
) -> Res<PlaylistResult> {
    let me = user::get_current_user(api, access_token).await?;

    let uris = fetch_tracks(api, access_token, request.source, request.limit).await?;
    info!(
        "Fetched {} {} tracks for user {}",
        uris.len(),
        request.source.name(),
        me.id
    );

    // product decision: an empty source is reported, not turned into an empty playlist
    if uris.is_empty() {
        return Err(Error::EmptyResult);
    }

    let created = playlist::create_playlist(
        api,
        access_token,
        &me.id,
        &request.name,
        request.public,
        &request.description,
    )
    .await?;

    let tracks_added = match playlist::add_tracks(api, access_token, &created.id, &uris).await {
        Ok(added) => added,
        Err(e) => {
            warning!(
                "Playlist {} was created but is not fully populated",
                created.id
            );
            return Err(e);
        }
    };

    Ok(PlaylistResult {
        playlist_id: created.id,
        playlist_url: created.external_url,
        tracks_added,
        source: request.source.name(),
        time_range: request.source.time_range(),
    })
}
