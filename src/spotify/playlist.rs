use crate::{
    Res,
    spotify::client::SpotifyApi,
    types::{AddTrackToPlaylistRequest, CreatePlaylistRequest, CreatePlaylistResponse, Playlist},
    warning,
};

/// Most URIs Spotify accepts in one add-tracks call.
pub const ADD_TRACKS_BATCH: usize = 100;

pub async fn create_playlist<A: SpotifyApi>(
    api: &A,
    access_token: &str,
    user_id: &str,
    name: &str,
    public: bool,
    description: &str,
) -> Res<Playlist> {
    let body = serde_json::to_value(CreatePlaylistRequest {
        name: name.to_string(),
        description: description.to_string(),
        public,
        collaborative: false,
    })?;

    let path = format!("/users/{}/playlists", urlencoding::encode(user_id));
    let json = api.post(access_token, &path, &body).await?;
    let created: CreatePlaylistResponse = serde_json::from_value(json)?;

    Ok(Playlist {
        id: created.id,
        external_url: created.external_urls.spotify,
    })
}

/// Appends `uris` to a playlist in order, [`ADD_TRACKS_BATCH`] at a time.
///
/// Stops at the first failing batch and returns its error. Batches sent
/// before the failure stay in the playlist; there is no rollback.
/// Returns the number of tracks added.
pub async fn add_tracks<A: SpotifyApi>(
    api: &A,
    access_token: &str,
    playlist_id: &str,
    uris: &[String],
) -> Res<usize> {
    let path = format!("/playlists/{}/tracks", urlencoding::encode(playlist_id));
    let mut added = 0;

    for chunk in uris.chunks(ADD_TRACKS_BATCH) {
        let body = serde_json::to_value(AddTrackToPlaylistRequest {
            uris: chunk.to_vec(),
        })?;

        if let Err(e) = api.post(access_token, &path, &body).await {
            warning!(
                "Adding tracks to playlist {} stopped after {} of {} tracks",
                playlist_id,
                added,
                uris.len()
            );
            return Err(e);
        }
        added += chunk.len();
    }

    Ok(added)
}
