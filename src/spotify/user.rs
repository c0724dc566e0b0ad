use crate::{Res, spotify::client::SpotifyApi, types::UserProfile};

/// Profile of the user the access token belongs to (`GET /me`).
pub async fn get_current_user<A: SpotifyApi>(api: &A, access_token: &str) -> Res<UserProfile> {
    let json = api.get(access_token, "/me", &[]).await?;
    Ok(serde_json::from_value(json)?)
}
