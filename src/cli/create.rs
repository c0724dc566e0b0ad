use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    Error,
    cli::auth::browser_login,
    config::Config,
    error, generator, info,
    spotify::{
        auth::AuthClient,
        client::{self, ApiClient},
    },
    success,
    types::{CreatePlaylistPayload, PlaylistTableRow},
    warning,
};

/// Creates one playlist for the user who logs in through the browser.
pub async fn create(config: Config, payload: CreatePlaylistPayload) {
    let request = match generator::validate(&payload, config.default_public) {
        Ok(request) => request,
        Err(e) => error!("{}", e),
    };

    let http = match client::http_client(&config) {
        Ok(http) => http,
        Err(e) => error!("Cannot create HTTP client. Err: {}", e),
    };
    let auth = match AuthClient::new(&config, http.clone()) {
        Ok(auth) => Arc::new(auth),
        Err(e) => error!("{}", e),
    };
    let api = ApiClient::new(&config, http);

    let token = match browser_login(&config, auth).await {
        Ok(token) => token,
        Err(e) => error!("Authentication failed. Err: {}", e),
    };
    success!("Authentication successful!");

    info!(
        "Create playlist '{}' from {} tracks",
        request.name,
        request.source.name()
    );

    let pb = ProgressBar::new_spinner();
    pb.set_message("Collecting tracks and building playlist...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let result = generator::generate(&api, &token.access_token, &request).await;
    pb.finish_and_clear();

    match result {
        Ok(result) => {
            success!("Playlist created.");
            let table = Table::new(vec![PlaylistTableRow {
                name: request.name.clone(),
                source: match result.time_range {
                    Some(range) => format!("{} ({})", result.source, range),
                    None => result.source.to_string(),
                },
                tracks: result.tracks_added,
                url: result.playlist_url.unwrap_or(result.playlist_id),
            }]);
            println!("{}", table);
        }
        Err(Error::EmptyResult) => {
            warning!("No tracks found for this source, no playlist was created.");
        }
        Err(e) => error!("Failed to create playlist. Err: {}", e),
    }
}
