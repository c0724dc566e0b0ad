//! Paginated retrieval of a user's liked and top tracks.
//!
//! Both endpoints are offset-paginated lists capped at [`PAGE_SIZE`] items per
//! request. Fetching is split in two layers:
//!
//! - a [`PageSource`] knows how to fetch one page at a given offset
//! - [`Pages`] walks a source from offset 0, deciding when to stop
//!
//! [`collect_uris`] drains a page sequence, deduplicates the URIs and enforces
//! the overall limit. Tests drive `Pages` with scripted sources, the
//! production sources sit on top of [`SpotifyApi`].

use std::future::Future;

use crate::{
    Res,
    spotify::client::SpotifyApi,
    types::{SavedTracksResponse, TimeRange, TopTracksResponse},
    utils,
};

/// Largest page Spotify serves for the track list endpoints.
pub const PAGE_SIZE: usize = 50;

/// Upper bound for one fetch, matching the playlist size ceiling.
pub const MAX_TRACKS: usize = 10_000;

/// One page of a track listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Number of entries the server returned, including entries without a URI.
    pub items: usize,
    pub uris: Vec<String>,
}

pub trait PageSource: Send {
    fn fetch_page(&mut self, offset: usize, limit: usize) -> impl Future<Output = Res<Page>> + Send;
}

/// Lazy, finite sequence of pages over a [`PageSource`].
///
/// Every call to [`Pages::next_page`] issues at most one request. The sequence
/// ends after an empty page, after a page shorter than requested, or once
/// `limit` items have been seen. [`Pages::restart`] rewinds to offset 0.
pub struct Pages<S> {
    source: S,
    limit: usize,
    offset: usize,
    remaining: usize,
    exhausted: bool,
}

impl<S: PageSource> Pages<S> {
    /// `limit` is clamped to [`MAX_TRACKS`].
    pub fn new(source: S, limit: usize) -> Self {
        let limit = limit.min(MAX_TRACKS);
        Self {
            source,
            limit,
            offset: 0,
            remaining: limit,
            exhausted: false,
        }
    }

    pub async fn next_page(&mut self) -> Res<Option<Vec<String>>> {
        if self.exhausted || self.remaining == 0 {
            return Ok(None);
        }

        let batch = self.remaining.min(PAGE_SIZE);
        let page = self.source.fetch_page(self.offset, batch).await?;

        if page.items == 0 {
            self.exhausted = true;
            return Ok(None);
        }
        if page.items < batch {
            self.exhausted = true;
        }

        self.remaining = self.remaining.saturating_sub(page.items);
        self.offset += page.items;
        Ok(Some(page.uris))
    }

    pub fn restart(&mut self) {
        self.offset = 0;
        self.remaining = self.limit;
        self.exhausted = false;
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

/// Drains `source` into at most `min(limit, MAX_TRACKS)` unique URIs in
/// first-seen order. An account without matching tracks yields an empty list.
pub async fn collect_uris<S: PageSource>(source: S, limit: usize) -> Res<Vec<String>> {
    let mut pages = Pages::new(source, limit);
    let mut uris = Vec::new();

    while let Some(page) = pages.next_page().await? {
        uris.extend(page);
    }

    utils::remove_duplicate_uris(&mut uris);
    uris.truncate(pages.limit());
    Ok(uris)
}

/// `GET /me/top/tracks` for one time range.
pub struct TopTracksPages<'a, A> {
    api: &'a A,
    access_token: &'a str,
    time_range: TimeRange,
}

impl<'a, A: SpotifyApi> TopTracksPages<'a, A> {
    pub fn new(api: &'a A, access_token: &'a str, time_range: TimeRange) -> Self {
        Self {
            api,
            access_token,
            time_range,
        }
    }
}

impl<A: SpotifyApi> PageSource for TopTracksPages<'_, A> {
    async fn fetch_page(&mut self, offset: usize, limit: usize) -> Res<Page> {
        let query = [
            ("time_range", self.time_range.as_str().to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        let json = self
            .api
            .get(self.access_token, "/me/top/tracks", &query)
            .await?;
        let response: TopTracksResponse = serde_json::from_value(json)?;

        Ok(Page {
            items: response.items.len(),
            uris: response
                .items
                .into_iter()
                .filter_map(|track| track.uri)
                .filter(|uri| !uri.is_empty())
                .collect(),
        })
    }
}

/// `GET /me/tracks`, the user's saved ("liked") tracks.
pub struct LikedTracksPages<'a, A> {
    api: &'a A,
    access_token: &'a str,
}

impl<'a, A: SpotifyApi> LikedTracksPages<'a, A> {
    pub fn new(api: &'a A, access_token: &'a str) -> Self {
        Self { api, access_token }
    }
}

impl<A: SpotifyApi> PageSource for LikedTracksPages<'_, A> {
    async fn fetch_page(&mut self, offset: usize, limit: usize) -> Res<Page> {
        let query = [
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        let json = self.api.get(self.access_token, "/me/tracks", &query).await?;
        let response: SavedTracksResponse = serde_json::from_value(json)?;

        // entries whose track was removed from the catalog come back as null
        Ok(Page {
            items: response.items.len(),
            uris: response
                .items
                .into_iter()
                .filter_map(|saved| saved.track.and_then(|track| track.uri))
                .filter(|uri| !uri.is_empty())
                .collect(),
        })
    }
}

pub async fn get_top_tracks<A: SpotifyApi>(
    api: &A,
    access_token: &str,
    time_range: TimeRange,
    limit: usize,
) -> Res<Vec<String>> {
    collect_uris(TopTracksPages::new(api, access_token, time_range), limit).await
}

pub async fn get_liked_tracks<A: SpotifyApi>(
    api: &A,
    access_token: &str,
    limit: usize,
) -> Res<Vec<String>> {
    collect_uris(LikedTracksPages::new(api, access_token), limit).await
}
