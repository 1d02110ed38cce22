//! Network stage of the chansite build pipeline.
//!
//! Everything that touches the API lives here: a [`Transport`] seam, a
//! paginated fetch loop, and the four resource aggregators that compose it.
//! Stage output is a [`FetchManifest`] — raw channel/video/playlist data,
//! written as JSON for the shape stage.
//!
//! ## Pagination model
//!
//! Every listing endpoint pages the same way: request, decode a
//! [`PageEnvelope`](crate::api::PageEnvelope), fold the page's items into the
//! accumulator, repeat while a continuation token comes back. Bounds are
//! explicit and independent ([`PageLimits`]):
//!
//! - the video listing is capped in items *and* pages, so a continuation
//!   token loop can never fetch forever;
//! - the playlist listing and each expanded playlist's members are fetched to
//!   exhaustion;
//! - playlist expansion is bounded in breadth instead — only the first
//!   `limits.expanded_playlists` playlists are expanded at all.
//!
//! ## Failure policy
//!
//! Fail loud, fail whole. Any transport failure, non-JSON body, or
//! API-reported error aborts the run with a [`FetchError`] tagged by kind;
//! nothing is retried and no partial manifest is written. Requests run
//! strictly one at a time — the API hands out one page per request and the
//! join step downstream needs all of them anyway.

use crate::api::{
    self, ChannelResource, PageEnvelope, PlaylistItemResource, PlaylistResource, SearchResource,
};
use crate::config::{LimitsConfig, SiteConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum FetchError {
    /// The API answered, but with its error envelope — or with data the run
    /// cannot proceed on (e.g. an unknown channel).
    #[error("API error: {0}")]
    Api(String),
    /// Transport-level failure: DNS, TLS, connect, timeout.
    #[error("network error: {0}")]
    Network(String),
    /// The body wasn't JSON, or wasn't the expected shape.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

// ============================================================================
// Transport
// ============================================================================

/// Transport seam for the fetch engine.
///
/// Production is [`HttpTransport`]; tests substitute a scripted transport to
/// drive pagination and assert request counts without a network.
pub trait Transport {
    /// Perform one GET and return the raw response body.
    fn get(&self, url: &Url) -> Result<String, FetchError>;
}

/// Blocking HTTP transport.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, FetchError> {
        // The builder's default timeout (30s) is the only hang protection a
        // one-shot generator needs.
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url) -> Result<String, FetchError> {
        // The API reports failures as a JSON error envelope with a non-2xx
        // status. Return the body either way; the envelope decides.
        Ok(self.client.get(url.as_str()).send()?.text()?)
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// Bounds on one pagination loop. `None` means unbounded.
///
/// The two caps are deliberately separate knobs: `max_items` bounds what we
/// keep, `max_pages` bounds how many requests we make. Either one alone is
/// enough to terminate an endless continuation-token sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageLimits {
    pub max_items: Option<usize>,
    pub max_pages: Option<usize>,
}

impl PageLimits {
    pub const UNBOUNDED: PageLimits = PageLimits {
        max_items: None,
        max_pages: None,
    };

    /// True once either bound has been reached.
    fn reached(&self, items: usize, pages: usize) -> bool {
        self.max_items.is_some_and(|cap| items >= cap)
            || self.max_pages.is_some_and(|cap| pages >= cap)
    }
}

/// An exhausted token is absent or empty — both mean "no more pages".
fn exhausted(token: &Option<String>) -> bool {
    match token {
        Some(t) => t.is_empty(),
        None => true,
    }
}

// ============================================================================
// Client
// ============================================================================

/// Fetch engine: composes a [`Transport`] into the four resource aggregators.
pub struct Client<T: Transport> {
    transport: T,
    api_key: String,
    channel_id: String,
    limits: LimitsConfig,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T, config: &SiteConfig) -> Self {
        Self {
            transport,
            api_key: config.api_key.clone(),
            channel_id: config.channel_id.clone(),
            limits: config.limits.clone(),
        }
    }

    /// Fetch and decode a single page.
    fn fetch_page<R: DeserializeOwned>(
        &self,
        base: &Url,
        token: Option<&str>,
    ) -> Result<PageEnvelope<R>, FetchError> {
        let url = api::with_page_token(base, token);
        let body = self.transport.get(&url)?;
        let envelope: PageEnvelope<R> = serde_json::from_str(&body)?;
        if let Some(err) = envelope.error {
            return Err(FetchError::Api(err.message));
        }
        Ok(envelope)
    }

    /// Fold pages into an accumulator until the continuation token runs out
    /// or a bound is reached. `keep` filters items before they count toward
    /// `max_items`.
    fn paginate<R, F>(&self, base: &Url, limits: PageLimits, mut keep: F) -> Result<Vec<R>, FetchError>
    where
        R: DeserializeOwned,
        F: FnMut(&R) -> bool,
    {
        let mut acc: Vec<R> = Vec::new();
        let mut token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.fetch_page::<R>(base, token.as_deref())?;
            acc.extend(page.items.into_iter().filter(|item| keep(item)));
            pages += 1;
            token = page.next_page_token;

            if exhausted(&token) || limits.reached(acc.len(), pages) {
                break;
            }
        }

        // A final page may overshoot the item cap; trim to the bound.
        if let Some(cap) = limits.max_items {
            acc.truncate(cap);
        }
        Ok(acc)
    }

    /// Channel lookup: single request, no pagination. Zero results is fatal —
    /// without a channel there is no site.
    pub fn channel(&self) -> Result<ChannelResource, FetchError> {
        let url = api::channel_url(&self.api_key, &self.channel_id);
        let page: PageEnvelope<ChannelResource> = self.fetch_page(&url, None)?;
        page.items
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::Api(format!("channel not found: {}", self.channel_id)))
    }

    /// Recent uploads, newest first, capped in items and pages. Search hits
    /// that aren't videos (channels, playlists) are filtered out before they
    /// count toward the cap.
    pub fn recent_videos(&self) -> Result<Vec<SearchResource>, FetchError> {
        let url = api::search_url(&self.api_key, &self.channel_id, self.limits.page_size);
        let limits = PageLimits {
            max_items: Some(self.limits.max_videos),
            max_pages: Some(self.limits.max_video_pages),
        };
        self.paginate(&url, limits, SearchResource::is_video)
    }

    /// Every playlist the channel owns, fetched to exhaustion.
    pub fn playlists(&self) -> Result<Vec<PlaylistResource>, FetchError> {
        let url = api::playlists_url(&self.api_key, &self.channel_id);
        self.paginate(&url, PageLimits::UNBOUNDED, |_| true)
    }

    /// All members of one playlist, fetched to exhaustion and projected down
    /// to the fields the join and the page need. An empty playlist yields an
    /// empty list, not an error.
    pub fn playlist_items(&self, playlist_id: &str) -> Result<Vec<PlaylistVideo>, FetchError> {
        let url = api::playlist_items_url(&self.api_key, playlist_id);
        let items: Vec<PlaylistItemResource> =
            self.paginate(&url, PageLimits::UNBOUNDED, |_| true)?;
        Ok(items
            .into_iter()
            .map(|item| PlaylistVideo::project(item, playlist_id))
            .collect())
    }

    /// Run the whole fetch stage: channel, then all video pages, then all
    /// playlist pages, then members of the first `expanded_playlists`
    /// playlists, strictly in that order.
    pub fn fetch_all(&self) -> Result<FetchManifest, FetchError> {
        let channel = self.channel()?;
        let videos = self.recent_videos()?;
        let playlists = self.playlists()?;

        let mut expanded = Vec::new();
        for playlist in playlists.iter().take(self.limits.expanded_playlists) {
            let items = self.playlist_items(&playlist.id)?;
            expanded.push(FetchedPlaylist {
                id: playlist.id.clone(),
                title: playlist.snippet.title.clone(),
                items,
            });
        }

        Ok(FetchManifest {
            channel,
            videos,
            playlists: expanded,
        })
    }
}

// ============================================================================
// Stage output
// ============================================================================

/// Projection of one playlist member: just what the join and the page need.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaylistVideo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub thumbnail: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    pub playlist_id: String,
}

impl PlaylistVideo {
    fn project(item: PlaylistItemResource, playlist_id: &str) -> Self {
        let snippet = item.snippet;
        Self {
            id: snippet.resource_id.video_id.unwrap_or_default(),
            title: snippet.title,
            thumbnail: snippet.thumbnails.high_url(),
            published_at: snippet.published_at,
            description: snippet.description,
            playlist_id: playlist_id.to_string(),
        }
    }
}

/// An expanded playlist: summary metadata plus its full member list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedPlaylist {
    pub id: String,
    pub title: String,
    pub items: Vec<PlaylistVideo>,
}

/// Manifest output from the fetch stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct FetchManifest {
    pub channel: ChannelResource,
    pub videos: Vec<SearchResource>,
    /// Only the expanded playlists — summaries beyond the breadth limit are
    /// not carried forward, since the page has no use for them.
    pub playlists: Vec<FetchedPlaylist>,
}
