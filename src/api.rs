//! Typed models for the YouTube Data API v3 surface chansite consumes.
//!
//! Four endpoints, all paginated the same way:
//!
//! | Endpoint | Purpose | Pagination |
//! |----------|---------|------------|
//! | `channels` | channel title, description, branding, statistics | single page |
//! | `search` | recent uploads, newest first | capped (items + pages) |
//! | `playlists` | playlist summaries for a channel | to exhaustion |
//! | `playlistItems` | members of one playlist | to exhaustion |
//!
//! Every listing response is a [`PageEnvelope`]: an `items` array plus an
//! optional `nextPageToken`. An absent or empty token means the result set is
//! exhausted. Failures arrive as a JSON error envelope (`ApiErrorBody`)
//! instead of items, which [`PageEnvelope`] also captures so the fetch layer
//! can distinguish "the API said no" from transport and decode failures.
//!
//! Optional display fields (descriptions, high-res thumbnails, statistics)
//! decode to defaults rather than failing — a channel without a description
//! is a valid channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Base URL for all four endpoints.
pub const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// `id.kind` value identifying a search hit that is an actual video.
pub const KIND_VIDEO: &str = "youtube#video";

/// Items per page requested from the uncapped listing endpoints (API maximum).
pub const LISTING_PAGE_SIZE: u32 = 50;

// ============================================================================
// Envelope
// ============================================================================

/// One page of a listing response.
///
/// Transient by design: the fetch loop consumes a page into its accumulator
/// immediately and never stores envelopes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
    /// Populated instead of `items` when the API rejects the request.
    pub error: Option<ApiErrorBody>,
}

/// The API's error envelope payload.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: i64,
    pub message: String,
}

// ============================================================================
// Shared fragments
// ============================================================================

/// Thumbnail variants keyed by size. Only `high` is consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thumbnails {
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

impl Thumbnails {
    /// The high-resolution thumbnail URL, or an empty string when the API
    /// didn't provide one.
    pub fn high_url(&self) -> String {
        self.high
            .as_ref()
            .map(|t| t.url.clone())
            .unwrap_or_default()
    }
}

// ============================================================================
// channels
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResource {
    pub id: String,
    pub snippet: ChannelSnippet,
    #[serde(default)]
    pub statistics: Option<ChannelStatistics>,
    #[serde(default)]
    pub branding_settings: Option<BrandingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

/// Channel statistics. The API serializes the counts as decimal strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    #[serde(default)]
    pub subscriber_count: Option<String>,
    #[serde(default)]
    pub video_count: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandingSettings {
    #[serde(default)]
    pub image: Option<BrandingImage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingImage {
    #[serde(default)]
    pub banner_external_url: Option<String>,
}

impl ChannelResource {
    /// External banner URL, or empty when the channel has no banner.
    pub fn banner_url(&self) -> String {
        self.branding_settings
            .as_ref()
            .and_then(|b| b.image.as_ref())
            .and_then(|i| i.banner_external_url.clone())
            .unwrap_or_default()
    }
}

// ============================================================================
// search
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResource {
    pub id: SearchId,
    pub snippet: SearchSnippet,
}

/// A search hit's identity. `kind` discriminates videos from channel and
/// playlist hits; `video_id` is only present for videos.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchId {
    pub kind: String,
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

impl SearchResource {
    /// Resource kind filter: keep only hits that are actual videos.
    pub fn is_video(&self) -> bool {
        self.id.kind == KIND_VIDEO
    }
}

// ============================================================================
// playlists
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistResource {
    pub id: String,
    pub snippet: PlaylistSnippet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSnippet {
    pub title: String,
}

// ============================================================================
// playlistItems
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItemResource {
    pub snippet: PlaylistItemSnippet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    #[serde(default)]
    pub video_id: Option<String>,
}

// ============================================================================
// Endpoint URLs
// ============================================================================

fn endpoint(resource: &str, params: &[(&str, &str)]) -> Url {
    Url::parse_with_params(&format!("{API_BASE}/{resource}"), params)
        .expect("static endpoint URL must parse")
}

/// Single channel lookup by id.
pub fn channel_url(key: &str, channel_id: &str) -> Url {
    endpoint(
        "channels",
        &[
            ("part", "snippet,brandingSettings,statistics"),
            ("id", channel_id),
            ("key", key),
        ],
    )
}

/// Recent uploads for a channel, newest first.
pub fn search_url(key: &str, channel_id: &str, page_size: u32) -> Url {
    endpoint(
        "search",
        &[
            ("part", "snippet,id"),
            ("channelId", channel_id),
            ("order", "date"),
            ("type", "video"),
            ("maxResults", &page_size.to_string()),
            ("key", key),
        ],
    )
}

/// All playlists owned by a channel.
pub fn playlists_url(key: &str, channel_id: &str) -> Url {
    endpoint(
        "playlists",
        &[
            ("part", "snippet"),
            ("channelId", channel_id),
            ("maxResults", &LISTING_PAGE_SIZE.to_string()),
            ("key", key),
        ],
    )
}

/// Members of one playlist.
pub fn playlist_items_url(key: &str, playlist_id: &str) -> Url {
    endpoint(
        "playlistItems",
        &[
            ("part", "snippet"),
            ("playlistId", playlist_id),
            ("maxResults", &LISTING_PAGE_SIZE.to_string()),
            ("key", key),
        ],
    )
}

/// Clone `base` with the continuation token appended. `None` returns the
/// first-page URL unchanged.
pub fn with_page_token(base: &Url, token: Option<&str>) -> Url {
    match token {
        Some(t) if !t.is_empty() => {
            let mut url = base.clone();
            url.query_pairs_mut().append_pair("pageToken", t);
            url
        }
        _ => base.clone(),
    }
}
