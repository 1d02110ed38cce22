//! Shared test utilities for the chansite test suite.
//!
//! Provides a scripted [`MockTransport`] that stands in for the network, JSON
//! page builders for each API resource, and a canonical fetch-manifest
//! fixture for the shape and generate stages.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let transport = MockTransport::new()
//!     .on("search", "", search_page(&["v1", "v2"], Some("T1")))
//!     .on("search", "T1", search_page(&["v3"], None));
//!
//! let client = Client::new(transport, &test_config());
//! assert_eq!(client.recent_videos().unwrap().len(), 3);
//! ```
//!
//! Responses are keyed by (resource, playlist id, page token), so multi-page
//! and multi-playlist scripts can coexist. Every request is recorded for
//! call-count assertions. An unscripted request panics with the full URL.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::api::{ChannelResource, SearchResource};
use crate::config::SiteConfig;
use crate::fetch::{FetchError, FetchManifest, FetchedPlaylist, PlaylistVideo, Transport};
use url::Url;

// =========================================================================
// Mock transport
// =========================================================================

/// (resource, playlistId or "", pageToken or "") — enough to address every
/// request the fetch engine makes.
type RouteKey = (String, String, String);

enum Canned {
    Body(String),
    NetworkError(String),
}

pub struct MockTransport {
    routes: HashMap<RouteKey, Canned>,
    requests: RefCell<Vec<Url>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Script a response for a resource (`"channels"`, `"search"`,
    /// `"playlists"`) at a given page token ("" for the first page).
    pub fn on(mut self, resource: &str, token: &str, body: String) -> Self {
        self.routes.insert(
            (resource.to_string(), String::new(), token.to_string()),
            Canned::Body(body),
        );
        self
    }

    /// Script a `playlistItems` response for one playlist at a given token.
    pub fn on_playlist(mut self, playlist_id: &str, token: &str, body: String) -> Self {
        self.routes.insert(
            (
                "playlistItems".to_string(),
                playlist_id.to_string(),
                token.to_string(),
            ),
            Canned::Body(body),
        );
        self
    }

    /// Script a transport-level failure for a resource's first page.
    pub fn fail(mut self, resource: &str, message: &str) -> Self {
        self.routes.insert(
            (resource.to_string(), String::new(), String::new()),
            Canned::NetworkError(message.to_string()),
        );
        self
    }

    /// Number of requests made against one resource.
    pub fn request_count(&self, resource: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|url| resource_of(url) == resource)
            .count()
    }

    /// Resource name of every request, in order.
    pub fn requested_resources(&self) -> Vec<String> {
        self.requests.borrow().iter().map(resource_of).collect()
    }

    /// Playlist ids requested from `playlistItems`, in order.
    pub fn requested_playlists(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .filter(|url| resource_of(url) == "playlistItems")
            .map(|url| query_param(url, "playlistId"))
            .collect()
    }
}

fn resource_of(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default()
        .to_string()
}

fn query_param(url: &Url, name: &str) -> String {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

impl Transport for MockTransport {
    fn get(&self, url: &Url) -> Result<String, FetchError> {
        self.requests.borrow_mut().push(url.clone());

        let key = (
            resource_of(url),
            query_param(url, "playlistId"),
            query_param(url, "pageToken"),
        );
        match self.routes.get(&key) {
            Some(Canned::Body(body)) => Ok(body.clone()),
            Some(Canned::NetworkError(message)) => Err(FetchError::Network(message.clone())),
            None => panic!("unscripted request: {url}"),
        }
    }
}

// =========================================================================
// Page builders
// =========================================================================

fn envelope(items: serde_json::Value, next: Option<&str>) -> String {
    let mut body = serde_json::json!({ "items": items });
    if let Some(token) = next {
        body["nextPageToken"] = serde_json::json!(token);
    }
    body.to_string()
}

/// One `channels` page with a single channel.
pub fn channel_page(title: &str) -> String {
    envelope(
        serde_json::json!([{
            "id": "UC-test",
            "snippet": {
                "title": title,
                "description": "About this channel",
                "thumbnails": {"high": {"url": "https://img.example/avatar.jpg"}}
            },
            "statistics": {"subscriberCount": "12345", "videoCount": "99"}
        }]),
        None,
    )
}

/// One `search` page of video hits with the given ids.
pub fn search_page(video_ids: &[&str], next: Option<&str>) -> String {
    let items: Vec<serde_json::Value> = video_ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "id": {"kind": "youtube#video", "videoId": id},
                "snippet": {
                    "title": format!("Video {id}"),
                    "description": "",
                    "publishedAt": "2024-03-01T10:00:00Z",
                    "thumbnails": {"high": {"url": format!("https://img.example/{id}.jpg")}}
                }
            })
        })
        .collect();
    envelope(serde_json::json!(items), next)
}

/// One `playlists` page of (id, title) summaries.
pub fn playlists_page(playlists: &[(&str, &str)], next: Option<&str>) -> String {
    let items: Vec<serde_json::Value> = playlists
        .iter()
        .map(|(id, title)| {
            serde_json::json!({
                "id": id,
                "snippet": {"title": title}
            })
        })
        .collect();
    envelope(serde_json::json!(items), next)
}

/// One `playlistItems` page whose members reference the given video ids.
pub fn playlist_items_page(video_ids: &[&str], next: Option<&str>) -> String {
    let items: Vec<serde_json::Value> = video_ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "snippet": {
                    "title": format!("Video {id}"),
                    "description": "",
                    "publishedAt": "2024-03-01T10:00:00Z",
                    "thumbnails": {},
                    "resourceId": {"videoId": id}
                }
            })
        })
        .collect();
    envelope(serde_json::json!(items), next)
}

// =========================================================================
// Fixtures
// =========================================================================

/// Config with credentials filled in, stock limits otherwise.
pub fn test_config() -> SiteConfig {
    SiteConfig {
        api_key: "TEST-KEY".into(),
        channel_id: "UC-test".into(),
        ..SiteConfig::default()
    }
}

fn raw_video(id: &str, title: &str, published_at: &str) -> SearchResource {
    serde_json::from_value(serde_json::json!({
        "id": {"kind": "youtube#video", "videoId": id},
        "snippet": {
            "title": title,
            "description": format!("Description of {title}"),
            "publishedAt": published_at,
            "thumbnails": {"high": {"url": format!("https://img.example/{id}.jpg")}}
        }
    }))
    .unwrap()
}

fn member(video_id: &str, playlist_id: &str) -> PlaylistVideo {
    PlaylistVideo {
        id: video_id.to_string(),
        title: format!("Video {video_id}"),
        thumbnail: String::new(),
        published_at: "2024-03-01T10:00:00Z".parse().unwrap(),
        description: String::new(),
        playlist_id: playlist_id.to_string(),
    }
}

/// Canonical fetch-manifest fixture for the shape and generate stages:
///
/// - channel "Test Channel" with statistics 12,345 / 99
/// - videos V1 (2024), V2 (2024), V3 (2022), newest first
/// - playlist P1 containing {V1}, playlist P2 containing {V1, V2};
///   V3 is in no playlist
pub fn fetched_fixture() -> FetchManifest {
    let channel: ChannelResource =
        serde_json::from_str(&unwrap_items(channel_page("Test Channel"))).unwrap();

    FetchManifest {
        channel,
        videos: vec![
            raw_video("V1", "Video One", "2024-06-15T12:00:00Z"),
            raw_video("V2", "Video Two", "2024-03-01T10:00:00Z"),
            raw_video("V3", "Video Three", "2022-11-20T08:30:00Z"),
        ],
        playlists: vec![
            FetchedPlaylist {
                id: "P1".into(),
                title: "First Playlist".into(),
                items: vec![member("V1", "P1")],
            },
            FetchedPlaylist {
                id: "P2".into(),
                title: "Second Playlist".into(),
                items: vec![member("V1", "P2"), member("V2", "P2")],
            },
        ],
    }
}

/// Pull the first item back out of a page-builder body.
fn unwrap_items(body: String) -> String {
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    value["items"][0].to_string()
}
