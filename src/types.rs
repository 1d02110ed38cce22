//! Shaped entities serialized between the shape and generate stages.
//!
//! These types cross the `site.json` manifest boundary and must stay stable
//! between both modules. Everything here is a plain value: one generator run
//! produces one manifest, nothing is merged against a prior run.

use crate::config::{PageConfig, ThemeConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Channel identity and display metadata. Fetched exactly once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub banner_url: String,
    /// Absent when the channel hides its statistics.
    pub subscriber_count: Option<u64>,
    pub video_count: Option<u64>,
}

impl Channel {
    /// Subscribe link with the confirmation prompt enabled.
    pub fn subscribe_url(&self) -> String {
        format!(
            "https://www.youtube.com/channel/{}?sub_confirmation=1",
            self.id
        )
    }
}

/// A video enriched with its playlist memberships and year facet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub thumbnail: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    /// Calendar year of `published_at`, derived in UTC so identical input
    /// shapes identically on every machine.
    pub year: i32,
    /// Ids of the expanded playlists this video is a member of.
    #[serde(default)]
    pub playlists: Vec<String>,
}

/// Tab metadata for one expanded playlist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaylistTab {
    pub id: String,
    pub title: String,
    /// Member count as fetched — the tab label shows it.
    pub count: usize,
}

/// The shaped dataset the page is rendered from.
///
/// Pure function of the fetch manifest plus presentation settings: no clock,
/// no randomness, byte-identical across runs on identical input.
#[derive(Debug, Serialize, Deserialize)]
pub struct SiteManifest {
    pub channel: Channel,
    /// Listing order preserved — the API reports newest first.
    pub videos: Vec<Video>,
    pub playlists: Vec<PlaylistTab>,
    /// Distinct publish years, newest first, for the year filter.
    pub years: Vec<i32>,
    pub settings: PageSettings,
}

impl SiteManifest {
    /// The featured video: most recent upload by listing order. `None` when
    /// the channel has no videos — the page renders without a hero thumbnail.
    pub fn featured(&self) -> Option<&Video> {
        self.videos.first()
    }
}

/// Presentation settings copied out of the config at shape time, so the
/// generate stage needs nothing but the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSettings {
    pub videos_per_page: u32,
    #[serde(default)]
    pub source_url: String,
    pub theme: ThemeConfig,
}

impl PageSettings {
    pub fn from_config(site: &PageConfig, theme: &ThemeConfig) -> Self {
        Self {
            videos_per_page: site.videos_per_page,
            source_url: site.source_url.clone(),
            theme: theme.clone(),
        }
    }
}
