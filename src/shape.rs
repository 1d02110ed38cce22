//! Join & shape pass.
//!
//! Stage 2 of the chansite build pipeline. Takes the raw fetch manifest and
//! produces the shaped dataset the page is rendered from:
//!
//! - every video gets its playlist-membership set, computed by scanning the
//!   expanded playlists' member lists for an exact id match;
//! - every video gets a year facet, derived from its publish timestamp in
//!   UTC (the year filter buckets on this);
//! - playlists are reduced to tab metadata (id, title, member count);
//! - channel statistics are parsed out of their decimal-string encoding.
//!
//! This is a pure single-pass transformation: no network, no clock, no
//! partial states. Shaping the same fetch manifest twice yields identical
//! output.
//!
//! The membership scan is O(videos × playlists × members). Both factors are
//! hard-capped upstream (video cap, playlist breadth limit), so the quadratic
//! shape is fine and keeps the join trivially auditable.

use crate::api::ChannelResource;
use crate::config::SiteConfig;
use crate::fetch::{FetchManifest, FetchedPlaylist};
use crate::types::{Channel, PageSettings, PlaylistTab, SiteManifest, Video};
use chrono::Datelike;
use std::collections::BTreeSet;

/// Run the shape stage.
pub fn shape(fetched: &FetchManifest, config: &SiteConfig) -> SiteManifest {
    let channel = shape_channel(&fetched.channel);
    let videos = shape_videos(fetched);
    let years = year_facets(&videos);
    let playlists = fetched
        .playlists
        .iter()
        .map(|pl| PlaylistTab {
            id: pl.id.clone(),
            title: pl.title.clone(),
            count: pl.items.len(),
        })
        .collect();

    SiteManifest {
        channel,
        videos,
        playlists,
        years,
        settings: PageSettings::from_config(&config.site, &config.theme),
    }
}

fn shape_channel(raw: &ChannelResource) -> Channel {
    let stats = raw.statistics.clone().unwrap_or_default();
    Channel {
        id: raw.id.clone(),
        title: raw.snippet.title.clone(),
        description: raw.snippet.description.clone(),
        avatar_url: raw.snippet.thumbnails.high_url(),
        banner_url: raw.banner_url(),
        subscriber_count: parse_count(stats.subscriber_count.as_deref()),
        video_count: parse_count(stats.video_count.as_deref()),
    }
}

/// The API serializes counts as decimal strings; anything unparseable is
/// treated as absent.
fn parse_count(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.parse().ok())
}

fn shape_videos(fetched: &FetchManifest) -> Vec<Video> {
    fetched
        .videos
        .iter()
        .filter_map(|raw| {
            // The kind filter upstream guarantees a video id in practice;
            // a hit without one can't be linked or played, so skip it.
            let id = raw.id.video_id.clone()?;
            let playlists = memberships(&id, &fetched.playlists);
            Some(Video {
                title: raw.snippet.title.clone(),
                thumbnail: raw.snippet.thumbnails.high_url(),
                published_at: raw.snippet.published_at,
                description: raw.snippet.description.clone(),
                year: raw.snippet.published_at.year(),
                playlists,
                id,
            })
        })
        .collect()
}

/// Playlist ids whose member list contains `video_id`. Exact id equality —
/// a membership test, not a lookup.
fn memberships(video_id: &str, playlists: &[FetchedPlaylist]) -> Vec<String> {
    playlists
        .iter()
        .filter(|pl| pl.items.iter().any(|item| item.id == video_id))
        .map(|pl| pl.id.clone())
        .collect()
}

/// Distinct publish years, newest first.
fn year_facets(videos: &[Video]) -> Vec<i32> {
    let years: BTreeSet<i32> = videos.iter().map(|v| v.year).collect();
    years.into_iter().rev().collect()
}
