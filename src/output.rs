//! CLI output formatting for all pipeline stages.
//!
//! Output is information-centric: the primary display for every entity is
//! its semantic identity (channel title, playlist title, counts), with the
//! manifest paths shown by the CLI driver, not here.
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! ```text
//! Channel: Test Channel (12,345 subscribers · 99 videos)
//! Videos: 500 fetched
//! Playlists: 5 expanded
//!     001 Highlights (37 items)
//!     002 Match Days (12 items)
//! ```

use crate::fetch::FetchManifest;
use crate::types::SiteManifest;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Format an optional count with thousands separators; absent counts render
/// as the same placeholder the page shows.
pub fn format_count(count: Option<u64>) -> String {
    match count {
        Some(n) => {
            let digits = n.to_string();
            let mut out = String::with_capacity(digits.len() + digits.len() / 3);
            for (i, c) in digits.chars().enumerate() {
                if i > 0 && (digits.len() - i) % 3 == 0 {
                    out.push(',');
                }
                out.push(c);
            }
            out
        }
        None => "–".to_string(),
    }
}

// ============================================================================
// Fetch stage
// ============================================================================

pub fn format_fetch_output(manifest: &FetchManifest) -> Vec<String> {
    let stats = manifest.channel.statistics.clone().unwrap_or_default();
    let subscribers = format_count(stats.subscriber_count.and_then(|s| s.parse().ok()));
    let video_total = format_count(stats.video_count.and_then(|s| s.parse().ok()));

    let mut lines = vec![
        format!(
            "Channel: {} ({} subscribers · {} videos)",
            manifest.channel.snippet.title, subscribers, video_total
        ),
        format!("Videos: {} fetched", manifest.videos.len()),
        format!("Playlists: {} expanded", manifest.playlists.len()),
    ];
    for (idx, playlist) in manifest.playlists.iter().enumerate() {
        lines.push(format!(
            "    {} {} ({} items)",
            format_index(idx + 1),
            playlist.title,
            playlist.items.len()
        ));
    }
    lines
}

pub fn print_fetch_output(manifest: &FetchManifest) {
    for line in format_fetch_output(manifest) {
        println!("{line}");
    }
}

// ============================================================================
// Shape stage
// ============================================================================

pub fn format_shape_output(manifest: &SiteManifest) -> Vec<String> {
    let in_playlists = manifest
        .videos
        .iter()
        .filter(|v| !v.playlists.is_empty())
        .count();
    let years: Vec<String> = manifest.years.iter().map(|y| y.to_string()).collect();

    let mut lines = vec![format!(
        "Shaped {} videos ({} in playlists)",
        manifest.videos.len(),
        in_playlists
    )];
    lines.push(match manifest.featured() {
        Some(video) => format!("Featured: {}", video.title),
        None => "Featured: none (no videos)".to_string(),
    });
    if !years.is_empty() {
        lines.push(format!("Years: {}", years.join(", ")));
    }
    lines
}

pub fn print_shape_output(manifest: &SiteManifest) {
    for line in format_shape_output(manifest) {
        println!("{line}");
    }
}

// ============================================================================
// Generate stage
// ============================================================================

/// The one-line summary a successful run exits with.
pub fn format_generate_output(manifest: &SiteManifest, output_dir: &Path) -> Vec<String> {
    vec![format!(
        "Site generated with {} videos: {}",
        manifest.videos.len(),
        output_dir.join("index.html").display()
    )]
}

pub fn print_generate_output(manifest: &SiteManifest, output_dir: &Path) {
    for line in format_generate_output(manifest, output_dir) {
        println!("{line}");
    }
}
