//! HTML page generation.
//!
//! Stage 3 of the chansite build pipeline. Takes the shaped manifest and
//! renders the final page: one self-contained `index.html` with inline CSS,
//! the embedded video dataset, and the client-side script.
//!
//! ## Page Structure
//!
//! - **Header**: avatar + channel title, search box, theme toggle
//! - **Hero**: channel description, subscriber/video counts, subscribe link,
//!   featured-video thumbnail (most recent upload)
//! - **Tabs**: "All Videos" plus one tab per expanded playlist
//! - **Filters**: year dropdown, sort dropdown, clear button
//! - **Grid + pagination**: empty containers populated client-side from the
//!   embedded dataset
//! - **Modal**: iframe player with watch-on-YouTube link
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping. The only
//! unescaped interpolations are the stylesheet, the client script, and the
//! JSON dataset — the last with its `</script>` sequences neutralized.
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: page styles (theme colors injected from config)
//! - `static/site.js`: tabs, search, filters, pagination, modal, theme toggle
//!
//! The output directory receives exactly one file, written only after the
//! whole page has rendered — a failed run leaves no partial artifact.

use crate::config;
use crate::output::format_count;
use crate::types::{Channel, PlaylistTab, SiteManifest, Video};
use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/site.js");

/// Render the site from a shaped manifest file into `output_dir/index.html`.
pub fn generate(manifest_path: &Path, output_dir: &Path) -> Result<(), GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: SiteManifest = serde_json::from_str(&manifest_content)?;

    let page = render_page(&manifest, Utc::now())?;

    fs::create_dir_all(output_dir)?;
    fs::write(output_dir.join("index.html"), page.into_string())?;
    Ok(())
}

/// Render the complete page. Pure except for `generated_at`, which the
/// caller supplies (the footer shows it).
pub fn render_page(
    manifest: &SiteManifest,
    generated_at: DateTime<Utc>,
) -> Result<Markup, serde_json::Error> {
    let color_css = config::theme_css(&manifest.settings.theme);
    let css = format!("{}\n\n{}", color_css, CSS_STATIC);
    let dataset = embed_dataset(manifest)?;
    let channel = &manifest.channel;

    let content = html! {
        (render_header(channel))
        div.container {
            (render_hero(channel, manifest.featured(), manifest.videos.len()))
            (render_tabs(manifest.videos.len(), &manifest.playlists))
            (render_filters(&manifest.years))
            div.video-grid id="video-gallery" {}
            div.pagination {}
        }
        button.backtotop id="back-to-top" title="Back to top" { "↑" }
        (render_footer(manifest.videos.len(), &manifest.settings.source_url, generated_at))
        (render_modal())
    };

    Ok(base_document(&channel.title, &css, &dataset, content))
}

/// Serialize the dataset the client script reads from `window.SITE`.
///
/// A `</script>` inside a video title or description would terminate the
/// inline script early, so the closing slash is escaped inside the JSON.
fn embed_dataset(manifest: &SiteManifest) -> Result<String, serde_json::Error> {
    let videos = serde_json::to_string(&manifest.videos)?;
    let script = format!(
        "window.SITE = {{ videos: {}, videosPerPage: {} }};",
        videos, manifest.settings.videos_per_page
    );
    Ok(script.replace("</", "<\\/"))
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure.
fn base_document(title: &str, css: &str, dataset: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="description" content={ (title) " - YouTube Channel" };
                title { (title) " - All Videos & Playlists" }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
                script { (PreEscaped(dataset)) }
                script { (PreEscaped(JS)) }
            }
        }
    }
}

/// Renders the sticky header: avatar, channel name, search box, theme toggle.
fn render_header(channel: &Channel) -> Markup {
    html! {
        header {
            div.logo {
                @if !channel.avatar_url.is_empty() {
                    img src=(channel.avatar_url) alt="Channel avatar";
                }
                div.logo-text { (channel.title) }
            }
            div.controls {
                input.search-box type="text" id="search-box" placeholder="Search videos...";
                button.toggle-theme id="theme-toggle" title="Toggle theme" { "🌙" }
            }
        }
    }
}

/// Renders the hero: channel description, stats, subscribe link, and the
/// featured video when there is one.
fn render_hero(channel: &Channel, featured: Option<&Video>, total_videos: usize) -> Markup {
    // The listing count stands in when the channel hides its statistics.
    let video_count = channel
        .video_count
        .map(|n| format_count(Some(n)))
        .unwrap_or_else(|| format_count(Some(total_videos as u64)));

    html! {
        div.hero {
            div.hero-content {
                h1 { (channel.title) }
                @if !channel.description.is_empty() {
                    p {
                        @for (i, line) in channel.description.lines().enumerate() {
                            @if i > 0 { br; }
                            (line)
                        }
                    }
                }
                p {
                    strong { (format_count(channel.subscriber_count)) }
                    " subscribers • "
                    strong { (video_count) }
                    " videos"
                }
                a.subscribe-btn href=(channel.subscribe_url()) target="_blank" rel="noopener" {
                    "Subscribe"
                }
            }
            @if let Some(video) = featured {
                div.featured-video {
                    img.featured-thumb id="featured-thumb"
                        src=(video.thumbnail)
                        alt=(video.title)
                        data-video-id=(video.id);
                }
            }
        }
    }
}

/// Renders the playlist tabs. "All Videos" is always first and active.
fn render_tabs(total_videos: usize, playlists: &[PlaylistTab]) -> Markup {
    html! {
        div.nav-tabs {
            div.tab.active data-tab="all" {
                "All Videos " span.count { (total_videos) }
            }
            @for tab in playlists {
                div.tab data-tab=(tab.id) {
                    (tab.title) " " span.count { (tab.count) }
                }
            }
        }
    }
}

/// Renders the year and sort filters.
fn render_filters(years: &[i32]) -> Markup {
    html! {
        div.filters {
            div.filter-group {
                label for="year-filter" { "Year:" }
                select.year-filter id="year-filter" {
                    option value="all" { "All Years" }
                    @for year in years {
                        option value=(year) { (year) }
                    }
                }
            }
            div.filter-group {
                label for="sort-filter" { "Sort:" }
                select.sort-filter id="sort-filter" {
                    option value="date" { "Latest First" }
                    option value="title" { "Title A-Z" }
                }
            }
            button.clear-btn id="clear-filters" { "Clear" }
        }
    }
}

/// Renders the (hidden) modal player.
fn render_modal() -> Markup {
    html! {
        div.modal id="video-modal" {
            div.modal-content {
                span.close id="modal-close" { "×" }
                iframe.modal-video id="modal-video" allowfullscreen {}
                h2.modal-title id="modal-title" {}
                p.modal-description id="modal-description" {}
                div.modal-actions {
                    a.action-btn id="watch-btn" href="#" target="_blank" rel="noopener" {
                        "Watch on YouTube"
                    }
                    button.action-btn.secondary id="modal-close-btn" { "Close" }
                }
            }
        }
    }
}

fn render_footer(video_count: usize, source_url: &str, generated_at: DateTime<Utc>) -> Markup {
    html! {
        div.footer {
            (video_count) " recent videos · Generated "
            (generated_at.format("%Y-%m-%d %H:%M UTC"))
            @if !source_url.is_empty() {
                br;
                a href=(source_url) { "Source" }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
