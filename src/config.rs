//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by the user's config file, and the API key can additionally be
//! supplied through the `CHANSITE_API_KEY` environment variable so it never
//! has to live in a checked-in file.
//!
//! ## Configuration Options
//!
//! ```toml
//! api_key = ""               # required (or CHANSITE_API_KEY)
//! channel_id = ""            # required
//!
//! [limits]
//! page_size = 50             # items per API page (API maximum is 50)
//! max_videos = 500           # hard cap on accumulated videos
//! max_video_pages = 10       # hard cap on video listing pages
//! expanded_playlists = 5     # how many playlists get their members fetched
//!
//! [site]
//! videos_per_page = 24       # client-side pagination size
//! source_url = ""            # optional "Source" link in the footer
//!
//! [theme]
//! accent = "#ffbf00"
//! accent_alt = "#e30613"
//! background = "#0a1627"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! channel_id = "UCP2lwcWmDw6BFDHvQR6EWbQ"
//!
//! [limits]
//! max_videos = 200
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Environment variable overriding `api_key` from the config file.
pub const API_KEY_ENV: &str = "CHANSITE_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults; user config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// API key for the platform's data API.
    pub api_key: String,
    /// Id of the channel the site is generated for.
    pub channel_id: String,
    /// Fetch bounds — see [`LimitsConfig`].
    pub limits: LimitsConfig,
    /// Presentation settings carried into the generated page.
    pub site: PageConfig,
    /// Page colors, injected as CSS custom properties.
    pub theme: ThemeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            channel_id: String::new(),
            limits: LimitsConfig::default(),
            site: PageConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.page_size == 0 || self.limits.page_size > 50 {
            return Err(ConfigError::Validation(
                "limits.page_size must be 1-50".into(),
            ));
        }
        if self.limits.max_videos == 0 {
            return Err(ConfigError::Validation(
                "limits.max_videos must be nonzero".into(),
            ));
        }
        if self.limits.max_video_pages == 0 {
            return Err(ConfigError::Validation(
                "limits.max_video_pages must be nonzero".into(),
            ));
        }
        if self.site.videos_per_page == 0 {
            return Err(ConfigError::Validation(
                "site.videos_per_page must be nonzero".into(),
            ));
        }
        Ok(())
    }

    /// Check that the fields every fetch needs are present.
    ///
    /// Separate from [`validate`](Self::validate) so `gen-config` and offline
    /// commands work without credentials.
    pub fn require_credentials(&self) -> Result<(), ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError::Validation(format!(
                "api_key is not set (config.toml or {API_KEY_ENV})"
            )));
        }
        if self.channel_id.is_empty() {
            return Err(ConfigError::Validation("channel_id is not set".into()));
        }
        Ok(())
    }
}

/// Bounds on API consumption.
///
/// The video listing carries two independent caps — an item cap and a page
/// cap — so a pathological continuation-token loop can never fetch unbounded
/// pages. Playlist expansion is bounded in breadth only: the first
/// `expanded_playlists` playlists (API listing order) have their members
/// fetched, each to exhaustion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Items requested per API page (the API caps this at 50).
    pub page_size: u32,
    /// Maximum videos accumulated across all listing pages.
    pub max_videos: usize,
    /// Maximum pages fetched from the video listing.
    pub max_video_pages: usize,
    /// Breadth limit: only the first N playlists are expanded.
    pub expanded_playlists: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            max_videos: 500,
            max_video_pages: 10,
            expanded_playlists: 5,
        }
    }
}

/// Presentation settings embedded into the shaped manifest for the
/// generate stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// Videos per page in the client-side grid.
    pub videos_per_page: u32,
    /// Optional repository/source link shown in the footer.
    pub source_url: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            videos_per_page: 24,
            source_url: String::new(),
        }
    }
}

/// Page colors. Values are CSS colors, injected verbatim as custom
/// properties on `:root`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Primary accent (headings, tabs, play icon).
    pub accent: String,
    /// Secondary accent (subscribe button, badges).
    pub accent_alt: String,
    /// Dark-mode page background.
    pub background: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            accent: "#ffbf00".to_string(),
            accent_alt: "#e30613".to_string(),
            background: "#0a1627".to_string(),
        }
    }
}

/// Render the theme as CSS custom-property overrides.
///
/// Prepended to the static stylesheet, which reads these variables.
pub fn theme_css(theme: &ThemeConfig) -> String {
    format!(
        ":root {{\n  --accent: {};\n  --accent2: {};\n  --main-bg: {};\n}}",
        theme.accent, theme.accent_alt, theme.background
    )
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Apply the environment override for the API key, when set and nonempty.
pub fn apply_env_override(config: &mut SiteConfig, env_key: Option<String>) {
    if let Some(key) = env_key
        && !key.is_empty()
    {
        config.api_key = key;
    }
}

/// Load config from the given path.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// validates the result, and applies the `CHANSITE_API_KEY` override.
/// A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    let mut config = resolve_config(base, overlay)?;
    apply_env_override(&mut config, std::env::var(API_KEY_ENV).ok());
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# chansite configuration
# ======================
#
# All keys are optional except api_key and channel_id; values shown are the
# stock defaults. Unknown keys are rejected.

# API key for the platform's data API. Leave empty here and set the
# CHANSITE_API_KEY environment variable if you'd rather keep it out of the file.
api_key = ""

# The channel to generate the site for.
channel_id = ""

[limits]
# Items requested per API page. The API caps this at 50.
page_size = 50

# Hard cap on videos accumulated from the listing, across all pages.
max_videos = 500

# Hard cap on listing pages fetched, independent of max_videos. Guards
# against an API that keeps handing out continuation tokens.
max_video_pages = 10

# Only the first N playlists (API listing order) get their members fetched.
# Each expanded playlist is fetched to exhaustion.
expanded_playlists = 5

[site]
# Videos per page in the generated grid (client-side pagination).
videos_per_page = 24

# Optional repository link shown in the footer. Empty hides the link.
source_url = ""

[theme]
# Colors injected into the page as CSS custom properties.
accent = "#ffbf00"
accent_alt = "#e30613"
background = "#0a1627"
"##
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config.limits.max_videos, 500);
        assert_eq!(config.limits.expanded_playlists, 5);
        assert_eq!(config.site.videos_per_page, 24);
    }

    #[test]
    fn user_values_override_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            "channel_id = \"UC1\"\n[limits]\nmax_videos = 100\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.channel_id, "UC1");
        assert_eq!(config.limits.max_videos, 100);
        // Untouched sibling keys keep their defaults.
        assert_eq!(config.limits.max_video_pages, 10);
    }

    #[test]
    fn unknown_keys_rejected() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str("max_vidoes = 100").unwrap();
        let result = resolve_config(base, Some(overlay));
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn invalid_toml_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "channel_id = ").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn page_size_out_of_range_rejected() {
        let mut config = SiteConfig::default();
        config.limits.page_size = 51;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn zero_caps_rejected() {
        let mut config = SiteConfig::default();
        config.limits.max_videos = 0;
        assert!(config.validate().is_err());

        let mut config = SiteConfig::default();
        config.limits.max_video_pages = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn credentials_required_for_fetch() {
        let config = SiteConfig::default();
        assert!(config.require_credentials().is_err());

        let mut config = SiteConfig::default();
        config.api_key = "KEY".into();
        config.channel_id = "UC1".into();
        assert!(config.require_credentials().is_ok());
    }

    #[test]
    fn env_override_wins_over_file_value() {
        let mut config = SiteConfig {
            api_key: "from-file".into(),
            ..SiteConfig::default()
        };
        apply_env_override(&mut config, Some("from-env".into()));
        assert_eq!(config.api_key, "from-env");
    }

    #[test]
    fn empty_env_value_does_not_clobber() {
        let mut config = SiteConfig {
            api_key: "from-file".into(),
            ..SiteConfig::default()
        };
        apply_env_override(&mut config, Some(String::new()));
        assert_eq!(config.api_key, "from-file");
        apply_env_override(&mut config, None);
        assert_eq!(config.api_key, "from-file");
    }

    #[test]
    fn theme_css_contains_custom_properties() {
        let css = theme_css(&ThemeConfig::default());
        assert!(css.contains("--accent: #ffbf00"));
        assert!(css.contains("--main-bg: #0a1627"));
    }

    #[test]
    fn merge_preserves_unrelated_tables() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str("[theme]\naccent = \"#00ff00\"").unwrap();
        let config = resolve_config(base, Some(overlay)).unwrap();
        assert_eq!(config.theme.accent, "#00ff00");
        assert_eq!(config.theme.accent_alt, "#e30613");
        assert_eq!(config.limits.max_videos, 500);
    }

    #[test]
    fn stock_config_round_trips() {
        // The commented stock file must parse back to the defaults.
        let parsed: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let config = resolve_config(stock_defaults_value(), Some(parsed)).unwrap();
        assert_eq!(config.limits.max_videos, 500);
        assert_eq!(config.theme.accent, "#ffbf00");
    }
}
