use chansite::fetch::{Client, HttpTransport};
use chansite::{config, fetch, generate, output, shape, types};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let hash = env!("GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup — trivial, called exactly once
        Box::leak(format!("{} ({hash})", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "chansite")]
#[command(about = "Static site generator for a YouTube channel")]
#[command(long_about = "\
Static site generator for a YouTube channel

Pulls a channel's metadata, recent uploads, and playlists from the Data API
and renders one self-contained HTML page with client-side search, year
filtering, playlist tabs, pagination, and a modal player.

Pipeline stages (each writes a JSON manifest the next one reads):

  fetch      API          →  fetched.json     # the only stage that goes online
  shape      fetched.json →  site.json        # joins, facets, featured video
  generate   site.json    →  dist/index.html  # final page

Configuration lives in config.toml (run 'chansite gen-config' for a
documented stock file). The API key can also be supplied via the
CHANSITE_API_KEY environment variable.")]
#[command(version = version_string())]
struct Cli {
    /// Path to config.toml
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate manifests
    #[arg(long, default_value = ".chansite-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch channel, videos, and playlists into a manifest
    Fetch,
    /// Join videos to playlists and derive facets
    Shape,
    /// Produce the final HTML page from the shaped manifest
    Generate,
    /// Run the full pipeline: fetch → shape → generate
    Build,
    /// Validate config without fetching anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Fetch => {
            let config = config::load_config(&cli.config)?;
            run_fetch(&config, &cli.temp_dir)?;
        }
        Command::Shape => {
            let config = config::load_config(&cli.config)?;
            run_shape(&config, &cli.temp_dir)?;
        }
        Command::Generate => {
            let manifest_path = cli.temp_dir.join("site.json");
            generate::generate(&manifest_path, &cli.output)?;
            let manifest = read_site_manifest(&manifest_path)?;
            output::print_generate_output(&manifest, &cli.output);
        }
        Command::Build => {
            let config = config::load_config(&cli.config)?;

            println!("==> Stage 1: Fetching channel {}", config.channel_id);
            run_fetch(&config, &cli.temp_dir)?;

            println!("==> Stage 2: Shaping");
            run_shape(&config, &cli.temp_dir)?;

            println!("==> Stage 3: Generating HTML → {}", cli.output.display());
            let manifest_path = cli.temp_dir.join("site.json");
            generate::generate(&manifest_path, &cli.output)?;
            let manifest = read_site_manifest(&manifest_path)?;
            output::print_generate_output(&manifest, &cli.output);
        }
        Command::Check => {
            println!("==> Checking {}", cli.config.display());
            let config = config::load_config(&cli.config)?;
            config.require_credentials()?;
            println!(
                "Channel: {} · up to {} videos over {} pages · {} playlists expanded",
                config.channel_id,
                config.limits.max_videos,
                config.limits.max_video_pages,
                config.limits.expanded_playlists
            );
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Run the fetch stage and write `fetched.json`.
fn run_fetch(
    config: &config::SiteConfig,
    temp_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    config.require_credentials()?;

    let client = Client::new(HttpTransport::new()?, config);
    let manifest = client.fetch_all()?;

    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(&manifest)?;
    std::fs::write(temp_dir.join("fetched.json"), json)?;
    output::print_fetch_output(&manifest);
    Ok(())
}

/// Run the shape stage and write `site.json`.
fn run_shape(
    config: &config::SiteConfig,
    temp_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let fetched_content = std::fs::read_to_string(temp_dir.join("fetched.json"))?;
    let fetched: fetch::FetchManifest = serde_json::from_str(&fetched_content)?;

    let manifest = shape::shape(&fetched, config);

    let json = serde_json::to_string_pretty(&manifest)?;
    std::fs::write(temp_dir.join("site.json"), json)?;
    output::print_shape_output(&manifest);
    Ok(())
}

fn read_site_manifest(path: &Path) -> Result<types::SiteManifest, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
