// apod_gallery - builds nasa_gallery.html, details/ and nasa_video.mp4
// from the last days of the NASA Astronomy Picture of the Day feed

use anyhow::{Context, Result};
use apod_gallery::config::APOD_ENDPOINT;
use apod_gallery::{
    FeedConfig, FetchConfig, GalleryConfig, ImageConfig, OutputLayout, Pipeline, ReqwestClient,
    VideoConfig,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apod_gallery", version, about = "NASA APOD gallery and video generator")]
struct Args {
    /// NASA API key
    #[arg(long, env = "NASA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Lookback window in days
    #[arg(long, default_value_t = 9)]
    days: u32,

    /// Directory receiving the gallery, images/, details/ and the video
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Directory with home.html and photo_detail.html (built-in pages otherwise)
    #[arg(long)]
    templates: Option<PathBuf>,

    #[arg(long, default_value = APOD_ENDPOINT)]
    endpoint: String,

    /// Per-image download timeout
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    #[arg(long, default_value_t = 1)]
    fps: u32,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,

    /// ffmpeg binary
    #[arg(long, default_value = "ffmpeg")]
    ffmpeg: PathBuf,
}

impl Args {
    fn into_config(self) -> GalleryConfig {
        GalleryConfig {
            feed: FeedConfig {
                endpoint: self.endpoint,
                api_key: self.api_key,
                window_days: self.days,
            },
            fetch: FetchConfig {
                timeout: Duration::from_secs(self.timeout_secs),
                ..FetchConfig::default()
            },
            image: ImageConfig {
                width: self.width,
                height: self.height,
                ..ImageConfig::default()
            },
            video: VideoConfig {
                fps: self.fps,
                ffmpeg: self.ffmpeg,
            },
            output: OutputLayout::under(self.output_dir),
            templates: self.templates,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let args = Args::parse();

    let pipeline = match build(args) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Erreur globale : {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let today = chrono::Local::now().date_naive();
    match pipeline.run(today) {
        Ok(report) => {
            info!("✅ Galerie, pages de détail et vidéo générées avec succès.");
            info!("   Gallery: {}", report.gallery.display());
            info!("   Video:   {}", report.video.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e.diagnostic());
            ExitCode::FAILURE
        }
    }
}

fn build(args: Args) -> Result<Pipeline> {
    let config = args.into_config();
    info!("🔭 Starting apod_gallery");
    info!("   Output: {}", config.output.root.display());

    std::fs::create_dir_all(&config.output.root)
        .with_context(|| format!("Failed to create {}", config.output.root.display()))?;

    let http = ReqwestClient::new().context("Failed to build HTTP client")?;
    let pipeline = Pipeline::new(config, Box::new(http)).context("Failed to load templates")?;
    Ok(pipeline)
}
