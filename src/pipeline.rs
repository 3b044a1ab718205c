//! Run driver: feed -> download -> resize -> render -> video
//!
//! Stages run strictly one after another. Per-item failures during download
//! and resize only drop the item; any other error ends the run. The scratch
//! directory lives exactly as long as one call to [`Pipeline::run`] and is
//! removed on every exit path.

use crate::config::GalleryConfig;
use crate::error::{GalleryError, Result};
use crate::feed::FeedClient;
use crate::fetch::ImageFetcher;
use crate::http::HttpGet;
use crate::record::successes;
use crate::render::GalleryRenderer;
use crate::transform::ImageTransformer;
use crate::video::{FfmpegSlideshow, VideoEncoder};
use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchingFeed,
    Downloading,
    Resizing,
    RenderingGallery,
    RenderingDetails,
    AssemblingVideo,
    Done,
    /// Terminal state for any fatal error.
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::FetchingFeed => "fetching feed",
            Stage::Downloading => "downloading",
            Stage::Resizing => "resizing",
            Stage::RenderingGallery => "rendering gallery",
            Stage::RenderingDetails => "rendering details",
            Stage::AssemblingVideo => "assembling video",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What a successful run produced.
#[derive(Debug)]
pub struct RunReport {
    pub feed_items: usize,
    pub candidates: usize,
    pub downloaded: usize,
    pub resized: usize,
    pub gallery: PathBuf,
    pub details: Vec<PathBuf>,
    pub video: PathBuf,
}

pub struct Pipeline {
    config: GalleryConfig,
    http: Box<dyn HttpGet>,
    renderer: GalleryRenderer,
    encoder: Box<dyn VideoEncoder>,
}

impl Pipeline {
    /// Built-in or configured templates, ffmpeg for the video.
    pub fn new(config: GalleryConfig, http: Box<dyn HttpGet>) -> Result<Self> {
        let renderer = GalleryRenderer::from_config(&config)?;
        let encoder: Box<dyn VideoEncoder> = Box::new(FfmpegSlideshow::new(&config.video));
        Ok(Self {
            config,
            http,
            renderer,
            encoder,
        })
    }

    pub fn with_renderer(mut self, renderer: GalleryRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_encoder(mut self, encoder: Box<dyn VideoEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn run(&self, today: NaiveDate) -> Result<RunReport> {
        let result = self.run_stages(today);
        if result.is_err() {
            enter(Stage::Failed);
        }
        result
    }

    fn run_stages(&self, today: NaiveDate) -> Result<RunReport> {
        enter(Stage::FetchingFeed);
        let items = FeedClient::new(&self.config.feed, self.http.as_ref()).fetch(today)?;

        enter(Stage::Downloading);
        let scratch = tempfile::Builder::new().prefix("apod_gallery").tempdir()?;
        let outcomes = ImageFetcher::new(&self.config.fetch, self.http.as_ref())
            .fetch_all(&items, scratch.path());
        let candidates = outcomes.len();
        let downloads = successes("download", outcomes);
        if downloads.is_empty() {
            return Err(GalleryError::NoImages);
        }
        let downloaded = downloads.len();

        enter(Stage::Resizing);
        let transformer = ImageTransformer::new(&self.config.image, &self.config.output);
        let records = successes("resize", transformer.transform_all(downloads));
        if records.is_empty() {
            return Err(GalleryError::NothingResized(downloaded));
        }

        enter(Stage::RenderingGallery);
        let gallery = self.renderer.render_gallery(&records)?;

        enter(Stage::RenderingDetails);
        let details = self.renderer.render_details(&records)?;

        enter(Stage::AssemblingVideo);
        let frames: Vec<PathBuf> = records.iter().map(|r| r.output_file.clone()).collect();
        let video = self.config.output.video_path();
        self.encoder.encode(&frames, &video, scratch.path())?;

        enter(Stage::Done);
        info!(
            "Gallery, {} detail pages and video generated ({} of {} candidates)",
            details.len(),
            records.len(),
            candidates
        );

        Ok(RunReport {
            feed_items: items.len(),
            candidates,
            downloaded,
            resized: records.len(),
            gallery,
            details,
            video,
        })
    }
}

fn enter(stage: Stage) {
    info!("Stage: {}", stage);
}
