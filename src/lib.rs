//! apod_gallery - NASA Astronomy Picture of the Day gallery and video generator
//!
//! Fetches the APOD feed, downloads the images, resizes them to a fixed
//! resolution, renders an HTML gallery with one detail page per image and
//! assembles the resized images into an MP4 slideshow (system `ffmpeg`).

pub mod config;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod ffmpeg;
pub mod http;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod transform;
pub mod video;

pub use config::{FeedConfig, FetchConfig, GalleryConfig, ImageConfig, OutputLayout, VideoConfig};
pub use error::{GalleryError, Result};
pub use feed::{FeedClient, FeedError, FeedItem, MediaType};
pub use fetch::ImageFetcher;
pub use ffmpeg::{FfmpegCommand, FfmpegError};
pub use http::{HttpError, HttpGet, ReqwestClient};
pub use pipeline::{Pipeline, RunReport, Stage};
pub use record::{DownloadedImage, ImageRecord, ItemError, ItemFailure, ItemOutcome};
pub use render::{GalleryRenderer, MiniJinjaPage, PageTemplate, RenderError};
pub use transform::{sanitize, ImageTransformer};
pub use video::{FfmpegSlideshow, VideoEncoder};
