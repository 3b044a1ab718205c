//! Per-image records flowing through the pipeline, and per-item outcomes

use crate::http::HttpError;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Raw bytes on disk, not yet resized.
#[derive(Debug, Clone)]
pub struct DownloadedImage {
    /// Where the bytes came from; names the item in failure reports.
    pub url: String,
    pub title: String,
    pub explanation: String,
    pub source_path: PathBuf,
}

/// Fully annotated image, ready for rendering and video assembly.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub title: String,
    pub explanation: String,
    pub source_path: PathBuf,
    /// Web path relative to the gallery page, `/`-separated.
    pub resized_path: String,
    pub output_file: PathBuf,
    pub detail_link: String,
    pub alt_text: String,
}

/// Reasons a single item is dropped. Never fatal.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("unsupported extension {0:?}")]
    UnsupportedExtension(String),

    #[error("download failed: {0}")]
    Download(#[from] HttpError),

    #[error("body is not an image")]
    NotAnImage,

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
#[error("{subject}: {error}")]
pub struct ItemFailure {
    /// Source URL of the offending item.
    pub subject: String,
    pub error: ItemError,
}

impl ItemFailure {
    pub fn new(subject: impl Into<String>, error: impl Into<ItemError>) -> Self {
        Self {
            subject: subject.into(),
            error: error.into(),
        }
    }
}

pub type ItemOutcome<T> = Result<T, ItemFailure>;

/// Logs every failure and keeps the successes, in order.
pub fn successes<T>(stage: &str, outcomes: Vec<ItemOutcome<T>>) -> Vec<T> {
    outcomes
        .into_iter()
        .filter_map(|outcome| match outcome {
            Ok(item) => Some(item),
            Err(failure) => {
                warn!("{} skipped {}", stage, failure);
                None
            }
        })
        .collect()
}
