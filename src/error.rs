use thiserror::Error;

use crate::feed::FeedError;
use crate::ffmpeg::FfmpegError;
use crate::render::RenderError;

/// Fatal errors: any of these ends the run.
#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Feed fetch failed: {0}")]
    Feed(#[from] FeedError),

    #[error("Aucune image téléchargée")]
    NoImages,

    /// Every download was dropped while resizing. Raised before rendering, so
    /// no empty gallery is left behind. Carrying on would only write a gallery
    /// with no entries and then fail at the video step with an empty frame
    /// list, so the run stops here with the same exit code instead.
    #[error("No image could be resized ({0} downloaded)")]
    NothingResized(usize),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Video assembly failed: {0}")]
    Video(#[from] FfmpegError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GalleryError {
    /// Human-readable line printed by the binary when a run ends on this error.
    pub fn diagnostic(&self) -> String {
        match self {
            GalleryError::NoImages => self.to_string(),
            other => format!("Erreur globale : {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;
