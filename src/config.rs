//! Run configuration, built once by the binary and handed to each stage

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APOD_ENDPOINT: &str = "https://api.nasa.gov/planetary/apod";

pub struct FeedConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub window_days: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: APOD_ENDPOINT.to_string(),
            api_key: None,
            window_days: 9,
        }
    }
}

pub struct FetchConfig {
    pub timeout: Duration,
    /// Lowercase, dot-prefixed.
    pub allowed_extensions: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            allowed_extensions: vec![".jpg".into(), ".jpeg".into(), ".png".into()],
        }
    }
}

pub struct ImageConfig {
    pub width: u32,
    pub height: u32,
    pub quality: u8, // JPEG, 1-100
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            quality: 90,
        }
    }
}

pub struct VideoConfig {
    pub fps: u32,
    pub ffmpeg: PathBuf,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            fps: 1, // one image per second
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }
}

/// Where the run writes its outputs. Directory names double as web paths.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub images_dir: String,
    pub details_dir: String,
    pub gallery_file: String,
    pub video_file: String,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            images_dir: "images".to_string(),
            details_dir: "details".to_string(),
            gallery_file: "nasa_gallery.html".to_string(),
            video_file: "nasa_video.mp4".to_string(),
        }
    }
}

impl OutputLayout {
    pub fn under(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn images_path(&self) -> PathBuf {
        self.root.join(&self.images_dir)
    }

    pub fn details_path(&self) -> PathBuf {
        self.root.join(&self.details_dir)
    }

    pub fn gallery_path(&self) -> PathBuf {
        self.root.join(&self.gallery_file)
    }

    pub fn video_path(&self) -> PathBuf {
        self.root.join(&self.video_file)
    }

    /// Link to `file` inside the images directory, relative to the gallery page.
    pub fn image_link(&self, file: &str) -> String {
        web_path(&format!("{}/{}", self.images_dir, file))
    }

    pub fn detail_link(&self, file: &str) -> String {
        web_path(&format!("{}/{}", self.details_dir, file))
    }
}

pub fn web_path(path: &str) -> String {
    path.replace('\\', "/")
}

#[derive(Default)]
pub struct GalleryConfig {
    pub feed: FeedConfig,
    pub fetch: FetchConfig,
    pub image: ImageConfig,
    pub video: VideoConfig,
    pub output: OutputLayout,
    /// Directory holding `home.html` and `photo_detail.html`. Built-in pages when unset.
    pub templates: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_names() {
        let layout = OutputLayout::default();
        assert_eq!(layout.gallery_path(), PathBuf::from("./nasa_gallery.html"));
        assert_eq!(layout.video_path(), PathBuf::from("./nasa_video.mp4"));
        assert_eq!(layout.image_link("a_resized.jpg"), "images/a_resized.jpg");
        assert_eq!(layout.detail_link("a_detail.html"), "details/a_detail.html");
    }

    #[test]
    fn test_web_path_normalizes_separators() {
        assert_eq!(web_path("images\\nasa_0_jpg_resized.jpg"), "images/nasa_0_jpg_resized.jpg");
    }

    #[test]
    fn test_defaults() {
        let config = GalleryConfig::default();
        assert_eq!(config.feed.window_days, 9);
        assert_eq!(config.fetch.timeout, Duration::from_secs(10));
        assert_eq!((config.image.width, config.image.height), (1280, 720));
        assert_eq!(config.video.fps, 1);
        assert!(config.templates.is_none());
    }
}
