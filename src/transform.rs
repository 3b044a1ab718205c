//! Image resizing into the persistent images directory

use crate::config::{ImageConfig, OutputLayout};
use crate::record::{DownloadedImage, ImageRecord, ItemFailure, ItemOutcome};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, ImageResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

pub const RESIZED_SUFFIX: &str = "_resized.jpg";
pub const DETAIL_SUFFIX: &str = "_detail.html";

/// Replaces every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `nasa_0.jpg` -> `nasa_0_jpg_resized.jpg`
pub fn resized_file_name(source: &Path) -> String {
    let base = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}{}", sanitize(&base), RESIZED_SUFFIX)
}

/// `nasa_0_jpg_resized.jpg` -> `nasa_0_jpg_resized_detail.html`
pub fn detail_file_name(resized_file: &str) -> String {
    let stem = resized_file.strip_suffix(".jpg").unwrap_or(resized_file);
    format!("{}{}", stem, DETAIL_SUFFIX)
}

pub struct ImageTransformer<'a> {
    config: &'a ImageConfig,
    layout: &'a OutputLayout,
}

impl<'a> ImageTransformer<'a> {
    pub fn new(config: &'a ImageConfig, layout: &'a OutputLayout) -> Self {
        Self { config, layout }
    }

    pub fn transform_all(&self, downloads: Vec<DownloadedImage>) -> Vec<ItemOutcome<ImageRecord>> {
        let total = downloads.len();
        let outcomes: Vec<_> = downloads.into_iter().map(|d| self.transform(d)).collect();
        let ok = outcomes.iter().filter(|o| o.is_ok()).count();
        info!(
            "Resized {}/{} images to {}x{}",
            ok, total, self.config.width, self.config.height
        );
        outcomes
    }

    pub fn transform(&self, download: DownloadedImage) -> ItemOutcome<ImageRecord> {
        let subject = download.url.as_str();

        let file_name = resized_file_name(&download.source_path);
        let images_dir = self.layout.images_path();
        let output_file = images_dir.join(&file_name);

        let img = decode(&download.source_path).map_err(|e| ItemFailure::new(subject, e))?;
        let resized = self.resize(&img);

        std::fs::create_dir_all(&images_dir).map_err(|e| ItemFailure::new(subject, e))?;
        self.save_jpeg(&resized, &output_file)
            .map_err(|e| ItemFailure::new(subject, e))?;
        debug!("Wrote {}", output_file.display());

        Ok(ImageRecord {
            alt_text: download.title.clone(),
            title: download.title,
            explanation: download.explanation,
            source_path: download.source_path,
            resized_path: self.layout.image_link(&file_name),
            output_file,
            detail_link: self.layout.detail_link(&detail_file_name(&file_name)),
        })
    }

    /// Exact target dimensions; aspect ratio is not preserved.
    pub fn resize(&self, img: &DynamicImage) -> DynamicImage {
        img.resize_exact(self.config.width, self.config.height, FilterType::Lanczos3)
    }

    fn save_jpeg(&self, img: &DynamicImage, path: &Path) -> ImageResult<()> {
        // JPEG has no alpha channel
        let rgb = img.to_rgb8();
        let mut writer = BufWriter::new(File::create(path)?);
        JpegEncoder::new_with_quality(&mut writer, self.config.quality).encode_image(&rgb)?;
        writer.flush()?;
        Ok(())
    }
}

/// Trusts the file's magic bytes over its extension.
fn decode(path: &Path) -> ImageResult<DynamicImage> {
    ImageReader::open(path)?.with_guessed_format()?.decode()
}
