//! Gallery and detail page rendering

use crate::config::{GalleryConfig, OutputLayout};
use crate::record::ImageRecord;
use minijinja::Environment;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const GALLERY_TEMPLATE: &str = "home.html";
pub const DETAIL_TEMPLATE: &str = "photo_detail.html";

const BUILTIN_GALLERY: &str = include_str!("templates/home.html");
const BUILTIN_DETAIL: &str = include_str!("templates/photo_detail.html");

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Invalid template context: {0}")]
    Context(#[from] serde_json::Error),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        RenderError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Anything that turns a context value into page text.
pub trait PageTemplate {
    fn render(&self, context: &Value) -> Result<String, RenderError>;
}

/// Jinja2-syntax page backed by minijinja. `.html` names autoescape.
pub struct MiniJinjaPage {
    env: Environment<'static>,
    name: String,
}

impl MiniJinjaPage {
    pub fn from_source(name: &str, source: impl Into<String>) -> Result<Self, RenderError> {
        let source: String = source.into();
        let mut env = Environment::new();
        env.add_template_owned(name.to_string(), source)?;
        Ok(Self {
            env,
            name: name.to_string(),
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| RenderError::io(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| GALLERY_TEMPLATE.to_string());
        Self::from_source(&name, source)
    }
}

impl PageTemplate for MiniJinjaPage {
    fn render(&self, context: &Value) -> Result<String, RenderError> {
        Ok(self.env.get_template(&self.name)?.render(context)?)
    }
}

#[derive(Serialize)]
struct GalleryEntry<'a> {
    src: &'a str,
    alt: &'a str,
    title: &'a str,
    detail_link: &'a str,
}

#[derive(Serialize)]
struct DetailEntry<'a> {
    src: &'a str,
    alt: &'a str,
    title: &'a str,
    explanation: &'a str,
}

pub struct GalleryRenderer {
    gallery: Box<dyn PageTemplate>,
    detail: Box<dyn PageTemplate>,
    layout: OutputLayout,
}

impl GalleryRenderer {
    pub fn new(
        gallery: Box<dyn PageTemplate>,
        detail: Box<dyn PageTemplate>,
        layout: OutputLayout,
    ) -> Self {
        Self {
            gallery,
            detail,
            layout,
        }
    }

    /// Templates from `config.templates` when set, built-in pages otherwise.
    pub fn from_config(config: &GalleryConfig) -> Result<Self, RenderError> {
        let (gallery, detail) = match &config.templates {
            Some(dir) => {
                info!("Loading templates from {}", dir.display());
                (
                    MiniJinjaPage::from_file(dir.join(GALLERY_TEMPLATE))?,
                    MiniJinjaPage::from_file(dir.join(DETAIL_TEMPLATE))?,
                )
            }
            None => (
                MiniJinjaPage::from_source(GALLERY_TEMPLATE, BUILTIN_GALLERY)?,
                MiniJinjaPage::from_source(DETAIL_TEMPLATE, BUILTIN_DETAIL)?,
            ),
        };
        Ok(Self::new(Box::new(gallery), Box::new(detail), config.output.clone()))
    }

    pub fn render_gallery(&self, records: &[ImageRecord]) -> Result<PathBuf, RenderError> {
        let entries: Vec<GalleryEntry> = records
            .iter()
            .map(|r| GalleryEntry {
                src: &r.resized_path,
                alt: &r.alt_text,
                title: &r.title,
                detail_link: &r.detail_link,
            })
            .collect();
        let html = self
            .gallery
            .render(&json!({ "images": serde_json::to_value(&entries)? }))?;

        let path = self.layout.gallery_path();
        write_page(&path, &html)?;
        info!("Gallery with {} images written to {}", records.len(), path.display());
        Ok(path)
    }

    pub fn render_details(&self, records: &[ImageRecord]) -> Result<Vec<PathBuf>, RenderError> {
        let dir = self.layout.details_path();
        std::fs::create_dir_all(&dir).map_err(|e| RenderError::io(&dir, e))?;

        let mut pages = Vec::with_capacity(records.len());
        for record in records {
            let entry = DetailEntry {
                src: &record.resized_path,
                alt: &record.alt_text,
                title: &record.title,
                explanation: &record.explanation,
            };
            let html = self
                .detail
                .render(&json!({ "image": serde_json::to_value(&entry)? }))?;

            let file_name = record
                .detail_link
                .rsplit('/')
                .next()
                .unwrap_or(&record.detail_link);
            let path = dir.join(file_name);
            write_page(&path, &html)?;
            pages.push(path);
        }

        info!("{} detail pages written to {}", pages.len(), dir.display());
        Ok(pages)
    }
}

fn write_page(path: &Path, html: &str) -> Result<(), RenderError> {
    std::fs::write(path, html).map_err(|e| RenderError::io(path, e))
}
