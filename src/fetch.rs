//! Image download into the run's scratch directory

use crate::config::FetchConfig;
use crate::feed::FeedItem;
use crate::http::HttpGet;
use crate::record::{DownloadedImage, ItemError, ItemFailure, ItemOutcome};
use reqwest::Url;
use std::path::Path;
use tracing::{debug, info};

pub struct ImageFetcher<'a> {
    config: &'a FetchConfig,
    http: &'a dyn HttpGet,
}

impl<'a> ImageFetcher<'a> {
    pub fn new(config: &'a FetchConfig, http: &'a dyn HttpGet) -> Self {
        Self { config, http }
    }

    /// One outcome per image item with a URL; other items are ignored.
    pub fn fetch_all(&self, items: &[FeedItem], scratch: &Path) -> Vec<ItemOutcome<DownloadedImage>> {
        let outcomes: Vec<_> = items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let url = item.url.as_deref().filter(|u| !u.is_empty())?;
                if !item.is_image() {
                    return None;
                }
                Some(self.fetch_one(index, item, url, scratch))
            })
            .collect();

        let ok = outcomes.iter().filter(|o| o.is_ok()).count();
        info!("Downloaded {}/{} images", ok, outcomes.len());
        outcomes
    }

    fn fetch_one(
        &self,
        index: usize,
        item: &FeedItem,
        url: &str,
        scratch: &Path,
    ) -> ItemOutcome<DownloadedImage> {
        let ext = url_extension(url).unwrap_or_default();
        if !self.is_allowed(&ext) {
            return Err(ItemFailure::new(url, ItemError::UnsupportedExtension(ext)));
        }

        debug!("Downloading {}", url);
        let bytes = self
            .http
            .get(url, &[], Some(self.config.timeout))
            .map_err(|e| ItemFailure::new(url, e))?;

        if !infer::is_image(&bytes) {
            return Err(ItemFailure::new(url, ItemError::NotAnImage));
        }

        let source_path = scratch.join(format!("nasa_{}{}", index, ext));
        std::fs::write(&source_path, &bytes).map_err(|e| ItemFailure::new(url, e))?;

        Ok(DownloadedImage {
            url: url.to_string(),
            title: item
                .title
                .clone()
                .unwrap_or_else(|| format!("NASA Image {}", index)),
            explanation: item.explanation.clone().unwrap_or_default(),
            source_path,
        })
    }

    fn is_allowed(&self, ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        self.config.allowed_extensions.iter().any(|a| *a == ext)
    }
}

/// Dot-prefixed extension of the URL's last path segment, case preserved.
pub fn url_extension(url: &str) -> Option<String> {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.to_string(),
    };
    let name = path.rsplit('/').next()?;
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::MediaType;
    use crate::http::HttpError;
    use std::cell::RefCell;
    use std::time::Duration;

    const PNG: &[u8] = &[
        0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D, b'I', b'H', b'D', b'R',
    ];

    struct Canned {
        calls: RefCell<Vec<(String, Option<Duration>)>>,
        body: &'static [u8],
    }

    impl HttpGet for Canned {
        fn get(
            &self,
            url: &str,
            _query: &[(&str, &str)],
            timeout: Option<Duration>,
        ) -> Result<Vec<u8>, HttpError> {
            self.calls.borrow_mut().push((url.to_string(), timeout));
            if url.contains("timeout") {
                return Err(HttpError::Timeout { url: url.to_string() });
            }
            Ok(self.body.to_vec())
        }
    }

    fn item(media: MediaType, url: Option<&str>, title: Option<&str>) -> FeedItem {
        FeedItem {
            media_type: Some(media),
            url: url.map(str::to_string),
            title: title.map(str::to_string),
            explanation: None,
            date: None,
        }
    }

    #[test]
    fn test_url_extension() {
        assert_eq!(url_extension("https://apod.nasa.gov/image/2403/M42.jpg").as_deref(), Some(".jpg"));
        assert_eq!(url_extension("https://x.org/a/B.JPEG?size=large").as_deref(), Some(".JPEG"));
        assert_eq!(url_extension("https://www.youtube.com/embed/abc"), None);
        assert_eq!(url_extension("https://x.org/dir.d/"), None);
    }

    #[test]
    fn test_extension_filter_is_case_insensitive() {
        let config = FetchConfig::default();
        let http = Canned { calls: RefCell::new(Vec::new()), body: PNG };
        let fetcher = ImageFetcher::new(&config, &http);
        assert!(fetcher.is_allowed(".JPG"));
        assert!(fetcher.is_allowed(".png"));
        assert!(fetcher.is_allowed(".Jpeg"));
        assert!(!fetcher.is_allowed(".gif"));
        assert!(!fetcher.is_allowed(""));
    }

    #[test]
    fn test_fetch_all_skips_and_records() {
        let scratch = tempfile::tempdir().unwrap();
        let config = FetchConfig::default();
        let http = Canned { calls: RefCell::new(Vec::new()), body: PNG };
        let fetcher = ImageFetcher::new(&config, &http);

        let items = vec![
            item(MediaType::Image, Some("https://x.org/a.png"), Some("First")),
            item(MediaType::Video, Some("https://x.org/v.mp4"), None),
            item(MediaType::Image, None, None),
            item(MediaType::Image, Some("https://x.org/anim.gif"), None),
            item(MediaType::Image, Some("https://x.org/timeout.jpg"), None),
            item(MediaType::Image, Some("https://x.org/b.PNG"), None),
        ];
        let outcomes = fetcher.fetch_all(&items, scratch.path());

        // video and url-less items produce no outcome at all
        assert_eq!(outcomes.len(), 4);
        assert!(matches!(
            outcomes[1].as_ref().unwrap_err().error,
            ItemError::UnsupportedExtension(_)
        ));
        assert!(matches!(
            outcomes[2].as_ref().unwrap_err().error,
            ItemError::Download(HttpError::Timeout { .. })
        ));

        let first = outcomes[0].as_ref().unwrap();
        assert_eq!(first.title, "First");
        assert_eq!(first.explanation, "");
        assert_eq!(first.source_path, scratch.path().join("nasa_0.png"));
        assert!(first.source_path.exists());

        let last = outcomes[3].as_ref().unwrap();
        assert_eq!(last.title, "NASA Image 5");
        assert_eq!(last.source_path, scratch.path().join("nasa_5.PNG"));

        // the gif is rejected before any request
        let calls = http.calls.borrow();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|(_, t)| *t == Some(Duration::from_secs(10))));
    }

    #[test]
    fn test_non_image_body_is_dropped() {
        let scratch = tempfile::tempdir().unwrap();
        let config = FetchConfig::default();
        let http = Canned {
            calls: RefCell::new(Vec::new()),
            body: b"<html>rate limited</html>",
        };
        let fetcher = ImageFetcher::new(&config, &http);
        let outcomes = fetcher.fetch_all(
            &[item(MediaType::Image, Some("https://x.org/a.jpg"), None)],
            scratch.path(),
        );
        assert!(matches!(outcomes[0].as_ref().unwrap_err().error, ItemError::NotAnImage));
        assert!(!scratch.path().join("nasa_0.jpg").exists());
    }
}
