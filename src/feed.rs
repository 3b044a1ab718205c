//! APOD feed client

use crate::config::FeedConfig;
use crate::http::{HttpError, HttpGet};
use chrono::{NaiveDate, TimeDelta};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Invalid feed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Lookback window of {0} days is out of the calendar range")]
    InvalidWindow(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    #[serde(other)]
    Other,
}

/// One APOD entry as served by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedItem {
    #[serde(default)]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl FeedItem {
    pub fn is_image(&self) -> bool {
        self.media_type == Some(MediaType::Image)
    }
}

pub struct FeedClient<'a> {
    config: &'a FeedConfig,
    http: &'a dyn HttpGet,
}

impl<'a> FeedClient<'a> {
    pub fn new(config: &'a FeedConfig, http: &'a dyn HttpGet) -> Self {
        Self { config, http }
    }

    pub fn start_date(&self, today: NaiveDate) -> Result<NaiveDate, FeedError> {
        let days = self.config.window_days;
        TimeDelta::try_days(i64::from(days))
            .and_then(|window| today.checked_sub_signed(window))
            .ok_or(FeedError::InvalidWindow(days))
    }

    /// Single GET for every entry published since `today - window_days`.
    pub fn fetch(&self, today: NaiveDate) -> Result<Vec<FeedItem>, FeedError> {
        let start_date = self.start_date(today)?.format("%Y-%m-%d").to_string();

        let mut query = Vec::with_capacity(2);
        match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => query.push(("api_key", key)),
            _ => warn!("No NASA API key configured, the feed will likely reject the request"),
        }
        query.push(("start_date", start_date.as_str()));

        info!("Fetching feed since {}", start_date);
        let body = self.http.get(&self.config.endpoint, &query, None)?;
        let items: Vec<FeedItem> = serde_json::from_slice(&body)?;
        info!("Feed returned {} items", items.len());

        Ok(items)
    }
}
