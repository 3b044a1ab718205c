//! Blocking HTTP transport used by the feed client and the image fetcher

use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
}

/// Minimal GET capability. Non-2xx answers are errors, never bodies.
pub trait HttpGet {
    fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        timeout: Option<Duration>,
    ) -> Result<Vec<u8>, HttpError>;
}

pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("apod_gallery/", env!("CARGO_PKG_VERSION")))
            // Only downloads carry a timeout; they set it per request.
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| HttpError::Transport {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl HttpGet for ReqwestClient {
    fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        timeout: Option<Duration>,
    ) -> Result<Vec<u8>, HttpError> {
        let mut request = self.client.get(url).query(query);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().map_err(|e| classify(url, e))?;
        let status = response.status();
        debug!("GET {} -> {}", url, status);

        if !status.is_success() {
            return Err(HttpError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(|e| classify(url, e))?;
        Ok(body.to_vec())
    }
}

fn classify(url: &str, err: reqwest::Error) -> HttpError {
    if err.is_timeout() {
        HttpError::Timeout { url: url.to_string() }
    } else {
        // without_url keeps the api_key query parameter out of messages
        HttpError::Transport {
            url: url.to_string(),
            reason: err.without_url().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serves exactly one canned HTTP response on a loopback port.
    fn serve_once(status_line: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let head = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status_line,
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
        });
        format!("http://{}/feed", addr)
    }

    #[test]
    fn test_get_returns_body() {
        let url = serve_once("200 OK", b"[]");
        let client = ReqwestClient::new().unwrap();
        let body = client.get(&url, &[("start_date", "2024-01-01")], None).unwrap();
        assert_eq!(body, b"[]");
    }

    #[test]
    fn test_non_success_is_status_error() {
        let url = serve_once("403 Forbidden", b"{\"error\":\"API_KEY_INVALID\"}");
        let client = ReqwestClient::new().unwrap();
        match client.get(&url, &[], None) {
            Err(HttpError::Status { status, .. }) => assert_eq!(status, 403),
            other => panic!("expected status error, got {:?}", other),
        }
    }
}
