//! Blocking REST client for the cloud-disk backend.
//!
//! Speaks the disk API's resource model: folders are created segment by
//! segment with `PUT /resources` (409 means "already there", which is fine),
//! file uploads go through a short-lived upload href, and publishing is a
//! `PUT /resources/publish` followed by reading back `public_url`. Transient
//! failures (429, 5xx, network) are retried with backoff; everything else is
//! surfaced as `UploadUnavailable`.

use crate::error::{Result, ShiftError};
use crate::retry::with_backoff;
use crate::upload::DriveStore;
use std::fmt;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://cloud-api.yandex.net/v1/disk";

const DEFAULT_TRIES: u32 = 3;
const DEFAULT_BACKOFF: Duration = Duration::from_millis(300);

pub struct DiskClient {
    http: reqwest::blocking::Client,
    api_base: String,
    token: String,
    tries: u32,
    backoff: Duration,
}

impl DiskClient {
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(ShiftError::UploadUnavailable(
                "disk OAuth token is empty".into(),
            ));
        }
        Ok(Self {
            http: reqwest::blocking::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
            tries: DEFAULT_TRIES,
            backoff: DEFAULT_BACKOFF,
        })
    }

    /// Override the retry policy (tests use a zero backoff).
    pub fn with_retry_policy(mut self, tries: u32, backoff: Duration) -> Self {
        self.tries = tries;
        self.backoff = backoff;
        self
    }

    /// Map a logical folder path onto the disk resource namespace.
    fn disk_path(logical: &str) -> String {
        let mut cleaned = format!("/{}", logical.trim_matches('/'));
        while cleaned.contains("//") {
            cleaned = cleaned.replace("//", "/");
        }
        format!("disk:{cleaned}")
    }

    fn execute<B>(&self, allowed: &[u16], build: B) -> Result<reqwest::blocking::Response>
    where
        B: Fn() -> reqwest::blocking::RequestBuilder,
    {
        with_backoff(
            self.tries,
            self.backoff,
            || {
                let response = build()
                    .send()
                    .map_err(|e| HttpFailure::transient(e.to_string()))?;
                let status = response.status().as_u16();
                if allowed.contains(&status) {
                    return Ok(response);
                }
                let message = extract_error_message(response);
                if status == 429 || status >= 500 {
                    Err(HttpFailure::transient(format!("{status}: {message}")))
                } else {
                    Err(HttpFailure::fatal(format!("{status}: {message}")))
                }
            },
            |failure: &HttpFailure| failure.transient,
        )
        .map_err(|failure| ShiftError::UploadUnavailable(failure.message))
    }

    fn api(&self, method: reqwest::Method, path: &str) -> reqwest::blocking::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.api_base, path))
            .header("Authorization", format!("OAuth {}", self.token))
    }

    fn ensure_single_folder(&self, disk_path: &str) -> Result<()> {
        let response = self.execute(&[201, 202, 409], || {
            self.api(reqwest::Method::PUT, "/resources")
                .query(&[("path", disk_path)])
        })?;
        if response.status().as_u16() == 409 {
            debug!(path = disk_path, "folder already exists");
        }
        Ok(())
    }
}

impl DriveStore for DiskClient {
    fn ensure_folder(&mut self, path: &str) -> Result<()> {
        // Parents first: the API creates one level at a time.
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut current = String::new();
        for segment in segments {
            current.push('/');
            current.push_str(segment);
            self.ensure_single_folder(&Self::disk_path(&current))?;
        }
        Ok(())
    }

    fn store_file(
        &mut self,
        folder: &str,
        name: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<()> {
        let target = Self::disk_path(&format!("{folder}/{name}"));
        let response = self.execute(&[200], || {
            self.api(reqwest::Method::GET, "/resources/upload")
                .query(&[("path", target.as_str()), ("overwrite", "true")])
        })?;
        let payload: serde_json::Value = response
            .json()
            .map_err(|e| ShiftError::UploadUnavailable(e.to_string()))?;
        let href = payload
            .get("href")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                ShiftError::UploadUnavailable("upload href missing from response".into())
            })?
            .to_string();

        self.execute(&[201, 202, 204], || {
            self.http
                .put(&href)
                .header("Content-Type", content_type.to_string())
                .body(bytes.to_vec())
        })?;
        debug!(path = %target, size = bytes.len(), "file uploaded");
        Ok(())
    }

    fn publish_folder(&mut self, path: &str) -> Result<String> {
        let disk_path = Self::disk_path(path);
        self.execute(&[200, 202, 409], || {
            self.api(reqwest::Method::PUT, "/resources/publish")
                .query(&[("path", disk_path.as_str())])
        })?;

        let response = self.execute(&[200], || {
            self.api(reqwest::Method::GET, "/resources")
                .query(&[("path", disk_path.as_str()), ("fields", "public_url")])
        })?;
        let payload: serde_json::Value = response
            .json()
            .map_err(|e| ShiftError::UploadUnavailable(e.to_string()))?;
        payload
            .get("public_url")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| ShiftError::UploadUnavailable("public_url missing after publish".into()))
    }
}

// ---------------------------------------------------------------------------
// Failure plumbing
// ---------------------------------------------------------------------------

struct HttpFailure {
    transient: bool,
    message: String,
}

impl HttpFailure {
    fn transient(message: String) -> Self {
        Self {
            transient: true,
            message,
        }
    }

    fn fatal(message: String) -> Self {
        Self {
            transient: false,
            message,
        }
    }
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Pull a human-readable message out of an error body, JSON or not.
fn extract_error_message(response: reqwest::blocking::Response) -> String {
    let fallback = response
        .status()
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string();
    let Ok(text) = response.text() else {
        return fallback;
    };
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(&text) {
        for key in ["message", "error", "description", "reason"] {
            if let Some(serde_json::Value::String(s)) = map.get(key) {
                if !s.is_empty() {
                    return s.clone();
                }
            }
        }
    }
    if text.trim().is_empty() {
        fallback
    } else {
        text.chars().take(200).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
