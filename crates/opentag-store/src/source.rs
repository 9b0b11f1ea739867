//! Document sources — where the two JSON documents come from.
//!
//! The store never knows about paths or URLs; it asks a source for a
//! document by name. Injecting the source lets tests serve fixed bytes and
//! count fetches.

use std::{future::Future, path::PathBuf, time::Duration};

use thiserror::Error;

// ─── Error ───────────────────────────────────────────────────────────────────

/// Failure to produce a document's bytes.
#[derive(Debug, Error)]
pub enum SourceError {
  #[error("reading {path}: {source}")]
  Io {
    path:   String,
    #[source]
    source: std::io::Error,
  },

  #[error("fetching {url}: {source}")]
  Http {
    url:    String,
    #[source]
    source: reqwest::Error,
  },

  #[error("fetching {url} → {status}")]
  HttpStatus {
    url:    String,
    status: reqwest::StatusCode,
  },
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Supplier of raw document bytes.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes.
pub trait DocumentSource: Send + Sync {
  /// Fetch the named document, e.g. `tags.json`.
  fn fetch<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Vec<u8>, SourceError>> + Send + 'a;
}

// ─── Filesystem ──────────────────────────────────────────────────────────────

/// Reads documents from a base directory on disk.
#[derive(Debug, Clone)]
pub struct FsSource {
  base: PathBuf,
}

impl FsSource {
  pub fn new(base: impl Into<PathBuf>) -> Self {
    Self { base: base.into() }
  }
}

impl DocumentSource for FsSource {
  async fn fetch(&self, name: &str) -> Result<Vec<u8>, SourceError> {
    let path = self.base.join(name);
    tokio::fs::read(&path)
      .await
      .map_err(|source| SourceError::Io {
        path: path.display().to_string(),
        source,
      })
  }
}

// ─── HTTP ────────────────────────────────────────────────────────────────────

/// Fetches documents over HTTP from a base URL.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct HttpSource {
  client:   reqwest::Client,
  base_url: String,
}

impl HttpSource {
  pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self {
      client,
      base_url: base_url.into(),
    })
  }

  fn url(&self, name: &str) -> String {
    format!("{}/{name}", self.base_url.trim_end_matches('/'))
  }
}

impl DocumentSource for HttpSource {
  async fn fetch(&self, name: &str) -> Result<Vec<u8>, SourceError> {
    let url = self.url(name);
    let resp = self
      .client
      .get(&url)
      .send()
      .await
      .map_err(|source| SourceError::Http {
        url: url.clone(),
        source,
      })?;

    if !resp.status().is_success() {
      return Err(SourceError::HttpStatus {
        url,
        status: resp.status(),
      });
    }

    resp
      .bytes()
      .await
      .map(|b| b.to_vec())
      .map_err(|source| SourceError::Http { url, source })
  }
}
