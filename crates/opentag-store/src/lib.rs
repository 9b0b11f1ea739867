//! Load-once document store for the tag registry and pattern list.
//!
//! Both documents are fetched exactly once per process: the first caller
//! performs the fetch, concurrent first callers coalesce on it, and every
//! later caller receives the same `Arc`. A failed load caches nothing, so
//! the next call retries from scratch, and the two documents only ever
//! become visible together — never one without the other.

pub mod source;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use opentag_core::{pattern::Pattern, tag::TagRegistry};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

pub use source::{DocumentSource, FsSource, HttpSource, SourceError};

/// Name of the tag registry document.
pub const TAGS_DOC: &str = "tags.json";
/// Name of the pattern document.
pub const PATTERNS_DOC: &str = "patterns.json";

// ─── Error ───────────────────────────────────────────────────────────────────

/// Failure to load either source document.
#[derive(Debug, Error)]
pub enum LoadError {
  #[error("fetching {doc}: {source}")]
  Fetch {
    doc:    &'static str,
    #[source]
    source: SourceError,
  },

  #[error("parsing {doc}: {source}")]
  Parse {
    doc:    &'static str,
    #[source]
    source: serde_json::Error,
  },
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// The two documents, loaded together and immutable thereafter.
#[derive(Debug, Clone)]
pub struct Snapshot {
  pub registry: Arc<TagRegistry>,
  pub patterns: Arc<Vec<Pattern>>,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Caller-owned, load-once cache of the two source documents.
///
/// The fetch dependency is injected so tests can serve fixed documents and
/// assert single-fetch behavior without process-wide globals.
pub struct TagStore<S> {
  source: S,
  loaded: OnceCell<Snapshot>,
}

impl<S: DocumentSource> TagStore<S> {
  pub fn new(source: S) -> Self {
    Self {
      source,
      loaded: OnceCell::new(),
    }
  }

  /// Load both documents, or return the already-loaded snapshot.
  ///
  /// The two fetches run concurrently; either failure leaves the store
  /// unloaded, so a later call retries both documents.
  pub async fn load(&self) -> Result<Snapshot, LoadError> {
    self
      .loaded
      .get_or_try_init(|| async {
        let (registry, patterns) =
          tokio::try_join!(self.fetch_registry(), self.fetch_patterns())?;
        info!(
          entities = registry.len(),
          patterns = patterns.len(),
          "loaded tag documents"
        );
        Ok(Snapshot {
          registry: Arc::new(registry),
          patterns: Arc::new(patterns),
        })
      })
      .await
      .map(Snapshot::clone)
  }

  /// The tag registry; loads both documents on first use.
  pub async fn registry(&self) -> Result<Arc<TagRegistry>, LoadError> {
    Ok(self.load().await?.registry)
  }

  /// The pattern list; loads both documents on first use.
  pub async fn patterns(&self) -> Result<Arc<Vec<Pattern>>, LoadError> {
    Ok(self.load().await?.patterns)
  }

  async fn fetch_registry(&self) -> Result<TagRegistry, LoadError> {
    let bytes = self
      .source
      .fetch(TAGS_DOC)
      .await
      .map_err(|source| LoadError::Fetch {
        doc: TAGS_DOC,
        source,
      })?;
    serde_json::from_slice(&bytes).map_err(|source| LoadError::Parse {
      doc: TAGS_DOC,
      source,
    })
  }

  async fn fetch_patterns(&self) -> Result<Vec<Pattern>, LoadError> {
    let bytes = self
      .source
      .fetch(PATTERNS_DOC)
      .await
      .map_err(|source| LoadError::Fetch {
        doc: PATTERNS_DOC,
        source,
      })?;
    serde_json::from_slice(&bytes).map_err(|source| LoadError::Parse {
      doc: PATTERNS_DOC,
      source,
    })
  }
}
