//! Store behavior tests against an in-memory document source.

use std::sync::{
  Arc,
  atomic::{AtomicUsize, Ordering},
};

use serde_json::json;

use crate::{DocumentSource, LoadError, PATTERNS_DOC, SourceError, TAGS_DOC, TagStore};

/// Serves fixed documents and counts fetches. Optionally fails the first
/// `fail_tags_first` fetches of the tags document to exercise retry.
struct MockSource {
  tags:            Vec<u8>,
  patterns:        Vec<u8>,
  tag_fetches:     AtomicUsize,
  pattern_fetches: AtomicUsize,
  fail_tags_first: usize,
}

impl MockSource {
  fn new() -> Self {
    let tags = json!({
      "player:Faker": [
        { "tag": "combat:kda", "value": 5.2, "confidence": 0.9 },
      ],
      "team:T1": [],
    });
    let patterns = json!([
      { "type": "single_correlation", "interpretation": "x", "correlation": 0.8, "n": 40 },
    ]);
    Self {
      tags: serde_json::to_vec(&tags).expect("tags fixture"),
      patterns: serde_json::to_vec(&patterns).expect("patterns fixture"),
      tag_fetches: AtomicUsize::new(0),
      pattern_fetches: AtomicUsize::new(0),
      fail_tags_first: 0,
    }
  }

  fn failing_first(n: usize) -> Self {
    Self {
      fail_tags_first: n,
      ..Self::new()
    }
  }

  fn not_found(path: &str) -> SourceError {
    SourceError::Io {
      path: path.to_owned(),
      source: std::io::Error::new(std::io::ErrorKind::NotFound, "injected"),
    }
  }
}

impl DocumentSource for MockSource {
  async fn fetch(&self, name: &str) -> Result<Vec<u8>, SourceError> {
    match name {
      TAGS_DOC => {
        let n = self.tag_fetches.fetch_add(1, Ordering::SeqCst);
        if n < self.fail_tags_first {
          return Err(Self::not_found(name));
        }
        Ok(self.tags.clone())
      }
      PATTERNS_DOC => {
        self.pattern_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.patterns.clone())
      }
      other => Err(Self::not_found(other)),
    }
  }
}

// ─── Loading ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn load_parses_both_documents() {
  let store = TagStore::new(MockSource::new());
  let snapshot = store.load().await.unwrap();

  assert_eq!(snapshot.registry.len(), 2);
  assert!(snapshot.registry.contains_key("player:Faker"));
  assert_eq!(snapshot.patterns.len(), 1);
  assert_eq!(snapshot.patterns[0].sample_size, Some(40));
}

#[tokio::test]
async fn second_load_reuses_the_first_without_refetch() {
  let store = TagStore::new(MockSource::new());

  let first = store.load().await.unwrap();
  let second = store.load().await.unwrap();

  assert!(Arc::ptr_eq(&first.registry, &second.registry));
  assert!(Arc::ptr_eq(&first.patterns, &second.patterns));
  assert_eq!(store.source.tag_fetches.load(Ordering::SeqCst), 1);
  assert_eq!(store.source.pattern_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_first_loads_share_one_fetch() {
  let store = TagStore::new(MockSource::new());

  let (a, b) = tokio::join!(store.load(), store.load());
  let (a, b) = (a.unwrap(), b.unwrap());

  assert!(Arc::ptr_eq(&a.registry, &b.registry));
  assert_eq!(store.source.tag_fetches.load(Ordering::SeqCst), 1);
  assert_eq!(store.source.pattern_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn registry_and_patterns_views_share_the_snapshot() {
  let store = TagStore::new(MockSource::new());

  let registry = store.registry().await.unwrap();
  let registry_again = store.registry().await.unwrap();
  let patterns = store.patterns().await.unwrap();

  assert!(Arc::ptr_eq(&registry, &registry_again));
  assert_eq!(patterns.len(), 1);
  assert_eq!(store.source.tag_fetches.load(Ordering::SeqCst), 1);
}

// ─── Failure ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn failed_fetch_is_not_cached_and_retries() {
  let store = TagStore::new(MockSource::failing_first(1));

  let err = store.load().await.unwrap_err();
  assert!(matches!(err, LoadError::Fetch { doc: TAGS_DOC, .. }));

  // The store stayed unloaded; the next call refetches and succeeds.
  let snapshot = store.load().await.unwrap();
  assert_eq!(snapshot.registry.len(), 2);
  assert_eq!(store.source.tag_fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unparseable_document_is_a_parse_error() {
  let mut source = MockSource::new();
  source.patterns = b"not json at all".to_vec();
  let store = TagStore::new(source);

  let err = store.load().await.unwrap_err();
  assert!(matches!(err, LoadError::Parse { doc: PATTERNS_DOC, .. }));

  // Not cached either: fixing the source is not possible here, but the
  // store must still be willing to try again.
  assert!(store.load().await.is_err());
}

#[tokio::test]
async fn wrong_shape_is_a_parse_error() {
  let mut source = MockSource::new();
  // An array where an object keyed by entity is required.
  source.tags = b"[1, 2, 3]".to_vec();
  let store = TagStore::new(source);

  let err = store.load().await.unwrap_err();
  assert!(matches!(err, LoadError::Parse { doc: TAGS_DOC, .. }));
}
