//! Tag types — the fundamental unit of the registry.
//!
//! A tag is an immutable, confidence-scored observation about an entity.
//! Tags are never updated after load, and no field is cross-validated
//! against another; the registry is best-effort analytic output, not a
//! transactional record.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ─── TagValue ────────────────────────────────────────────────────────────────

/// The observed value of a tag.
///
/// Source documents carry values as plain JSON scalars; deserialization
/// picks the variant from the JSON type, so the numeric-only views used by
/// comparison and filtering are type-checked rather than runtime-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
  Bool(bool),
  Number(f64),
  Text(String),
}

impl TagValue {
  /// The numeric view of the value; `None` for text and booleans.
  pub fn as_number(&self) -> Option<f64> {
    match self {
      Self::Number(n) => Some(*n),
      _ => None,
    }
  }

  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text(s) => Some(s),
      _ => None,
    }
  }
}

impl std::fmt::Display for TagValue {
  /// Whole numbers print without a fractional part; everything else is
  /// rounded to two decimals.
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Text(s) => f.write_str(s),
      Self::Bool(b) => write!(f, "{b}"),
      Self::Number(n) if n.fract() == 0.0 => write!(f, "{n}"),
      Self::Number(n) => write!(f, "{n:.2}"),
    }
  }
}

// ─── Tag ─────────────────────────────────────────────────────────────────────

/// A single labeled, confidence-scored observation about an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
  /// Identifier of the form `<prefix>:<name>`; the prefix is the namespace
  /// (e.g. `combat`, `info`, `record`). Split on the first colon only.
  pub tag:         String,
  pub value:       TagValue,
  /// Reliability of the observation, in `[0, 1]`.
  pub confidence:  f64,
  /// Free-text justification.
  #[serde(default)]
  pub evidence:    String,
  /// Number of underlying observations.
  #[serde(default)]
  pub sample_size: u64,
  /// Free-text provenance label.
  #[serde(default)]
  pub source:      String,
  /// Point-in-time marker; kept as text, never parsed.
  #[serde(default)]
  pub timestamp:   String,
}

impl Tag {
  /// The namespace segment before the first colon. An identifier without a
  /// colon is its own prefix.
  pub fn prefix(&self) -> &str {
    match self.tag.find(':') {
      Some(idx) => &self.tag[..idx],
      None => &self.tag,
    }
  }

  /// The name segment after the first colon, or the whole identifier when
  /// there is none. Further colons stay part of the name.
  pub fn name(&self) -> &str {
    match self.tag.find(':') {
      Some(idx) => &self.tag[idx + 1..],
      None => &self.tag,
    }
  }
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// The registry: entity key → that entity's tags, in document order.
///
/// Backed by an insertion-ordered map because the source document's object
/// key order drives the default display order. Read-only after load.
pub type TagRegistry = IndexMap<String, Vec<Tag>>;

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn tag(id: &str, value: TagValue) -> Tag {
    Tag {
      tag: id.into(),
      value,
      confidence: 0.9,
      evidence: String::new(),
      sample_size: 10,
      source: String::new(),
      timestamp: String::new(),
    }
  }

  #[test]
  fn prefix_and_name_split_on_first_colon() {
    let t = tag("combat:kda", TagValue::Number(5.0));
    assert_eq!(t.prefix(), "combat");
    assert_eq!(t.name(), "kda");
  }

  #[test]
  fn name_keeps_further_colons() {
    let t = tag("info:team:alt", TagValue::Text("T1".into()));
    assert_eq!(t.prefix(), "info");
    assert_eq!(t.name(), "team:alt");
  }

  #[test]
  fn colonless_identifier_is_its_own_prefix() {
    let t = tag("orphan", TagValue::Bool(true));
    assert_eq!(t.prefix(), "orphan");
    assert_eq!(t.name(), "orphan");
  }

  #[test]
  fn value_deserializes_by_json_type() {
    let t: Tag = serde_json::from_value(serde_json::json!({
      "tag": "record:winrate",
      "value": 0.62,
      "confidence": 0.8,
      "evidence": "34 games",
      "sample_size": 34,
      "source": "miner-v2",
      "timestamp": "2025-11-03",
    }))
    .unwrap();
    assert_eq!(t.value.as_number(), Some(0.62));

    let t: Tag = serde_json::from_value(serde_json::json!({
      "tag": "info:team",
      "value": "Gen.G",
      "confidence": 1.0,
    }))
    .unwrap();
    assert_eq!(t.value.as_text(), Some("Gen.G"));
    assert_eq!(t.value.as_number(), None);
    assert_eq!(t.sample_size, 0);
  }

  #[test]
  fn display_trims_whole_numbers() {
    assert_eq!(TagValue::Number(5.0).to_string(), "5");
    assert_eq!(TagValue::Number(3.14159).to_string(), "3.14");
    assert_eq!(TagValue::Bool(true).to_string(), "true");
    assert_eq!(TagValue::Text("mid".into()).to_string(), "mid");
  }

  #[test]
  fn registry_preserves_document_order() {
    let registry: TagRegistry = serde_json::from_str(
      r#"{"team:T1": [], "player:Faker": [], "champion:Ahri": []}"#,
    )
    .unwrap();
    let keys: Vec<_> = registry.keys().collect();
    assert_eq!(keys, ["team:T1", "player:Faker", "champion:Ahri"]);
  }
}
