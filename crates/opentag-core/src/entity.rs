//! Entity keys and the derived entity summary.
//!
//! An entity holds no state of its own. Everything shown about it — name,
//! tag count, average confidence — is derived from its registry entry at
//! read time and never written back.

use serde::{Deserialize, Serialize};

use crate::{
  error::{Error, Result},
  tag::Tag,
};

// ─── EntityType ──────────────────────────────────────────────────────────────

/// The kind of entity a registry key refers to.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
  Player,
  Team,
  Champion,
  Duo,
  Matchup,
  MatchupChamp,
  Pattern,
}

impl EntityType {
  pub const ALL: [Self; 7] = [
    Self::Player,
    Self::Team,
    Self::Champion,
    Self::Duo,
    Self::Matchup,
    Self::MatchupChamp,
    Self::Pattern,
  ];

  /// The string form used in registry keys.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Player => "player",
      Self::Team => "team",
      Self::Champion => "champion",
      Self::Duo => "duo",
      Self::Matchup => "matchup",
      Self::MatchupChamp => "matchup_champ",
      Self::Pattern => "pattern",
    }
  }
}

impl std::str::FromStr for EntityType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Ok(match s {
      "player" => Self::Player,
      "team" => Self::Team,
      "champion" => Self::Champion,
      "duo" => Self::Duo,
      "matchup" => Self::Matchup,
      "matchup_champ" => Self::MatchupChamp,
      "pattern" => Self::Pattern,
      other => return Err(Error::UnknownEntityType(other.to_owned())),
    })
  }
}

impl std::fmt::Display for EntityType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── EntityKey ───────────────────────────────────────────────────────────────

/// A parsed registry key: `<type>:<name>`, split on the first colon only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityKey {
  pub kind: EntityType,
  pub name: String,
}

impl EntityKey {
  /// Parse a registry key. The name keeps any further colons intact, so
  /// `matchup_champ:TeamA-vs-TeamB#Ahri` and names containing colons both
  /// survive unchanged.
  pub fn parse(key: &str) -> Result<Self> {
    let (kind, name) = key
      .split_once(':')
      .ok_or_else(|| Error::MalformedKey(key.to_owned()))?;
    if name.is_empty() {
      return Err(Error::MalformedKey(key.to_owned()));
    }
    Ok(Self {
      kind: kind.parse()?,
      name: name.to_owned(),
    })
  }
}

// ─── EntitySummary ───────────────────────────────────────────────────────────

/// The computed read model for one entity — never stored, always derived.
///
/// A pure projection of the registry entry: rebuilding it is always safe,
/// and mutating it never touches the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySummary {
  /// The full registry key, e.g. `player:Faker`.
  pub key:            String,
  pub kind:           EntityType,
  pub name:           String,
  pub tags:           Vec<Tag>,
  pub tag_count:      usize,
  /// Arithmetic mean of tag confidences; 0.0 for an entity with no tags.
  pub avg_confidence: f64,
}

impl EntitySummary {
  /// Build the summary for one registry entry.
  pub fn new(key: &str, tags: &[Tag]) -> Result<Self> {
    let EntityKey { kind, name } = EntityKey::parse(key)?;
    let avg_confidence = if tags.is_empty() {
      0.0
    } else {
      tags.iter().map(|t| t.confidence).sum::<f64>() / tags.len() as f64
    };
    Ok(Self {
      key: key.to_owned(),
      kind,
      name,
      tags: tags.to_vec(),
      tag_count: tags.len(),
      avg_confidence,
    })
  }

  /// The first tag with exactly this identifier, if any.
  pub fn find_tag(&self, tag: &str) -> Option<&Tag> {
    self.tags.iter().find(|t| t.tag == tag)
  }

  /// The text value of `tag`; `None` when absent or non-text.
  pub fn text_tag(&self, tag: &str) -> Option<&str> {
    self.find_tag(tag).and_then(|t| t.value.as_text())
  }

  /// The numeric value of `tag`; `None` when absent or non-numeric.
  pub fn numeric_tag(&self, tag: &str) -> Option<f64> {
    self.find_tag(tag).and_then(|t| t.value.as_number())
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tag::TagValue;

  #[test]
  fn parse_splits_on_first_colon_only() {
    let key = EntityKey::parse("matchup_champ:TeamA-vs-TeamB#Ahri").unwrap();
    assert_eq!(key.kind, EntityType::MatchupChamp);
    assert_eq!(key.name, "TeamA-vs-TeamB#Ahri");
  }

  #[test]
  fn parse_preserves_colons_in_name() {
    let key = EntityKey::parse("team:T1:Academy").unwrap();
    assert_eq!(key.kind, EntityType::Team);
    assert_eq!(key.name, "T1:Academy");
  }

  #[test]
  fn parse_rejects_missing_separator() {
    assert!(matches!(
      EntityKey::parse("justaname"),
      Err(Error::MalformedKey(_))
    ));
  }

  #[test]
  fn parse_rejects_empty_name() {
    assert!(matches!(
      EntityKey::parse("player:"),
      Err(Error::MalformedKey(_))
    ));
  }

  #[test]
  fn parse_rejects_unknown_type() {
    assert!(matches!(
      EntityKey::parse("galaxy:Andromeda"),
      Err(Error::UnknownEntityType(_))
    ));
  }

  #[test]
  fn type_round_trips_through_string_form() {
    for kind in EntityType::ALL {
      assert_eq!(kind.as_str().parse::<EntityType>().unwrap(), kind);
    }
  }

  fn conf_tag(id: &str, confidence: f64) -> Tag {
    Tag {
      tag: id.into(),
      value: TagValue::Number(1.0),
      confidence,
      evidence: String::new(),
      sample_size: 1,
      source: String::new(),
      timestamp: String::new(),
    }
  }

  #[test]
  fn summary_averages_confidence() {
    let tags = vec![conf_tag("a:x", 0.4), conf_tag("a:y", 0.8)];
    let summary = EntitySummary::new("player:Faker", &tags).unwrap();
    assert_eq!(summary.tag_count, 2);
    assert!((summary.avg_confidence - 0.6).abs() < 1e-12);
  }

  #[test]
  fn summary_of_tagless_entity_has_zero_confidence() {
    let summary = EntitySummary::new("team:DRX", &[]).unwrap();
    assert_eq!(summary.tag_count, 0);
    assert_eq!(summary.avg_confidence, 0.0);
  }
}
