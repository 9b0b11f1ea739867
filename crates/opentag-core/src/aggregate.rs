//! Registry-wide aggregation: entity summaries and global stats.

use std::collections::BTreeMap;

use tracing::warn;

use crate::{
  entity::{EntityKey, EntitySummary, EntityType},
  tag::TagRegistry,
};

/// Build one summary per well-formed key, in registry insertion order.
///
/// Keys without a separator or with an unknown type are skipped with a
/// warning rather than failing the whole list; the registry is best-effort
/// analytic output, and one bad key must not take down the view.
pub fn summarize(registry: &TagRegistry) -> Vec<EntitySummary> {
  registry
    .iter()
    .filter_map(|(key, tags)| match EntitySummary::new(key, tags) {
      Ok(summary) => Some(summary),
      Err(e) => {
        warn!(key, error = %e, "skipping entity with malformed key");
        None
      }
    })
    .collect()
}

/// Count every tag in the registry by its namespace prefix.
/// Drives the global facet and legend displays.
pub fn tag_prefix_stats(registry: &TagRegistry) -> BTreeMap<String, usize> {
  let mut counts = BTreeMap::new();
  for tags in registry.values() {
    for tag in tags {
      *counts.entry(tag.prefix().to_owned()).or_insert(0) += 1;
    }
  }
  counts
}

/// Count entities per type over well-formed keys.
///
/// Types with no entities are omitted, not reported as zero: the result
/// only ever contains types that occur in the registry.
pub fn entity_type_stats(registry: &TagRegistry) -> BTreeMap<EntityType, usize> {
  let mut counts = BTreeMap::new();
  for key in registry.keys() {
    if let Ok(parsed) = EntityKey::parse(key) {
      *counts.entry(parsed.kind).or_insert(0) += 1;
    }
  }
  counts
}

/// Player entities whose `info:team` tag names `team`.
pub fn team_players(registry: &TagRegistry, team: &str) -> Vec<EntitySummary> {
  summarize(registry)
    .into_iter()
    .filter(|e| e.kind == EntityType::Player && e.text_tag("info:team") == Some(team))
    .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn registry() -> TagRegistry {
    serde_json::from_value(json!({
      "player:Faker": [
        { "tag": "combat:kda", "value": 5.2, "confidence": 0.9 },
        { "tag": "info:team", "value": "T1", "confidence": 1.0 },
        { "tag": "combat:dpm", "value": 612.0, "confidence": 0.7 },
      ],
      "player:Chovy": [
        { "tag": "info:team", "value": "Gen.G", "confidence": 1.0 },
      ],
      "team:T1": [
        { "tag": "record:winrate", "value": 0.71, "confidence": 0.8 },
      ],
      "no-separator-here": [],
      "asteroid:Ceres": [],
      "duo:Faker+Gumayusi": [],
    }))
    .unwrap()
  }

  #[test]
  fn summarize_skips_malformed_keys() {
    let summaries = summarize(&registry());
    let keys: Vec<_> = summaries.iter().map(|s| s.key.as_str()).collect();
    // Insertion order, minus the separator-less and unknown-type keys.
    assert_eq!(
      keys,
      ["player:Faker", "player:Chovy", "team:T1", "duo:Faker+Gumayusi"]
    );
  }

  #[test]
  fn summarize_derives_counts_and_confidence() {
    let summaries = summarize(&registry());
    let faker = &summaries[0];
    assert_eq!(faker.tag_count, 3);
    let expected = (0.9 + 1.0 + 0.7) / 3.0;
    assert!((faker.avg_confidence - expected).abs() < 1e-12);

    let duo = summaries.iter().find(|s| s.kind == EntityType::Duo).unwrap();
    assert_eq!(duo.tag_count, 0);
    assert_eq!(duo.avg_confidence, 0.0);
  }

  #[test]
  fn prefix_stats_count_across_entities() {
    let stats = tag_prefix_stats(&registry());
    assert_eq!(stats.get("combat"), Some(&2));
    assert_eq!(stats.get("info"), Some(&2));
    assert_eq!(stats.get("record"), Some(&1));
    assert_eq!(stats.get("vision"), None);
  }

  #[test]
  fn type_stats_omit_absent_types() {
    let stats = entity_type_stats(&registry());
    assert_eq!(stats.get(&EntityType::Player), Some(&2));
    assert_eq!(stats.get(&EntityType::Team), Some(&1));
    assert_eq!(stats.get(&EntityType::Duo), Some(&1));
    // Champion never occurs: omitted entirely, not reported as zero.
    assert!(!stats.contains_key(&EntityType::Champion));
    assert_eq!(stats.len(), 3);
  }

  #[test]
  fn team_players_matches_on_info_team() {
    let players = team_players(&registry(), "T1");
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].name, "Faker");
    assert!(team_players(&registry(), "KT").is_empty());
  }
}
