//! The generic filter-then-sort pipeline behind every list view.
//!
//! Each invocation borrows from the source collection and returns a new
//! ordered sequence; nothing is ever filtered or sorted in place.

use std::cmp::Ordering;

use crate::{
  entity::{EntitySummary, EntityType},
  pattern::{Pattern, PatternKind},
  tag::Tag,
};

// ─── Generic core ────────────────────────────────────────────────────────────

/// Filter `items`, then stable-sort the survivors.
///
/// Equal elements keep their input order, so applying a sort key never
/// scrambles ties, and a comparator of `Ordering::Equal` preserves input
/// order outright.
pub fn apply<'a, T, F, C>(items: &'a [T], keep: F, cmp: C) -> Vec<&'a T>
where
  F: Fn(&T) -> bool,
  C: Fn(&T, &T) -> Ordering,
{
  let mut out: Vec<&T> = items.iter().filter(|item| keep(item)).collect();
  out.sort_by(|a, b| cmp(a, b));
  out
}

// ─── Entity view ─────────────────────────────────────────────────────────────

/// Sort keys for the entity list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitySort {
  /// Lexical name, ascending.
  Name,
  /// Tag count, descending.
  TagCount,
  /// Average confidence, descending.
  AvgConfidence,
}

/// Filter and sort parameters for the entity list.
#[derive(Debug, Clone, Default)]
pub struct EntityQuery {
  pub kind: Option<EntityType>,
  /// Case-insensitive free text matched against the entity name and type,
  /// tag identifiers, and stringified tag values. Empty means no filter.
  pub text: String,
  /// `None` keeps the input order.
  pub sort: Option<EntitySort>,
}

pub fn entities<'a>(
  items: &'a [EntitySummary],
  query: &EntityQuery,
) -> Vec<&'a EntitySummary> {
  let needle = query.text.to_lowercase();
  apply(
    items,
    |e| {
      if query.kind.is_some_and(|kind| e.kind != kind) {
        return false;
      }
      needle.is_empty() || entity_matches(e, &needle)
    },
    |a, b| match query.sort {
      None => Ordering::Equal,
      Some(EntitySort::Name) => a.name.cmp(&b.name),
      Some(EntitySort::TagCount) => b.tag_count.cmp(&a.tag_count),
      Some(EntitySort::AvgConfidence) => b.avg_confidence.total_cmp(&a.avg_confidence),
    },
  )
}

fn entity_matches(e: &EntitySummary, needle: &str) -> bool {
  e.name.to_lowercase().contains(needle)
    || e.kind.as_str().contains(needle)
    || e.tags.iter().any(|t| {
      t.tag.to_lowercase().contains(needle)
        || t.value.to_string().to_lowercase().contains(needle)
    })
}

// ─── Tag view ────────────────────────────────────────────────────────────────

/// Sort keys for a tag list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSort {
  /// Full identifier, ascending — groups tags by prefix as a side effect.
  Name,
  /// Confidence, descending.
  Confidence,
  /// Sample size, descending.
  SampleSize,
}

#[derive(Debug, Clone, Default)]
pub struct TagQuery {
  pub prefix: Option<String>,
  /// `None` keeps the input order.
  pub sort:   Option<TagSort>,
}

pub fn tags<'a>(items: &'a [Tag], query: &TagQuery) -> Vec<&'a Tag> {
  apply(
    items,
    |t| query.prefix.as_deref().is_none_or(|p| t.prefix() == p),
    |a, b| match query.sort {
      None => Ordering::Equal,
      Some(TagSort::Name) => a.tag.cmp(&b.tag),
      Some(TagSort::Confidence) => b.confidence.total_cmp(&a.confidence),
      Some(TagSort::SampleSize) => b.sample_size.cmp(&a.sample_size),
    },
  )
}

// ─── Pattern view ────────────────────────────────────────────────────────────

/// Sort keys for the pattern list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSort {
  /// Metric magnitude, descending; patterns without a metric last.
  Strength,
  /// Kind string form, ascending.
  Kind,
  /// Sample size, descending; patterns without one last.
  SampleSize,
}

#[derive(Debug, Clone, Default)]
pub struct PatternQuery {
  pub kind: Option<PatternKind>,
  /// `None` keeps the input order.
  pub sort: Option<PatternSort>,
}

pub fn patterns<'a>(items: &'a [Pattern], query: &PatternQuery) -> Vec<&'a Pattern> {
  apply(
    items,
    |p| query.kind.as_ref().is_none_or(|k| p.kind == *k),
    |a, b| match query.sort {
      None => Ordering::Equal,
      Some(PatternSort::Strength) => {
        let sa = a.strength().unwrap_or(f64::NEG_INFINITY);
        let sb = b.strength().unwrap_or(f64::NEG_INFINITY);
        sb.total_cmp(&sa)
      }
      Some(PatternSort::Kind) => a.kind.as_str().cmp(b.kind.as_str()),
      Some(PatternSort::SampleSize) => {
        b.sample_size.unwrap_or(0).cmp(&a.sample_size.unwrap_or(0))
      }
    },
  )
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn summaries() -> Vec<EntitySummary> {
    let registry: crate::tag::TagRegistry = serde_json::from_value(json!({
      "player:Zeus": [
        { "tag": "combat:kda", "value": 4.1, "confidence": 0.9 },
        { "tag": "info:team", "value": "T1", "confidence": 1.0 },
      ],
      "team:T1": [
        { "tag": "record:winrate", "value": 0.71, "confidence": 0.8 },
      ],
      "player:Chovy": [
        { "tag": "combat:kda", "value": 6.0, "confidence": 0.7 },
      ],
      "team:DRX": [],
    }))
    .unwrap();
    crate::aggregate::summarize(&registry)
  }

  #[test]
  fn kind_filter_preserves_input_order() {
    let all = summaries();
    let teams = entities(&all, &EntityQuery {
      kind: Some(EntityType::Team),
      ..EntityQuery::default()
    });
    let keys: Vec<_> = teams.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, ["team:T1", "team:DRX"]);
  }

  #[test]
  fn text_filter_matches_tags_and_values() {
    let all = summaries();

    // Matches Zeus via the stringified info:team value.
    let hits = entities(&all, &EntityQuery {
      text: "t1".into(),
      ..EntityQuery::default()
    });
    assert!(hits.iter().any(|e| e.name == "Zeus"));
    assert!(hits.iter().any(|e| e.key == "team:T1"));

    // Matches via tag identifier, case-insensitively.
    let hits = entities(&all, &EntityQuery {
      text: "WINRATE".into(),
      ..EntityQuery::default()
    });
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].key, "team:T1");

    // Empty text returns the input unchanged.
    let hits = entities(&all, &EntityQuery::default());
    assert_eq!(hits.len(), all.len());
  }

  #[test]
  fn tag_count_sort_is_stable_for_ties() {
    let all = summaries();
    let sorted = entities(&all, &EntityQuery {
      sort: Some(EntitySort::TagCount),
      ..EntityQuery::default()
    });
    let keys: Vec<_> = sorted.iter().map(|e| e.key.as_str()).collect();
    // Zeus has 2 tags; T1 and Chovy tie at 1 and keep input order; DRX last.
    assert_eq!(keys, ["player:Zeus", "team:T1", "player:Chovy", "team:DRX"]);
  }

  #[test]
  fn name_sort_is_lexical_ascending() {
    let all = summaries();
    let sorted = entities(&all, &EntityQuery {
      sort: Some(EntitySort::Name),
      ..EntityQuery::default()
    });
    let names: Vec<_> = sorted.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Chovy", "DRX", "T1", "Zeus"]);
  }

  #[test]
  fn tag_query_filters_by_prefix_and_sorts() {
    let tags_in: Vec<Tag> = serde_json::from_value(json!([
      { "tag": "combat:kda", "value": 4.1, "confidence": 0.6, "sample_size": 30 },
      { "tag": "info:team", "value": "T1", "confidence": 1.0, "sample_size": 1 },
      { "tag": "combat:dpm", "value": 610.0, "confidence": 0.9, "sample_size": 30 },
    ]))
    .unwrap();

    let combat = tags(&tags_in, &TagQuery {
      prefix: Some("combat".into()),
      sort: Some(TagSort::Confidence),
    });
    let ids: Vec<_> = combat.iter().map(|t| t.tag.as_str()).collect();
    assert_eq!(ids, ["combat:dpm", "combat:kda"]);

    // Equal sample sizes keep input order under the stable sort.
    let by_sample = tags(&tags_in, &TagQuery {
      prefix: None,
      sort: Some(TagSort::SampleSize),
    });
    let ids: Vec<_> = by_sample.iter().map(|t| t.tag.as_str()).collect();
    assert_eq!(ids, ["combat:kda", "combat:dpm", "info:team"]);
  }

  #[test]
  fn pattern_query_sorts_by_strength_with_missing_last() {
    let items: Vec<Pattern> = serde_json::from_value(json!([
      { "type": "win_condition", "interpretation": "no metric" },
      { "type": "single_correlation", "interpretation": "weak", "correlation": -0.2 },
      { "type": "team_deviation", "interpretation": "z", "z_score": 3.0 },
      { "type": "single_correlation", "interpretation": "strong", "correlation": 0.8 },
    ]))
    .unwrap();

    let sorted = patterns(&items, &PatternQuery {
      kind: None,
      sort: Some(PatternSort::Strength),
    });
    let interps: Vec<_> = sorted.iter().map(|p| p.interpretation.as_str()).collect();
    assert_eq!(interps, ["z", "strong", "weak", "no metric"]);

    let only_corr = patterns(&items, &PatternQuery {
      kind: Some(PatternKind::SingleCorrelation),
      sort: None,
    });
    assert_eq!(only_corr.len(), 2);
    assert_eq!(only_corr[0].interpretation, "weak");
  }
}
