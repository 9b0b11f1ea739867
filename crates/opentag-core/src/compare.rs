//! Side-by-side comparison of selected entities.

use std::collections::BTreeSet;

use crate::entity::EntitySummary;

// ─── Selection ───────────────────────────────────────────────────────────────

/// The entities picked for comparison, in selection order.
///
/// An entity appears at most once; re-selecting it is a no-op rather than
/// an error, matching how a "+ Compare" toggle behaves.
#[derive(Debug, Clone, Default)]
pub struct Selection {
  entities: Vec<EntitySummary>,
}

impl Selection {
  pub fn add(&mut self, entity: EntitySummary) {
    if !self.contains(&entity.key) {
      self.entities.push(entity);
    }
  }

  pub fn remove(&mut self, key: &str) {
    self.entities.retain(|e| e.key != key);
  }

  pub fn contains(&self, key: &str) -> bool {
    self.entities.iter().any(|e| e.key == key)
  }

  pub fn entities(&self) -> &[EntitySummary] {
    &self.entities
  }

  pub fn len(&self) -> usize {
    self.entities.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entities.is_empty()
  }

  pub fn clear(&mut self) {
    self.entities.clear();
  }
}

// ─── Common prefixes ─────────────────────────────────────────────────────────

/// Tag prefixes present in every entity, sorted lexically.
///
/// Suggests comparable dimensions; with fewer than two entities there is
/// nothing to intersect and the result is empty.
pub fn common_prefixes(entities: &[EntitySummary]) -> Vec<String> {
  if entities.len() < 2 {
    return Vec::new();
  }
  let mut sets = entities
    .iter()
    .map(|e| e.tags.iter().map(|t| t.prefix()).collect::<BTreeSet<_>>());
  let first = match sets.next() {
    Some(s) => s,
    None => return Vec::new(),
  };
  let common = sets.fold(first, |acc, s| acc.intersection(&s).copied().collect());
  common.into_iter().map(str::to_owned).collect()
}

// ─── Comparison rows ─────────────────────────────────────────────────────────

/// Highlight applied to one cell of a comparison row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFlag {
  /// The row maximum.
  Best,
  /// The row minimum.
  Worst,
  Plain,
}

/// One comparable metric across the selected entities.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareRow {
  /// Full tag identifier, e.g. `combat:kda`.
  pub tag:    String,
  /// One cell per selected entity, in selection order; `None` where the
  /// entity has no tag of that name or its value is non-numeric.
  pub values: Vec<Option<f64>>,
  max:        f64,
  min:        f64,
}

impl CompareRow {
  /// Highlight for the cell at `idx`.
  ///
  /// When every value in the row is equal, max and min coincide and the
  /// shared value reports `Best` — an accepted degenerate tie.
  pub fn flag(&self, idx: usize) -> CellFlag {
    match self.values.get(idx).copied().flatten() {
      Some(v) if v == self.max => CellFlag::Best,
      Some(v) if v == self.min => CellFlag::Worst,
      Some(_) => CellFlag::Plain,
      None => CellFlag::Plain,
    }
  }
}

/// Build comparison rows for the selected entities.
///
/// A candidate row exists for every distinct tag identifier carrying a
/// numeric value in at least one entity; it survives only if at least two
/// entities have a numeric value for it, since anything less carries no
/// comparative information. Rows come back sorted by tag identifier.
pub fn comparison_rows(entities: &[EntitySummary]) -> Vec<CompareRow> {
  let mut names: BTreeSet<&str> = BTreeSet::new();
  for e in entities {
    for t in &e.tags {
      if t.value.as_number().is_some() {
        names.insert(&t.tag);
      }
    }
  }

  let mut rows = Vec::new();
  for name in names {
    let values: Vec<Option<f64>> =
      entities.iter().map(|e| e.numeric_tag(name)).collect();
    let numeric: Vec<f64> = values.iter().copied().flatten().collect();
    if numeric.len() < 2 {
      continue;
    }
    let max = numeric.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = numeric.iter().copied().fold(f64::INFINITY, f64::min);
    rows.push(CompareRow {
      tag: name.to_owned(),
      values,
      max,
      min,
    });
  }
  rows
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::tag::Tag;

  fn entity(key: &str, tags: serde_json::Value) -> EntitySummary {
    let tags: Vec<Tag> = serde_json::from_value(tags).unwrap();
    EntitySummary::new(key, &tags).unwrap()
  }

  fn player_a() -> EntitySummary {
    entity(
      "player:A",
      json!([
        { "tag": "combat:kda", "value": 5.0, "confidence": 0.9 },
      ]),
    )
  }

  fn player_b() -> EntitySummary {
    entity(
      "player:B",
      json!([
        { "tag": "combat:kda", "value": 3.0, "confidence": 0.9 },
        { "tag": "info:team", "value": "X", "confidence": 1.0 },
      ]),
    )
  }

  #[test]
  fn selection_ignores_duplicates_and_keeps_order() {
    let mut sel = Selection::default();
    sel.add(player_a());
    sel.add(player_b());
    sel.add(player_a()); // no-op
    assert_eq!(sel.len(), 2);
    assert_eq!(sel.entities()[0].key, "player:A");
    assert_eq!(sel.entities()[1].key, "player:B");

    sel.remove("player:A");
    assert_eq!(sel.len(), 1);
    assert!(!sel.contains("player:A"));
  }

  #[test]
  fn common_prefixes_intersect_sorted() {
    let a = entity(
      "player:A",
      json!([
        { "tag": "combat:kda", "value": 5.0, "confidence": 0.9 },
        { "tag": "vision:wards", "value": 1.2, "confidence": 0.9 },
        { "tag": "info:team", "value": "T1", "confidence": 1.0 },
      ]),
    );
    let b = entity(
      "player:B",
      json!([
        { "tag": "info:team", "value": "X", "confidence": 1.0 },
        { "tag": "combat:kda", "value": 3.0, "confidence": 0.9 },
      ]),
    );
    assert_eq!(common_prefixes(&[a, b]), ["combat", "info"]);
  }

  #[test]
  fn common_prefixes_empty_below_two_entities() {
    assert!(common_prefixes(&[]).is_empty());
    assert!(common_prefixes(&[player_a()]).is_empty());
  }

  #[test]
  fn rows_flag_max_and_min_and_drop_non_numeric() {
    let rows = comparison_rows(&[player_a(), player_b()]);
    // info:team is non-numeric and present in only one entity: excluded.
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.tag, "combat:kda");
    assert_eq!(row.values, vec![Some(5.0), Some(3.0)]);
    assert_eq!(row.flag(0), CellFlag::Best);
    assert_eq!(row.flag(1), CellFlag::Worst);
  }

  #[test]
  fn rows_with_fewer_than_two_numeric_cells_are_dropped() {
    let a = player_a();
    let c = entity(
      "player:C",
      json!([
        { "tag": "vision:wards", "value": 0.8, "confidence": 0.9 },
      ]),
    );
    // combat:kda numeric in A only, vision:wards in C only.
    assert!(comparison_rows(&[a, c]).is_empty());
  }

  #[test]
  fn absent_cells_are_none_in_selection_order() {
    let a = entity(
      "player:A",
      json!([
        { "tag": "combat:kda", "value": 5.0, "confidence": 0.9 },
        { "tag": "combat:dpm", "value": 600.0, "confidence": 0.9 },
      ]),
    );
    let b = entity(
      "player:B",
      json!([
        { "tag": "combat:kda", "value": 3.0, "confidence": 0.9 },
        { "tag": "combat:dpm", "value": 550.0, "confidence": 0.9 },
      ]),
    );
    let c = entity(
      "player:C",
      json!([
        { "tag": "combat:kda", "value": 4.0, "confidence": 0.9 },
      ]),
    );
    let rows = comparison_rows(&[a, b, c]);
    assert_eq!(rows.len(), 2);
    // Sorted lexically: combat:dpm before combat:kda.
    assert_eq!(rows[0].tag, "combat:dpm");
    assert_eq!(rows[0].values, vec![Some(600.0), Some(550.0), None]);
    assert_eq!(rows[0].flag(2), CellFlag::Plain);
    assert_eq!(rows[1].values, vec![Some(5.0), Some(3.0), Some(4.0)]);
    assert_eq!(rows[1].flag(2), CellFlag::Plain);
  }

  #[test]
  fn all_equal_values_degenerate_to_best() {
    let a = entity(
      "player:A",
      json!([{ "tag": "combat:kda", "value": 4.0, "confidence": 0.9 }]),
    );
    let b = entity(
      "player:B",
      json!([{ "tag": "combat:kda", "value": 4.0, "confidence": 0.9 }]),
    );
    let rows = comparison_rows(&[a, b]);
    assert_eq!(rows[0].flag(0), CellFlag::Best);
    assert_eq!(rows[0].flag(1), CellFlag::Best);
  }
}
