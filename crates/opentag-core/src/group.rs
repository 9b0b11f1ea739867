//! Prefix grouping of one entity's tags, for faceted filtering.

use indexmap::IndexMap;

use crate::tag::Tag;

/// One entity's tags partitioned by namespace prefix.
///
/// Rebuilt per view from the entity's tag list; the source tags are never
/// mutated. Groups appear in first-seen order and each tag keeps its
/// position within its group, so the sum of group sizes always equals the
/// entity's tag count.
#[derive(Debug, Clone, Default)]
pub struct PrefixGroups<'a> {
  all:    &'a [Tag],
  groups: IndexMap<&'a str, Vec<&'a Tag>>,
}

impl<'a> PrefixGroups<'a> {
  pub fn build(tags: &'a [Tag]) -> Self {
    let mut groups: IndexMap<&str, Vec<&Tag>> = IndexMap::new();
    for tag in tags {
      groups.entry(tag.prefix()).or_default().push(tag);
    }
    Self { all: tags, groups }
  }

  /// Number of distinct prefixes.
  pub fn len(&self) -> usize {
    self.groups.len()
  }

  pub fn is_empty(&self) -> bool {
    self.groups.is_empty()
  }

  /// Total number of tags across all groups.
  pub fn total(&self) -> usize {
    self.all.len()
  }

  /// Prefixes with their group sizes, largest group first; ties broken
  /// lexically so facet ordering is deterministic.
  pub fn by_size(&self) -> Vec<(&'a str, usize)> {
    let mut sizes: Vec<_> = self.groups.iter().map(|(p, g)| (*p, g.len())).collect();
    sizes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    sizes
  }

  /// The tags under one prefix; empty for a prefix that does not occur.
  pub fn get(&self, prefix: &str) -> &[&'a Tag] {
    self.groups.get(prefix).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Tags filtered to `prefix`, or the full list in its original order
  /// when no prefix is selected.
  pub fn select(&self, prefix: Option<&str>) -> Vec<&'a Tag> {
    match prefix {
      Some(p) => self.get(p).to_vec(),
      None => self.all.iter().collect(),
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
