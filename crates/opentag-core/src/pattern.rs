//! Pattern records and strength classification.
//!
//! Patterns arrive as heterogeneous JSON records discriminated by `type`.
//! Deserialization resolves the strength-bearing metric and the sample size
//! up front, so downstream code matches on variants instead of probing for
//! field presence.

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

// ─── Kind ────────────────────────────────────────────────────────────────────

/// Discriminant of a pattern record. Unrecognized future values are carried
/// through as [`PatternKind::Other`] rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatternKind {
  SingleCorrelation,
  ConditionalWr,
  ChampionWrDeviation,
  Combination,
  WinCondition,
  TeamDeviation,
  Other(String),
}

impl PatternKind {
  /// The snake_case string form used in the pattern document.
  pub fn as_str(&self) -> &str {
    match self {
      Self::SingleCorrelation => "single_correlation",
      Self::ConditionalWr => "conditional_wr",
      Self::ChampionWrDeviation => "champion_wr_deviation",
      Self::Combination => "combination",
      Self::WinCondition => "win_condition",
      Self::TeamDeviation => "team_deviation",
      Self::Other(s) => s,
    }
  }
}

impl From<String> for PatternKind {
  fn from(s: String) -> Self {
    match s.as_str() {
      "single_correlation" => Self::SingleCorrelation,
      "conditional_wr" => Self::ConditionalWr,
      "champion_wr_deviation" => Self::ChampionWrDeviation,
      "combination" => Self::Combination,
      "win_condition" => Self::WinCondition,
      "team_deviation" => Self::TeamDeviation,
      _ => Self::Other(s),
    }
  }
}

impl fmt::Display for PatternKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Strength ────────────────────────────────────────────────────────────────

/// The single strength-bearing metric of a pattern.
///
/// At most one of the source fields is expected per record; should several
/// be present, the first in the fixed priority order `correlation`, `gap`,
/// `effect_size`, `z_score` wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrengthMetric {
  Correlation(f64),
  Gap(f64),
  EffectSize(f64),
  ZScore(f64),
}

/// Color tier backing a strength label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthTier {
  Strong,
  Moderate,
  Weak,
}

/// A qualitative strength bucket: the display label plus its color tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrengthClass {
  pub label: &'static str,
  pub tier:  StrengthTier,
}

impl StrengthMetric {
  /// The raw metric value as loaded.
  pub fn value(self) -> f64 {
    match self {
      Self::Correlation(v) | Self::Gap(v) | Self::EffectSize(v) | Self::ZScore(v) => v,
    }
  }

  /// Absolute value of the metric; the sort key for strength ordering.
  pub fn magnitude(self) -> f64 {
    self.value().abs()
  }

  /// The source field name, e.g. `correlation`.
  pub fn field(self) -> &'static str {
    match self {
      Self::Correlation(_) => "correlation",
      Self::Gap(_) => "gap",
      Self::EffectSize(_) => "effect_size",
      Self::ZScore(_) => "z_score",
    }
  }

  /// Classify the metric into its qualitative bucket.
  ///
  /// Thresholds apply to the absolute value, so a correlation of -0.75 is
  /// as strong as +0.75. Z-scores have no defined buckets; they display as
  /// a raw value only and classify as `None`.
  pub fn classify(self) -> Option<StrengthClass> {
    use StrengthTier::{Moderate, Strong, Weak};
    let class = |label, tier| StrengthClass { label, tier };
    match self {
      Self::Correlation(v) => Some(match v.abs() {
        m if m >= 0.7 => class("STRONG", Strong),
        m if m >= 0.4 => class("MODERATE", Moderate),
        _ => class("WEAK", Weak),
      }),
      Self::Gap(v) => Some(match v.abs() {
        m if m >= 0.5 => class("HIGH", Strong),
        m if m >= 0.3 => class("MODERATE", Moderate),
        _ => class("LOW", Weak),
      }),
      Self::EffectSize(v) => Some(match v.abs() {
        m if m >= 1.5 => class("LARGE", Strong),
        m if m >= 0.8 => class("MEDIUM", Moderate),
        _ => class("SMALL", Weak),
      }),
      Self::ZScore(_) => None,
    }
  }
}

// ─── Pattern ─────────────────────────────────────────────────────────────────

/// One auto-discovered statistical relationship.
///
/// Loaded as a flat ordered sequence with no uniqueness requirement, and
/// immutable after load.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawPattern")]
pub struct Pattern {
  pub kind:           PatternKind,
  /// Human-readable statement of the relationship.
  pub interpretation: String,
  pub metric:         Option<StrengthMetric>,
  /// Underlying sample size, from `n`, `n_both`, or `games` in that
  /// priority order; `None` displays as unknown, never as zero.
  pub sample_size:    Option<u64>,
  /// Remaining type-specific fields, preserved in document order for
  /// drill-down display.
  pub details:        Map<String, Value>,
}

impl Pattern {
  /// Strength magnitude for sorting; patterns without a metric sort last.
  pub fn strength(&self) -> Option<f64> {
    self.metric.map(StrengthMetric::magnitude)
  }

  /// Qualitative strength bucket, when the metric defines one.
  pub fn class(&self) -> Option<StrengthClass> {
    self.metric.and_then(StrengthMetric::classify)
  }
}

/// Wire shape of a pattern record; collapsed into [`Pattern`] on load.
#[derive(Deserialize)]
struct RawPattern {
  #[serde(rename = "type")]
  kind:           String,
  interpretation: String,
  correlation:    Option<f64>,
  gap:            Option<f64>,
  effect_size:    Option<f64>,
  z_score:        Option<f64>,
  n:              Option<u64>,
  n_both:         Option<u64>,
  games:          Option<u64>,
  #[serde(flatten)]
  details:        Map<String, Value>,
}

impl From<RawPattern> for Pattern {
  fn from(raw: RawPattern) -> Self {
    let metric = if let Some(v) = raw.correlation {
      Some(StrengthMetric::Correlation(v))
    } else if let Some(v) = raw.gap {
      Some(StrengthMetric::Gap(v))
    } else if let Some(v) = raw.effect_size {
      Some(StrengthMetric::EffectSize(v))
    } else {
      raw.z_score.map(StrengthMetric::ZScore)
    };
    Self {
      kind: raw.kind.into(),
      interpretation: raw.interpretation,
      metric,
      sample_size: raw.n.or(raw.n_both).or(raw.games),
      details: raw.details,
    }
  }
}

/// Pattern kinds with their occurrence counts, most frequent first.
/// Drives the kind filter bar in the patterns view.
pub fn kind_counts(patterns: &[Pattern]) -> Vec<(PatternKind, usize)> {
  let mut counts: IndexMap<&PatternKind, usize> = IndexMap::new();
  for p in patterns {
    *counts.entry(&p.kind).or_insert(0) += 1;
  }
  let mut out: Vec<(PatternKind, usize)> =
    counts.into_iter().map(|(k, c)| (k.clone(), c)).collect();
  out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
  out
}

// ─── Tests ───────────────────────────────────────────────────────────────────
