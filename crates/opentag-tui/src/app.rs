//! Application state machine and event dispatcher.
//!
//! All data is loaded once before the event loop starts; every list shown
//! on screen is recomputed through the core query pipeline from that
//! immutable snapshot plus the selection state owned here.

use std::collections::BTreeMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use opentag_core::{
  aggregate,
  compare::Selection,
  entity::{EntitySummary, EntityType},
  pattern::{self, Pattern, PatternKind},
  query::{self, EntityQuery, EntitySort, PatternQuery, PatternSort, TagQuery, TagSort},
  tag::Tag,
};
use opentag_store::Snapshot;

// ─── Tabs and focus ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
  Entities,
  Compare,
  Patterns,
}

/// Keyboard focus within the entities tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  List,
  Detail,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// All entity summaries, in registry order.
  pub entities:     Vec<EntitySummary>,
  /// All patterns, in document order.
  pub patterns:     Vec<Pattern>,
  /// Global per-prefix tag counts, for the status line.
  pub prefix_stats: BTreeMap<String, usize>,
  /// Entity counts per type; drives the type filter cycle.
  pub type_stats:   BTreeMap<EntityType, usize>,

  pub tab:   Tab,
  pub focus: Focus,

  // Entity list state.
  pub search:        String,
  pub search_active: bool,
  pub type_filter:   Option<EntityType>,
  pub entity_sort:   EntitySort,
  pub list_cursor:   usize,

  // Entity detail state.
  pub selected_key:  Option<String>,
  pub prefix_filter: Option<String>,
  pub tag_sort:      TagSort,
  pub detail_scroll: usize,

  // Comparison state.
  pub compare:        Selection,
  pub compare_cursor: usize,

  // Patterns state.
  pub pattern_filter:   Option<PatternKind>,
  pub pattern_sort:     PatternSort,
  pub pattern_cursor:   usize,
  pub pattern_expanded: bool,

  /// One-line message shown in the status bar.
  pub status_msg: String,
}

impl App {
  pub fn new(snapshot: &Snapshot) -> Self {
    Self {
      entities: aggregate::summarize(&snapshot.registry),
      patterns: snapshot.patterns.as_ref().clone(),
      prefix_stats: aggregate::tag_prefix_stats(&snapshot.registry),
      type_stats: aggregate::entity_type_stats(&snapshot.registry),
      tab: Tab::Entities,
      focus: Focus::List,
      search: String::new(),
      search_active: false,
      type_filter: None,
      entity_sort: EntitySort::TagCount,
      list_cursor: 0,
      selected_key: None,
      prefix_filter: None,
      tag_sort: TagSort::Name,
      detail_scroll: 0,
      compare: Selection::default(),
      compare_cursor: 0,
      pattern_filter: None,
      pattern_sort: PatternSort::Strength,
      pattern_cursor: 0,
      pattern_expanded: false,
      status_msg: String::new(),
    }
  }

  // ── Derived lists ─────────────────────────────────────────────────────────

  /// Entities surviving the current search/type filter, sorted.
  pub fn visible_entities(&self) -> Vec<&EntitySummary> {
    query::entities(&self.entities, &EntityQuery {
      kind: self.type_filter,
      text: self.search.clone(),
      sort: Some(self.entity_sort),
    })
  }

  /// The entity under the list cursor, if any.
  pub fn cursor_entity(&self) -> Option<&EntitySummary> {
    let list = self.visible_entities();
    list.get(self.list_cursor).copied()
  }

  /// The entity open in the detail pane.
  pub fn selected_entity(&self) -> Option<&EntitySummary> {
    let key = self.selected_key.as_deref()?;
    self.entities.iter().find(|e| e.key == key)
  }

  /// The selected entity's tags under the current facet and sort.
  pub fn detail_tags(&self) -> Vec<&Tag> {
    match self.selected_entity() {
      Some(entity) => query::tags(&entity.tags, &TagQuery {
        prefix: self.prefix_filter.clone(),
        sort: Some(self.tag_sort),
      }),
      None => Vec::new(),
    }
  }

  /// Patterns surviving the current kind filter, sorted.
  pub fn visible_patterns(&self) -> Vec<&Pattern> {
    query::patterns(&self.patterns, &PatternQuery {
      kind: self.pattern_filter.clone(),
      sort: Some(self.pattern_sort),
    })
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    // Search input mode captures printable keys.
    if self.search_active {
      self.handle_search_key(key);
      return true;
    }

    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Char('1') => self.tab = Tab::Entities,
      KeyCode::Char('2') => self.tab = Tab::Compare,
      KeyCode::Char('3') => self.tab = Tab::Patterns,
      KeyCode::Tab => self.next_tab(),
      _ => match self.tab {
        Tab::Entities => self.handle_entities_key(key),
        Tab::Compare => self.handle_compare_key(key),
        Tab::Patterns => self.handle_patterns_key(key),
      },
    }
    true
  }

  fn next_tab(&mut self) {
    self.tab = match self.tab {
      Tab::Entities => Tab::Compare,
      Tab::Compare => Tab::Patterns,
      Tab::Patterns => Tab::Entities,
    };
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.search_active = false;
        self.search.clear();
        self.list_cursor = 0;
      }
      KeyCode::Enter => {
        self.search_active = false;
        self.list_cursor = 0;
      }
      KeyCode::Backspace => {
        self.search.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.search.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
  }

  fn handle_entities_key(&mut self, key: KeyEvent) {
    match self.focus {
      Focus::List => self.handle_list_key(key),
      Focus::Detail => self.handle_detail_key(key),
    }
  }

  fn handle_list_key(&mut self, key: KeyEvent) {
    let len = self.visible_entities().len();
    match key.code {
      KeyCode::Char('/') => {
        self.search_active = true;
        self.status_msg = String::new();
      }
      KeyCode::Char('t') => self.cycle_type_filter(),
      KeyCode::Char('s') => {
        self.entity_sort = match self.entity_sort {
          EntitySort::TagCount => EntitySort::Name,
          EntitySort::Name => EntitySort::AvgConfidence,
          EntitySort::AvgConfidence => EntitySort::TagCount,
        };
      }
      KeyCode::Down | KeyCode::Char('j') => {
        if len > 0 {
          self.list_cursor = (self.list_cursor + 1).min(len - 1);
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }
      KeyCode::Enter => {
        if let Some(key) = self.cursor_entity().map(|e| e.key.clone()) {
          self.selected_key = Some(key);
          self.prefix_filter = None;
          self.detail_scroll = 0;
          self.focus = Focus::Detail;
        }
      }
      KeyCode::Char('c') => self.add_cursor_to_compare(),
      _ => {}
    }
  }

  fn handle_detail_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc | KeyCode::Char('h') => self.focus = Focus::List,
      KeyCode::Char('p') => self.cycle_prefix_filter(),
      KeyCode::Char('o') => {
        self.tag_sort = match self.tag_sort {
          TagSort::Name => TagSort::Confidence,
          TagSort::Confidence => TagSort::SampleSize,
          TagSort::SampleSize => TagSort::Name,
        };
      }
      KeyCode::Down | KeyCode::Char('j') => {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
      }
      KeyCode::Char('c') => {
        if let Some(entity) = self.selected_entity().cloned() {
          self.push_compare(entity);
        }
      }
      _ => {}
    }
  }

  fn handle_compare_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Left | KeyCode::Char('h') => {
        self.compare_cursor = self.compare_cursor.saturating_sub(1);
      }
      KeyCode::Right | KeyCode::Char('l') => {
        let len = self.compare.len();
        if len > 0 {
          self.compare_cursor = (self.compare_cursor + 1).min(len - 1);
        }
      }
      KeyCode::Char('d') => {
        let key_to_remove = self
          .compare
          .entities()
          .get(self.compare_cursor)
          .map(|e| e.key.clone());
        if let Some(k) = key_to_remove {
          self.compare.remove(&k);
          self.compare_cursor = self.compare_cursor.saturating_sub(1);
        }
      }
      KeyCode::Char('C') => {
        self.compare.clear();
        self.compare_cursor = 0;
      }
      _ => {}
    }
  }

  fn handle_patterns_key(&mut self, key: KeyEvent) {
    let len = self.visible_patterns().len();
    match key.code {
      KeyCode::Char('f') => self.cycle_pattern_filter(),
      KeyCode::Char('s') => {
        self.pattern_sort = match self.pattern_sort {
          PatternSort::Strength => PatternSort::Kind,
          PatternSort::Kind => PatternSort::SampleSize,
          PatternSort::SampleSize => PatternSort::Strength,
        };
      }
      KeyCode::Down | KeyCode::Char('j') => {
        if len > 0 {
          self.pattern_cursor = (self.pattern_cursor + 1).min(len - 1);
        }
        self.pattern_expanded = false;
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.pattern_cursor = self.pattern_cursor.saturating_sub(1);
        self.pattern_expanded = false;
      }
      KeyCode::Enter | KeyCode::Char('e') => {
        self.pattern_expanded = !self.pattern_expanded;
      }
      _ => {}
    }
  }

  // ── Filter cycling ────────────────────────────────────────────────────────

  /// Cycle the type filter through the types that actually occur,
  /// returning to "all" after the last one.
  fn cycle_type_filter(&mut self) {
    let present: Vec<EntityType> = self.type_stats.keys().copied().collect();
    self.type_filter = match self.type_filter {
      None => present.first().copied(),
      Some(current) => {
        let idx = present.iter().position(|t| *t == current);
        idx.and_then(|i| present.get(i + 1).copied())
      }
    };
    self.list_cursor = 0;
  }

  /// Cycle the detail facet through the entity's prefixes, largest group
  /// first, returning to "all" after the last one.
  fn cycle_prefix_filter(&mut self) {
    let prefixes: Vec<String> = match self.selected_entity() {
      Some(entity) => {
        let groups = opentag_core::group::PrefixGroups::build(&entity.tags);
        groups.by_size().iter().map(|(p, _)| (*p).to_owned()).collect()
      }
      None => return,
    };
    self.prefix_filter = match &self.prefix_filter {
      None => prefixes.first().cloned(),
      Some(current) => {
        let idx = prefixes.iter().position(|p| p == current);
        idx.and_then(|i| prefixes.get(i + 1).cloned())
      }
    };
    self.detail_scroll = 0;
  }

  /// Cycle the pattern kind filter through the kinds that occur, most
  /// frequent first, returning to "all" after the last one.
  fn cycle_pattern_filter(&mut self) {
    let kinds: Vec<PatternKind> = pattern::kind_counts(&self.patterns)
      .into_iter()
      .map(|(k, _)| k)
      .collect();
    self.pattern_filter = match &self.pattern_filter {
      None => kinds.first().cloned(),
      Some(current) => {
        let idx = kinds.iter().position(|k| k == current);
        idx.and_then(|i| kinds.get(i + 1).cloned())
      }
    };
    self.pattern_cursor = 0;
    self.pattern_expanded = false;
  }

  // ── Comparison ────────────────────────────────────────────────────────────

  fn add_cursor_to_compare(&mut self) {
    if let Some(entity) = self.cursor_entity().cloned() {
      self.push_compare(entity);
    }
  }

  fn push_compare(&mut self, entity: EntitySummary) {
    let name = entity.name.clone();
    let before = self.compare.len();
    self.compare.add(entity);
    self.status_msg = if self.compare.len() > before {
      format!("{name} added to compare ({})", self.compare.len())
    } else {
      format!("{name} is already selected")
    };
  }
}
