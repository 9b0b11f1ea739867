//! TUI rendering — orchestrates all panes.

pub mod compare;
pub mod entity_detail;
pub mod entity_list;
pub mod patterns;

use chrono::Local;
use opentag_core::entity::EntityType;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Tab};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let tab_span = |label: &str, tab: Tab| {
    if app.tab == tab {
      Span::styled(
        format!(" {label} "),
        Style::default()
          .fg(Color::Black)
          .bg(Color::White)
          .add_modifier(Modifier::BOLD),
      )
    } else {
      Span::styled(format!(" {label} "), Style::default().fg(Color::White))
    }
  };

  let left = vec![
    Span::styled(
      " opentag ",
      Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    tab_span("[1] Entities", Tab::Entities),
    tab_span("[2] Compare", Tab::Compare),
    tab_span("[3] Patterns", Tab::Patterns),
  ];
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let left_width: u16 = left.iter().map(|s| s.content.len() as u16).sum();
  let right_width = right.content.len() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let mut spans = left;
  spans.push(Span::raw(" ".repeat(pad as usize)));
  spans.push(right);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  match app.tab {
    Tab::Entities => {
      // Split into left list pane (35%) and right detail pane (65%).
      let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);
      entity_list::draw(f, cols[0], app);
      entity_detail::draw(f, cols[1], app);
    }
    Tab::Compare => compare::draw(f, area, app),
    Tab::Patterns => patterns::draw(f, area, app),
  }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let total_tags: usize = app.prefix_stats.values().sum();
  let hints = match app.tab {
    Tab::Entities => "[/] search  [t] type  [s] sort  [c] compare  [q] quit",
    Tab::Compare => "[←/→] column  [d] remove  [C] clear  [q] quit",
    Tab::Patterns => "[f] kind  [s] sort  [e] expand  [q] quit",
  };

  let line = if app.status_msg.is_empty() {
    format!(
      " {} entities · {} tags · {} patterns   {hints}",
      app.entities.len(),
      total_tags,
      app.patterns.len(),
    )
  } else {
    format!(" {}", app.status_msg)
  };

  f.render_widget(
    Paragraph::new(line).style(Style::default().fg(Color::Gray).bg(Color::Black)),
    area,
  );
}

// ─── Shared color helpers ─────────────────────────────────────────────────────

/// Confidence → traffic-light color, from green at 0.8 down to red.
pub fn confidence_color(c: f64) -> Color {
  if c >= 0.8 {
    Color::Green
  } else if c >= 0.6 {
    Color::Yellow
  } else if c >= 0.4 {
    Color::LightRed
  } else {
    Color::Red
  }
}

/// Stable accent color per tag namespace; unknown prefixes render gray.
pub fn prefix_color(prefix: &str) -> Color {
  match prefix {
    "combat" => Color::Red,
    "meta" => Color::Magenta,
    "champ" => Color::LightMagenta,
    "vision" => Color::Cyan,
    "laning" => Color::Yellow,
    "build" => Color::LightBlue,
    "rune" => Color::LightCyan,
    "rank" => Color::LightYellow,
    "side" => Color::Blue,
    "objective" => Color::LightGreen,
    "draft" => Color::Green,
    "info" => Color::White,
    "record" => Color::LightBlue,
    _ => Color::Gray,
  }
}

/// Icon shown next to an entity, by type.
pub fn type_icon(kind: EntityType) -> &'static str {
  match kind {
    EntityType::Player => "👤",
    EntityType::Team => "🏢",
    EntityType::Champion => "⚔️",
    EntityType::Duo => "👥",
    EntityType::Matchup => "🆚",
    EntityType::MatchupChamp => "🎯",
    EntityType::Pattern => "📐",
  }
}

/// Accent color per entity type.
pub fn type_color(kind: EntityType) -> Color {
  match kind {
    EntityType::Player => Color::Blue,
    EntityType::Team => Color::Magenta,
    EntityType::Champion => Color::Red,
    EntityType::Duo => Color::Cyan,
    EntityType::Matchup => Color::Yellow,
    EntityType::MatchupChamp => Color::LightMagenta,
    EntityType::Pattern => Color::Green,
  }
}
