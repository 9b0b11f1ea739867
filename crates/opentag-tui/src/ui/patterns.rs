//! Patterns pane — auto-discovered statistical relationships as cards.

use opentag_core::{
  pattern::{StrengthTier, kind_counts},
  query::PatternSort,
};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

fn tier_color(tier: StrengthTier) -> Color {
  match tier {
    StrengthTier::Strong => Color::Green,
    StrengthTier::Moderate => Color::Yellow,
    StrengthTier::Weak => Color::Red,
  }
}

/// Render the patterns pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let visible = app.visible_patterns();

  let sort_label = match app.pattern_sort {
    PatternSort::Strength => "strength",
    PatternSort::Kind => "kind",
    PatternSort::SampleSize => "sample",
  };
  let block = Block::default()
    .title(format!(
      " 📐 Patterns ({}/{}) · by {sort_label} ",
      visible.len(),
      app.patterns.len()
    ))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines: Vec<Line> = Vec::new();

  // Kind filter bar, most frequent first.
  let mut filter_spans: Vec<Span> = Vec::new();
  let all_style = if app.pattern_filter.is_none() {
    Style::default().fg(Color::Black).bg(Color::White)
  } else {
    Style::default().fg(Color::Gray)
  };
  filter_spans.push(Span::styled(" all ", all_style));
  for (kind, count) in kind_counts(&app.patterns) {
    let active = app.pattern_filter.as_ref() == Some(&kind);
    let style = if active {
      Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
      Style::default().fg(Color::Cyan)
    };
    filter_spans.push(Span::styled(format!(" {kind} ({count}) "), style));
  }
  lines.push(Line::from(filter_spans));
  lines.push(Line::from(""));

  // Cards: a badge line and the interpretation, expanded details on demand.
  for (i, pattern) in visible.iter().enumerate() {
    let at_cursor = i == app.pattern_cursor;
    let marker = if at_cursor { "▶ " } else { "  " };

    let mut badge = vec![
      Span::raw(marker),
      Span::styled(
        format!("[{}]", pattern.kind),
        Style::default().fg(Color::Cyan),
      ),
    ];
    match pattern.metric {
      Some(metric) => match metric.classify() {
        Some(class) => badge.push(Span::styled(
          format!("  {}", class.label),
          Style::default()
            .fg(tier_color(class.tier))
            .add_modifier(Modifier::BOLD),
        )),
        // No buckets defined for this metric: show the raw value only.
        None => badge.push(Span::styled(
          format!("  {}={:.2}", metric.field(), metric.value()),
          Style::default().fg(Color::White),
        )),
      },
      None => {}
    }
    match pattern.sample_size {
      Some(n) => badge.push(Span::styled(
        format!("  N={n}"),
        Style::default().fg(Color::Gray),
      )),
      None => badge.push(Span::styled("  N=?", Style::default().fg(Color::DarkGray))),
    }
    lines.push(Line::from(badge));

    let interp_style = if at_cursor {
      Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::White)
    };
    lines.push(Line::from(Span::styled(
      format!("    {}", pattern.interpretation),
      interp_style,
    )));

    if at_cursor && app.pattern_expanded {
      if let Some(metric) = pattern.metric {
        lines.push(Line::from(Span::styled(
          format!("      {} = {}", metric.field(), metric.value()),
          Style::default().fg(Color::DarkGray),
        )));
      }
      for (key, value) in &pattern.details {
        lines.push(Line::from(Span::styled(
          format!("      {key} = {value}"),
          Style::default().fg(Color::DarkGray),
        )));
      }
    }
    lines.push(Line::from(""));
  }

  // Keep the cursor's card in view: scroll past earlier cards when needed.
  let card_height = 3;
  let visible_cards = (inner.height as usize / card_height).max(1);
  let scroll = app
    .pattern_cursor
    .saturating_sub(visible_cards.saturating_sub(1))
    * card_height;
  // The two filter-bar lines stay pinned by scrolling content only.
  let para = Paragraph::new(lines).scroll((scroll as u16, 0));
  f.render_widget(para, inner);
}
