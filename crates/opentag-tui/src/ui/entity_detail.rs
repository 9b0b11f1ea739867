//! Entity detail pane — right panel of the entities tab.
//!
//! Shows headline stats pulled from well-known tags, the prefix facet bar,
//! and the tag list under the current facet and sort.

use opentag_core::{group::PrefixGroups, query::TagSort};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::{
  app::{App, Focus},
  ui::{confidence_color, prefix_color, type_icon},
};

/// Render the detail pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let border_color = if app.focus == Focus::Detail {
    Color::White
  } else {
    Color::DarkGray
  };

  let entity = match app.selected_entity() {
    Some(e) => e,
    None => {
      let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
      let inner = block.inner(area);
      f.render_widget(block, area);
      f.render_widget(
        Paragraph::new("Press Enter to open an entity.")
          .style(Style::default().fg(Color::DarkGray)),
        inner,
      );
      return;
    }
  };

  let block = Block::default()
    .title(format!(
      " {} {} · {} ",
      type_icon(entity.kind),
      entity.name,
      entity.kind
    ))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border_color));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines: Vec<Line> = Vec::new();

  // Headline stats from well-known tags, when present.
  let mut headline: Vec<Span> = Vec::new();
  if let Some(team) = entity.text_tag("info:team") {
    headline.push(Span::raw(format!("🏢 {team}   ")));
  }
  if let Some(role) = entity.text_tag("info:role") {
    headline.push(Span::raw(format!("🎮 {role}   ")));
  }
  if let Some(games) = entity.numeric_tag("info:games") {
    headline.push(Span::raw(format!("📊 {games:.0}G   ")));
  }
  if let Some(winrate) = entity.numeric_tag("record:winrate") {
    headline.push(Span::raw(format!("🏆 {:.1}%", winrate * 100.0)));
  }
  if !headline.is_empty() {
    lines.push(Line::from(headline));
  }

  // Average confidence as a bar.
  let bar_width = 24usize;
  let filled = ((entity.avg_confidence * bar_width as f64).round() as usize).min(bar_width);
  lines.push(Line::from(vec![
    Span::styled("avg confidence ", Style::default().fg(Color::Gray)),
    Span::styled(
      "█".repeat(filled),
      Style::default().fg(confidence_color(entity.avg_confidence)),
    ),
    Span::styled("░".repeat(bar_width - filled), Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {:.0}%", entity.avg_confidence * 100.0),
      Style::default().fg(confidence_color(entity.avg_confidence)),
    ),
  ]));

  // Facet bar: prefixes by group size, the active one highlighted.
  let groups = PrefixGroups::build(&entity.tags);
  let mut facet_spans: Vec<Span> = Vec::new();
  let all_style = if app.prefix_filter.is_none() {
    Style::default().fg(Color::Black).bg(Color::White)
  } else {
    Style::default().fg(Color::Gray)
  };
  facet_spans.push(Span::styled(format!(" all ({}) ", groups.total()), all_style));
  for (prefix, count) in groups.by_size() {
    let active = app.prefix_filter.as_deref() == Some(prefix);
    let style = if active {
      Style::default().fg(Color::Black).bg(prefix_color(prefix))
    } else {
      Style::default().fg(prefix_color(prefix))
    };
    facet_spans.push(Span::styled(format!(" {prefix} ({count}) "), style));
  }
  lines.push(Line::from(facet_spans));

  let sort_label = match app.tag_sort {
    TagSort::Name => "category",
    TagSort::Confidence => "confidence",
    TagSort::SampleSize => "sample size",
  };
  lines.push(Line::from(Span::styled(
    format!("sort: {sort_label}  [p] facet  [o] sort  [c] compare  [esc] back"),
    Style::default().fg(Color::DarkGray),
  )));
  lines.push(Line::from(""));

  // Tag rows.
  for tag in app.detail_tags() {
    let mut spans = vec![
      Span::styled(
        format!("{:<24}", tag.tag),
        Style::default()
          .fg(prefix_color(tag.prefix()))
          .add_modifier(Modifier::BOLD),
      ),
      Span::raw(format!("{:<12}", tag.value.to_string())),
      Span::styled(
        format!("N={:<6}", tag.sample_size),
        Style::default().fg(Color::Gray),
      ),
      Span::styled(
        format!("{:.0}%", tag.confidence * 100.0),
        Style::default().fg(confidence_color(tag.confidence)),
      ),
    ];
    if !tag.evidence.is_empty() {
      // Char-boundary-safe truncation.
      let mut evidence: String = tag.evidence.chars().take(48).collect();
      if tag.evidence.chars().nth(48).is_some() {
        evidence.push('…');
      }
      spans.push(Span::styled(
        format!("  {evidence}"),
        Style::default().fg(Color::DarkGray),
      ));
    }
    lines.push(Line::from(spans));
  }

  let para = Paragraph::new(lines).scroll((app.detail_scroll as u16, 0));
  f.render_widget(para, inner);
}
