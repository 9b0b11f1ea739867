//! Comparison pane — side-by-side numeric tags for the selected entities.

use opentag_core::compare::{CellFlag, common_prefixes, comparison_rows};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

const LABEL_WIDTH: usize = 24;
const CELL_WIDTH: usize = 14;

/// Render the comparison pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(format!(" ⚖ Compare ({}) ", app.compare.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  if app.compare.is_empty() {
    f.render_widget(
      Paragraph::new(vec![
        Line::from(""),
        Line::from("  Nothing selected."),
        Line::from("  Press [c] on an entity to add it here."),
      ])
      .style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let entities = app.compare.entities();
  let mut lines: Vec<Line> = Vec::new();

  // Column headers, the cursor column highlighted.
  let mut header = vec![Span::styled(
    format!("{:<LABEL_WIDTH$}", "metric"),
    Style::default().fg(Color::Gray),
  )];
  for (i, entity) in entities.iter().enumerate() {
    let style = if i == app.compare_cursor {
      Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };
    header.push(Span::styled(
      format!("{:<CELL_WIDTH$}", entity.name),
      style,
    ));
  }
  lines.push(Line::from(header));

  let mut sub = vec![Span::raw(" ".repeat(LABEL_WIDTH))];
  for entity in entities {
    sub.push(Span::styled(
      format!("{:<CELL_WIDTH$}", format!("{} · {}t", entity.kind, entity.tag_count)),
      Style::default().fg(Color::DarkGray),
    ));
  }
  lines.push(Line::from(sub));
  lines.push(Line::from(""));

  // Shared dimensions hint.
  let common = common_prefixes(entities);
  if !common.is_empty() {
    lines.push(Line::from(Span::styled(
      format!("common prefixes: {}", common.join(", ")),
      Style::default().fg(Color::Cyan),
    )));
    lines.push(Line::from(""));
  }

  // One line per comparable row; best green, worst red.
  let rows = comparison_rows(entities);
  if rows.is_empty() {
    lines.push(Line::from(Span::styled(
      "No metric is numeric in two or more selected entities.",
      Style::default().fg(Color::DarkGray),
    )));
  }
  for row in &rows {
    let mut spans = vec![Span::styled(
      format!("{:<LABEL_WIDTH$}", row.tag),
      Style::default().fg(Color::Gray),
    )];
    for (i, value) in row.values.iter().enumerate() {
      let (text, style) = match value {
        Some(v) => {
          let color = match row.flag(i) {
            CellFlag::Best => Color::Green,
            CellFlag::Worst => Color::Red,
            CellFlag::Plain => Color::White,
          };
          let text = if v.fract() == 0.0 {
            format!("{v}")
          } else {
            format!("{v:.2}")
          };
          (text, Style::default().fg(color))
        }
        None => ("—".to_owned(), Style::default().fg(Color::DarkGray)),
      };
      spans.push(Span::styled(format!("{text:<CELL_WIDTH$}"), style));
    }
    lines.push(Line::from(spans));
  }

  f.render_widget(Paragraph::new(lines), inner);
}
