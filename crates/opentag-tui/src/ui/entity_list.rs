//! Entity list pane — left panel of the entities tab.

use opentag_core::query::EntitySort;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{
  app::{App, Focus},
  ui::{confidence_color, type_color, type_icon},
};

/// Render the entity list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let filtered = app.visible_entities();
  let total = app.entities.len();

  let mut title = if app.search_active || !app.search.is_empty() {
    format!(" Entities ({}/{}) ", filtered.len(), total)
  } else {
    format!(" Entities ({total}) ")
  };
  if let Some(kind) = app.type_filter {
    title.push_str(&format!("· {kind} "));
  }
  let sort_label = match app.entity_sort {
    EntitySort::TagCount => "tags",
    EntitySort::Name => "name",
    EntitySort::AvgConfidence => "conf",
  };
  title.push_str(&format!("· by {sort_label} "));

  let border_color = if app.focus == Focus::List {
    Color::White
  } else {
    Color::DarkGray
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border_color));

  let items: Vec<ListItem> = filtered
    .iter()
    .map(|entity| {
      let in_compare = app.compare.contains(&entity.key);
      let marker = if in_compare { "⚖ " } else { "" };
      ListItem::new(Line::from(vec![
        Span::raw(format!("{} ", type_icon(entity.kind))),
        Span::styled(
          entity.name.clone(),
          Style::default().fg(type_color(entity.kind)),
        ),
        Span::styled(
          format!("  {marker}{} tags ", entity.tag_count),
          Style::default().fg(Color::Gray),
        ),
        Span::styled(
          format!("{:.0}%", entity.avg_confidence * 100.0),
          Style::default().fg(confidence_color(entity.avg_confidence)),
        ),
      ]))
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Search bar at the bottom of the pane while active or set.
  if (app.search_active || !app.search.is_empty()) && inner_area.height > 2 {
    let search_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let search_text = if app.search_active {
      format!("/{}_", app.search)
    } else {
      format!("/{}", app.search)
    };
    f.render_widget(
      Paragraph::new(search_text).style(Style::default().fg(Color::Yellow)),
      search_area,
    );
  }

  let mut state = ListState::default();
  state.select(if filtered.is_empty() {
    None
  } else {
    Some(app.list_cursor.min(filtered.len() - 1))
  });

  f.render_stateful_widget(
    List::new(items)
      .highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol(""),
    inner_area,
    &mut state,
  );
}
