//! Result list pane, left panel.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::App;

/// Render the result list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let title = if app.searching {
    format!(" Faculty ({}) searching… ", app.results.len())
  } else {
    format!(" Faculty ({}) ", app.results.len())
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  if let Some(error) = &app.search_error {
    f.render_widget(
      Paragraph::new(error.as_str())
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(block),
      area,
    );
    return;
  }

  if app.results.is_empty() && !app.searching {
    f.render_widget(
      Paragraph::new("No faculty found.")
        .style(Style::default().fg(Color::DarkGray))
        .block(block),
      area,
    );
    return;
  }

  let items: Vec<ListItem> = app
    .results
    .iter()
    .map(|record| {
      let mut spans = vec![
        Span::styled(
          format!("{:<3} ", record.initials()),
          Style::default().fg(Color::Cyan),
        ),
        Span::raw(record.name.clone()),
      ];
      let departments = record.department_line();
      if !departments.is_empty() {
        spans.push(Span::styled(
          format!("  {departments}"),
          Style::default().fg(Color::DarkGray),
        ));
      }
      ListItem::new(Line::from(spans))
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.list_cursor));

  f.render_stateful_widget(
    List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol(""),
    area,
    &mut state,
  );
}
