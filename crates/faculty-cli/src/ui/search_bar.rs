//! Search bar across the top of the screen.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, SearchField};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([
      Constraint::Percentage(35),
      Constraint::Percentage(30),
      Constraint::Percentage(35),
    ])
    .split(area);

  let department = if app.live.department().is_empty() {
    "All departments"
  } else {
    app.live.department()
  };

  let fields = [
    (SearchField::Topic, " Research topic ", app.live.topic(), "e.g. marine biology"),
    (SearchField::Name, " Name ", app.live.name(), "last name recommended"),
    (SearchField::Department, " Department ◂▸ ", department, ""),
  ];
  for (col, (field, title, value, placeholder)) in cols.iter().zip(fields) {
    draw_field(f, *col, app, field, title, value, placeholder);
  }
}

fn draw_field(
  f: &mut Frame,
  area: Rect,
  app: &App,
  field: SearchField,
  title: &str,
  value: &str,
  placeholder: &str,
) {
  let focused = app.search_active && app.focus == field;

  let mut title = title.to_owned();
  if field == SearchField::Name && app.live.is_pending() {
    title.push_str("… ");
  }

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(if focused {
      Style::default().fg(Color::Yellow)
    } else {
      Style::default().fg(Color::DarkGray)
    });

  let text = if value.is_empty() && !focused {
    Line::from(Span::styled(
      placeholder.to_owned(),
      Style::default().fg(Color::DarkGray),
    ))
  } else {
    let mut spans = vec![Span::raw(value.to_owned())];
    if focused && field != SearchField::Department {
      spans.push(Span::styled(
        "_",
        Style::default().add_modifier(Modifier::SLOW_BLINK),
      ));
    }
    Line::from(spans)
  };

  f.render_widget(Paragraph::new(text).block(block), area);
}
