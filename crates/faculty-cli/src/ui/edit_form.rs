//! Profile edit form. Replaces the detail pane while editing.

use faculty_core::profile::EditField;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(edit) = &app.edit else {
    return;
  };

  let block = Block::default()
    .title(format!(" Editing {} ", edit.name))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines = Vec::new();
  for field in EditField::ALL {
    let focused = field == edit.field;
    let label_style = if focused {
      Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Cyan)
    };

    lines.push(Line::from(Span::styled(field.label(), label_style)));

    let value = edit.form.field(field);
    let mut rows: Vec<&str> = value.split('\n').collect();
    let last = rows.pop().unwrap_or_default();
    for row in rows {
      lines.push(Line::from(format!("  {row}")));
    }
    let mut tail = vec![Span::raw(format!("  {last}"))];
    if focused {
      tail.push(Span::styled(
        "_",
        Style::default().add_modifier(Modifier::SLOW_BLINK),
      ));
    }
    lines.push(Line::from(tail));
  }

  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    "Research areas: one per line (Enter adds a line). Blank fields are left unchanged.",
    Style::default().fg(Color::DarkGray),
  )));

  f.render_widget(Paragraph::new(lines), inner);
}
