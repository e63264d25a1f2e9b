//! Faculty detail pane, right panel.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
  app::App,
  commands::link_text,
  detail::{Detail, Enrichment},
};

// ─── Public entry ─────────────────────────────────────────────────────────────

/// Render the detail pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let title = app
    .detail
    .as_ref()
    .map_or_else(|| " Detail ".to_owned(), |d| format!(" {} ", d.record.name));

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let inner = block.inner(area);
  f.render_widget(block, area);

  if let Some(error) = &app.detail_error {
    let para = Paragraph::new(error.as_str())
      .style(Style::default().fg(Color::Red))
      .wrap(Wrap { trim: true });
    f.render_widget(para, inner);
    return;
  }

  let Some(detail) = &app.detail else {
    let hint = Paragraph::new("Loading…").style(Style::default().fg(Color::DarkGray));
    f.render_widget(hint, inner);
    return;
  };

  let editable = app
    .session
    .as_ref()
    .is_some_and(|s| s.can_edit(&detail.record));

  let mut lines = record_lines(detail);
  lines.push(Line::from(""));
  lines.extend(enrichment_lines(detail));

  if editable {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
      "[e] edit this profile",
      Style::default().fg(Color::Yellow),
    )));
  }

  let para = Paragraph::new(lines)
    .wrap(Wrap { trim: false })
    .scroll((app.detail_scroll, 0));
  f.render_widget(para, inner);
}

// ─── Sections ─────────────────────────────────────────────────────────────────

fn record_lines(detail: &Detail) -> Vec<Line<'static>> {
  let r = &detail.record;
  let fields = [
    ("title", r.title.clone()),
    ("department", Some(r.department_line()).filter(|d| !d.is_empty())),
    ("focus", r.specialization.clone()),
    ("email", r.email.clone()),
    ("phone", r.phone.clone()),
    ("office", r.office.clone()),
    ("website", r.website.clone()),
    ("profile", r.profile_url.clone()),
  ];

  let mut lines: Vec<Line> = fields
    .into_iter()
    .filter_map(|(label, value)| value.map(|v| labelled(label, v)))
    .collect();

  if !r.research_areas.is_empty() {
    lines.push(Line::from(""));
    lines.push(heading("Research areas"));
    lines.extend(
      r.research_areas
        .iter()
        .map(|area| Line::from(format!("  • {area}"))),
    );
  }
  lines
}

fn enrichment_lines(detail: &Detail) -> Vec<Line<'static>> {
  let mut lines = vec![heading("Summary")];
  lines.push(match &detail.summary {
    Enrichment::Loaded(Some(text)) => Line::from(text.clone()),
    Enrichment::Loaded(None) => muted("No summary yet."),
    Enrichment::Unavailable => muted("Summary unavailable."),
  });

  for (title, list) in [
    ("Keywords", &detail.keywords),
    ("Broad keywords", &detail.broad_keywords),
  ] {
    lines.push(Line::from(""));
    lines.push(heading(title));
    lines.push(match list {
      Enrichment::Loaded(items) if items.is_empty() => muted("None."),
      Enrichment::Loaded(items) => Line::from(items.join(", ")),
      Enrichment::Unavailable => muted("Unavailable."),
    });
  }

  if let Enrichment::Loaded(links) = &detail.links
    && !links.is_empty()
  {
    lines.push(Line::from(""));
    lines.push(heading("Links"));
    lines.extend(
      links
        .iter()
        .map(|(kind, target)| labelled(kind, link_text(target))),
    );
  }
  lines
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn labelled(label: &str, value: String) -> Line<'static> {
  Line::from(vec![
    Span::styled(
      format!("{label:<12}"),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::raw(value),
  ])
}

fn heading(text: &'static str) -> Line<'static> {
  Line::from(Span::styled(
    text,
    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
  ))
}

fn muted(text: &'static str) -> Line<'static> {
  Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}
