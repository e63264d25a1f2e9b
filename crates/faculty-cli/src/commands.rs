//! One-shot subcommands. Each prints to stdout and returns.

use anyhow::{Context as _, bail};
use clap::Args;
use faculty_client::{ApiClient, auth::parse_callback};
use faculty_core::{
  filter::SearchFilter,
  profile::ProfileUpdate,
  record::{FacultyId, FacultyRecord, split_delimited},
  router::route,
};
use serde_json::Value;

use crate::{
  detail::{Detail, Enrichment, load_detail},
  session_store::SessionStore,
};

// ─── Arguments ────────────────────────────────────────────────────────────────

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
  #[arg(long)]
  pub name:       Option<String>,
  #[arg(long)]
  pub department: Option<String>,
  /// Research topic or keyword.
  #[arg(long)]
  pub topic:      Option<String>,
  /// Print raw JSON records.
  #[arg(long)]
  pub json:       bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
  pub id:             FacultyId,
  #[arg(long)]
  pub specialization: Option<String>,
  /// Comma or newline separated.
  #[arg(long)]
  pub research_areas: Option<String>,
  #[arg(long)]
  pub phone:          Option<String>,
  #[arg(long)]
  pub office:         Option<String>,
  #[arg(long)]
  pub website:        Option<String>,
  #[arg(long)]
  pub email:          Option<String>,
  #[arg(long)]
  pub profile_url:    Option<String>,
}

impl EditArgs {
  fn to_update(&self) -> ProfileUpdate {
    let text = |v: &Option<String>| {
      v.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
    };
    ProfileUpdate {
      specialization: text(&self.specialization),
      research_areas: self
        .research_areas
        .as_deref()
        .map(split_delimited)
        .filter(|areas| !areas.is_empty()),
      phone:          text(&self.phone),
      office:         text(&self.office),
      website:        text(&self.website),
      email:          text(&self.email),
      profile_url:    text(&self.profile_url),
    }
  }
}

// ─── Commands ─────────────────────────────────────────────────────────────────

pub async fn search(client: &ApiClient, args: SearchArgs) -> anyhow::Result<()> {
  let filter = SearchFilter::new(
    args.name.as_deref().unwrap_or_default(),
    args.department.as_deref().unwrap_or_default(),
    args.topic.as_deref().unwrap_or_default(),
  );
  let records = route(client, &filter).await.context("search failed")?;

  if args.json {
    println!("{}", serde_json::to_string_pretty(&records)?);
    return Ok(());
  }
  if records.is_empty() {
    println!("No faculty found.");
  }
  for record in &records {
    println!("{}", summary_line(record));
  }
  Ok(())
}

pub async fn show(client: &ApiClient, id: FacultyId, json: bool) -> anyhow::Result<()> {
  let detail = load_detail(client, id)
    .await
    .with_context(|| format!("loading faculty {id}"))?;

  if json {
    println!("{}", serde_json::to_string_pretty(&detail.record)?);
  } else {
    print!("{}", render_detail(&detail));
  }
  Ok(())
}

pub async fn departments(client: &ApiClient, broad_keywords: Option<&str>) -> anyhow::Result<()> {
  if let Some(department) = broad_keywords {
    let keywords = client
      .department_broad_keywords(department)
      .await
      .with_context(|| format!("loading broad keywords for {department}"))?;
    println!("{}", serde_json::to_string_pretty(&keywords)?);
    return Ok(());
  }
  for department in client.departments().await.context("listing departments")? {
    println!("{department}");
  }
  Ok(())
}

pub async fn login(client: &ApiClient, store: &SessionStore, redirect: &str) -> anyhow::Result<()> {
  let callback = parse_callback(redirect)?;
  let info = client
    .user_info(&callback.access_token)
    .await
    .context("resolving signed-in user")?;
  let session = info.into_session(callback.access_token.clone());
  store.save(&session)?;

  println!("Signed in as {}", session.email);
  if let Some(id) = callback.edit_target() {
    println!("Continue with: faculty edit {id}");
  }
  Ok(())
}

pub fn logout(store: &SessionStore) -> anyhow::Result<()> {
  if store.clear()? {
    println!("Signed out.");
  } else {
    println!("Not signed in.");
  }
  Ok(())
}

pub fn whoami(store: &SessionStore) -> anyhow::Result<()> {
  match store.load()? {
    Some(session) => match &session.name {
      Some(name) => println!("{name} <{}>", session.email),
      None => println!("{}", session.email),
    },
    None => println!("Not signed in."),
  }
  Ok(())
}

pub async fn edit(client: &ApiClient, store: &SessionStore, args: EditArgs) -> anyhow::Result<()> {
  let Some(session) = store.load()? else {
    bail!("not signed in; run `faculty login <redirect-url>` first");
  };

  let update = args.to_update();
  if update.is_empty() {
    bail!("nothing to update");
  }

  let record = client
    .faculty(args.id)
    .await
    .with_context(|| format!("loading faculty {}", args.id))?;
  session.authorize(&record)?;

  let updated = client.update_faculty(args.id, &update, &session).await?;
  println!("Updated {}.", updated.name);
  Ok(())
}

// ─── Formatting ───────────────────────────────────────────────────────────────

fn summary_line(record: &FacultyRecord) -> String {
  let mut line = format!("{:>5}  {}", record.id, record.name);
  let departments = record.department_line();
  if !departments.is_empty() {
    line.push_str(&format!("  ({departments})"));
  }
  line
}

fn render_detail(detail: &Detail) -> String {
  let r = &detail.record;
  let mut out = format!("{} [{}]\n", r.name, r.id);

  let fields = [
    ("Title", r.title.clone()),
    ("Department", Some(r.department_line()).filter(|d| !d.is_empty())),
    ("Specialization", r.specialization.clone()),
    ("Email", r.email.clone()),
    ("Phone", r.phone.clone()),
    ("Office", r.office.clone()),
    ("Website", r.website.clone()),
    ("Profile", r.profile_url.clone()),
  ];
  for (label, value) in fields {
    if let Some(value) = value {
      out.push_str(&format!("  {label:<15} {value}\n"));
    }
  }
  if !r.research_areas.is_empty() {
    out.push_str(&format!("  {:<15} {}\n", "Research areas", r.research_areas.join("; ")));
  }

  let summary = match &detail.summary {
    Enrichment::Loaded(Some(text)) => text.clone(),
    Enrichment::Loaded(None) => "(none)".into(),
    Enrichment::Unavailable => "(unavailable)".into(),
  };
  out.push_str(&format!("\nSummary\n  {summary}\n"));
  out.push_str(&format!("Keywords\n  {}\n", list_or_placeholder(&detail.keywords)));
  out.push_str(&format!(
    "Broad keywords\n  {}\n",
    list_or_placeholder(&detail.broad_keywords)
  ));
  if let Enrichment::Loaded(links) = &detail.links
    && !links.is_empty()
  {
    out.push_str("Links\n");
    for (kind, target) in links {
      out.push_str(&format!("  {kind:<15} {}\n", link_text(target)));
    }
  }
  out
}

/// Links are usually plain URLs; anything else is shown as JSON.
pub fn link_text(target: &Value) -> String {
  match target {
    Value::String(url) => url.clone(),
    other => other.to_string(),
  }
}

fn list_or_placeholder(list: &Enrichment<Vec<String>>) -> String {
  match list {
    Enrichment::Loaded(items) if items.is_empty() => "(none)".into(),
    Enrichment::Loaded(items) => items.join(", "),
    Enrichment::Unavailable => "(unavailable)".into(),
  }
}
