//! Faculty records as served by the directory API.
//!
//! The API is loose about shapes. `department` arrives as a single string or
//! a list, and `research_areas` may be a native list, a brace-delimited
//! string (`{a,b}`), a JSON-encoded string, or a plain comma/newline separated
//! string. Everything is normalised at deserialisation time so the rest of
//! the workspace only ever sees `Vec<String>` with no blank entries.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Stable integer identifier assigned by the directory.
pub type FacultyId = u32;

// ─── Record ───────────────────────────────────────────────────────────────────

/// One faculty member's directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyRecord {
  pub id:             FacultyId,
  pub name:           String,
  #[serde(default)]
  pub title:          Option<String>,
  /// Department affiliations; never empty for well-formed records.
  #[serde(rename = "department", default, deserialize_with = "string_or_list")]
  pub departments:    Vec<String>,
  #[serde(default)]
  pub specialization: Option<String>,
  #[serde(default, deserialize_with = "deserialize_string_list")]
  pub research_areas: Vec<String>,
  #[serde(default)]
  pub email:          Option<String>,
  #[serde(default)]
  pub phone:          Option<String>,
  #[serde(default)]
  pub office:         Option<String>,
  /// Personal website.
  #[serde(default)]
  pub website:        Option<String>,
  /// Publications / institutional profile page.
  #[serde(default)]
  pub profile_url:    Option<String>,
  #[serde(default)]
  pub photo_url:      Option<String>,
}

impl FacultyRecord {
  /// Case-insensitive substring match against the display name.
  pub fn matches_name(&self, query: &str) -> bool {
    self.name.to_lowercase().contains(&query.to_lowercase())
  }

  /// Case-insensitive substring match against specialization, any research
  /// area, or title.
  pub fn matches_topic(&self, query: &str) -> bool {
    let needle = query.to_lowercase();
    let hit = |text: &str| text.to_lowercase().contains(&needle);

    self.specialization.as_deref().is_some_and(hit)
      || self.research_areas.iter().any(|area| hit(area))
      || self.title.as_deref().is_some_and(hit)
  }

  /// Departments joined for single-line display.
  pub fn department_line(&self) -> String { self.departments.join(", ") }

  /// Upper-cased initials of the display name, used in place of a photo.
  pub fn initials(&self) -> String {
    self
      .name
      .split_whitespace()
      .filter_map(|part| part.chars().next())
      .flat_map(char::to_uppercase)
      .collect()
  }
}

// ─── Normalisation ────────────────────────────────────────────────────────────

/// Normalise a research-area field of any JSON shape into a clean list.
///
/// Strings are parsed by [`parse_research_areas`]; lists keep their string
/// elements; every other shape yields an empty list.
pub fn normalize_research_areas(value: &Value) -> Vec<String> {
  match value {
    Value::String(raw) => parse_research_areas(raw),
    Value::Array(items) => clean(items.iter().filter_map(Value::as_str)),
    _ => Vec::new(),
  }
}

/// Parse a research-area string.
///
/// - `{a,"b",'c'}` is treated as a brace-delimited list: split on commas,
///   entries trimmed and unquoted.
/// - `["a","b"]` is decoded as a JSON list; non-string items are dropped.
/// - Anything else is split on commas and newlines.
pub fn parse_research_areas(raw: &str) -> Vec<String> {
  let raw = raw.trim();

  if let Some(inner) = raw.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
    return clean(inner.split(',').map(unquote));
  }

  if raw.starts_with('[')
    && let Ok(list) = serde_json::from_str::<Vec<Value>>(raw)
  {
    return clean(list.iter().filter_map(Value::as_str));
  }

  split_delimited(raw)
}

/// Split on commas and newlines, trimming and dropping blank entries.
pub fn split_delimited(raw: &str) -> Vec<String> { clean(raw.split([',', '\n'])) }

fn unquote(entry: &str) -> &str {
  let entry = entry.trim();
  let entry = entry.strip_prefix(['"', '\'']).unwrap_or(entry);
  entry.strip_suffix(['"', '\'']).unwrap_or(entry)
}

fn clean<'a>(entries: impl Iterator<Item = &'a str>) -> Vec<String> {
  entries
    .map(str::trim)
    .filter(|e| !e.is_empty())
    .map(str::to_owned)
    .collect()
}

// ─── Serde helpers ────────────────────────────────────────────────────────────

/// Deserialise any string-list-ish JSON value via [`normalize_research_areas`].
pub(crate) fn deserialize_string_list<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Value::deserialize(de)?;
  Ok(normalize_research_areas(&value))
}

/// `"Physics"` and `["Physics", "Astronomy"]` both become a list. Unlike
/// research areas a department string is never split: names such as
/// "Ecology, Evolution, and Marine Biology" contain commas.
fn string_or_list<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Value::deserialize(de)?;
  Ok(match &value {
    Value::String(s) => clean(std::iter::once(s.as_str())),
    Value::Array(items) => clean(items.iter().filter_map(Value::as_str)),
    _ => Vec::new(),
  })
}
