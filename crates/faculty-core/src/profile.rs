//! Profile edits: the partial record sent on update, and the form it is
//! built from.

use serde::{Deserialize, Serialize};

use crate::record::{FacultyRecord, split_delimited};

// ─── Update body ──────────────────────────────────────────────────────────────

/// Partial record accepted by the update endpoint. Absent fields are left
/// unchanged server-side and are omitted from the JSON body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub specialization: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub research_areas: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub phone:          Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub office:         Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub website:        Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email:          Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub profile_url:    Option<String>,
}

impl ProfileUpdate {
  pub fn is_empty(&self) -> bool { *self == Self::default() }
}

// ─── Form ─────────────────────────────────────────────────────────────────────

/// Editable fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
  Specialization,
  ResearchAreas,
  Email,
  Phone,
  Office,
  Website,
  ProfileUrl,
}

impl EditField {
  pub const ALL: [EditField; 7] = [
    EditField::Specialization,
    EditField::ResearchAreas,
    EditField::Email,
    EditField::Phone,
    EditField::Office,
    EditField::Website,
    EditField::ProfileUrl,
  ];

  pub fn label(self) -> &'static str {
    match self {
      EditField::Specialization => "Specialization",
      EditField::ResearchAreas => "Research areas",
      EditField::Email => "Email",
      EditField::Phone => "Phone",
      EditField::Office => "Office",
      EditField::Website => "Website",
      EditField::ProfileUrl => "Profile URL",
    }
  }

  pub fn next(self) -> Self {
    let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
    Self::ALL[(i + 1) % Self::ALL.len()]
  }

  pub fn prev(self) -> Self {
    let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
    Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
  }
}

/// Raw text of the edit form. Research areas are entered as one string,
/// separated by commas or newlines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
  pub specialization: String,
  pub research_areas: String,
  pub email:          String,
  pub phone:          String,
  pub office:         String,
  pub website:        String,
  pub profile_url:    String,
}

impl ProfileForm {
  /// Prefill the form from the current record.
  pub fn from_record(record: &FacultyRecord) -> Self {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    Self {
      specialization: text(&record.specialization),
      research_areas: record.research_areas.join("\n"),
      email:          text(&record.email),
      phone:          text(&record.phone),
      office:         text(&record.office),
      website:        text(&record.website),
      profile_url:    text(&record.profile_url),
    }
  }

  pub fn field(&self, field: EditField) -> &str {
    match field {
      EditField::Specialization => &self.specialization,
      EditField::ResearchAreas => &self.research_areas,
      EditField::Email => &self.email,
      EditField::Phone => &self.phone,
      EditField::Office => &self.office,
      EditField::Website => &self.website,
      EditField::ProfileUrl => &self.profile_url,
    }
  }

  pub fn field_mut(&mut self, field: EditField) -> &mut String {
    match field {
      EditField::Specialization => &mut self.specialization,
      EditField::ResearchAreas => &mut self.research_areas,
      EditField::Email => &mut self.email,
      EditField::Phone => &mut self.phone,
      EditField::Office => &mut self.office,
      EditField::Website => &mut self.website,
      EditField::ProfileUrl => &mut self.profile_url,
    }
  }

  /// Convert to an update body: every field trimmed, blank fields omitted.
  pub fn to_update(&self) -> ProfileUpdate {
    let areas = split_delimited(&self.research_areas);
    ProfileUpdate {
      specialization: present(&self.specialization),
      research_areas: (!areas.is_empty()).then_some(areas),
      phone:          present(&self.phone),
      office:         present(&self.office),
      website:        present(&self.website),
      email:          present(&self.email),
      profile_url:    present(&self.profile_url),
    }
  }
}

fn present(raw: &str) -> Option<String> {
  let trimmed = raw.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
