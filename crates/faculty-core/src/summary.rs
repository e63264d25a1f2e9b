//! Auxiliary per-faculty data from the summary service.
//!
//! Every endpoint here is optional: a missing entry is "no data", not an
//! error, so all shapes default to empty.

use serde::{Deserialize, Serialize};

use crate::record::{FacultyId, deserialize_string_list};

/// `GET /faculty-summary/id/{id}/summary`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryText {
  #[serde(default)]
  pub summary: Option<String>,
}

/// `GET /faculty-summary/id/{id}/keywords`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keywords {
  #[serde(default, deserialize_with = "deserialize_string_list")]
  pub keywords: Vec<String>,
}

/// `GET /faculty-summary/id/{id}/broad_keywords`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadKeywords {
  #[serde(default, deserialize_with = "deserialize_string_list")]
  pub broad_keywords: Vec<String>,
}

/// `GET /faculty-summary/id/{id}`: the three pieces above in one object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultySummary {
  #[serde(default)]
  pub id:             Option<FacultyId>,
  #[serde(default)]
  pub summary:        Option<String>,
  #[serde(default, deserialize_with = "deserialize_string_list")]
  pub keywords:       Vec<String>,
  #[serde(default, deserialize_with = "deserialize_string_list")]
  pub broad_keywords: Vec<String>,
}
