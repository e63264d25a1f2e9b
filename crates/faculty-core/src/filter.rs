//! Sparse search filters.

use serde::{Deserialize, Serialize};

/// An optional (name, department, topic) triple.
///
/// Fields are trimmed on the way in and blank input is stored as `None`, so
/// an absent field can never leak into a request as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  name:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  department: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  topic:      Option<String>,
}

impl SearchFilter {
  /// Build a filter from raw field text.
  pub fn new(name: &str, department: &str, topic: &str) -> Self {
    Self {
      name:       present(name),
      department: present(department),
      topic:      present(topic),
    }
  }

  pub fn with_name(mut self, name: &str) -> Self {
    self.name = present(name);
    self
  }

  pub fn with_department(mut self, department: &str) -> Self {
    self.department = present(department);
    self
  }

  pub fn with_topic(mut self, topic: &str) -> Self {
    self.topic = present(topic);
    self
  }

  /// Name substring, if set.
  pub fn name(&self) -> Option<&str> { self.name.as_deref() }

  /// Exact department, if set.
  pub fn department(&self) -> Option<&str> { self.department.as_deref() }

  /// Topic substring, if set.
  pub fn topic(&self) -> Option<&str> { self.topic.as_deref() }

  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.department.is_none() && self.topic.is_none()
  }
}

fn present(raw: &str) -> Option<String> {
  let trimmed = raw.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
