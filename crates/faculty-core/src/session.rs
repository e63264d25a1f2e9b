//! Signed-in identity and the profile edit gate.
//!
//! A [`Session`] is an explicit value: the binary loads it from its session
//! file and passes it to whatever needs it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  record::FacultyRecord,
};

/// Identity allowed to edit every profile.
pub const OVERRIDE_EDITOR: &str = "brian_kim@ucsb.edu";

/// Identity captured from the OAuth implicit flow.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub email:        String,
  #[serde(default)]
  pub name:         Option<String>,
  pub access_token: String,
}

impl Session {
  pub fn new(email: impl Into<String>, access_token: impl Into<String>) -> Self {
    Self {
      email:        email.into(),
      name:         None,
      access_token: access_token.into(),
    }
  }

  /// Whether this session is the override identity.
  pub fn is_override(&self) -> bool { same_email(&self.email, OVERRIDE_EDITOR) }

  /// A session may edit a record whose stored email matches its own
  /// (case-insensitively), or any record if it is the override identity.
  pub fn can_edit(&self, record: &FacultyRecord) -> bool {
    self.is_override()
      || record
        .email
        .as_deref()
        .is_some_and(|email| same_email(email, &self.email))
  }

  /// [`Self::can_edit`] as a `Result`.
  pub fn authorize(&self, record: &FacultyRecord) -> Result<()> {
    if self.can_edit(record) {
      Ok(())
    } else {
      Err(Error::NotAuthorized {
        email: self.email.clone(),
        id:    record.id,
      })
    }
  }
}

impl fmt::Debug for Session {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Session")
      .field("email", &self.email)
      .field("name", &self.name)
      .field("access_token", &"<redacted>")
      .finish()
  }
}

fn same_email(a: &str, b: &str) -> bool {
  let (a, b) = (a.trim(), b.trim());
  !a.is_empty() && a.to_lowercase() == b.to_lowercase()
}
