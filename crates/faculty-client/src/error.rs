//! Error types for `faculty-client`.

use faculty_core::record::FacultyId;
use thiserror::Error;

use crate::auth::AuthError;

#[derive(Debug, Error)]
pub enum Error {
  /// Network failure, or a body that could not be decoded.
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  /// Non-2xx response from a read endpoint.
  #[error("HTTP {status}: {reason}")]
  Status { status: u16, reason: String },

  /// Non-2xx response from the update endpoint, with the server's message.
  #[error("{message}")]
  Rejected { status: u16, message: String },

  #[error("faculty {0} not found")]
  NotFound(FacultyId),

  #[error("invalid URL: {0}")]
  InvalidUrl(String),

  #[error(transparent)]
  Auth(#[from] AuthError),
}

impl Error {
  pub(crate) fn status(status: reqwest::StatusCode) -> Self {
    Self::Status {
      status: status.as_u16(),
      reason: status.canonical_reason().unwrap_or("Unknown").to_owned(),
    }
  }

  /// The HTTP status carried by this error, if any.
  pub fn status_code(&self) -> Option<u16> {
    match self {
      Error::Status { status, .. } | Error::Rejected { status, .. } => Some(*status),
      Error::NotFound(_) => Some(404),
      Error::Http(e) => e.status().map(|s| s.as_u16()),
      Error::InvalidUrl(_) | Error::Auth(_) => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
