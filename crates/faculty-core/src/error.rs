//! Error types for `faculty-core`.

use thiserror::Error;

use crate::record::FacultyId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("API request failed: {0}")]
  RequestFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("{email} is not authorized to edit profile {id}")]
  NotAuthorized { email: String, id: FacultyId },
}

impl Error {
  /// Wrap an underlying directory failure, keeping it as the source.
  pub fn request_failed<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::RequestFailed(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
