//! The `FacultyDirectory` trait.
//!
//! The trait is the seam between routing logic and transport:
//! `faculty-client` implements it over HTTP, and tests implement it in
//! memory. It covers exactly the lookups the router needs.

use std::future::Future;

use crate::record::{FacultyId, FacultyRecord};

/// Read access to a remote faculty directory.
///
/// All methods return `Send` futures so routed searches can be spawned onto
/// a multi-threaded runtime.
pub trait FacultyDirectory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The full, unfiltered collection.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<FacultyRecord>, Self::Error>> + Send + '_;

  /// Records whose department equals `department` exactly.
  fn by_department<'a>(
    &'a self,
    department: &'a str,
  ) -> impl Future<Output = Result<Vec<FacultyRecord>, Self::Error>> + Send + 'a;

  /// Records whose name contains `name`.
  fn by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Vec<FacultyRecord>, Self::Error>> + Send + 'a;

  /// A single record, bypassing any intermediate cache.
  fn get(
    &self,
    id: FacultyId,
  ) -> impl Future<Output = Result<FacultyRecord, Self::Error>> + Send + '_;

  /// Identifiers filed under a curated keyword. An unknown keyword yields an
  /// empty list, not an error.
  fn keyword_ids<'a>(
    &'a self,
    keyword: &'a str,
  ) -> impl Future<Output = Result<Vec<FacultyId>, Self::Error>> + Send + 'a;
}
