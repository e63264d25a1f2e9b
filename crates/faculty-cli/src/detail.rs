//! A faculty record plus its optional summary data.

use faculty_client::{ApiClient, FacultyLinks};
use faculty_core::record::{FacultyId, FacultyRecord};
use tracing::warn;

/// Result of an auxiliary lookup. Failures never block the primary view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment<T> {
  Loaded(T),
  Unavailable,
}

impl<T> Enrichment<T> {
  fn from_result<E: std::fmt::Display>(what: &str, id: FacultyId, result: Result<T, E>) -> Self {
    match result {
      Ok(value) => Enrichment::Loaded(value),
      Err(e) => {
        warn!(id, what, error = %e, "enrichment unavailable");
        Enrichment::Unavailable
      }
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
  pub record:         FacultyRecord,
  pub summary:        Enrichment<Option<String>>,
  pub keywords:       Enrichment<Vec<String>>,
  pub broad_keywords: Enrichment<Vec<String>>,
  pub links:          Enrichment<FacultyLinks>,
}

/// Fetch `id` fresh, with summary data fetched alongside.
///
/// Only a failure of the record itself is an error.
pub async fn load_detail(client: &ApiClient, id: FacultyId) -> faculty_client::Result<Detail> {
  let (record, summary, keywords, broad_keywords, links) = tokio::join!(
    client.faculty(id),
    client.summary(id),
    client.keywords(id),
    client.broad_keywords(id),
    client.links(id),
  );

  Ok(Detail {
    record:         record?,
    summary:        Enrichment::from_result("summary", id, summary),
    keywords:       Enrichment::from_result("keywords", id, keywords),
    broad_keywords: Enrichment::from_result("broad_keywords", id, broad_keywords),
    links:          Enrichment::from_result("links", id, links),
  })
}
