//! Query routing: a sparse [`SearchFilter`] in, one record list out.
//!
//! Endpoint selection is a decision table over which filter fields are
//! present ([`Strategy::select`]). Each strategy maps to a [`RequestPlan`]:
//! which endpoint to call and which filters to apply locally afterwards.
//! Department is the only reliably indexed field server-side; the combined
//! department+topic and name+topic endpoints are unreliable, so those cases
//! fetch a broader set and filter here instead.

use std::collections::HashSet;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::{
  Error, Result,
  directory::FacultyDirectory,
  filter::SearchFilter,
  record::{FacultyId, FacultyRecord},
};

// ─── Decision table ───────────────────────────────────────────────────────────

/// How a filter is served, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
  /// name + department + topic: department endpoint, name and topic local.
  DepartmentThenNameAndTopic,
  /// department + topic: department endpoint, topic local.
  DepartmentThenTopic,
  /// name + department: department endpoint, name local.
  DepartmentThenName,
  /// name + topic: full collection, name and topic local.
  AllThenNameAndTopic,
  /// department only.
  Department,
  /// topic only: keyword index, else full collection with topic local.
  Keyword,
  /// name only.
  Name,
  /// no filters.
  All,
}

impl Strategy {
  pub fn select(filter: &SearchFilter) -> Self {
    let has = (
      filter.name().is_some(),
      filter.department().is_some(),
      filter.topic().is_some(),
    );
    match has {
      (true, true, true) => Strategy::DepartmentThenNameAndTopic,
      (false, true, true) => Strategy::DepartmentThenTopic,
      (true, true, false) => Strategy::DepartmentThenName,
      (true, false, true) => Strategy::AllThenNameAndTopic,
      (false, true, false) => Strategy::Department,
      (false, false, true) => Strategy::Keyword,
      (true, false, false) => Strategy::Name,
      (false, false, false) => Strategy::All,
    }
  }

  /// Turn `filter` into the calls this strategy makes.
  pub fn plan(self, filter: &SearchFilter) -> RequestPlan {
    let name = || filter.name().map(str::to_owned);
    let topic = || filter.topic().map(str::to_owned);
    let department = || filter.department().unwrap_or_default().to_owned();

    match self {
      Strategy::DepartmentThenNameAndTopic => RequestPlan {
        source:       Source::Department(department()),
        name_filter:  name(),
        topic_filter: topic(),
      },
      Strategy::DepartmentThenTopic => RequestPlan {
        source:       Source::Department(department()),
        name_filter:  None,
        topic_filter: topic(),
      },
      Strategy::DepartmentThenName => RequestPlan {
        source:       Source::Department(department()),
        name_filter:  name(),
        topic_filter: None,
      },
      Strategy::AllThenNameAndTopic => RequestPlan {
        source:       Source::All,
        name_filter:  name(),
        topic_filter: topic(),
      },
      Strategy::Department => RequestPlan::unfiltered(Source::Department(department())),
      Strategy::Keyword => {
        RequestPlan::unfiltered(Source::Keyword(topic().unwrap_or_default()))
      }
      Strategy::Name => RequestPlan::unfiltered(Source::Name(name().unwrap_or_default())),
      Strategy::All => RequestPlan::unfiltered(Source::All),
    }
  }
}

// ─── Plans ────────────────────────────────────────────────────────────────────

/// The endpoint a plan draws records from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
  All,
  Department(String),
  Name(String),
  /// Keyword index; falls back to the full collection filtered by the
  /// keyword as a topic when the index has nothing.
  Keyword(String),
}

/// One endpoint call plus the filters applied to its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPlan {
  pub source:       Source,
  pub name_filter:  Option<String>,
  pub topic_filter: Option<String>,
}

impl RequestPlan {
  fn unfiltered(source: Source) -> Self {
    Self {
      source,
      name_filter: None,
      topic_filter: None,
    }
  }

  /// Apply the local filters. A plan without filters returns its input as is.
  pub fn apply(&self, records: Vec<FacultyRecord>) -> Vec<FacultyRecord> {
    if self.name_filter.is_none() && self.topic_filter.is_none() {
      return records;
    }
    records
      .into_iter()
      .filter(|r| {
        self.name_filter.as_deref().is_none_or(|n| r.matches_name(n))
          && self.topic_filter.as_deref().is_none_or(|t| r.matches_topic(t))
      })
      .collect()
  }
}

// ─── Execution ────────────────────────────────────────────────────────────────

/// Serve `filter` from `directory`.
///
/// Failures of the primary call surface as [`Error::RequestFailed`]. In the
/// keyword path, a failed index lookup falls back to local filtering and a
/// failed per-id lookup drops only that id.
pub async fn route<D>(directory: &D, filter: &SearchFilter) -> Result<Vec<FacultyRecord>>
where
  D: FacultyDirectory,
{
  let strategy = Strategy::select(filter);
  let plan = strategy.plan(filter);
  debug!(?strategy, source = ?plan.source, "routing search");

  let records = match &plan.source {
    Source::All => directory.list_all().await,
    Source::Department(department) => directory.by_department(department).await,
    Source::Name(name) => directory.by_name(name).await,
    Source::Keyword(keyword) => {
      let matched = resolve_keyword(directory, keyword).await;
      if !matched.is_empty() {
        debug!(keyword = %keyword, count = matched.len(), "served from keyword index");
        return Ok(matched);
      }
      debug!(keyword = %keyword, "keyword index empty; filtering full collection");
      let all = directory.list_all().await.map_err(Error::request_failed)?;
      return Ok(all.into_iter().filter(|r| r.matches_topic(keyword)).collect());
    }
  }
  .map_err(Error::request_failed)?;

  Ok(plan.apply(records))
}

/// Look up `keyword` in the index and resolve each distinct id concurrently.
/// Lookup failures are logged and treated as no match.
async fn resolve_keyword<D>(directory: &D, keyword: &str) -> Vec<FacultyRecord>
where
  D: FacultyDirectory,
{
  let ids = match directory.keyword_ids(keyword).await {
    Ok(ids) => dedup_ids(ids),
    Err(e) => {
      warn!(keyword, error = %e, "keyword lookup failed");
      return Vec::new();
    }
  };

  let lookups = ids.into_iter().map(|id| async move {
    match directory.get(id).await {
      Ok(record) => Some(record),
      Err(e) => {
        warn!(id, error = %e, "dropping unresolved keyword match");
        None
      }
    }
  });

  join_all(lookups).await.into_iter().flatten().collect()
}

/// Drop repeated ids, keeping first-occurrence order.
pub fn dedup_ids(ids: impl IntoIterator<Item = FacultyId>) -> Vec<FacultyId> {
  let mut seen = HashSet::new();
  ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
  use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
  };

  use pretty_assertions::assert_eq;
  use serde_json::json;

  use super::*;

  #[derive(Debug, thiserror::Error)]
  #[error("fake failure: {0}")]
  struct FakeError(&'static str);

  #[derive(Debug, Clone, PartialEq, Eq)]
  enum Call {
    All,
    Department(String),
    Name(String),
    Get(FacultyId),
    Keyword(String),
  }

  /// In-memory directory that records every call it receives.
  #[derive(Default)]
  struct FakeDirectory {
    records:        Vec<FacultyRecord>,
    keywords:       HashMap<String, Vec<FacultyId>>,
    failing_ids:    HashSet<FacultyId>,
    keyword_broken: bool,
    list_broken:    bool,
    calls:          Mutex<Vec<Call>>,
  }

  impl FakeDirectory {
    fn new() -> Self {
      Self {
        records: vec![
          faculty(1, "Ana Kim", "Physics", "Quantum optics", &["Lasers"], None),
          faculty(2, "Ben Okafor", "Physics", "Cosmology", &["Dark matter"], None),
          faculty(
            3,
            "Cara Kimball",
            "Geography",
            "Remote sensing",
            &["Marine Biology"],
            Some("Professor of Oceanography"),
          ),
          faculty(4, "Dev Rao", "Geography", "Urban studies", &[], None),
          faculty(7, "Eli Marsh", "Earth Science", "Marine geology", &["Sediments"], None),
        ],
        ..Self::default()
      }
    }

    fn calls(&self) -> Vec<Call> { self.calls.lock().unwrap().clone() }

    fn log(&self, call: Call) { self.calls.lock().unwrap().push(call); }
  }

  impl FacultyDirectory for FakeDirectory {
    type Error = FakeError;

    async fn list_all(&self) -> Result<Vec<FacultyRecord>, FakeError> {
      self.log(Call::All);
      if self.list_broken {
        return Err(FakeError("list"));
      }
      Ok(self.records.clone())
    }

    async fn by_department(&self, department: &str) -> Result<Vec<FacultyRecord>, FakeError> {
      self.log(Call::Department(department.to_owned()));
      Ok(
        self
          .records
          .iter()
          .filter(|r| r.departments.iter().any(|d| d == department))
          .cloned()
          .collect(),
      )
    }

    async fn by_name(&self, name: &str) -> Result<Vec<FacultyRecord>, FakeError> {
      self.log(Call::Name(name.to_owned()));
      Ok(self.records.iter().filter(|r| r.matches_name(name)).cloned().collect())
    }

    async fn get(&self, id: FacultyId) -> Result<FacultyRecord, FakeError> {
      self.log(Call::Get(id));
      if self.failing_ids.contains(&id) {
        return Err(FakeError("get"));
      }
      self
        .records
        .iter()
        .find(|r| r.id == id)
        .cloned()
        .ok_or(FakeError("missing"))
    }

    async fn keyword_ids(&self, keyword: &str) -> Result<Vec<FacultyId>, FakeError> {
      self.log(Call::Keyword(keyword.to_owned()));
      if self.keyword_broken {
        return Err(FakeError("keyword"));
      }
      Ok(self.keywords.get(keyword).cloned().unwrap_or_default())
    }
  }

  fn faculty(
    id: FacultyId,
    name: &str,
    department: &str,
    specialization: &str,
    areas: &[&str],
    title: Option<&str>,
  ) -> FacultyRecord {
    serde_json::from_value(json!({
      "id": id,
      "name": name,
      "department": department,
      "specialization": specialization,
      "research_areas": areas,
      "title": title,
    }))
    .unwrap()
  }

  fn ids(records: &[FacultyRecord]) -> Vec<FacultyId> {
    records.iter().map(|r| r.id).collect()
  }

  // ─── Strategy selection ──────────────────────────────────────────────────

  #[test]
  fn decision_table_covers_every_combination() {
    let cases = [
      (("n", "d", "t"), Strategy::DepartmentThenNameAndTopic),
      (("", "d", "t"), Strategy::DepartmentThenTopic),
      (("n", "d", ""), Strategy::DepartmentThenName),
      (("n", "", "t"), Strategy::AllThenNameAndTopic),
      (("", "d", ""), Strategy::Department),
      (("", "", "t"), Strategy::Keyword),
      (("n", "", ""), Strategy::Name),
      (("", "", ""), Strategy::All),
    ];
    for ((n, d, t), expected) in cases {
      assert_eq!(Strategy::select(&SearchFilter::new(n, d, t)), expected);
    }
  }

  #[test]
  fn blank_fields_do_not_count_as_present() {
    let f = SearchFilter::new("   ", "Physics", "");
    assert_eq!(Strategy::select(&f), Strategy::Department);
  }

  #[test]
  fn combined_plans_filter_locally() {
    let f = SearchFilter::new("kim", "Physics", "optics");
    let plan = Strategy::select(&f).plan(&f);
    assert_eq!(plan, RequestPlan {
      source:       Source::Department("Physics".into()),
      name_filter:  Some("kim".into()),
      topic_filter: Some("optics".into()),
    });
  }

  // ─── Single-field routes ─────────────────────────────────────────────────

  #[tokio::test]
  async fn no_filter_fetches_everything() {
    let dir = FakeDirectory::new();
    let out = route(&dir, &SearchFilter::default()).await.unwrap();
    assert_eq!(out, dir.records);
    assert_eq!(dir.calls(), vec![Call::All]);
  }

  #[tokio::test]
  async fn department_only_uses_department_endpoint() {
    let dir = FakeDirectory::new();
    let out = route(&dir, &SearchFilter::default().with_department("Geography"))
      .await
      .unwrap();
    assert_eq!(ids(&out), vec![3, 4]);
    assert_eq!(dir.calls(), vec![Call::Department("Geography".into())]);
  }

  #[tokio::test]
  async fn name_only_uses_name_endpoint() {
    let dir = FakeDirectory::new();
    let out = route(&dir, &SearchFilter::default().with_name("kim")).await.unwrap();
    assert_eq!(ids(&out), vec![1, 3]);
    assert_eq!(dir.calls(), vec![Call::Name("kim".into())]);
  }

  // ─── Combined routes ─────────────────────────────────────────────────────

  #[tokio::test]
  async fn name_and_department_filters_department_by_name() {
    let dir = FakeDirectory::new();
    let out = route(&dir, &SearchFilter::new("OKAFOR", "Physics", ""))
      .await
      .unwrap();
    assert_eq!(ids(&out), vec![2]);
    assert_eq!(dir.calls(), vec![Call::Department("Physics".into())]);
  }

  #[tokio::test]
  async fn department_and_topic_filters_department_by_topic() {
    let dir = FakeDirectory::new();
    let out = route(&dir, &SearchFilter::new("", "Geography", "oceanography"))
      .await
      .unwrap();
    assert_eq!(ids(&out), vec![3]);
    assert_eq!(dir.calls(), vec![Call::Department("Geography".into())]);
  }

  #[tokio::test]
  async fn all_three_filters_department_by_name_and_topic() {
    let dir = FakeDirectory::new();
    let out = route(&dir, &SearchFilter::new("kim", "Physics", "lasers"))
      .await
      .unwrap();
    assert_eq!(ids(&out), vec![1]);

    let none = route(&dir, &SearchFilter::new("kim", "Physics", "cosmology"))
      .await
      .unwrap();
    assert!(none.is_empty());
    assert_eq!(dir.calls(), vec![
      Call::Department("Physics".into()),
      Call::Department("Physics".into()),
    ]);
  }

  #[tokio::test]
  async fn name_and_topic_filters_full_collection() {
    let dir = FakeDirectory::new();
    let filter = SearchFilter::new("kim", "", "marine");
    let out = route(&dir, &filter).await.unwrap();

    let expected: Vec<_> = dir
      .records
      .iter()
      .filter(|r| r.matches_name("kim") && r.matches_topic("marine"))
      .cloned()
      .collect();
    assert_eq!(out, expected);
    assert_eq!(ids(&out), vec![3]);
    assert_eq!(dir.calls(), vec![Call::All]);
  }

  // ─── Keyword route ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn keyword_hits_are_deduplicated_and_resolved() {
    let mut dir = FakeDirectory::new();
    dir.keywords.insert("oceanography".into(), vec![3, 7, 3]);

    let out = route(&dir, &SearchFilter::default().with_topic("oceanography"))
      .await
      .unwrap();

    assert_eq!(ids(&out), vec![3, 7]);
    let calls = dir.calls();
    assert_eq!(calls[0], Call::Keyword("oceanography".into()));
    let gets: Vec<_> = calls[1..].to_vec();
    assert_eq!(gets.len(), 2);
    assert!(gets.contains(&Call::Get(3)));
    assert!(gets.contains(&Call::Get(7)));
  }

  #[tokio::test]
  async fn failed_id_lookups_are_dropped() {
    let mut dir = FakeDirectory::new();
    dir.keywords.insert("geology".into(), vec![7, 2]);
    dir.failing_ids.insert(2);

    let out = route(&dir, &SearchFilter::default().with_topic("geology"))
      .await
      .unwrap();
    assert_eq!(ids(&out), vec![7]);
  }

  #[tokio::test]
  async fn empty_keyword_result_falls_back_to_topic_filter() {
    let dir = FakeDirectory::new();
    let out = route(&dir, &SearchFilter::default().with_topic("marine"))
      .await
      .unwrap();
    assert_eq!(ids(&out), vec![3, 7]);
    assert_eq!(dir.calls(), vec![Call::Keyword("marine".into()), Call::All]);
  }

  #[tokio::test]
  async fn fallback_may_be_empty_without_error() {
    let dir = FakeDirectory::new();
    let out = route(&dir, &SearchFilter::default().with_topic("volcanology"))
      .await
      .unwrap();
    assert!(out.is_empty());
  }

  #[tokio::test]
  async fn broken_keyword_index_falls_back() {
    let dir = FakeDirectory { keyword_broken: true, ..FakeDirectory::new() };
    let out = route(&dir, &SearchFilter::default().with_topic("cosmology"))
      .await
      .unwrap();
    assert_eq!(ids(&out), vec![2]);
  }

  #[tokio::test]
  async fn keyword_ids_that_all_fail_fall_back() {
    let mut dir = FakeDirectory::new();
    dir.keywords.insert("lasers".into(), vec![1]);
    dir.failing_ids.insert(1);

    let out = route(&dir, &SearchFilter::default().with_topic("lasers"))
      .await
      .unwrap();
    assert_eq!(ids(&out), vec![1]);
    assert_eq!(dir.calls().last(), Some(&Call::All));
  }

  // ─── Failures ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn primary_failure_is_request_failed_with_cause() {
    let dir = FakeDirectory { list_broken: true, ..FakeDirectory::new() };
    let err = route(&dir, &SearchFilter::default()).await.unwrap_err();

    assert!(matches!(err, Error::RequestFailed(_)));
    assert_eq!(err.to_string(), "API request failed: fake failure: list");
    let source = std::error::Error::source(&err).expect("cause kept");
    assert_eq!(source.to_string(), "fake failure: list");
  }

  #[test]
  fn dedup_keeps_first_occurrence_order() {
    assert_eq!(dedup_ids([5, 1, 5, 2, 1]), vec![5, 1, 2]);
  }
}
