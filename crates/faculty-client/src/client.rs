//! Async HTTP client wrapping the faculty directory JSON API.

use std::{collections::BTreeMap, time::Duration};

use chrono::Utc;
use faculty_core::{
  directory::FacultyDirectory,
  profile::ProfileUpdate,
  record::{FacultyId, FacultyRecord},
  session::Session,
  summary::{BroadKeywords, FacultySummary, Keywords, SummaryText},
};
use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
  Error, Result,
  auth::{AuthError, UserInfo},
  message::extract_error_message,
};

pub const DEFAULT_BASE_URL: &str = "https://api.research-profiles.grit.ucsb.edu";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Header carrying the signed-in identity on updates.
const USER_EMAIL_HEADER: &str = "X-User-Email";

/// External links for one faculty member, keyed by link kind.
pub type FacultyLinks = BTreeMap<String, Value>;

/// Connection settings for the directory API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url:     String,
  /// OAuth provider endpoint that resolves a bearer token to a profile.
  pub userinfo_url: String,
  pub timeout:      Duration,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url:     DEFAULT_BASE_URL.to_owned(),
      userinfo_url: GOOGLE_USERINFO_URL.to_owned(),
      timeout:      Duration::from_secs(30),
    }
  }
}

/// Async HTTP client for the faculty directory REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &ApiConfig { &self.config }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// Build `<base>/api/<segments…>` with each segment percent-encoded.
  fn segment_url(&self, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(self.config.base_url.trim_end_matches('/'))
      .map_err(|e| Error::InvalidUrl(e.to_string()))?;
    url
      .path_segments_mut()
      .map_err(|()| Error::InvalidUrl(self.config.base_url.clone()))?
      .pop_if_empty()
      .push("api")
      .extend(segments);
    Ok(url)
  }

  // ── Plumbing ──────────────────────────────────────────────────────────────

  /// Send `req` and decode a 2xx JSON body. Any other status is an error.
  async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> Result<T> {
    let resp = req.send().await?;
    debug!(what, status = %resp.status(), "response");
    if !resp.status().is_success() {
      return Err(Error::status(resp.status()));
    }
    Ok(resp.json().await?)
  }

  /// Like [`Self::fetch`], but a 404 means "no data" and yields the default.
  async fn fetch_optional<T>(&self, req: RequestBuilder, what: &str) -> Result<T>
  where
    T: DeserializeOwned + Default,
  {
    let resp = req.send().await?;
    debug!(what, status = %resp.status(), "response");
    match resp.status() {
      StatusCode::NOT_FOUND => Ok(T::default()),
      s if s.is_success() => Ok(resp.json().await?),
      s => Err(Error::status(s)),
    }
  }

  // ── Faculty ───────────────────────────────────────────────────────────────

  /// `GET /api/faculty`
  pub async fn list_faculty(&self) -> Result<Vec<FacultyRecord>> {
    self
      .fetch(self.client.get(self.url("/faculty")), "GET /faculty")
      .await
  }

  /// `GET /api/faculty/department?department=<d>`
  pub async fn faculty_by_department(&self, department: &str) -> Result<Vec<FacultyRecord>> {
    let req = self
      .client
      .get(self.url("/faculty/department"))
      .query(&[("department", department)]);
    self.fetch(req, "GET /faculty/department").await
  }

  /// `GET /api/faculty/name?name=<n>`
  pub async fn faculty_by_name(&self, name: &str) -> Result<Vec<FacultyRecord>> {
    let req = self
      .client
      .get(self.url("/faculty/name"))
      .query(&[("name", name)]);
    self.fetch(req, "GET /faculty/name").await
  }

  /// `GET /api/faculty/<id>`, always fresh. A timestamp query parameter and
  /// `Cache-Control: no-cache` defeat intermediate caches.
  pub async fn faculty(&self, id: FacultyId) -> Result<FacultyRecord> {
    let resp = self
      .client
      .get(self.url(&format!("/faculty/{id}")))
      .query(&[("t", Utc::now().timestamp_millis())])
      .header(header::CACHE_CONTROL, "no-cache")
      .send()
      .await?;

    match resp.status() {
      StatusCode::NOT_FOUND => Err(Error::NotFound(id)),
      s if s.is_success() => Ok(resp.json().await?),
      s => Err(Error::status(s)),
    }
  }

  /// `PUT /api/faculty/<id>` on behalf of `session`.
  ///
  /// A rejected update surfaces the server's own message, dug out of
  /// whatever body shape it sent (see [`extract_error_message`]).
  pub async fn update_faculty(
    &self,
    id: FacultyId,
    update: &ProfileUpdate,
    session: &Session,
  ) -> Result<FacultyRecord> {
    info!(id, editor = %session.email, "updating faculty profile");
    let resp = self
      .client
      .put(self.url(&format!("/faculty/{id}")))
      .header(USER_EMAIL_HEADER, &session.email)
      .json(update)
      .send()
      .await?;

    let status = resp.status();
    if status.is_success() {
      return Ok(resp.json().await?);
    }

    let body = read_body(resp).await;
    let message = extract_error_message(status, &body);
    warn!(id, %status, %message, "update rejected");
    Err(Error::Rejected {
      status: status.as_u16(),
      message,
    })
  }

  /// `GET /api/faculty/alldepartments`
  pub async fn departments(&self) -> Result<Vec<String>> {
    self
      .fetch(
        self.client.get(self.url("/faculty/alldepartments")),
        "GET /faculty/alldepartments",
      )
      .await
  }

  /// `GET /api/faculty-links/<id>`
  pub async fn links(&self, id: FacultyId) -> Result<FacultyLinks> {
    self
      .fetch(
        self.client.get(self.url(&format!("/faculty-links/{id}"))),
        "GET /faculty-links",
      )
      .await
  }

  // ── Summaries ─────────────────────────────────────────────────────────────

  /// `GET /api/faculty-summary/keyword/<kw>/getId`; 404 is an empty list.
  pub async fn keyword_ids(&self, keyword: &str) -> Result<Vec<FacultyId>> {
    let url = self.segment_url(&["faculty-summary", "keyword", keyword, "getId"])?;
    self
      .fetch_optional(self.client.get(url), "GET /faculty-summary/keyword")
      .await
  }

  /// `GET /api/faculty-summary/id/<id>`; 404 is an empty summary.
  pub async fn summary_bundle(&self, id: FacultyId) -> Result<FacultySummary> {
    self
      .fetch_optional(
        self.client.get(self.url(&format!("/faculty-summary/id/{id}"))),
        "GET /faculty-summary/id",
      )
      .await
  }

  /// `GET /api/faculty-summary/id/<id>/summary`; 404 is `None`.
  pub async fn summary(&self, id: FacultyId) -> Result<Option<String>> {
    let text: SummaryText = self
      .fetch_optional(
        self.client.get(self.url(&format!("/faculty-summary/id/{id}/summary"))),
        "GET /faculty-summary/id/summary",
      )
      .await?;
    Ok(text.summary.filter(|s| !s.trim().is_empty()))
  }

  /// `GET /api/faculty-summary/id/<id>/keywords`; 404 is empty.
  pub async fn keywords(&self, id: FacultyId) -> Result<Vec<String>> {
    let k: Keywords = self
      .fetch_optional(
        self.client.get(self.url(&format!("/faculty-summary/id/{id}/keywords"))),
        "GET /faculty-summary/id/keywords",
      )
      .await?;
    Ok(k.keywords)
  }

  /// `GET /api/faculty-summary/id/<id>/broad_keywords`; 404 is empty.
  pub async fn broad_keywords(&self, id: FacultyId) -> Result<Vec<String>> {
    let k: BroadKeywords = self
      .fetch_optional(
        self
          .client
          .get(self.url(&format!("/faculty-summary/id/{id}/broad_keywords"))),
        "GET /faculty-summary/id/broad_keywords",
      )
      .await?;
    Ok(k.broad_keywords)
  }

  /// `GET /api/faculty-summary/broad_keywords/department?department=<d>`
  pub async fn department_broad_keywords(&self, department: &str) -> Result<Value> {
    let req = self
      .client
      .get(self.url("/faculty-summary/broad_keywords/department"))
      .query(&[("department", department)]);
    self
      .fetch(req, "GET /faculty-summary/broad_keywords/department")
      .await
  }

  // ── Identity ──────────────────────────────────────────────────────────────

  /// Resolve an OAuth access token to the user's profile.
  pub async fn user_info(&self, access_token: &str) -> Result<UserInfo> {
    let resp = self
      .client
      .get(&self.config.userinfo_url)
      .bearer_auth(access_token)
      .send()
      .await?;
    if !resp.status().is_success() {
      return Err(AuthError::UserInfo { status: resp.status().as_u16() }.into());
    }
    Ok(resp.json().await?)
  }
}

async fn read_body(resp: Response) -> String {
  match resp.text().await {
    Ok(body) => body,
    Err(e) => {
      warn!(error = %e, "failed to read error body");
      String::new()
    }
  }
}

// ─── Router seam ──────────────────────────────────────────────────────────────

impl FacultyDirectory for ApiClient {
  type Error = Error;

  async fn list_all(&self) -> Result<Vec<FacultyRecord>> { self.list_faculty().await }

  async fn by_department(&self, department: &str) -> Result<Vec<FacultyRecord>> {
    self.faculty_by_department(department).await
  }

  async fn by_name(&self, name: &str) -> Result<Vec<FacultyRecord>> {
    self.faculty_by_name(name).await
  }

  async fn get(&self, id: FacultyId) -> Result<FacultyRecord> { self.faculty(id).await }

  async fn keyword_ids(&self, keyword: &str) -> Result<Vec<FacultyId>> {
    ApiClient::keyword_ids(self, keyword).await
  }
}
