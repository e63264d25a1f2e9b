//! HTTP-level tests for `ApiClient` against a local mock server.

use std::time::Duration;

use faculty_core::{
  filter::SearchFilter,
  profile::ProfileUpdate,
  router::route,
  session::Session,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::{
  Mock, MockServer, ResponseTemplate,
  matchers::{body_json, header, header_exists, method, path, query_param},
};

use crate::{ApiClient, ApiConfig, Error};

async fn client(server: &MockServer) -> ApiClient {
  ApiClient::new(ApiConfig {
    base_url:     server.uri(),
    userinfo_url: format!("{}/oauth2/v2/userinfo", server.uri()),
    timeout:      Duration::from_secs(5),
  })
  .expect("client builds")
}

fn faculty(id: u32, name: &str, department: &str, areas: Value) -> Value {
  json!({
    "id": id,
    "name": name,
    "department": department,
    "specialization": null,
    "research_areas": areas,
    "email": format!("{}@ucsb.edu", name.to_lowercase().replace(' ', "_")),
  })
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_normalises_research_areas() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/faculty"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([
      faculty(1, "Ana Kim", "Physics", json!("{Marine Biology,Oceanography}")),
      faculty(2, "Ben Ode", "Economics", json!("Trade,\nLabor")),
      faculty(3, "Cy Lu", "English", json!(null)),
    ])))
    .expect(1)
    .mount(&server)
    .await;

  let all = client(&server).await.list_faculty().await.unwrap();
  assert_eq!(all[0].research_areas, vec!["Marine Biology", "Oceanography"]);
  assert_eq!(all[1].research_areas, vec!["Trade", "Labor"]);
  assert!(all[2].research_areas.is_empty());
}

#[tokio::test]
async fn department_search_sends_query_parameter() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/faculty/department"))
    .and(query_param("department", "Ecology, Evolution, and Marine Biology"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([
      faculty(4, "Dee Fox", "Ecology, Evolution, and Marine Biology", json!([])),
    ])))
    .expect(1)
    .mount(&server)
    .await;

  let hits = client(&server)
    .await
    .faculty_by_department("Ecology, Evolution, and Marine Biology")
    .await
    .unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].departments, vec!["Ecology, Evolution, and Marine Biology"]);
}

#[tokio::test]
async fn non_success_is_a_status_error() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/faculty/name"))
    .respond_with(ResponseTemplate::new(503))
    .mount(&server)
    .await;

  let err = client(&server).await.faculty_by_name("kim").await.unwrap_err();
  assert!(matches!(err, Error::Status { status: 503, .. }));
  assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
  assert_eq!(err.status_code(), Some(503));
}

#[tokio::test]
async fn by_id_bypasses_caches() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/faculty/12"))
    .and(header("cache-control", "no-cache"))
    .respond_with(ResponseTemplate::new(200).set_body_json(faculty(
      12,
      "Eve Ng",
      "Geography",
      json!(["GIS"]),
    )))
    .expect(1)
    .mount(&server)
    .await;

  let record = client(&server).await.faculty(12).await.unwrap();
  assert_eq!(record.id, 12);

  let requests = server.received_requests().await.unwrap();
  assert!(requests[0].url.query_pairs().any(|(k, _)| k == "t"));
}

#[tokio::test]
async fn by_id_404_is_not_found() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/faculty/99"))
    .respond_with(ResponseTemplate::new(404))
    .mount(&server)
    .await;

  let err = client(&server).await.faculty(99).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(99)));
}

// ─── Optional endpoints ──────────────────────────────────────────────────────

#[tokio::test]
async fn keyword_404_is_empty() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/faculty-summary/keyword/volcanoes/getId"))
    .respond_with(ResponseTemplate::new(404))
    .mount(&server)
    .await;

  let ids = client(&server).await.keyword_ids("volcanoes").await.unwrap();
  assert!(ids.is_empty());
}

#[tokio::test]
async fn keyword_path_is_percent_encoded() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/faculty-summary/keyword/marine%20biology/getId"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([3, 7])))
    .expect(1)
    .mount(&server)
    .await;

  let ids = client(&server).await.keyword_ids("marine biology").await.unwrap();
  assert_eq!(ids, vec![3, 7]);
}

#[tokio::test]
async fn summary_endpoints_treat_404_as_no_data() {
  let server = MockServer::start().await;
  for suffix in ["summary", "keywords", "broad_keywords"] {
    Mock::given(method("GET"))
      .and(path(format!("/api/faculty-summary/id/5/{suffix}")))
      .respond_with(ResponseTemplate::new(404))
      .mount(&server)
      .await;
  }

  let c = client(&server).await;
  assert_eq!(c.summary(5).await.unwrap(), None);
  assert!(c.keywords(5).await.unwrap().is_empty());
  assert!(c.broad_keywords(5).await.unwrap().is_empty());
}

#[tokio::test]
async fn summary_endpoints_decode_payloads() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/faculty-summary/id/5/summary"))
    .respond_with(
      ResponseTemplate::new(200).set_body_json(json!({ "summary": "Studies kelp." })),
    )
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path("/api/faculty-summary/id/5/keywords"))
    .respond_with(
      ResponseTemplate::new(200).set_body_json(json!({ "keywords": ["kelp", "  "] })),
    )
    .mount(&server)
    .await;

  let c = client(&server).await;
  assert_eq!(c.summary(5).await.unwrap().as_deref(), Some("Studies kelp."));
  assert_eq!(c.keywords(5).await.unwrap(), vec!["kelp"]);
}

#[tokio::test]
async fn summary_server_error_is_still_an_error() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/faculty-summary/id/5/summary"))
    .respond_with(ResponseTemplate::new(500))
    .mount(&server)
    .await;

  assert!(client(&server).await.summary(5).await.is_err());
}

#[tokio::test]
async fn departments_list() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/faculty/alldepartments"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Physics", "English"])))
    .mount(&server)
    .await;

  assert_eq!(
    client(&server).await.departments().await.unwrap(),
    vec!["Physics", "English"]
  );
}

#[tokio::test]
async fn summary_bundle_and_links() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/faculty-summary/id/8"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "id": 8,
      "summary": "Coastal ecology.",
      "keywords": "{kelp,urchins}",
      "broad_keywords": ["Ecology"],
    })))
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path("/api/faculty-links/8"))
    .respond_with(
      ResponseTemplate::new(200).set_body_json(json!({ "lab": "https://lab.example" })),
    )
    .mount(&server)
    .await;

  let c = client(&server).await;
  let bundle = c.summary_bundle(8).await.unwrap();
  assert_eq!(bundle.id, Some(8));
  assert_eq!(bundle.keywords, vec!["kelp", "urchins"]);
  assert_eq!(bundle.broad_keywords, vec!["Ecology"]);

  let links = c.links(8).await.unwrap();
  assert_eq!(links["lab"], json!("https://lab.example"));

  assert_eq!(c.summary_bundle(9).await.unwrap().summary, None);
}

#[tokio::test]
async fn department_broad_keywords_passes_department() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/faculty-summary/broad_keywords/department"))
    .and(query_param("department", "Physics"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Optics": 3 })))
    .expect(1)
    .mount(&server)
    .await;

  let value = client(&server)
    .await
    .department_broad_keywords("Physics")
    .await
    .unwrap();
  assert_eq!(value, json!({ "Optics": 3 }));
}

// ─── Updates ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_sends_identity_header_and_partial_body() {
  let server = MockServer::start().await;
  Mock::given(method("PUT"))
    .and(path("/api/faculty/9"))
    .and(header("X-User-Email", "lin_park@ucsb.edu"))
    .and(body_json(json!({
      "specialization": "Hydrology",
      "research_areas": ["Groundwater"],
    })))
    .respond_with(ResponseTemplate::new(200).set_body_json(faculty(
      9,
      "Lin Park",
      "Geography",
      json!(["Groundwater"]),
    )))
    .expect(1)
    .mount(&server)
    .await;

  let update = ProfileUpdate {
    specialization: Some("Hydrology".into()),
    research_areas: Some(vec!["Groundwater".into()]),
    ..ProfileUpdate::default()
  };
  let session = Session::new("lin_park@ucsb.edu", "token");

  let updated = client(&server)
    .await
    .update_faculty(9, &update, &session)
    .await
    .unwrap();
  assert_eq!(updated.research_areas, vec!["Groundwater"]);
}

#[tokio::test]
async fn forbidden_html_update_surfaces_pre_text() {
  let server = MockServer::start().await;
  Mock::given(method("PUT"))
    .and(path("/api/faculty/9"))
    .respond_with(
      ResponseTemplate::new(403)
        .insert_header("content-type", "text/html")
        .set_body_string("<pre>Forbidden</pre>"),
    )
    .mount(&server)
    .await;

  let err = client(&server)
    .await
    .update_faculty(9, &ProfileUpdate::default(), &Session::new("x@ucsb.edu", "t"))
    .await
    .unwrap_err();

  assert!(matches!(err, Error::Rejected { status: 403, .. }));
  assert_eq!(err.to_string(), "Forbidden");
}

#[tokio::test]
async fn json_update_error_surfaces_error_field() {
  let server = MockServer::start().await;
  Mock::given(method("PUT"))
    .and(path("/api/faculty/9"))
    .respond_with(
      ResponseTemplate::new(401).set_body_json(json!({ "error": "Email mismatch" })),
    )
    .mount(&server)
    .await;

  let err = client(&server)
    .await
    .update_faculty(9, &ProfileUpdate::default(), &Session::new("x@ucsb.edu", "t"))
    .await
    .unwrap_err();
  assert_eq!(err.to_string(), "Email mismatch");
}

// ─── Identity ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn user_info_uses_bearer_token() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/oauth2/v2/userinfo"))
    .and(header("authorization", "Bearer ya29.tok"))
    .respond_with(
      ResponseTemplate::new(200)
        .set_body_json(json!({ "email": "lin_park@ucsb.edu", "name": "Lin Park" })),
    )
    .mount(&server)
    .await;

  let info = client(&server).await.user_info("ya29.tok").await.unwrap();
  let session = info.into_session("ya29.tok");
  assert_eq!(session.email, "lin_park@ucsb.edu");
  assert_eq!(session.name.as_deref(), Some("Lin Park"));
}

#[tokio::test]
async fn rejected_token_is_an_auth_error() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/oauth2/v2/userinfo"))
    .and(header_exists("authorization"))
    .respond_with(ResponseTemplate::new(401))
    .mount(&server)
    .await;

  let err = client(&server).await.user_info("bad").await.unwrap_err();
  assert!(matches!(err, Error::Auth(_)));
}

// ─── Routed through the client ───────────────────────────────────────────────

#[tokio::test]
async fn topic_search_resolves_keyword_ids_once_each() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/faculty-summary/keyword/oceanography/getId"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([3, 7, 3])))
    .expect(1)
    .mount(&server)
    .await;
  for (id, name) in [(3, "Cara Lim"), (7, "Eli Marsh")] {
    Mock::given(method("GET"))
      .and(path(format!("/api/faculty/{id}")))
      .respond_with(ResponseTemplate::new(200).set_body_json(faculty(
        id,
        name,
        "Earth Science",
        json!(["Oceanography"]),
      )))
      .expect(1)
      .mount(&server)
      .await;
  }

  let c = client(&server).await;
  let hits = route(&c, &SearchFilter::default().with_topic("oceanography"))
    .await
    .unwrap();

  let mut ids: Vec<_> = hits.iter().map(|r| r.id).collect();
  ids.sort_unstable();
  assert_eq!(ids, vec![3, 7]);
}

#[tokio::test]
async fn routed_transport_failure_is_request_failed() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/faculty"))
    .respond_with(ResponseTemplate::new(500))
    .mount(&server)
    .await;

  let err = route(&client(&server).await, &SearchFilter::default())
    .await
    .unwrap_err();
  assert!(matches!(err, faculty_core::Error::RequestFailed(_)));
  assert_eq!(
    err.to_string(),
    "API request failed: HTTP 500: Internal Server Error"
  );
}
