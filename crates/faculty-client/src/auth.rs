//! OAuth implicit-flow token capture.
//!
//! The identity provider redirects back with the token in the URL fragment
//! (`#access_token=…&state=…`). [`parse_callback`] pulls the token and the
//! optional `state` out of that redirect; [`crate::ApiClient::user_info`]
//! then resolves the token to an email address.

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD as B64, URL_SAFE_NO_PAD as B64_URL};
use faculty_core::{record::FacultyId, session::Session};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;
use url::Url;

#[derive(Debug, Error)]
pub enum AuthError {
  #[error("authentication failed: {0}")]
  Provider(String),

  #[error("no access token received")]
  MissingToken,

  #[error("invalid callback URL: {0}")]
  InvalidCallback(String),

  #[error("failed to fetch user information (HTTP {status})")]
  UserInfo { status: u16 },
}

/// Application state round-tripped through the provider as base64 JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackState {
  #[serde(default)]
  pub redirect_url: Option<String>,
  /// Profile the user was trying to edit when sign-in started.
  #[serde(default, deserialize_with = "lenient_id")]
  pub faculty_id:   Option<FacultyId>,
}

/// The useful parts of a provider redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callback {
  pub access_token: String,
  pub state:        Option<CallbackState>,
}

impl Callback {
  /// Profile to open for editing once signed in, if any.
  pub fn edit_target(&self) -> Option<FacultyId> {
    self.state.as_ref().and_then(|s| s.faculty_id)
  }
}

/// Profile returned by the provider's user-info endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
  pub email: String,
  #[serde(default)]
  pub name:  Option<String>,
}

impl UserInfo {
  /// Combine with the token that produced it.
  pub fn into_session(self, access_token: impl Into<String>) -> Session {
    Session {
      email:        self.email,
      name:         self.name,
      access_token: access_token.into(),
    }
  }
}

/// Parse a provider redirect URL.
///
/// Parameters are read from the fragment, or from the query string when the
/// fragment is empty. An `error` parameter wins over everything else. A
/// `state` that fails to decode is logged and dropped.
pub fn parse_callback(redirect: &str) -> Result<Callback, AuthError> {
  let url =
    Url::parse(redirect.trim()).map_err(|e| AuthError::InvalidCallback(e.to_string()))?;

  let params: Vec<(String, String)> = match url.fragment().filter(|f| !f.is_empty()) {
    Some(fragment) => url::form_urlencoded::parse(fragment.as_bytes())
      .into_owned()
      .collect(),
    None => url.query_pairs().into_owned().collect(),
  };
  let param = |key: &str| {
    params
      .iter()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v.as_str())
  };

  if let Some(error) = param("error") {
    return Err(AuthError::Provider(error.to_owned()));
  }

  let access_token = param("access_token")
    .filter(|t| !t.is_empty())
    .ok_or(AuthError::MissingToken)?
    .to_owned();

  let state = param("state").and_then(|raw| match decode_state(raw) {
    Ok(state) => Some(state),
    Err(e) => {
      warn!(error = %e, "ignoring undecodable OAuth state");
      None
    }
  });

  Ok(Callback { access_token, state })
}

fn decode_state(raw: &str) -> Result<CallbackState, String> {
  // Form decoding turns an unescaped `+` into a space.
  let raw = raw.replace(' ', "+");
  let bytes = B64
    .decode(&raw)
    .or_else(|_| B64_URL.decode(raw.trim_end_matches('=')))
    .map_err(|e| e.to_string())?;
  serde_json::from_slice(&bytes).map_err(|e| e.to_string())
}

/// Accept `12`, `"12"`, or nothing.
fn lenient_id<'de, D>(de: D) -> Result<Option<FacultyId>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Value::deserialize(de)? {
    Value::Number(n) => n.as_u64().and_then(|n| FacultyId::try_from(n).ok()),
    Value::String(s) => s.trim().parse().ok(),
    _ => None,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn state(json: &str) -> String { B64.encode(json) }

  #[test]
  fn token_and_state_come_from_fragment() {
    let redirect = format!(
      "https://profiles.example.edu/auth/callback#access_token=ya29.abc&token_type=Bearer&state={}",
      state(r#"{"redirectUrl":"/faculty/42","facultyId":"42"}"#)
    );
    let cb = parse_callback(&redirect).unwrap();

    assert_eq!(cb.access_token, "ya29.abc");
    assert_eq!(cb.edit_target(), Some(42));
    assert_eq!(
      cb.state.unwrap().redirect_url.as_deref(),
      Some("/faculty/42")
    );
  }

  #[test]
  fn query_string_is_used_without_fragment() {
    let cb = parse_callback("http://localhost/auth/callback?access_token=t0k").unwrap();
    assert_eq!(cb.access_token, "t0k");
    assert_eq!(cb.state, None);
  }

  #[test]
  fn provider_error_is_reported() {
    let err = parse_callback("http://localhost/cb#error=access_denied").unwrap_err();
    assert!(matches!(err, AuthError::Provider(ref e) if e == "access_denied"));
    assert_eq!(err.to_string(), "authentication failed: access_denied");
  }

  #[test]
  fn missing_token_is_an_error() {
    assert!(matches!(
      parse_callback("http://localhost/cb#state=abc"),
      Err(AuthError::MissingToken)
    ));
  }

  #[test]
  fn bad_state_is_ignored() {
    let cb = parse_callback("http://localhost/cb#access_token=t&state=%%%").unwrap();
    assert_eq!(cb.state, None);
  }

  #[test]
  fn numeric_faculty_id_is_accepted() {
    let redirect = format!(
      "http://localhost/cb#access_token=t&state={}",
      state(r#"{"facultyId":7}"#)
    );
    assert_eq!(parse_callback(&redirect).unwrap().edit_target(), Some(7));
  }

  #[test]
  fn not_a_url() {
    assert!(matches!(
      parse_callback("access_token=t"),
      Err(AuthError::InvalidCallback(_))
    ));
  }
}
