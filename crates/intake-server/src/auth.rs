//! Staff login and cookie sessions.
//!
//! `POST /api/auth` checks the configured username and argon2 hash and sets a
//! `token` cookie. The token is `<base64url(username)>.<expires>.<mac>`, where
//! `mac` is a hex HMAC-SHA256 over the first two parts keyed by the session
//! secret. Nothing is kept server-side.

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  Json,
  extract::{Request, State, rejection::JsonRejection},
  http::{HeaderMap, HeaderValue, Method, header},
  middleware::Next,
  response::{IntoResponse, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;

use crate::{ServerConfig, error::Error};

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Credentials and session parameters for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:       String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash:  String,
  pub session_secret: Vec<u8>,
  pub session_ttl:    Duration,
  /// Add `Secure` to the cookie (only sent over HTTPS).
  pub cookie_secure:  bool,
}

impl AuthConfig {
  pub fn from_config(cfg: &ServerConfig) -> Self {
    Self {
      username:       cfg.auth_username.clone(),
      password_hash:  cfg.auth_password_hash.clone(),
      session_secret: cfg.session_secret.as_bytes().to_vec(),
      session_ttl:    Duration::seconds(i64::try_from(cfg.session_ttl_secs).unwrap_or(i64::MAX)),
      cookie_secure:  cfg.cookie_secure,
    }
  }

  /// Check a username/password pair against the configured credentials.
  pub fn verify_password(&self, username: &str, password: &str) -> Result<(), Error> {
    if username != self.username {
      return Err(Error::InvalidCredentials);
    }
    let parsed_hash = PasswordHash::new(&self.password_hash)
      .map_err(|e| Error::Config(format!("auth_password_hash is not a PHC string: {e}")))?;
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed_hash)
      .map_err(|_| Error::InvalidCredentials)
  }

  fn mac(&self) -> Result<HmacSha256, Error> {
    HmacSha256::new_from_slice(&self.session_secret).map_err(|e| Error::Crypto(e.to_string()))
  }

  /// Issue a token for `username` that expires `session_ttl` after `now`.
  pub fn issue_token(&self, username: &str, now: DateTime<Utc>) -> Result<String, Error> {
    let expires = (now + self.session_ttl).timestamp();
    let payload = format!("{}.{expires}", B64.encode(username));
    let mut mac = self.mac()?;
    mac.update(payload.as_bytes());
    Ok(format!("{payload}.{}", hex::encode(mac.finalize().into_bytes())))
  }

  /// Verify a token's signature and expiry; returns the username it names.
  pub fn verify_token(&self, token: &str, now: DateTime<Utc>) -> Result<String, Error> {
    let (payload, signature) = token.rsplit_once('.').ok_or(Error::Unauthorized)?;
    let signature = hex::decode(signature).map_err(|_| Error::Unauthorized)?;

    let mut mac = self.mac()?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature).map_err(|_| Error::Unauthorized)?;

    let (user_b64, expires) = payload.split_once('.').ok_or(Error::Unauthorized)?;
    let expires: i64 = expires.parse().map_err(|_| Error::Unauthorized)?;
    if now.timestamp() >= expires {
      return Err(Error::Unauthorized);
    }

    let user = B64.decode(user_b64).map_err(|_| Error::Unauthorized)?;
    String::from_utf8(user).map_err(|_| Error::Unauthorized)
  }

  /// `Set-Cookie` value carrying `token`.
  pub fn session_cookie(&self, token: &str) -> String {
    let secure = if self.cookie_secure { "; Secure" } else { "" };
    format!(
      "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}{secure}",
      self.session_ttl.num_seconds()
    )
  }

  /// `Set-Cookie` value that removes the session cookie.
  pub fn clear_cookie(&self) -> String {
    let secure = if self.cookie_secure { "; Secure" } else { "" };
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0{secure}")
  }
}

/// Find the value of cookie `name` in the request's `Cookie` header(s).
pub fn extract_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|raw| raw.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(key, _)| key.trim() == name)
    .map(|(_, value)| value.trim().to_owned())
    .filter(|value| !value.is_empty())
}

/// Verify the session cookie directly from headers.
pub fn verify_session(headers: &HeaderMap, config: &AuthConfig) -> Result<String, Error> {
  let token = extract_cookie_value(headers, SESSION_COOKIE).ok_or(Error::Unauthorized)?;
  config.verify_token(&token, Utc::now())
}

/// Routes reachable without a session. Paths are relative to the `/api`
/// mount point.
pub fn is_public(method: &Method, path: &str) -> bool {
  matches!(
    (method, path),
    (&Method::POST, "/leads") | (_, "/auth") | (_, "/auth/logout")
  )
}

/// Middleware gating everything under `/api` except [`is_public`] routes.
pub async fn require_session(
  State(auth): State<Arc<AuthConfig>>,
  req: Request,
  next: Next,
) -> Response {
  if is_public(req.method(), req.uri().path()) {
    return next.run(req).await;
  }
  match verify_session(req.headers(), &auth) {
    Ok(_) => next.run(req).await,
    Err(e) => {
      tracing::debug!(path = %req.uri().path(), "rejected request without a valid session");
      e.into_response()
    }
  }
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub username: String,
  pub password: String,
}

/// `POST /auth` — body: `{"username":"...","password":"..."}`.
pub async fn login(
  State(auth): State<Arc<AuthConfig>>,
  body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<Response, Error> {
  let Json(body) = body.map_err(|e| Error::BadRequest(e.body_text()))?;

  if let Err(e) = auth.verify_password(&body.username, &body.password) {
    tracing::warn!(username = %body.username, "login rejected");
    return Err(e);
  }

  let token  = auth.issue_token(&body.username, Utc::now())?;
  let cookie = HeaderValue::from_str(&auth.session_cookie(&token))
    .map_err(|e| Error::Crypto(e.to_string()))?;

  tracing::info!(username = %body.username, "staff login");
  let mut res = Json(json!({ "success": true, "message": "Login successful" })).into_response();
  res.headers_mut().insert(header::SET_COOKIE, cookie);
  Ok(res)
}

/// `POST /auth/logout` — always succeeds.
pub async fn logout(State(auth): State<Arc<AuthConfig>>) -> Result<Response, Error> {
  let cookie = HeaderValue::from_str(&auth.clear_cookie())
    .map_err(|e| Error::Crypto(e.to_string()))?;
  let mut res = Json(json!({ "success": true })).into_response();
  res.headers_mut().insert(header::SET_COOKIE, cookie);
  Ok(res)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn config() -> AuthConfig {
    AuthConfig {
      username:       "admin".to_string(),
      password_hash:  String::new(),
      session_secret: b"test-secret-test-secret".to_vec(),
      session_ttl:    Duration::seconds(3600),
      cookie_secure:  false,
    }
  }

  fn at(secs: i64) -> DateTime<Utc> { DateTime::from_timestamp(secs, 0).unwrap() }

  #[test]
  fn token_roundtrip() {
    let cfg   = config();
    let token = cfg.issue_token("admin", at(1_000)).unwrap();
    assert_eq!(cfg.verify_token(&token, at(1_001)).unwrap(), "admin");
  }

  #[test]
  fn usernames_with_dots_survive() {
    let cfg   = config();
    let token = cfg.issue_token("first.last", at(0)).unwrap();
    assert_eq!(cfg.verify_token(&token, at(10)).unwrap(), "first.last");
  }

  #[test]
  fn expired_token_is_rejected() {
    let cfg   = config();
    let token = cfg.issue_token("admin", at(1_000)).unwrap();
    assert!(cfg.verify_token(&token, at(1_000 + 3_599)).is_ok());
    assert!(matches!(cfg.verify_token(&token, at(1_000 + 3_600)), Err(Error::Unauthorized)));
  }

  #[test]
  fn tampered_token_is_rejected() {
    let cfg   = config();
    let token = cfg.issue_token("admin", at(1_000)).unwrap();

    // Push the expiry far out without re-signing.
    let mut parts: Vec<&str> = token.split('.').collect();
    parts[1] = "99999999999";
    let forged = parts.join(".");
    assert!(matches!(cfg.verify_token(&forged, at(1_001)), Err(Error::Unauthorized)));

    for junk in ["", "abc", "a.b.c", "admin-1700000000000-your-secret-key"] {
      assert!(matches!(cfg.verify_token(junk, at(0)), Err(Error::Unauthorized)), "{junk:?}");
    }
  }

  #[test]
  fn token_from_another_secret_is_rejected() {
    let token = config().issue_token("admin", at(0)).unwrap();
    let other = AuthConfig {
      session_secret: b"a-different-secret".to_vec(),
      ..config()
    };
    assert!(matches!(other.verify_token(&token, at(1)), Err(Error::Unauthorized)));
  }

  #[test]
  fn cookie_attributes() {
    let cfg = config();
    let set = cfg.session_cookie("abc");
    assert!(set.starts_with("token=abc;"));
    assert!(set.contains("HttpOnly"));
    assert!(set.contains("SameSite=Strict"));
    assert!(set.contains("Max-Age=3600"));
    assert!(!set.contains("Secure"));

    let secure = AuthConfig {
      cookie_secure: true,
      ..config()
    };
    assert!(secure.session_cookie("abc").ends_with("; Secure"));
    assert!(secure.clear_cookie().contains("Max-Age=0"));
  }

  #[test]
  fn finds_cookie_among_others() {
    let mut headers = HeaderMap::new();
    headers.append(header::COOKIE, HeaderValue::from_static("theme=dark; token=xyz"));
    assert_eq!(extract_cookie_value(&headers, "token").as_deref(), Some("xyz"));
    assert_eq!(extract_cookie_value(&headers, "missing"), None);

    let mut empty = HeaderMap::new();
    empty.append(header::COOKIE, HeaderValue::from_static("token="));
    assert_eq!(extract_cookie_value(&empty, "token"), None);
  }

  #[test]
  fn public_routes() {
    assert!(is_public(&Method::POST, "/leads"));
    assert!(is_public(&Method::POST, "/auth"));
    assert!(is_public(&Method::POST, "/auth/logout"));
    assert!(!is_public(&Method::GET, "/leads"));
    assert!(!is_public(&Method::PATCH, "/leads/123"));
    assert!(!is_public(&Method::GET, "/leads/123"));
  }
}
