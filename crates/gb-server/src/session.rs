//! Signed cookie sessions.
//!
//! The whole session lives in one cookie:
//!
//! ```text
//! session=<base64url(json)>.<base64url(hmac-sha256(payload))>
//! ```
//!
//! A cookie that fails to decode or verify is treated as absent, so a
//! tampered cookie silently yields a fresh session. [`Session`] is an axum
//! extractor; returning it from a handler as a response part writes the
//! cookie back when, and only when, the data changed.

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponseParts, ResponseParts};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use rand::RngExt;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Cookie lifetime (30 days).
const MAX_AGE_SECS: u64 = 60 * 60 * 24 * 30;

/// Cookies longer than this are ignored without decoding.
const MAX_COOKIE_LEN: usize = 4096;

/// Data stored in the session cookie.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SessionData {
    /// Set after a successful login.
    #[serde(default)]
    pub(crate) authenticated: bool,
    /// One-time messages for the next page.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) flashes: Vec<String>,
    /// CSRF token for form posts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) csrf: Option<String>,
}

/// HMAC key for session cookies.
#[derive(Clone)]
pub(crate) struct SessionKey(Vec<u8>);

impl SessionKey {
    /// Key from a configured secret.
    pub(crate) fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    /// Random key for this process only.
    pub(crate) fn random() -> Self {
        let key: [u8; 32] = rand::rng().random();
        Self(key.to_vec())
    }

    fn mac(&self) -> Option<HmacSha256> {
        <HmacSha256 as KeyInit>::new_from_slice(&self.0).ok()
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey(..)")
    }
}

/// Cookie attributes and signing key.
#[derive(Clone, Debug)]
pub(crate) struct CookieSettings {
    /// Signing key.
    pub(crate) key: SessionKey,
    /// Cookie name.
    pub(crate) name: String,
    /// Add the `Secure` attribute.
    pub(crate) secure: bool,
}

impl CookieSettings {
    /// `Set-Cookie` value carrying `value`.
    fn set_cookie(&self, value: &str) -> String {
        let mut cookie = format!(
            "{}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={MAX_AGE_SECS}",
            self.name
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Encode and sign session data.
pub(crate) fn encode(data: &SessionData, key: &SessionKey) -> Option<String> {
    let json = serde_json::to_vec(data).ok()?;
    let payload = URL_SAFE_NO_PAD.encode(json);

    let mut mac = key.mac()?;
    mac.update(payload.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Some(format!("{payload}.{signature}"))
}

/// Verify and decode a cookie value.
pub(crate) fn decode(value: &str, key: &SessionKey) -> Option<SessionData> {
    if value.len() > MAX_COOKIE_LEN {
        return None;
    }
    let (payload, signature) = value.split_once('.')?;

    let mut mac = key.mac()?;
    mac.update(payload.as_bytes());
    let expected = URL_SAFE_NO_PAD.decode(signature).ok()?;
    mac.verify_slice(&expected).ok()?;

    let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&json).ok()
}

/// Find a cookie by name in the request headers.
fn find_cookie<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Request session.
#[derive(Debug)]
pub(crate) struct Session {
    data: SessionData,
    loaded: SessionData,
    settings: Arc<CookieSettings>,
}

impl Session {
    fn new(data: SessionData, settings: Arc<CookieSettings>) -> Self {
        Self {
            loaded: data.clone(),
            data,
            settings,
        }
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.data.authenticated
    }

    pub(crate) fn set_authenticated(&mut self, authenticated: bool) {
        self.data.authenticated = authenticated;
    }

    pub(crate) fn add_flash(&mut self, message: impl Into<String>) {
        self.data.flashes.push(message.into());
    }

    /// Remove and return all flash messages.
    pub(crate) fn take_flashes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.data.flashes)
    }

    /// Current CSRF token, created on first use.
    pub(crate) fn csrf_token(&mut self) -> String {
        self.data
            .csrf
            .get_or_insert_with(|| uuid::Uuid::new_v4().simple().to_string())
            .clone()
    }

    /// True if `token` matches the stored CSRF token.
    pub(crate) fn verify_csrf(&self, token: &str) -> bool {
        self.data
            .csrf
            .as_deref()
            .is_some_and(|expected| {
                !token.is_empty() && bool::from(expected.as_bytes().ct_eq(token.as_bytes()))
            })
    }

    /// Drop the CSRF token so the next form gets a fresh one.
    pub(crate) fn rotate_csrf(&mut self) {
        self.data.csrf = None;
    }

    fn is_modified(&self) -> bool {
        self.data != self.loaded
    }
}

impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let settings = Arc::clone(&state.cookies);
        let data = find_cookie(parts, &settings.name)
            .and_then(|value| {
                let data = decode(value, &settings.key);
                if data.is_none() {
                    tracing::debug!("Discarding invalid session cookie");
                }
                data
            })
            .unwrap_or_default();

        Ok(Self::new(data, settings))
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if !self.is_modified() {
            return Ok(res);
        }

        let Some(value) = encode(&self.data, &self.settings.key) else {
            tracing::error!("Failed to encode session");
            return Ok(res);
        };

        match HeaderValue::from_str(&self.settings.set_cookie(&value)) {
            Ok(cookie) => {
                res.headers_mut().append(header::SET_COOKIE, cookie);
            }
            Err(e) => tracing::error!(error = %e, "Invalid session cookie header"),
        }

        Ok(res)
    }
}
