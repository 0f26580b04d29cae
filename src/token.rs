use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::time::SystemTime;

/// Role carried in the `role` claim of a session token.
///
/// Anything outside the recognized set degrades to `Attendee`; an absent or
/// corrupt claim never elevates privilege.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Attendee,
    Manager,
    Core,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attendee => "attendee",
            Self::Manager => "manager",
            Self::Core => "core",
        }
    }

    fn from_claim(raw: &str) -> Option<Self> {
        match raw {
            "attendee" => Some(Self::Attendee),
            "manager" => Some(Self::Manager),
            "core" => Some(Self::Core),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims decoded from the middle segment of a compact token.
///
/// Field extraction is lenient: a claim of the wrong JSON type stays in
/// `extra` instead of failing the decode. The client never verifies the
/// token signature; trust is deferred to the backend that issued it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Claims {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub exp: Option<i64>,
    pub iat: Option<i64>,
    pub extra: Map<String, Value>,
}

impl Claims {
    fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut map) = value else {
            return None;
        };

        Some(Self {
            sub: take_string(&mut map, "sub"),
            email: take_string(&mut map, "email"),
            role: take_string(&mut map, "role"),
            exp: take_integer(&mut map, "exp"),
            iat: take_integer(&mut map, "iat"),
            extra: map,
        })
    }

    /// Recognized role claim, defaulting to the least-privileged role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
            .as_deref()
            .and_then(Role::from_claim)
            .unwrap_or_default()
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    if !map.get(key).is_some_and(Value::is_string) {
        return None;
    }
    match map.remove(key) {
        Some(Value::String(value)) => Some(value),
        _ => None,
    }
}

fn take_integer(map: &mut Map<String, Value>, key: &str) -> Option<i64> {
    let value = map.get(key).and_then(Value::as_i64)?;
    map.remove(key);
    Some(value)
}

/// Decode the claims segment of a compact token without verifying it.
///
/// Returns `None` unless the input has exactly three dot-separated segments
/// and the middle one is base64url-encoded JSON object. Malformed input is a
/// recoverable "no claims" outcome, never an error.
#[must_use]
pub fn decode(token: &str) -> Option<Claims> {
    let mut parts = token.split('.');
    let _header = parts.next()?;
    let payload = parts.next()?;
    let _signature = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let bytes = Base64UrlUnpadded::decode_vec(payload).ok()?;
    let value: Value = serde_json::from_slice(&bytes).ok()?;

    Claims::from_value(value)
}

/// Role carried by the token, `Attendee` when absent or unrecognized.
#[must_use]
pub fn role_of(token: &str) -> Role {
    decode(token).map_or(Role::Attendee, |claims| claims.role())
}

/// Whether the token is expired against the current wall clock.
#[must_use]
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, now_unix_millis())
}

/// Whether the token is expired at `now_millis`.
///
/// Fail-closed: an undecodable token or a missing `exp` claim counts as
/// expired, not as "never expires".
#[must_use]
pub fn is_expired_at(token: &str, now_millis: i64) -> bool {
    decode(token)
        .and_then(|claims| claims.exp)
        .map_or(true, |exp| now_millis >= exp.saturating_mul(1000))
}

pub(crate) fn now_unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
