//! HTTP client for the auth endpoints of the event platform backend.
//!
//! One request per submission, at most one in flight per form: every call
//! takes a cancellation handle, and a cancelled request resolves to a
//! distinguished [`AuthOutcome::Cancelled`] instead of an error. Transport
//! failures resolve to a recoverable rejection with a generic connectivity
//! message; nothing here surfaces as a crash.

use crate::classify::{self, FriendlyMessage};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, Instrument};
use url::Url;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";

pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your internet connection and try again.";
const NETWORK_ERROR_SUGGESTION: &str =
    "If the problem persists, please try again in a few moments.";

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Registrant payload for `POST /api/auth/register`.
///
/// `email_verified` is always sent as false; verification is the backend's
/// business.
#[derive(Serialize, Clone)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub university_name: String,
    pub university_uid: String,
    pub graduation_year: i32,
    pub degree_program: String,
    pub gender: String,
    pub role: String,
    pub hostel: Option<String>,
    pub profile_picture_url: Option<String>,
    pub email_verified: bool,
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("university_name", &self.university_name)
            .field("role", &self.role)
            .field("password", &"***")
            .finish()
    }
}

/// Outcome of one auth exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Success {
        message: String,
        token: Option<String>,
    },
    Rejected(Rejection),
    Cancelled,
}

/// Failed exchange, already classified for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// HTTP status, `None` for transport failures.
    pub status: Option<u16>,
    pub message: String,
    pub suggestion: Option<String>,
    pub retry_after_seconds: Option<u64>,
    pub is_rate_limited: bool,
    pub field_errors: BTreeMap<String, String>,
}

impl Rejection {
    fn from_response(status: u16, body: Option<&Value>) -> Self {
        let classification = classify::classify(status, body);
        let FriendlyMessage {
            message,
            suggestion,
        } = classify::friendly_message(status, body);

        // Field-level detail is only trusted on validation failures.
        let field_errors = if status == 400 {
            body.map(classify::field_errors).unwrap_or_default()
        } else {
            BTreeMap::new()
        };

        Self {
            status: Some(status),
            message,
            suggestion,
            retry_after_seconds: classification.retry_after_seconds,
            is_rate_limited: classification.is_rate_limited,
            field_errors,
        }
    }

    fn transport() -> Self {
        Self {
            status: None,
            message: NETWORK_ERROR_MESSAGE.to_string(),
            suggestion: Some(NETWORK_ERROR_SUGGESTION.to_string()),
            retry_after_seconds: None,
            is_rate_limited: false,
            field_errors: BTreeMap::new(),
        }
    }
}

fn token_from_body(body: &Value) -> Option<String> {
    let data = body.get("data")?;
    data.get("token")
        .and_then(Value::as_str)
        .or_else(|| data.get("access_token").and_then(Value::as_str))
        .map(ToString::to_string)
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    base_url: Url,
}

impl AuthClient {
    /// Build a client for the given backend base URL.
    ///
    /// # Errors
    /// Returns an error if the base URL cannot be parsed or the HTTP client
    /// cannot be constructed.
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).context("invalid API base URL")?;
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// `POST /api/auth/login`.
    ///
    /// # Errors
    /// Returns an error only if the request URL cannot be built; every
    /// network or backend failure resolves to an [`AuthOutcome`].
    pub async fn login(
        &self,
        request: &LoginRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<AuthOutcome> {
        self.post_auth(LOGIN_PATH, request, cancel).await
    }

    /// `POST /api/auth/register`.
    ///
    /// # Errors
    /// Returns an error only if the request URL cannot be built; every
    /// network or backend failure resolves to an [`AuthOutcome`].
    pub async fn register(
        &self,
        request: &RegisterRequest,
        cancel: &CancellationToken,
    ) -> Result<AuthOutcome> {
        self.post_auth(REGISTER_PATH, request, cancel).await
    }

    async fn post_auth<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        cancel: &CancellationToken,
    ) -> Result<AuthOutcome> {
        let url = self.base_url.join(path)?;

        let span = info_span!(
            "auth.request",
            http.method = "POST",
            url = %url
        );
        let send = self.client.post(url.clone()).json(payload).send();

        let response = tokio::select! {
            () = cancel.cancelled() => {
                debug!("request cancelled: {url}");
                return Ok(AuthOutcome::Cancelled);
            }
            result = send.instrument(span) => match result {
                Ok(response) => response,
                Err(err) => {
                    debug!("transport failure for {url}: {err}");
                    return Ok(AuthOutcome::Rejected(Rejection::transport()));
                }
            },
        };

        let status = response.status();
        let body: Option<Value> = response.json().await.ok();

        if status.is_success() {
            let message = body
                .as_ref()
                .and_then(|b| b.get("message"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let token = body.as_ref().and_then(token_from_body);
            return Ok(AuthOutcome::Success { message, token });
        }

        Ok(AuthOutcome::Rejected(Rejection::from_response(
            status.as_u16(),
            body.as_ref(),
        )))
    }
}
