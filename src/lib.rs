//! Auth client for the event platform backend.
//!
//! Decodes (never verifies) the session token, classifies failed HTTP
//! responses into displayable state, guards protected views, and drives the
//! login and registration flows over HTTP.

pub mod api;
pub mod classify;
pub mod cli;
pub mod form;
pub mod guard;
pub mod session;
pub mod token;
pub mod validate;

/// User agent sent on every backend request.
pub const APP_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
