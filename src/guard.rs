//! Session guard for protected views.
//!
//! Evaluated once per view load: there is no re-check timer, so a session can
//! go logically stale mid-visit and only be caught at the next load.

use crate::session::{SessionStore, AUTH_TOKEN_KEY};
use crate::token::{self, Claims, Role};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum GuardState {
    Checking,
    Denied,
    Authorized { role: Role, claims: Claims },
}

/// One-shot access decision over the stored session token.
#[derive(Debug, Default)]
pub struct SessionGuard {
    state: GuardState,
}

impl Default for GuardState {
    fn default() -> Self {
        Self::Checking
    }
}

impl SessionGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &GuardState {
        &self.state
    }

    /// Evaluate the stored token against the current wall clock.
    pub fn evaluate(&mut self, store: &dyn SessionStore) -> &GuardState {
        self.evaluate_at(store, token::now_unix_millis())
    }

    /// Evaluate against an explicit clock.
    ///
    /// Terminal states are reached exactly once; later calls return the
    /// first decision without re-reading the store. A missing or expired
    /// token denies access and clears the stored session.
    pub fn evaluate_at(&mut self, store: &dyn SessionStore, now_millis: i64) -> &GuardState {
        if !matches!(self.state, GuardState::Checking) {
            return &self.state;
        }

        let claims = store.get(AUTH_TOKEN_KEY).and_then(|stored| {
            if token::is_expired_at(&stored, now_millis) {
                return None;
            }
            token::decode(&stored)
        });

        self.state = match claims {
            Some(claims) => GuardState::Authorized {
                role: claims.role(),
                claims,
            },
            None => {
                if let Err(err) = store.clear() {
                    debug!("failed to clear stale session: {err}");
                }
                GuardState::Denied
            }
        };

        &self.state
    }
}
