use crate::api::{AuthClient, AuthOutcome, LoginRequest, Rejection};
use crate::classify::DEFAULT_RETRY_AFTER_SECONDS;
use crate::cli::globals::GlobalArgs;
use crate::form::{self, SubmitGate};
use crate::session::{FileStore, SessionStore, AUTH_TOKEN_KEY, USER_ROLE_KEY};
use crate::token;
use crate::APP_USER_AGENT;
use anyhow::{bail, Result};
use secrecy::{ExposeSecret, SecretString};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle the login action
pub async fn handle(email: String, password: SecretString, globals: &GlobalArgs) -> Result<()> {
    let errors = form::validate_login(&email, password.expose_secret());
    if !errors.is_empty() {
        for (field, message) in &errors {
            eprintln!("{field}: {message}");
        }
        bail!("login form validation failed");
    }

    let mut gate = SubmitGate::new();
    if let Err(blocked) = gate.begin() {
        eprintln!("{blocked}");
        return Ok(());
    }

    let client = AuthClient::new(&globals.api_url, APP_USER_AGENT)?;
    let cancel = CancellationToken::new();

    let request = LoginRequest {
        email: &email,
        password: password.expose_secret(),
    };

    match client.login(&request, &cancel).await? {
        AuthOutcome::Success { message, token } => {
            gate.succeed();

            if let Some(token) = token {
                let role = token::role_of(&token);
                let store = FileStore::new(&globals.session_file);
                store.set(AUTH_TOKEN_KEY, &token)?;
                store.set(USER_ROLE_KEY, role.as_str())?;
                debug!("session stored with role {role}");
            }

            if !message.is_empty() {
                debug!("backend message: {message}");
            }
            println!("Login successful! Redirecting to the dashboard...");

            Ok(())
        }

        AuthOutcome::Rejected(rejection) => {
            gate.fail(&rejection);
            report(&rejection);
            bail!("login failed")
        }

        // A cancelled attempt is a no-op, not a user-visible error.
        AuthOutcome::Cancelled => {
            gate.reset();
            Ok(())
        }
    }
}

fn report(rejection: &Rejection) {
    // Invalid credentials never get field-level detail.
    if rejection.status == Some(401) {
        eprintln!("Invalid email or password.");
        return;
    }

    eprintln!("{}", rejection.message);

    if rejection.is_rate_limited {
        let seconds = rejection
            .retry_after_seconds
            .unwrap_or(DEFAULT_RETRY_AFTER_SECONDS);
        eprintln!("Please wait {seconds} seconds before retrying.");
    } else if let Some(suggestion) = &rejection.suggestion {
        eprintln!("{suggestion}");
    }

    for (field, message) in &rejection.field_errors {
        eprintln!("{field}: {message}");
    }
}
