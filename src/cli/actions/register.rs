use crate::api::{AuthClient, AuthOutcome, Rejection};
use crate::classify::DEFAULT_RETRY_AFTER_SECONDS;
use crate::cli::globals::GlobalArgs;
use crate::form::{RegisterForm, SubmitGate};
use crate::session::{FileStore, SessionStore, AUTH_TOKEN_KEY};
use crate::APP_USER_AGENT;
use anyhow::{bail, Result};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle the register action
pub async fn handle(form: RegisterForm, globals: &GlobalArgs) -> Result<()> {
    let errors = form.validate_all();
    if !errors.is_empty() {
        for (field, message) in &errors {
            eprintln!("{field}: {message}");
        }
        bail!("registration form validation failed");
    }

    let request = form.to_request()?;

    let mut gate = SubmitGate::new();
    if let Err(blocked) = gate.begin() {
        eprintln!("{blocked}");
        return Ok(());
    }

    let client = AuthClient::new(&globals.api_url, APP_USER_AGENT)?;
    let cancel = CancellationToken::new();

    match client.register(&request, &cancel).await? {
        AuthOutcome::Success { message, token } => {
            gate.succeed();

            if let Some(token) = token {
                let store = FileStore::new(&globals.session_file);
                store.set(AUTH_TOKEN_KEY, &token)?;
                debug!("session token stored");
            }

            if !message.is_empty() {
                debug!("backend message: {message}");
            }
            println!("Registration successful! You can now log in.");

            Ok(())
        }

        AuthOutcome::Rejected(rejection) => {
            gate.fail(&rejection);
            report(&rejection);
            bail!("registration failed")
        }

        AuthOutcome::Cancelled => {
            gate.reset();
            Ok(())
        }
    }
}

fn report(rejection: &Rejection) {
    eprintln!("{}", rejection.message);

    if rejection.is_rate_limited {
        let seconds = rejection
            .retry_after_seconds
            .unwrap_or(DEFAULT_RETRY_AFTER_SECONDS);
        eprintln!("Please wait {seconds} seconds before trying again.");
    } else if let Some(suggestion) = &rejection.suggestion {
        eprintln!("{suggestion}");
    }

    for (field, message) in &rejection.field_errors {
        eprintln!("{field}: {message}");
    }
}
