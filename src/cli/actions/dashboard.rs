use crate::cli::globals::GlobalArgs;
use crate::guard::{GuardState, SessionGuard};
use crate::session::FileStore;
use crate::token::Role;
use anyhow::{bail, Result};

const fn role_badge(role: Role) -> (&'static str, &'static str) {
    match role {
        Role::Core => (
            "CORE_MEMBER",
            "Full system access: manage events, users, and platform settings.",
        ),
        Role::Manager => (
            "MANAGER",
            "Event management access: create and manage events.",
        ),
        Role::Attendee => ("ATTENDEE", "Browse and register for events."),
    }
}

/// Handle the dashboard action
pub fn handle(globals: &GlobalArgs) -> Result<()> {
    let store = FileStore::new(&globals.session_file);
    let mut guard = SessionGuard::new();

    match guard.evaluate(&store) {
        GuardState::Authorized { role, claims } => {
            let (label, description) = role_badge(*role);

            println!("[{label}]");
            println!("{description}");
            if let Some(email) = &claims.email {
                println!("Logged in as {email}");
            }

            Ok(())
        }

        GuardState::Checking | GuardState::Denied => {
            eprintln!("Session missing or expired. Please log in again.");
            bail!("not authenticated")
        }
    }
}
