use crate::cli::globals::GlobalArgs;
use crate::session::{FileStore, SessionStore};
use anyhow::Result;

/// Handle the logout action
pub fn handle(globals: &GlobalArgs) -> Result<()> {
    FileStore::new(&globals.session_file).clear()?;
    println!("Signed out.");

    Ok(())
}
