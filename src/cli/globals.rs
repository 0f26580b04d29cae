use std::path::PathBuf;

/// Container for global runtime arguments shared by every action.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    /// Base URL of the event platform backend.
    pub api_url: String,
    /// Path of the plain-text session file.
    pub session_file: PathBuf,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String, session_file: PathBuf) -> Self {
        Self {
            api_url,
            session_file,
        }
    }
}
