//! Environment loading helpers

use std::path::PathBuf;

/// Load variables from a `.env` file in the working directory or its parents
///
/// Variables already present in the process environment win. Returns the
/// path that was loaded, if any; a missing file is not an error.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            tracing::warn!("Failed to load .env file: {}", e);
            None
        }
    }
}
