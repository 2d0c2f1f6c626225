//! Seeding the user directory.

use quorum_core::ConfigError;
use quorum_storage::InMemoryUserDirectory;

use crate::error::ServerResult;

/// Path of a JSON file listing user accounts and their public keys.
pub const USERS_FILE_VAR: &str = "QUORUM_USERS_FILE";

/// Load the user directory named by `QUORUM_USERS_FILE`.
///
/// Without the variable the directory starts empty and proposal authors
/// stay unresolved.
pub fn load_user_directory() -> ServerResult<InMemoryUserDirectory> {
    load_user_directory_from_lookup(|key| std::env::var(key).ok())
}

pub fn load_user_directory_from_lookup<F>(lookup: F) -> ServerResult<InMemoryUserDirectory>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(path) = lookup(USERS_FILE_VAR).filter(|p| !p.trim().is_empty()) else {
        tracing::warn!("{} not set, proposal authors will not be resolved", USERS_FILE_VAR);
        return Ok(InMemoryUserDirectory::new());
    };

    let invalid = |reason: String| ConfigError::InvalidValue {
        field: USERS_FILE_VAR.to_string(),
        value: path.clone(),
        reason,
    };
    let json = std::fs::read_to_string(&path).map_err(|e| invalid(e.to_string()))?;
    let directory = InMemoryUserDirectory::from_json(&json).map_err(|e| invalid(e.to_string()))?;

    tracing::info!(path = %path, users = directory.len(), "User directory loaded");
    Ok(directory)
}
