//! Token storage for the `meater` CLI.
//!
//! Reads/writes ~/.config/meater/auth.json (0600 on Unix).
//! The library itself never persists a session; callers opt in.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Credentials stored locally after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCredentials {
    /// Bearer token for MEATER Cloud
    pub token: String,
    /// API base URL the token was issued for
    pub api_base: String,
    /// Account e-mail (for display)
    #[serde(default)]
    pub email: Option<String>,
    /// User id from the login response (for display)
    #[serde(default)]
    pub user_id: Option<String>,
}

impl AuthCredentials {
    pub fn new(token: String, api_base: String) -> Self {
        Self { token, api_base, email: None, user_id: None }
    }
}

/// Returns the path to the auth credentials file.
pub fn auth_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("meater/auth.json"))
}

/// Load saved credentials.
/// Returns None if nothing is saved or the file is invalid.
pub fn load_auth_from(path: &Path) -> Option<AuthCredentials> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(creds) => Some(creds),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable auth file");
            None
        }
    }
}

/// Save credentials to `path`, creating the parent directory.
/// Sets 0600 permissions on Unix.
pub fn save_auth_to(path: &Path, creds: &AuthCredentials) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    let contents = serde_json::to_string_pretty(creds)
        .map_err(|e| format!("Failed to serialize credentials: {}", e))?;

    std::fs::write(path, &contents)
        .map_err(|e| format!("Failed to write auth file: {}", e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)
            .map_err(|e| format!("Failed to set file permissions: {}", e))?;
    }

    Ok(())
}

/// Delete saved credentials. A missing file is not an error.
pub fn delete_auth_at(path: &Path) -> Result<(), String> {
    if path.exists() {
        std::fs::remove_file(path)
            .map_err(|e| format!("Failed to delete auth file: {}", e))?;
    }
    Ok(())
}
