//! Unified path management for ChatBI client files.
//!
//! All client-local files live under `~/.config/chatbi/`:
//!
//! ```text
//! ~/.config/chatbi/
//! ├── secret.json        # backend endpoint and credential
//! └── client_state.toml  # remembered session id
//! ```

use chatbi_core::{ChatBiError, Result};
use std::path::PathBuf;

/// Unified path management for the ChatBI client.
pub struct ChatBiPaths;

impl ChatBiPaths {
    /// Returns the client configuration directory (`~/.config/chatbi/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ChatBiError::io("Could not determine home directory"))?;
        Ok(home.join(".config").join("chatbi"))
    }

    /// Returns the path to the backend secret/endpoint file.
    pub fn secret_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    /// Returns the path to the client state file.
    pub fn state_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("client_state.toml"))
    }
}
