//! On-disk configuration of the `neato` CLI.
//!
//! The file is TOML and holds the last used email and the session
//! credentials written by `neato login`:
//!
//! ```toml
//! email = "user@example.com"
//!
//! [session]
//! endpoint = "https://beehive.neatocloud.com"
//!
//! [session.header]
//! Authorization = ["Token token=..."]
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use neato_core::SessionCredentials;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Contents of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Email of the last login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Saved account session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionCredentials>,
}

impl CliConfig {
    /// `<config dir>/neato/config.toml`, if the platform has a config dir.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("neato").join("config.toml"))
    }

    /// Read the config at `path`. A missing file is an empty config.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read '{}'", path.display()))
            }
        };
        toml::from_str(&text).with_context(|| format!("failed to parse '{}'", path.display()))
    }

    /// Write the config to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create '{}'", parent.display()))?;
        }
        let text = toml::to_string_pretty(self).context("failed to serialize config")?;
        std::fs::write(path, text)
            .with_context(|| format!("failed to write to file '{}'", path.display()))?;
        info!(path = %path.display(), "saved config");
        Ok(())
    }
}
