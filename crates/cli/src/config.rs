//! TOML profile supplying values for omitted command-line arguments
//!
//! Profiles are loaded from an explicit `--config` path only; there is no
//! dotfile discovery, because a dotfile living inside the local root would
//! be mirrored away by the engine itself.

use std::path::{Path, PathBuf};

use color_eyre::Result;
use color_eyre::eyre::WrapErr as _;

/// Mirror profile; every field is optional and flags win over it
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct Profile {
    /// FTP host
    pub host: Option<String>,
    /// FTP port
    pub port: Option<u16>,
    /// FTP username
    pub user: Option<String>,
    /// Remote directory to mirror from
    pub remote: Option<String>,
    /// Local directory to mirror into
    pub local: Option<PathBuf>,
    /// Seconds between watch passes
    pub interval: Option<u64>,
}

impl Profile {
    /// Load a profile from a TOML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("cannot read profile {}", path.display()))?;
        let profile = toml::from_str(&content)
            .wrap_err_with(|| format!("cannot parse profile {}", path.display()))?;
        Ok(profile)
    }
}
