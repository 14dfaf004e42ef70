//
//  bitbucket-cloud-cli
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Saved connection profiles for the Bitbucket CLI. Each profile holds the
//! API root, a token, and an optional username; one of them is current.
//!
//! ## Example Configuration File
//!
//! ```json
//! {
//!   "current": "work",
//!   "profiles": {
//!     "work": {
//!       "base_url": "https://api.bitbucket.org/2.0",
//!       "token": "ATBB...",
//!       "username": "dev@example.com"
//!     }
//!   }
//! }
//! ```
//!
//! See [`file`] for where the file lives and how it is written.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bitbucket_cloud_cli::config::Config;
//!
//! let mut config = Config::load()?;
//! config.set_profile("work", "dev@example.com", "secret", "");
//! config.save()?;
//!
//! let (name, profile) = config.active_profile(None)?;
//! println!("{} -> {}", name, profile.base_url);
//! # Ok::<(), anyhow::Error>(())
//! ```

mod file;

pub use file::*;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::api::{ClientConfig, DEFAULT_BASE_URL};

/// Profile name used when none is given at login.
pub const DEFAULT_PROFILE: &str = "default";

/// Why no profile could be selected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// Nothing was requested and no profile is current.
    #[error("no active profile")]
    NoActiveProfile,

    /// The requested profile does not exist.
    #[error("profile {0:?} not found")]
    NotFound(String),
}

/// Connection settings for one Bitbucket account.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// API root, e.g. `https://api.bitbucket.org/2.0`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub base_url: String,

    /// API token, app password, or access token.
    #[serde(default, deserialize_with = "null_as_default")]
    pub token: String,

    /// Username for Basic auth. Empty selects Bearer auth.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub username: String,
}

impl Profile {
    /// True when a non-blank token is stored.
    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// Builds client settings from this profile.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.base_url)
            .with_token(self.token.clone())
            .with_username(self.username.clone())
    }
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("base_url", &self.base_url)
            .field("token", &if self.token.is_empty() { "" } else { "***" })
            .field("username", &self.username)
            .finish()
    }
}

/// All saved profiles plus the name of the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Name of the profile used when none is requested. May be empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub current: String,

    /// Profiles by name, kept sorted.
    #[serde(default, deserialize_with = "null_as_default")]
    pub profiles: BTreeMap<String, Profile>,
}

/// Reads an explicit `null` as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Config {
    /// Loads the configuration from its default location.
    ///
    /// A missing file yields an empty configuration. The legacy location is
    /// consulted when the primary file is missing.
    pub fn load() -> Result<Self> {
        let path = default_config_path()?;
        if let Some(raw) = read_config_file(&path)? {
            return Self::decode(&raw);
        }

        match legacy_config_path(&path) {
            Some(legacy) => match read_config_file(&legacy).context("read legacy config")? {
                Some(raw) => Self::decode(&raw),
                None => Ok(Self::default()),
            },
            None => Ok(Self::default()),
        }
    }

    /// Loads the configuration from a specific file, with no fallback.
    pub fn load_from(path: &Path) -> Result<Self> {
        match read_config_file(path)? {
            Some(raw) => Self::decode(&raw),
            None => Ok(Self::default()),
        }
    }

    fn decode(raw: &[u8]) -> Result<Self> {
        serde_json::from_slice(raw).context("decode config")
    }

    /// Saves the configuration to its default location.
    pub fn save(&self) -> Result<()> {
        let path = default_config_path()?;
        self.save_to(&path)
    }

    /// Saves the configuration as pretty JSON to a specific file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let payload = serde_json::to_vec_pretty(self).context("encode config")?;
        write_config_file(path, &payload)
    }

    /// Inserts or replaces a profile and makes it current.
    ///
    /// An empty name means [`DEFAULT_PROFILE`]; an empty base URL means the
    /// Bitbucket Cloud API root. The username is trimmed.
    pub fn set_profile(&mut self, name: &str, username: &str, token: &str, base_url: &str) {
        let name = if name.is_empty() { DEFAULT_PROFILE } else { name };
        let base_url = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        self.profiles.insert(
            name.to_string(),
            Profile {
                base_url: base_url.to_string(),
                token: token.to_string(),
                username: username.trim().to_string(),
            },
        );
        self.current = name.to_string();
    }

    /// Deletes a profile.
    ///
    /// A blank name targets the current profile. Returns the targeted name
    /// (empty when there was nothing to target) and whether a profile was
    /// removed. Removing the current profile promotes the alphabetically
    /// first remaining one, or leaves none current.
    pub fn remove_profile(&mut self, name: &str) -> (String, bool) {
        let target = match name.trim() {
            "" => self.current.clone(),
            other => other.to_string(),
        };
        if target.is_empty() || self.profiles.remove(&target).is_none() {
            return (target, false);
        }

        if self.current == target {
            self.current = self.profiles.keys().next().cloned().unwrap_or_default();
        }
        (target, true)
    }

    /// Selects a profile by override name or by the current setting.
    ///
    /// The returned profile has its base URL defaulted when empty.
    ///
    /// # Errors
    ///
    /// [`ProfileError::NoActiveProfile`] when nothing is requested and
    /// nothing is current, [`ProfileError::NotFound`] for an unknown name.
    pub fn active_profile(&self, name: Option<&str>) -> Result<(String, Profile), ProfileError> {
        let name = match name.filter(|n| !n.is_empty()) {
            Some(name) => name,
            None => self.current.as_str(),
        };
        if name.is_empty() {
            return Err(ProfileError::NoActiveProfile);
        }

        let mut profile = self
            .profiles
            .get(name)
            .cloned()
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))?;
        if profile.base_url.is_empty() {
            profile.base_url = DEFAULT_BASE_URL.to_string();
        }
        Ok((name.to_string(), profile))
    }
}
