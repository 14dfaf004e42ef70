//
//  bitbucket-cloud-cli
//  config/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration File I/O Module
//!
//! This module locates the profile file and performs the raw reads and
//! writes. It knows nothing about the JSON layout; that lives in
//! [`Config`](super::Config).
//!
//! ## Location
//!
//! The file is found in this order:
//!
//! 1. `$BB_CONFIG_PATH`, used as-is
//! 2. `$XDG_CONFIG_HOME/bb/config.json`
//! 3. `~/.config/bb/config.json`
//!
//! When none of those exist and `BB_CONFIG_PATH` is unset, the platform
//! configuration directory (`~/Library/Application Support/bb/config.json`
//! on macOS) is read as a legacy location. Writes always go to the
//! primary path.
//!
//! ## Permissions
//!
//! The file holds API tokens. On Unix it is written with mode `0600` and
//! its directory is created with mode `0700`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use tracing::debug;

/// Environment variable that pins the configuration file location.
pub const CONFIG_PATH_ENV: &str = "BB_CONFIG_PATH";

const CONFIG_DIR_NAME: &str = "bb";
const CONFIG_FILE_NAME: &str = "config.json";

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Returns the explicitly configured path, if `BB_CONFIG_PATH` is set.
pub fn explicit_config_path() -> Option<PathBuf> {
    env_path(CONFIG_PATH_ENV)
}

/// Resolves the primary path from its inputs.
///
/// Kept free of environment access so the precedence can be tested.
pub fn resolve_config_path(
    explicit: Option<PathBuf>,
    xdg_config_home: Option<PathBuf>,
    home: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    let base = match xdg_config_home {
        Some(base) => base,
        None => home
            .context("get user home dir: no home directory found")?
            .join(".config"),
    };

    Ok(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Returns the primary configuration file path.
///
/// # Errors
///
/// Fails only when neither `BB_CONFIG_PATH` nor `XDG_CONFIG_HOME` is set
/// and the home directory cannot be determined.
pub fn default_config_path() -> Result<PathBuf> {
    let dirs = BaseDirs::new();
    resolve_config_path(
        explicit_config_path(),
        env_path("XDG_CONFIG_HOME"),
        dirs.as_ref().map(|d| d.home_dir()),
    )
}

/// Returns the legacy path to fall back to, when one applies.
///
/// There is none when `BB_CONFIG_PATH` is set, when the platform has no
/// configuration directory, or when it coincides with the primary path.
pub fn legacy_config_path(primary: &Path) -> Option<PathBuf> {
    if explicit_config_path().is_some() {
        return None;
    }

    let dirs = BaseDirs::new()?;
    let legacy = dirs
        .config_dir()
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME);

    (legacy != primary).then_some(legacy)
}

/// Reads a configuration file.
///
/// A missing file is not an error and yields `Ok(None)`; anything else that
/// goes wrong while reading is.
///
/// # Example
///
/// ```rust,no_run
/// use std::path::Path;
/// use bitbucket_cloud_cli::config::read_config_file;
///
/// match read_config_file(Path::new("/tmp/bb/config.json"))? {
///     Some(raw) => println!("{} bytes of config", raw.len()),
///     None => println!("no config yet"),
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn read_config_file(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(raw) => {
            debug!(path = %path.display(), "read config");
            Ok(Some(raw))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).context("read config"),
    }
}

/// Writes a configuration file with owner-only permissions.
///
/// Parent directories are created first. An existing file is overwritten
/// and has its mode tightened as well.
pub fn write_config_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_private_dir(parent).context("create config directory")?;
    }

    fs::write(path, content).context("write config")?;
    restrict_permissions(path).context("chmod config")?;
    debug!(path = %path.display(), "wrote config");
    Ok(())
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
