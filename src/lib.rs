//
//  bitbucket-cloud-cli
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Cloud CLI Library
//!
//! The core of the `bb` command-line tool for the Bitbucket Cloud REST API
//! (`https://api.bitbucket.org/2.0`).
//!
//! ## Overview
//!
//! At the centre is a small HTTP client that authenticates every request
//! from a saved profile, turns HTTP failures into typed errors, and walks
//! Bitbucket's `next`-linked listings. The command handlers in [`cli`] are
//! thin consumers of it.
//!
//! ## Features
//!
//! - **Profiles**: Named credentials in a JSON config file, Basic or Bearer auth
//! - **Listings**: Repositories, pull requests, pipelines, and issues, one page or all
//! - **Mutations**: Create pull requests and issues, trigger pipelines
//! - **Raw API access**: `bb api` for any endpoint
//! - **Wikis**: Read and write wiki pages through git
//! - **Scriptable**: `--json` on every command
//!
//! ## Module Structure
//!
//! - [`cli`]: Command-line interface definitions using clap
//! - [`api`]: The Bitbucket Cloud HTTP client and its error taxonomy
//! - [`auth`]: Credential selection and token input
//! - [`config`]: Profile storage
//! - [`context`]: Workspace and repository detection from git remotes
//! - [`output`]: Output formatting (Table, JSON, Markdown)
//! - [`wiki`]: The git-backed wiki channel
//! - [`version`]: Build metadata
//! - [`util`]: Utility functions
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bitbucket_cloud_cli::api::ApiClient;
//! use bitbucket_cloud_cli::Config;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let (_, profile) = config.active_profile(None)?;
//!
//! let client = ApiClient::from_config(profile.client_config())?;
//! let repos = client.get_all_values("/repositories/acme", &[]).await?;
//! println!("{} repositories", repos.len());
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
///
/// Contains all CLI commands, arguments, and subcommands defined using the clap derive API.
/// Each command module handles parsing and execution of its respective functionality.
pub mod cli;

/// The Bitbucket Cloud API client.
///
/// Request construction, authentication, error classification, and
/// pagination over `next` links.
pub mod api;

/// Authentication credentials.
///
/// Chooses Basic or Bearer auth from a profile and reads tokens from flags,
/// stdin, the environment, or a hidden prompt.
pub mod auth;

/// Configuration file management.
///
/// Profiles are stored as JSON in `$BB_CONFIG_PATH`, or
/// `$XDG_CONFIG_HOME/bb/config.json`, or `~/.config/bb/config.json`.
pub mod config;

/// Git repository context detection.
///
/// Resolves the workspace and repository slug from flags, falling back to
/// the `origin` remote of the current git repository.
pub mod context;

/// Output formatting for different modes.
///
/// Provides formatters for:
/// - Table format: Human-readable tables for interactive use
/// - JSON format: Structured output for scripting and automation
/// - Markdown format: Terminal rendering of wiki pages
pub mod output;

/// Repository wikis over git.
pub mod wiki;

/// Build metadata: version, commit, and build date.
pub mod version;

/// Utility functions and helpers.
pub mod util;

/// Re-export of the main CLI struct for convenient access.
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use bitbucket_cloud_cli::Cli;
///
/// let cli = Cli::parse();
/// // Handle cli.command...
/// ```
pub use cli::Cli;

/// Re-export of the configuration struct.
pub use config::Config;

/// Re-export of the repository context struct.
pub use context::RepoContext;

use api::{ClientError, ErrorKind};
use cli::TimedOut;

/// Application name constant.
///
/// The name of the CLI binary, used for display purposes and configuration paths.
pub const APP_NAME: &str = "bb";

/// Application version constant.
///
/// The current version of the CLI, derived from Cargo.toml at compile time.
///
/// # Example
///
/// ```rust
/// use bitbucket_cloud_cli::VERSION;
///
/// println!("bb version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// Standardized exit codes, allowing scripts to programmatically detect the
/// outcome of CLI operations.
///
/// # Exit Code Ranges
///
/// - `0`: Success
/// - `1-3`: General errors and usage issues
/// - `4-7`: Authentication-related issues
/// - `8-15`: Resource-related issues
/// - `16-31`: Operation-related issues
/// - `32+`: External service issues
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error. Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments.
    ///
    /// Reported by clap itself when parsing fails.
    pub const USAGE: i32 = 2;

    /// The API rejected the credentials (HTTP 401 or 403).
    ///
    /// Run `bb auth login` to store a valid token.
    pub const AUTH_ERROR: i32 = 4;

    /// The requested resource does not exist (HTTP 404).
    pub const NOT_FOUND: i32 = 8;

    /// The operation was cut short, by `--timeout` or a transport timeout.
    pub const CANCELLED: i32 = 16;

    /// API rate limit exceeded (HTTP 429).
    pub const RATE_LIMIT: i32 = 32;
}

/// Picks the exit code for a failed command from its error chain.
///
/// The first [`ClientError`] or [`TimedOut`] found in the chain decides;
/// anything else is [`exit_codes::ERROR`].
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if cause.downcast_ref::<TimedOut>().is_some() {
            return exit_codes::CANCELLED;
        }
        if let Some(client_err) = cause.downcast_ref::<ClientError>() {
            return client_exit_code(client_err);
        }
    }
    exit_codes::ERROR
}

fn client_exit_code(err: &ClientError) -> i32 {
    match (err.kind(), err.as_api_error()) {
        (ErrorKind::Api, Some(api)) if api.is_unauthorized() || api.is_forbidden() => {
            exit_codes::AUTH_ERROR
        }
        (ErrorKind::Api, Some(api)) if api.is_not_found() => exit_codes::NOT_FOUND,
        (ErrorKind::Api, Some(api)) if api.is_rate_limited() => exit_codes::RATE_LIMIT,
        (ErrorKind::Transport, _) if err.is_timeout() => exit_codes::CANCELLED,
        _ => exit_codes::ERROR,
    }
}
