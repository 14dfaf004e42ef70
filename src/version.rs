//
//  bitbucket-cloud-cli
//  version.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Build metadata shown by `bb version`.
//!
//! The commit and build date are baked in at compile time from the
//! `BB_BUILD_COMMIT` and `BB_BUILD_DATE` environment variables:
//!
//! ```bash
//! BB_BUILD_COMMIT=$(git rev-parse HEAD) \
//! BB_BUILD_DATE=$(date -u +%Y-%m-%dT%H:%M:%SZ) \
//! cargo build --release
//! ```

/// Value shown for metadata that was not provided at build time.
pub const UNKNOWN: &str = "unknown";

/// The full commit hash, or `unknown`.
pub fn commit() -> &'static str {
    option_env!("BB_BUILD_COMMIT").unwrap_or(UNKNOWN)
}

/// The build timestamp, or `unknown`.
pub fn build_date() -> &'static str {
    option_env!("BB_BUILD_DATE")
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(UNKNOWN)
}

/// Shortens a commit hash to seven characters for display.
pub fn short_commit_of(commit: &str) -> String {
    let commit = commit.trim();
    if commit.is_empty() || commit == UNKNOWN {
        return UNKNOWN.to_string();
    }
    commit.chars().take(7).collect()
}

/// Appends `+<short commit>` build metadata when a commit is known and the
/// version does not already carry metadata.
pub fn display_version_of(version: &str, commit: &str) -> String {
    let version = version.trim();
    let version = if version.is_empty() {
        crate::VERSION
    } else {
        version
    };

    let short = short_commit_of(commit);
    if short == UNKNOWN || version.contains('+') {
        version.to_string()
    } else {
        format!("{}+{}", version, short)
    }
}

/// Short hash of the commit this binary was built from.
pub fn short_commit() -> String {
    short_commit_of(commit())
}

/// The crate version with build metadata.
pub fn display_version() -> String {
    display_version_of(crate::VERSION, commit())
}
