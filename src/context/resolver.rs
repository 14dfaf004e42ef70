//
//  bitbucket-cloud-cli
//  context/resolver.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Repository Context Resolver
//!
//! Works out the workspace and repository a command targets, from CLI
//! arguments first and the `origin` remote of the current git repository
//! second.
//!
//! ## Supported Remote Formats
//!
//! Only remotes on `bitbucket.org` are recognised:
//!
//! - SSH (scp-style): `git@bitbucket.org:workspace/repo.git`
//! - SSH (URL): `ssh://git@bitbucket.org/workspace/repo.git`
//! - HTTPS: `https://user@bitbucket.org/workspace/repo.git`
//!
//! The `.git` suffix is optional.
//!
//! ## Resolution Priority
//!
//! 1. `--workspace` and `--repo` (which may itself be `WORKSPACE/REPO`)
//! 2. The `origin` remote, only for values still missing
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_cloud_cli::context::ContextResolver;
//!
//! let resolver = ContextResolver::new(None, Some("acme/widgets".to_string()))
//!     .with_origin_url(None);
//! let ctx = resolver.resolve_repo()?;
//! assert_eq!(ctx.full_name(), "acme/widgets");
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

use super::{GitContext, RepoContext, RepoTarget};

/// Host whose remotes can be turned into a workspace and repository.
pub const CLOUD_HOST: &str = "bitbucket.org";

/// scp-style SSH remotes: `[user@]host:path`.
///
/// # Capture Groups
/// 1. Host (e.g., "bitbucket.org")
/// 2. Path (e.g., "workspace/repo.git")
static SCP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[^@:/]*@)?([^@:/]+):(.+)$").expect("valid regex"));

/// Parses a git remote URL into `(workspace, repo)`.
///
/// Returns `None` for anything that is not a two-segment path on
/// `bitbucket.org`.
pub fn parse_bitbucket_remote(remote: &str) -> Option<(String, String)> {
    let trimmed = remote.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.contains("://") {
        let url = Url::parse(trimmed).ok()?;
        if !url.host_str()?.eq_ignore_ascii_case(CLOUD_HOST) {
            return None;
        }
        return parse_bitbucket_path(url.path());
    }

    let caps = SCP_PATTERN.captures(trimmed)?;
    if !caps[1].trim().eq_ignore_ascii_case(CLOUD_HOST) {
        return None;
    }
    parse_bitbucket_path(&caps[2])
}

/// Splits `workspace/repo[.git]` with optional surrounding slashes.
fn parse_bitbucket_path(raw: &str) -> Option<(String, String)> {
    let path = raw.trim();
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);

    let (workspace, repo) = path.split_once('/')?;
    if repo.contains('/') {
        return None;
    }

    let workspace = workspace.trim();
    let repo = repo.strip_suffix(".git").unwrap_or(repo).trim();
    if workspace.is_empty() || repo.is_empty() {
        return None;
    }
    Some((workspace.to_string(), repo.to_string()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolves the target workspace and repository for a command.
#[derive(Debug, Clone, Default)]
pub struct ContextResolver {
    workspace: Option<String>,
    repo: Option<String>,
    /// Fixed origin remote; `None` means discover it from the working directory.
    origin_override: Option<Option<String>>,
}

impl ContextResolver {
    /// Creates a resolver from the `--workspace` and `--repo` values.
    pub fn new(workspace: Option<String>, repo: Option<String>) -> Self {
        Self {
            workspace: non_blank(workspace),
            repo: non_blank(repo),
            origin_override: None,
        }
    }

    /// Uses the given origin URL instead of looking at the working directory.
    pub fn with_origin_url(mut self, origin: Option<String>) -> Self {
        self.origin_override = Some(origin);
        self
    }

    /// Resolves the workspace; the repository is filled in when known.
    pub fn resolve_workspace(&self) -> Result<RepoTarget> {
        self.resolve(false)
    }

    /// Resolves both the workspace and the repository.
    pub fn resolve_repo(&self) -> Result<RepoContext> {
        let target = self.resolve(true)?;
        match target.repo {
            Some(repo_slug) => Ok(RepoContext {
                workspace: target.workspace,
                repo_slug,
            }),
            None => bail!("--repo is required"),
        }
    }

    fn resolve(&self, require_repo: bool) -> Result<RepoTarget> {
        let mut workspace = self.workspace.clone();
        let mut repo = self.repo.clone();

        if let Some(value) = repo.take() {
            match value.split_once('/') {
                Some((ws, slug)) => {
                    let ws = ws.trim();
                    let slug = slug.trim();
                    if ws.is_empty() || slug.is_empty() || slug.contains('/') {
                        bail!("invalid --repo value {:?}: expected REPO or WORKSPACE/REPO", value);
                    }
                    if workspace.is_none() {
                        workspace = Some(ws.to_string());
                    }
                    repo = Some(slug.to_string());
                }
                None => repo = Some(value),
            }
        }

        if workspace.is_none() || (require_repo && repo.is_none()) {
            if let Some((inferred_ws, inferred_repo)) = self.infer_from_origin() {
                debug!(workspace = %inferred_ws, repo = %inferred_repo, "inferred from origin remote");
                workspace.get_or_insert(inferred_ws);
                repo.get_or_insert(inferred_repo);
            }
        }

        let Some(workspace) = workspace else {
            bail!("--workspace is required");
        };
        if require_repo && repo.is_none() {
            bail!("--repo is required");
        }

        Ok(RepoTarget { workspace, repo })
    }

    fn infer_from_origin(&self) -> Option<(String, String)> {
        let origin = match &self.origin_override {
            Some(origin) => origin.clone(),
            None => GitContext::open().ok()?.origin_url().ok()?,
        };
        parse_bitbucket_remote(origin.as_deref()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(ws: &str, repo: &str) -> Option<(String, String)> {
        Some((ws.to_string(), repo.to_string()))
    }

    #[test]
    fn test_parse_cloud_ssh() {
        assert_eq!(
            parse_bitbucket_remote("git@bitbucket.org:workspace/repo.git"),
            pair("workspace", "repo")
        );
        assert_eq!(
            parse_bitbucket_remote("bitbucket.org:workspace/repo"),
            pair("workspace", "repo")
        );
    }

    #[test]
    fn test_parse_cloud_ssh_url() {
        assert_eq!(
            parse_bitbucket_remote("ssh://git@bitbucket.org/workspace/repo.git"),
            pair("workspace", "repo")
        );
    }

    #[test]
    fn test_parse_cloud_https() {
        assert_eq!(
            parse_bitbucket_remote("https://dev@bitbucket.org/workspace/repo.git"),
            pair("workspace", "repo")
        );
        assert_eq!(
            parse_bitbucket_remote("https://BitBucket.org/workspace/repo/"),
            pair("workspace", "repo")
        );
    }

    #[test]
    fn test_rejects_other_hosts_and_shapes() {
        assert_eq!(parse_bitbucket_remote("git@github.com:owner/repo.git"), None);
        assert_eq!(
            parse_bitbucket_remote("https://bitbucket.company.com/scm/PROJ/repo.git"),
            None
        );
        assert_eq!(parse_bitbucket_remote("https://bitbucket.org/a/b/c"), None);
        assert_eq!(parse_bitbucket_remote("https://bitbucket.org/only"), None);
        assert_eq!(parse_bitbucket_remote("   "), None);
        assert_eq!(parse_bitbucket_remote("/local/path/repo"), None);
    }

    #[test]
    fn test_flags_win_over_origin() {
        let resolver = ContextResolver::new(Some("flag-ws".into()), Some("flag-repo".into()))
            .with_origin_url(Some("git@bitbucket.org:origin-ws/origin-repo.git".into()));
        let ctx = resolver.resolve_repo().unwrap();
        assert_eq!(ctx.workspace, "flag-ws");
        assert_eq!(ctx.repo_slug, "flag-repo");
    }

    #[test]
    fn test_full_name_repo_flag() {
        let resolver = ContextResolver::new(None, Some("acme/widgets".into())).with_origin_url(None);
        assert_eq!(resolver.resolve_repo().unwrap().full_name(), "acme/widgets");

        let resolver = ContextResolver::new(Some("other".into()), Some("acme/widgets".into()))
            .with_origin_url(None);
        assert_eq!(resolver.resolve_repo().unwrap().full_name(), "other/widgets");
    }

    #[test]
    fn test_invalid_repo_flag() {
        let resolver = ContextResolver::new(None, Some("a/b/c".into())).with_origin_url(None);
        let err = resolver.resolve_repo().unwrap_err();
        assert!(err.to_string().starts_with("invalid --repo value"));
    }

    #[test]
    fn test_missing_values_filled_from_origin() {
        let origin = Some("https://bitbucket.org/acme/widgets.git".to_string());

        let resolver = ContextResolver::new(None, None).with_origin_url(origin.clone());
        assert_eq!(resolver.resolve_repo().unwrap().full_name(), "acme/widgets");

        let resolver = ContextResolver::new(Some("mine".into()), None).with_origin_url(origin);
        assert_eq!(resolver.resolve_repo().unwrap().full_name(), "mine/widgets");
    }

    #[test]
    fn test_required_errors() {
        let resolver = ContextResolver::new(None, None).with_origin_url(None);
        assert_eq!(
            resolver.resolve_workspace().unwrap_err().to_string(),
            "--workspace is required"
        );

        let resolver = ContextResolver::new(Some("acme".into()), None)
            .with_origin_url(Some("git@github.com:acme/widgets.git".into()));
        assert_eq!(
            resolver.resolve_repo().unwrap_err().to_string(),
            "--repo is required"
        );
    }

    #[test]
    fn test_workspace_only_resolution() {
        let resolver = ContextResolver::new(Some(" acme ".into()), Some("  ".into()))
            .with_origin_url(None);
        let target = resolver.resolve_workspace().unwrap();
        assert_eq!(target.workspace, "acme");
        assert_eq!(target.repo, None);
    }
}
