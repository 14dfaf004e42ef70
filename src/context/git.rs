//
//  bitbucket-cloud-cli
//  context/git.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Git Repository Lookup
//!
//! Read-only access to the local git repository, used to infer which
//! Bitbucket repository a command is about.
//!
//! ```rust,no_run
//! use bitbucket_cloud_cli::context::GitContext;
//!
//! if let Ok(git) = GitContext::open() {
//!     if let Some(url) = git.origin_url()? {
//!         println!("Origin URL: {}", url);
//!     }
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::path::Path;

use anyhow::Result;
use git2::{ErrorCode, Repository};

/// A handle on the git repository around a directory.
pub struct GitContext {
    /// The underlying git2 repository handle
    repo: Repository,
}

impl GitContext {
    /// Opens the repository containing the current working directory.
    ///
    /// Walks up parent directories the way `git` itself does.
    pub fn open() -> Result<Self> {
        Self::discover(Path::new("."))
    }

    /// Opens the repository containing `path`, walking up from it.
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)?;
        Ok(Self { repo })
    }

    /// Returns the fetch URL of a remote, or `None` when it does not exist.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(|s| s.trim().to_string())),
            Err(err) if err.code() == ErrorCode::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Returns the URL of the `origin` remote.
    pub fn origin_url(&self) -> Result<Option<String>> {
        self.remote_url("origin")
    }
}
