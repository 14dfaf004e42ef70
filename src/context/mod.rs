//
//  bitbucket-cloud-cli
//  context/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Repository Context Module
//!
//! Determines which Bitbucket workspace and repository a command should act
//! on, from explicit flags or the local git checkout.
//!
//! ## Module Structure
//!
//! - [`git`]: Read access to the local repository via `git2`
//! - [`resolver`]: Flag handling, remote URL parsing, and the fallback order

mod git;
mod resolver;

pub use git::*;
pub use resolver::*;

/// A workspace, and a repository in it when one was given or inferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoTarget {
    /// Workspace slug
    pub workspace: String,
    /// Repository slug, if known
    pub repo: Option<String>,
}

/// A fully identified Bitbucket Cloud repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoContext {
    /// Workspace slug
    pub workspace: String,
    /// Repository slug
    pub repo_slug: String,
}

impl RepoContext {
    /// Returns the repository path in the format `workspace/repo`.
    ///
    /// ```rust
    /// use bitbucket_cloud_cli::context::RepoContext;
    ///
    /// let ctx = RepoContext {
    ///     workspace: "atlassian".to_string(),
    ///     repo_slug: "python-bitbucket".to_string(),
    /// };
    /// assert_eq!(ctx.full_name(), "atlassian/python-bitbucket");
    /// ```
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.workspace, self.repo_slug)
    }

    /// API path of a resource under this repository.
    ///
    /// An empty resource gives the repository itself.
    pub fn api_path(&self, resource: &str) -> String {
        let resource = resource.trim_matches('/');
        if resource.is_empty() {
            format!("/repositories/{}/{}", self.workspace, self.repo_slug)
        } else {
            format!(
                "/repositories/{}/{}/{}",
                self.workspace, self.repo_slug, resource
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_path() {
        let ctx = RepoContext {
            workspace: "acme".to_string(),
            repo_slug: "widgets".to_string(),
        };
        assert_eq!(ctx.api_path(""), "/repositories/acme/widgets");
        assert_eq!(ctx.api_path("/pullrequests/"), "/repositories/acme/widgets/pullrequests");
    }
}
