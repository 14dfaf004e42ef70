//
//  bitbucket-cloud-cli
//  wiki/checkout.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Scratch clones of wiki repositories.
//!
//! A [`WikiCheckout`] owns a temporary directory holding a fresh clone.
//! The directory is deleted when the checkout is dropped, whether or not the
//! command succeeded. All operations here block; async callers should run
//! them on a blocking thread.

use std::cell::{Cell, RefCell};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use git2::build::RepoBuilder;
use git2::{
    Cred, CredentialType, DiffOptions, ErrorCode, FetchOptions, PushOptions,
    RemoteCallbacks, Repository, Signature,
};
use tempfile::TempDir;
use tracing::debug;

use super::{normalize_page_path, PutStatus, WikiPage, WikiRemote};

/// Commit author used when the profile has no e-mail style username.
pub const DEFAULT_AUTHOR_NAME: &str = "bb-cli";

/// Commit e-mail used when the profile has no e-mail style username.
pub const DEFAULT_AUTHOR_EMAIL: &str = "bb-cli@local";

/// Name and e-mail recorded on wiki commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

impl CommitAuthor {
    /// Derives the author from a profile username.
    ///
    /// An e-mail address is used as-is with its local part as the name;
    /// anything else gives `bb-cli <bb-cli@local>`.
    pub fn from_username(username: &str) -> Self {
        let username = username.trim();
        match username.split_once('@') {
            Some((name, _)) if !name.is_empty() => Self {
                name: name.to_string(),
                email: username.to_string(),
            },
            _ => Self {
                name: DEFAULT_AUTHOR_NAME.to_string(),
                email: DEFAULT_AUTHOR_EMAIL.to_string(),
            },
        }
    }
}

/// Default commit message for a page update.
pub fn default_commit_message(page: &str) -> String {
    format!("Update wiki page {}", page)
}

/// A temporary clone of a wiki repository.
pub struct WikiCheckout {
    repo: Repository,
    remote: WikiRemote,
    // Dropped after `repo`, removing the clone.
    dir: TempDir,
}

impl WikiCheckout {
    /// Clones the wiki into a new temporary directory.
    pub fn clone_remote(remote: &WikiRemote) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("bb-wiki-")
            .tempdir()
            .context("create temp dir")?;

        debug!(url = %remote.redacted_url(), shallow = remote.shallow, "cloning wiki");

        let attempts = Cell::new(0u8);
        let mut fetch = FetchOptions::new();
        fetch.remote_callbacks(credential_callbacks(remote, &attempts));
        if remote.shallow {
            fetch.depth(1);
        }

        let repo = RepoBuilder::new()
            .fetch_options(fetch)
            .clone(&remote.url, dir.path())
            .map_err(|err| git_error("clone", &err, remote))?;

        Ok(Self {
            repo,
            remote: remote.clone(),
            dir,
        })
    }

    /// Root of the working tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn page_path(&self, page: &str) -> Result<(String, PathBuf)> {
        let clean = normalize_page_path(page)?;
        let abs = self.path().join(&clean);
        Ok((clean, abs))
    }

    /// Lists every file outside `.git`, sorted by path.
    pub fn list_pages(&self) -> Result<Vec<WikiPage>> {
        let mut pages = Vec::new();
        collect_pages(self.path(), "", &mut pages).context("list wiki pages")?;
        pages.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(pages)
    }

    /// Reads a page. Returns `None` when it does not exist.
    pub fn read_page(&self, page: &str) -> Result<Option<String>> {
        let (_, abs) = self.page_path(page)?;
        match fs::read(&abs) {
            Ok(raw) => Ok(Some(String::from_utf8_lossy(&raw).into_owned())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).context("read wiki page"),
        }
    }

    /// Writes a page, commits it, and pushes `HEAD` to origin.
    ///
    /// Nothing is committed or pushed when the staged content matches the
    /// current commit.
    pub fn put_page(
        &self,
        page: &str,
        content: &[u8],
        message: Option<&str>,
        author: &CommitAuthor,
    ) -> Result<PutStatus> {
        let (clean, abs) = self.page_path(page)?;

        if let Some(parent) = abs.parent() {
            fs::create_dir_all(parent).context("create wiki page directory")?;
        }
        fs::write(&abs, content).context("write wiki page")?;

        let remote = &self.remote;
        let mut index = self
            .repo
            .index()
            .map_err(|err| git_error("add", &err, remote))?;
        index
            .add_path(Path::new(&clean))
            .map_err(|err| git_error("add", &err, remote))?;
        index.write().map_err(|err| git_error("add", &err, remote))?;

        let parent = self.head_commit().map_err(|err| git_error("status", &err, remote))?;
        if !self.page_changed(&clean, parent.as_ref(), &index)? {
            debug!(page = %clean, "wiki page unchanged");
            return Ok(PutStatus::NoChange);
        }

        let message = message
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_commit_message(&clean));

        self.commit(&mut index, parent.as_ref(), &message, author)
            .map_err(|err| git_error("commit", &err, remote))?;
        self.push_head()?;

        Ok(PutStatus::Updated)
    }

    fn head_commit(&self) -> std::result::Result<Option<git2::Commit<'_>>, git2::Error> {
        match self.repo.head() {
            Ok(head) => head.peel_to_commit().map(Some),
            Err(err) if matches!(err.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn page_changed(
        &self,
        page: &str,
        parent: Option<&git2::Commit<'_>>,
        index: &git2::Index,
    ) -> Result<bool> {
        let remote = &self.remote;
        let tree = parent
            .map(|c| c.tree())
            .transpose()
            .map_err(|err| git_error("status", &err, remote))?;

        let mut opts = DiffOptions::new();
        opts.pathspec(page);
        let diff = self
            .repo
            .diff_tree_to_index(tree.as_ref(), Some(index), Some(&mut opts))
            .map_err(|err| git_error("status", &err, remote))?;

        Ok(diff.deltas().len() > 0)
    }

    fn commit(
        &self,
        index: &mut git2::Index,
        parent: Option<&git2::Commit<'_>>,
        message: &str,
        author: &CommitAuthor,
    ) -> std::result::Result<git2::Oid, git2::Error> {
        let signature = Signature::now(&author.name, &author.email)?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let parents: Vec<&git2::Commit<'_>> = parent.into_iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        debug!(commit = %oid, "created wiki commit");
        Ok(oid)
    }

    fn push_head(&self) -> Result<()> {
        let remote = &self.remote;
        let head = self
            .repo
            .head()
            .map_err(|err| git_error("push", &err, remote))?;
        let refname = head
            .name()
            .ok_or_else(|| anyhow!("git push failed: HEAD is not a valid reference"))?;
        let refspec = format!("{0}:{0}", refname);

        let rejected = RefCell::new(None::<String>);
        let attempts = Cell::new(0u8);
        let mut callbacks = credential_callbacks(&self.remote, &attempts);
        callbacks.push_update_reference(|name, status| {
            if let Some(status) = status {
                *rejected.borrow_mut() = Some(format!("{} rejected: {}", name, status));
            }
            Ok(())
        });

        let mut options = PushOptions::new();
        options.remote_callbacks(callbacks);

        let mut origin = self
            .repo
            .find_remote("origin")
            .map_err(|err| git_error("push", &err, remote))?;
        origin
            .push(&[refspec.as_str()], Some(&mut options))
            .map_err(|err| git_error("push", &err, remote))?;
        drop(options);

        if let Some(reason) = rejected.into_inner() {
            return Err(anyhow!("git push failed: {}", remote.redact(&reason)));
        }
        debug!(refspec = %refspec, "pushed wiki");
        Ok(())
    }
}

/// Supplies the remote's username and token once per operation.
fn credential_callbacks<'a>(remote: &'a WikiRemote, attempts: &'a Cell<u8>) -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |_url, username_from_url, allowed| {
        if remote.token.is_empty() || !allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            return Err(git2::Error::from_str("no usable credentials"));
        }
        if attempts.get() > 0 {
            return Err(git2::Error::from_str("authentication failed"));
        }
        attempts.set(attempts.get() + 1);

        let user = username_from_url.unwrap_or(remote.user.as_str());
        Cred::userpass_plaintext(user, &remote.token)
    });
    callbacks
}

fn git_error(action: &str, err: &git2::Error, remote: &WikiRemote) -> anyhow::Error {
    anyhow!("git {} failed: {}", action, remote.redact(err.message()))
}

fn collect_pages(dir: &Path, prefix: &str, pages: &mut Vec<WikiPage>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let rel = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", prefix, name)
        };

        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            if name != ".git" {
                collect_pages(&entry.path(), &rel, pages)?;
            }
        } else {
            pages.push(WikiPage {
                path: rel,
                size: entry.metadata()?.len(),
            });
        }
    }
    Ok(())
}
