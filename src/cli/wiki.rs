//
//  bitbucket-cloud-cli
//  cli/wiki.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Wiki commands for the Bitbucket CLI.
//!
//! Bitbucket Cloud has no REST endpoints for wiki content, so these commands
//! work on a temporary git clone of `<repo>.git/wiki`. Each invocation clones,
//! does its work, and removes the clone again.

use std::fs;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use super::GlobalOptions;
use crate::config::Profile;
use crate::context::RepoContext;
use crate::output::print_markdown;
use crate::wiki::{normalize_page_path, CommitAuthor, PutStatus, WikiCheckout, WikiRemote};

/// Read and edit repository wikis
#[derive(Args, Debug)]
pub struct WikiCommand {
    #[command(subcommand)]
    pub command: WikiSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum WikiSubcommand {
    /// List wiki pages
    #[command(visible_alias = "ls")]
    List,

    /// Print a wiki page
    Get(GetArgs),

    /// Create or replace a wiki page and push the change
    Put(PutArgs),
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Page path inside the wiki (e.g. Home.md)
    #[arg(long)]
    pub page: String,

    /// Render markdown for the terminal
    #[arg(long)]
    pub render: bool,
}

#[derive(Args, Debug, Default)]
pub struct PutArgs {
    /// Page path inside the wiki (e.g. docs/Setup.md)
    #[arg(long)]
    pub page: String,

    /// New page content
    #[arg(long)]
    pub content: Option<String>,

    /// Read the new page content from a file
    #[arg(long, value_name = "PATH")]
    pub file: Option<String>,

    /// Commit message
    #[arg(long, short = 'm')]
    pub message: Option<String>,
}

#[derive(Serialize)]
struct PageContent<'a> {
    page: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct PutResult<'a> {
    page: &'a str,
    status: PutStatus,
}

impl WikiCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            WikiSubcommand::List => list(global).await,
            WikiSubcommand::Get(args) => get(args, global).await,
            WikiSubcommand::Put(args) => put(args, global).await,
        }
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Clones the wiki off the async runtime and runs `work` on the checkout.
async fn with_checkout<T, F>(remote: WikiRemote, work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&WikiCheckout) -> Result<T> + Send + 'static,
{
    let pb = spinner("Cloning wiki...");
    let result = tokio::task::spawn_blocking(move || {
        let checkout = WikiCheckout::clone_remote(&remote)?;
        work(&checkout)
    })
    .await
    .context("wiki task panicked");
    pb.finish_and_clear();
    result?
}

fn wiki_remote(global: &GlobalOptions, repo: &RepoContext) -> Result<(WikiRemote, Profile)> {
    let (_, profile) = global.load_profile()?;
    let remote = WikiRemote::for_repository(&profile, &repo.workspace, &repo.repo_slug)?;
    Ok((remote, profile))
}

async fn list(global: &GlobalOptions) -> Result<()> {
    let repo = global.resolve_repo()?;
    let (remote, _) = wiki_remote(global, &repo)?;
    let pages = with_checkout(remote, |checkout| checkout.list_pages()).await?;
    global.output().write_rows(&pages)
}

async fn get(args: &GetArgs, global: &GlobalOptions) -> Result<()> {
    let repo = global.resolve_repo()?;
    let page = normalize_page_path(&args.page)?;
    let (remote, _) = wiki_remote(global, &repo)?;

    let wanted = page.clone();
    let content = with_checkout(remote, move |checkout| checkout.read_page(&wanted)).await?;
    let Some(content) = content else {
        bail!("wiki page not found: {}", page);
    };

    if global.json {
        return global.output().write_json(&PageContent {
            page: &page,
            content: &content,
        });
    }
    if args.render {
        print_markdown(&content);
    } else {
        print!("{}", content);
    }
    Ok(())
}

/// Picks the new page content from exactly one of `--content` or `--file`.
fn page_content(args: &PutArgs) -> Result<Vec<u8>> {
    let content = args.content.as_deref().filter(|c| !c.trim().is_empty());
    let file = args.file.as_deref().map(str::trim).filter(|f| !f.is_empty());

    match (content, file) {
        (None, None) => bail!("either --content or --file is required"),
        (Some(_), Some(_)) => bail!("use only one of --content or --file"),
        (Some(content), None) => Ok(content.as_bytes().to_vec()),
        (None, Some(path)) => fs::read(path).context("read --file"),
    }
}

async fn put(args: &PutArgs, global: &GlobalOptions) -> Result<()> {
    let repo = global.resolve_repo()?;
    let page = normalize_page_path(&args.page)?;
    let content = page_content(args)?;
    let (remote, profile) = wiki_remote(global, &repo)?;

    let author = CommitAuthor::from_username(&profile.username);
    let message = args.message.clone();
    let target = page.clone();
    let status = with_checkout(remote, move |checkout| {
        checkout.put_page(&target, &content, message.as_deref(), &author)
    })
    .await?;

    if global.json {
        return global.output().write_json(&PutResult {
            page: &page,
            status,
        });
    }
    match status {
        PutStatus::Updated => println!("Updated wiki page: {}", page),
        PutStatus::NoChange => println!("No changes for wiki page: {}", page),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn put_args(content: Option<&str>, file: Option<&str>) -> PutArgs {
        PutArgs {
            page: "Home.md".to_string(),
            content: content.map(str::to_string),
            file: file.map(str::to_string),
            message: None,
        }
    }

    #[test]
    fn test_page_content_requires_one_source() {
        let err = page_content(&put_args(None, Some("  "))).unwrap_err();
        assert_eq!(err.to_string(), "either --content or --file is required");

        let err = page_content(&put_args(Some("text"), Some("page.md"))).unwrap_err();
        assert_eq!(err.to_string(), "use only one of --content or --file");
    }

    #[test]
    fn test_page_content_keeps_inline_text_verbatim() {
        let content = page_content(&put_args(Some("# Home\n"), None)).unwrap();
        assert_eq!(content, b"# Home\n");
    }

    #[test]
    fn test_page_content_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"from file").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        assert_eq!(page_content(&put_args(None, Some(&path))).unwrap(), b"from file");
    }

    #[test]
    fn test_page_content_missing_file() {
        let err = page_content(&put_args(None, Some("/nonexistent/bb/page.md"))).unwrap_err();
        assert!(err.to_string().starts_with("read --file"));
    }

    #[tokio::test]
    async fn test_with_checkout_runs_on_local_remote() {
        let origin = tempfile::tempdir().unwrap();
        let repo = git2::Repository::init(origin.path()).unwrap();
        std::fs::write(origin.path().join("Home.md"), "hello").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(std::path::Path::new("Home.md")).unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = git2::Signature::now("t", "t@example.com").unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "init", &tree, &[]).unwrap();

        let pages = with_checkout(WikiRemote::local(origin.path()), |checkout| {
            checkout.list_pages()
        })
        .await
        .unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].path, "Home.md");
        assert_eq!(pages[0].size, 5);
    }
}
