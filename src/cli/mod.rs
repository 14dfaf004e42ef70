//
//  bitbucket-cloud-cli
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod api;
mod auth;
mod completion;
mod issue;
mod pipeline;
mod pr;
mod repo;
mod wiki;

pub use api::ApiCommand;
pub use auth::AuthCommand;
pub use completion::CompletionCommand;
pub use issue::IssueCommand;
pub use pipeline::PipelineCommand;
pub use pr::PrCommand;
pub use repo::RepoCommand;
pub use wiki::WikiCommand;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use reqwest::Method;
use thiserror::Error;

use crate::api::{ApiClient, ListPage, Query, RawRecord};
use crate::config::{Config, Profile};
use crate::context::{ContextResolver, RepoContext, RepoTarget};
use crate::output::OutputWriter;
use crate::util::{push_query_if_not_empty, push_trimmed_query_if_not_empty};

/// Bitbucket Cloud CLI - Work with Bitbucket Cloud from the command line
#[derive(Parser, Debug)]
#[command(
    name = "bb",
    version,
    about = "Work with Bitbucket Cloud from the command line",
    long_about = "bb is a CLI for the Bitbucket Cloud REST API.\n\n\
                  It brings repositories, pull requests, pipelines, issues, and wikis to your terminal.",
    propagate_version = true,
    after_help = "Use 'bb <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Profile to use instead of the current one
    #[arg(long, global = true, env = "BB_PROFILE")]
    pub profile: Option<String>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Abort the command after this many seconds
    #[arg(long, global = true, env = "BB_TIMEOUT", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Workspace slug (inferred from the origin remote when omitted)
    #[arg(long, short = 'w', global = true, env = "BB_WORKSPACE")]
    pub workspace: Option<String>,

    /// Repository in REPO or WORKSPACE/REPO format
    #[arg(long, short = 'R', global = true, env = "BB_REPO")]
    pub repo: Option<String>,
}

impl GlobalOptions {
    pub(crate) fn output(&self) -> OutputWriter {
        OutputWriter::from_json_flag(self.json)
    }

    pub(crate) fn resolver(&self) -> ContextResolver {
        ContextResolver::new(self.workspace.clone(), self.repo.clone())
    }

    pub(crate) fn resolve_workspace(&self) -> Result<RepoTarget> {
        self.resolver().resolve_workspace()
    }

    pub(crate) fn resolve_repo(&self) -> Result<RepoContext> {
        self.resolver().resolve_repo()
    }

    /// Loads the selected profile, which must carry a token.
    pub(crate) fn load_profile(&self) -> Result<(String, Profile)> {
        let config = Config::load().context("load config")?;
        let (name, profile) = config
            .active_profile(self.profile.as_deref())
            .context("resolve profile")?;
        if !profile.has_token() {
            bail!("profile has no token configured");
        }
        Ok((name, profile))
    }

    /// Builds an API client for the selected profile.
    pub(crate) fn client(&self) -> Result<ApiClient> {
        let (_, profile) = self.load_profile()?;
        ApiClient::from_config(profile.client_config())
    }
}

/// The whole command ran past `--timeout`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("timed out after {0}s")]
pub struct TimedOut(pub u64);

/// Filters shared by every listing command
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Fetch every page instead of just the first
    #[arg(long)]
    pub all: bool,

    /// Bitbucket query filter (e.g. 'state="OPEN"')
    #[arg(long)]
    pub q: Option<String>,

    /// Sort field, '-' prefix for descending
    #[arg(long)]
    pub sort: Option<String>,

    /// Partial response field selector
    #[arg(long)]
    pub fields: Option<String>,
}

impl ListArgs {
    /// Query parameters with values passed through as given.
    pub(crate) fn query(&self) -> Query {
        self.build_query(push_query_if_not_empty)
    }

    /// Query parameters with surrounding whitespace stripped from values.
    pub(crate) fn trimmed_query(&self) -> Query {
        self.build_query(push_trimmed_query_if_not_empty)
    }

    fn build_query(&self, push: fn(&mut Query, &str, &str)) -> Query {
        let mut query = Query::new();
        push(&mut query, "q", self.q.as_deref().unwrap_or_default());
        push(&mut query, "sort", self.sort.as_deref().unwrap_or_default());
        push(&mut query, "fields", self.fields.as_deref().unwrap_or_default());
        query
    }
}

/// Fetches one page, or every page when `all` is set, of a listing.
pub(crate) async fn fetch_listing(
    client: &ApiClient,
    path: &str,
    query: &[(String, String)],
    all: bool,
) -> Result<Vec<RawRecord>> {
    if all {
        return Ok(client.get_all_values(path, query).await?);
    }
    let page: ListPage = client.do_json(Method::GET, path, query, None).await?;
    Ok(page.values)
}

/// Returns the trimmed value of a flag that must be given and non-blank.
pub(crate) fn required<'a>(value: &'a Option<String>, flag: &str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => bail!("{} is required", flag),
    }
}

/// Prints the `URL:` line of a mutation result when a link is present.
pub(crate) fn print_url(url: &str) {
    if !url.is_empty() {
        println!("URL: {}", url);
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage saved credentials
    #[command(visible_alias = "login")]
    Auth(AuthCommand),

    /// Make authenticated API requests
    Api(ApiCommand),

    /// Work with repositories
    #[command(visible_alias = "r")]
    Repo(RepoCommand),

    /// Work with pull requests
    Pr(PrCommand),

    /// Work with pipelines
    Pipeline(PipelineCommand),

    /// Work with issues
    Issue(IssueCommand),

    /// Read and edit repository wikis
    Wiki(WikiCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),

    /// Print version information
    Version,
}
