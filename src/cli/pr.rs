//
//  bitbucket-cloud-cli
//  cli/pr.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pull request commands for the Bitbucket CLI.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use reqwest::Method;
use serde_json::{json, Value};

use super::{fetch_listing, print_url, required, GlobalOptions, ListArgs};
use crate::output::PullRequestRow;
use crate::util::push_query_if_not_empty;

/// Work with pull requests
#[derive(Args, Debug)]
pub struct PrCommand {
    #[command(subcommand)]
    pub command: PrSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PrSubcommand {
    /// List pull requests
    #[command(visible_alias = "ls")]
    List(PrListArgs),

    /// Create a pull request
    Create(CreateArgs),
}

#[derive(Args, Debug)]
pub struct PrListArgs {
    /// Filter by state (OPEN, MERGED, DECLINED, SUPERSEDED)
    #[arg(long, short = 's')]
    pub state: Option<String>,

    #[command(flatten)]
    pub list: ListArgs,
}

#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    /// Title of the pull request
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Source branch
    #[arg(long, short = 'H')]
    pub source: Option<String>,

    /// Destination branch
    #[arg(long, short = 'B')]
    pub destination: Option<String>,

    /// Description in markdown
    #[arg(long, short = 'b')]
    pub description: Option<String>,
}

impl PrCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            PrSubcommand::List(args) => list(args, global).await,
            PrSubcommand::Create(args) => create(args, global).await,
        }
    }
}

impl PrListArgs {
    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        let state = self.state.as_deref().unwrap_or_default().trim().to_uppercase();
        push_query_if_not_empty(&mut query, "state", &state);
        query.extend(self.list.trimmed_query());
        query
    }
}

async fn list(args: &PrListArgs, global: &GlobalOptions) -> Result<()> {
    let repo = global.resolve_repo()?;
    let client = global.client()?;

    let records = fetch_listing(
        &client,
        &repo.api_path("pullrequests"),
        &args.query(),
        args.list.all,
    )
    .await?;
    global.output().write_records::<PullRequestRow>(&records)
}

fn create_body(args: &CreateArgs) -> Result<Value> {
    let title = required(&args.title, "--title")?;
    let source = required(&args.source, "--source")?;
    let destination = required(&args.destination, "--destination")?;

    let mut body = json!({
        "title": title,
        "source": {"branch": {"name": source}},
        "destination": {"branch": {"name": destination}},
    });
    if let Some(description) = args.description.as_deref().filter(|d| !d.trim().is_empty()) {
        body["description"] = Value::String(description.to_string());
    }
    Ok(body)
}

async fn create(args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
    let repo = global.resolve_repo()?;
    let body = create_body(args)?;
    let client = global.client()?;

    let created: Value = client
        .do_json(Method::POST, &repo.api_path("pullrequests"), &[], Some(&body))
        .await?;
    if global.json {
        return global.output().write_json(&created);
    }

    let pr: PullRequestRow = serde_json::from_value(created).context("decode pull request")?;
    println!("Created PR #{} ({}): {}", pr.id, pr.state, pr.title);
    print_url(pr.html_url());
    Ok(())
}
