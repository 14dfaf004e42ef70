//
//  bitbucket-cloud-cli
//  cli/issue.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue commands for the Bitbucket CLI.
//!
//! Covers the repository issue tracker: listing, creating, and updating
//! issues. Only non-blank fields are sent, so `update` leaves everything
//! else on the issue untouched.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use reqwest::Method;
use serde_json::{json, Map, Value};

use super::{fetch_listing, print_url, required, GlobalOptions, ListArgs};
use crate::output::IssueRow;

/// Work with issues
#[derive(Args, Debug)]
pub struct IssueCommand {
    #[command(subcommand)]
    pub command: IssueSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum IssueSubcommand {
    /// List issues
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Create an issue
    Create(CreateArgs),

    /// Update fields of an existing issue
    Update(UpdateArgs),
}

/// Issue fields settable on create and update.
#[derive(Args, Debug, Default)]
pub struct IssueFields {
    /// Body text
    #[arg(long, short = 'c')]
    pub content: Option<String>,

    /// State (new, open, resolved, on hold, invalid, duplicate, wontfix, closed)
    #[arg(long, short = 's')]
    pub state: Option<String>,

    /// Kind (bug, enhancement, proposal, task)
    #[arg(long, short = 'k')]
    pub kind: Option<String>,

    /// Priority (trivial, minor, major, critical, blocker)
    #[arg(long, short = 'p')]
    pub priority: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    /// Issue title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    #[command(flatten)]
    pub fields: IssueFields,
}

#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Issue ID
    #[arg(long)]
    pub id: Option<u64>,

    /// New title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    #[command(flatten)]
    pub fields: IssueFields,
}

impl IssueCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            IssueSubcommand::List(args) => list(args, global).await,
            IssueSubcommand::Create(args) => create(args, global).await,
            IssueSubcommand::Update(args) => update(args, global).await,
        }
    }
}

fn set_optional(body: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(trimmed) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        body.insert(key.to_string(), Value::String(trimmed.to_string()));
    }
}

impl IssueFields {
    fn apply(&self, body: &mut Map<String, Value>) {
        if let Some(content) = self.content.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            body.insert("content".to_string(), json!({ "raw": content }));
        }
        set_optional(body, "state", &self.state);
        set_optional(body, "kind", &self.kind);
        set_optional(body, "priority", &self.priority);
    }
}

fn create_body(args: &CreateArgs) -> Result<Value> {
    let title = required(&args.title, "--title")?;

    let mut body = Map::new();
    body.insert("title".to_string(), Value::String(title.to_string()));
    args.fields.apply(&mut body);
    Ok(Value::Object(body))
}

fn update_body(args: &UpdateArgs) -> Result<(u64, Value)> {
    let id = match args.id {
        Some(id) if id > 0 => id,
        _ => bail!("--id is required"),
    };

    let mut body = Map::new();
    set_optional(&mut body, "title", &args.title);
    args.fields.apply(&mut body);
    if body.is_empty() {
        bail!("at least one field to update is required");
    }
    Ok((id, Value::Object(body)))
}

async fn list(args: &ListArgs, global: &GlobalOptions) -> Result<()> {
    let repo = global.resolve_repo()?;
    let client = global.client()?;

    let records = fetch_listing(&client, &repo.api_path("issues"), &args.trimmed_query(), args.all).await?;
    global.output().write_records::<IssueRow>(&records)
}

async fn create(args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
    let repo = global.resolve_repo()?;
    let body = create_body(args)?;
    let client = global.client()?;

    let created: Value = client
        .do_json(Method::POST, &repo.api_path("issues"), &[], Some(&body))
        .await?;
    print_issue("Created", created, global)
}

async fn update(args: &UpdateArgs, global: &GlobalOptions) -> Result<()> {
    let repo = global.resolve_repo()?;
    let (id, body) = update_body(args)?;
    let client = global.client()?;

    let path = repo.api_path(&format!("issues/{}", id));
    let updated: Value = client.do_json(Method::PUT, &path, &[], Some(&body)).await?;
    print_issue("Updated", updated, global)
}

fn print_issue(verb: &str, value: Value, global: &GlobalOptions) -> Result<()> {
    if global.json {
        return global.output().write_json(&value);
    }

    let issue: IssueRow = serde_json::from_value(value).context("decode issue")?;
    println!("{} issue #{} ({}): {}", verb, issue.id, issue.state, issue.title);
    print_url(issue.html_url());
    Ok(())
}
