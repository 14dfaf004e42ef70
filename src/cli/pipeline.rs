//
//  bitbucket-cloud-cli
//  cli/pipeline.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pipeline commands for the Bitbucket CLI.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use reqwest::Method;
use serde_json::{json, Value};

use super::{fetch_listing, required, GlobalOptions, ListArgs};
use crate::output::PipelineRow;

/// Work with pipelines
#[derive(Args, Debug)]
pub struct PipelineCommand {
    #[command(subcommand)]
    pub command: PipelineSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PipelineSubcommand {
    /// List pipelines
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Trigger a pipeline for a branch
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Branch to run the pipeline on
    #[arg(long, short = 'b')]
    pub branch: Option<String>,
}

impl PipelineCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            PipelineSubcommand::List(args) => list(args, global).await,
            PipelineSubcommand::Run(args) => run_pipeline(args, global).await,
        }
    }
}

async fn list(args: &ListArgs, global: &GlobalOptions) -> Result<()> {
    let repo = global.resolve_repo()?;
    let client = global.client()?;

    let records = fetch_listing(&client, &repo.api_path("pipelines"), &args.trimmed_query(), args.all).await?;
    global.output().write_records::<PipelineRow>(&records)
}

fn branch_target(branch: &str) -> Value {
    json!({
        "target": {
            "type": "pipeline_ref_target",
            "ref_type": "branch",
            "ref_name": branch,
        }
    })
}

async fn run_pipeline(args: &RunArgs, global: &GlobalOptions) -> Result<()> {
    let repo = global.resolve_repo()?;
    let branch = required(&args.branch, "--branch")?;
    let client = global.client()?;

    let triggered: Value = client
        .do_json(
            Method::POST,
            &repo.api_path("pipelines"),
            &[],
            Some(&branch_target(branch)),
        )
        .await?;
    if global.json {
        return global.output().write_json(&triggered);
    }

    let pipeline: PipelineRow = serde_json::from_value(triggered).context("decode pipeline")?;
    println!("Triggered pipeline {}", pipeline.uuid);
    println!("State: {}", pipeline.state_label());
    if !pipeline.ref_name().trim().is_empty() {
        println!("Ref: {}", pipeline.ref_name());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_target_body() {
        assert_eq!(
            branch_target("main"),
            json!({"target": {"type": "pipeline_ref_target", "ref_type": "branch", "ref_name": "main"}})
        );
    }

    #[test]
    fn test_branch_is_required() {
        let err = required(&Some("  ".to_string()), "--branch").unwrap_err();
        assert_eq!(err.to_string(), "--branch is required");
    }
}
