//
//  bitbucket-cloud-cli
//  cli/repo.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository commands for the Bitbucket CLI.

use anyhow::Result;
use clap::{Args, Subcommand};

use super::{fetch_listing, GlobalOptions, ListArgs};
use crate::output::RepoRow;

/// Work with repositories
#[derive(Args, Debug)]
pub struct RepoCommand {
    #[command(subcommand)]
    pub command: RepoSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RepoSubcommand {
    /// List repositories in a workspace
    #[command(visible_alias = "ls")]
    List(ListArgs),
}

impl RepoCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            RepoSubcommand::List(args) => list(args, global).await,
        }
    }
}

fn list_path(workspace: &str) -> String {
    format!("/repositories/{}", workspace)
}

async fn list(args: &ListArgs, global: &GlobalOptions) -> Result<()> {
    let target = global.resolve_workspace()?;
    let client = global.client()?;

    let records = fetch_listing(&client, &list_path(&target.workspace), &args.query(), args.all).await?;
    global.output().write_records::<RepoRow>(&records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, ClientConfig};

    #[test]
    fn test_list_path() {
        assert_eq!(list_path("acme"), "/repositories/acme");
    }

    #[tokio::test]
    async fn test_first_page_only_without_all() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/repositories/acme")
            .match_query(mockito::Matcher::UrlEncoded("sort".into(), "slug".into()))
            .with_body(format!(
                r#"{{"values": [{{"slug": "widgets"}}], "next": "{}/repositories/acme?page=2"}}"#,
                server.url()
            ))
            .create_async()
            .await;

        let client = ApiClient::new(
            ClientConfig::new(&server.url()).with_token("t"),
            reqwest::Client::new(),
        );
        let args = ListArgs {
            sort: Some("slug".to_string()),
            ..ListArgs::default()
        };
        let records = fetch_listing(&client, &list_path("acme"), &args.query(), args.all)
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get(), r#"{"slug": "widgets"}"#);
        first.assert_async().await;
    }
}
