//
//  bitbucket-cloud-cli
//  output/rows.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Table rows for listing records.
//!
//! The client hands back records untouched. These structs pick out only the
//! fields a table shows; everything else in the record is ignored, and
//! missing fields render as empty cells.

use serde::Deserialize;

use super::{format_status, TableRow};
use crate::util::format_size;
use crate::wiki::WikiPage;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Named {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BranchEndpoint {
    branch: Named,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Href {
    href: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HtmlLinks {
    html: Href,
}

/// A repository listing entry.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RepoRow {
    pub slug: String,
    pub full_name: String,
}

impl TableRow for RepoRow {
    const HEADERS: &'static [&'static str] = &["SLUG", "FULL_NAME"];
    const NOUN: &'static str = "repo";

    fn cells(&self, _color: bool) -> Vec<String> {
        vec![self.slug.clone(), self.full_name.clone()]
    }
}

/// A pull request listing entry or creation response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PullRequestRow {
    pub id: u64,
    pub title: String,
    pub state: String,
    links: HtmlLinks,
    source: BranchEndpoint,
    destination: BranchEndpoint,
}

impl PullRequestRow {
    pub fn source_branch(&self) -> &str {
        &self.source.branch.name
    }

    pub fn destination_branch(&self) -> &str {
        &self.destination.branch.name
    }

    /// Web URL of the pull request, empty when absent.
    pub fn html_url(&self) -> &str {
        &self.links.html.href
    }
}

impl TableRow for PullRequestRow {
    const HEADERS: &'static [&'static str] = &["ID", "STATE", "SOURCE", "DEST", "TITLE"];
    const NOUN: &'static str = "pull request";

    fn cells(&self, color: bool) -> Vec<String> {
        vec![
            self.id.to_string(),
            format_status(&self.state, color),
            self.source_branch().to_string(),
            self.destination_branch().to_string(),
            self.title.clone(),
        ]
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PipelineState {
    name: String,
    result: Named,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PipelineTarget {
    ref_name: String,
}

/// A pipeline listing entry or trigger response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PipelineRow {
    pub uuid: String,
    state: PipelineState,
    target: PipelineTarget,
}

impl PipelineRow {
    /// The result name once finished, otherwise the state name.
    pub fn state_label(&self) -> &str {
        if self.state.result.name.trim().is_empty() {
            &self.state.name
        } else {
            &self.state.result.name
        }
    }

    pub fn ref_name(&self) -> &str {
        &self.target.ref_name
    }
}

impl TableRow for PipelineRow {
    const HEADERS: &'static [&'static str] = &["UUID", "STATE", "REF"];
    const NOUN: &'static str = "pipeline";

    fn cells(&self, color: bool) -> Vec<String> {
        vec![
            self.uuid.clone(),
            format_status(self.state_label(), color),
            self.ref_name().to_string(),
        ]
    }
}

/// An issue listing entry or create/update response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IssueRow {
    pub id: u64,
    pub title: String,
    pub state: String,
    pub kind: String,
    pub priority: String,
    links: HtmlLinks,
}

impl IssueRow {
    /// Web URL of the issue, empty when absent.
    pub fn html_url(&self) -> &str {
        &self.links.html.href
    }
}

impl TableRow for IssueRow {
    const HEADERS: &'static [&'static str] = &["ID", "STATE", "KIND", "PRIORITY", "TITLE"];
    const NOUN: &'static str = "issue";

    fn cells(&self, color: bool) -> Vec<String> {
        vec![
            self.id.to_string(),
            format_status(&self.state, color),
            self.kind.clone(),
            self.priority.clone(),
            self.title.clone(),
        ]
    }
}

impl TableRow for WikiPage {
    const HEADERS: &'static [&'static str] = &["PATH", "SIZE"];
    const NOUN: &'static str = "wiki page";

    fn cells(&self, _color: bool) -> Vec<String> {
        vec![self.path.clone(), format_size(self.size)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_request_row() {
        let row: PullRequestRow = serde_json::from_str(
            r#"{
                "id": 42,
                "title": "Add feature",
                "state": "OPEN",
                "source": {"branch": {"name": "feature"}},
                "destination": {"branch": {"name": "main"}},
                "links": {"html": {"href": "https://bitbucket.org/acme/widgets/pull-requests/42"}},
                "author": {"display_name": "ignored"}
            }"#,
        )
        .unwrap();

        assert_eq!(
            row.cells(false),
            vec!["42", "OPEN", "feature", "main", "Add feature"]
        );
        assert_eq!(row.html_url(), "https://bitbucket.org/acme/widgets/pull-requests/42");
    }

    #[test]
    fn test_pipeline_state_label_prefers_result() {
        let running: PipelineRow = serde_json::from_str(
            r#"{"uuid": "{1}", "state": {"name": "IN_PROGRESS"}, "target": {"ref_name": "main"}}"#,
        )
        .unwrap();
        assert_eq!(running.state_label(), "IN_PROGRESS");

        let done: PipelineRow = serde_json::from_str(
            r#"{"uuid": "{2}", "state": {"name": "COMPLETED", "result": {"name": "SUCCESSFUL"}}}"#,
        )
        .unwrap();
        assert_eq!(done.cells(false), vec!["{2}", "SUCCESSFUL", ""]);
    }

    #[test]
    fn test_issue_row_missing_fields_are_empty() {
        let row: IssueRow = serde_json::from_str(r#"{"id": 3, "title": "Crash"}"#).unwrap();
        assert_eq!(row.cells(false), vec!["3", "", "", "", "Crash"]);
        assert_eq!(row.html_url(), "");
    }

    #[test]
    fn test_wiki_page_row() {
        let page = WikiPage {
            path: "Home.md".to_string(),
            size: 2048,
        };
        assert_eq!(page.cells(false), vec!["Home.md", "2.0 KB"]);
    }
}
