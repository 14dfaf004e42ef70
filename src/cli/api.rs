//
//  bitbucket-cloud-cli
//  cli/api.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Direct API access command
//!
//! Sends one authenticated request to any endpoint and prints the JSON
//! response. Useful for endpoints the other commands do not cover.
//!
//! ## Examples
//!
//! ```bash
//! # Get repository info
//! bb api /repositories/workspace/repo
//!
//! # Create an issue with POST
//! echo '{"title": "Bug report"}' | bb api -X POST /repositories/workspace/repo/issues --input -
//!
//! # Paginate through results
//! bb api /repositories/workspace/repo/commits --paginate
//! ```

use std::fs;
use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use clap::Args;
use reqwest::Method;
use serde_json::Value;

use crate::api::Query;
use crate::output::records_to_values;
use crate::util::push_query_if_not_empty;

use super::GlobalOptions;

/// Make direct API requests
#[derive(Args, Debug)]
pub struct ApiCommand {
    /// API endpoint, relative to the profile base URL or absolute
    pub endpoint: String,

    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Follow `next` links and print every record as one array
    #[arg(long)]
    pub paginate: bool,

    /// Bitbucket query filter
    #[arg(long)]
    pub q: Option<String>,

    /// Sort expression
    #[arg(long)]
    pub sort: Option<String>,

    /// Partial response field selector
    #[arg(long)]
    pub fields: Option<String>,

    /// Read a JSON request body from a file (- for stdin)
    #[arg(long, value_name = "FILE")]
    pub input: Option<String>,
}

impl ApiCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let method = self.parse_method()?;
        let query = self.query();
        let client = global.client()?;
        let output = global.output();

        if self.paginate {
            if method != Method::GET {
                bail!("--paginate only supports GET requests");
            }
            let values = client.get_all_values(&self.endpoint, &query).await?;
            return output.write_json(&records_to_values(&values)?);
        }

        let body = self.read_body()?;
        // Bitbucket answers deletes with 204 and no body.
        if method == Method::DELETE {
            client
                .do_discard(method, &self.endpoint, &query, body.as_ref())
                .await?;
            return Ok(());
        }

        let value: Value = client
            .do_json(method, &self.endpoint, &query, body.as_ref())
            .await?;
        output.write_json(&value)
    }

    fn parse_method(&self) -> Result<Method> {
        let upper = self.method.trim().to_uppercase();
        Method::from_bytes(upper.as_bytes())
            .with_context(|| format!("invalid HTTP method {:?}", self.method))
    }

    fn query(&self) -> Query {
        let mut query = Query::new();
        push_query_if_not_empty(&mut query, "q", self.q.as_deref().unwrap_or_default());
        push_query_if_not_empty(&mut query, "sort", self.sort.as_deref().unwrap_or_default());
        push_query_if_not_empty(&mut query, "fields", self.fields.as_deref().unwrap_or_default());
        query
    }

    fn read_body(&self) -> Result<Option<Value>> {
        let Some(input) = self.input.as_deref() else {
            return Ok(None);
        };

        let raw = if input == "-" {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("read request body from stdin")?;
            buf
        } else {
            fs::read_to_string(input).with_context(|| format!("read request body from {}", input))?
        };

        let value = serde_json::from_str(&raw).context("parse request body as JSON")?;
        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn command(method: &str, input: Option<String>) -> ApiCommand {
        ApiCommand {
            endpoint: "/user".to_string(),
            method: method.to_string(),
            paginate: false,
            q: None,
            sort: Some("-created_on".to_string()),
            fields: None,
            input,
        }
    }

    #[test]
    fn test_method_is_case_insensitive() {
        assert_eq!(command("post", None).parse_method().unwrap(), Method::POST);
        assert!(command("NOT A METHOD", None).parse_method().is_err());
    }

    #[test]
    fn test_query_only_has_set_values() {
        assert_eq!(
            command("GET", None).query(),
            vec![("sort".to_string(), "-created_on".to_string())]
        );
    }

    #[test]
    fn test_query_values_are_sent_as_given() {
        let mut cmd = command("GET", None);
        cmd.q = Some(" state = \"OPEN\" ".to_string());
        cmd.sort = Some("   ".to_string());
        assert_eq!(
            cmd.query(),
            vec![("q".to_string(), " state = \"OPEN\" ".to_string())]
        );
    }

    #[test]
    fn test_body_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"title": "Bug"}}"#).unwrap();

        let cmd = command("POST", Some(file.path().to_string_lossy().into_owned()));
        assert_eq!(
            cmd.read_body().unwrap(),
            Some(serde_json::json!({"title": "Bug"}))
        );
    }

    #[test]
    fn test_body_must_be_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "title=Bug").unwrap();

        let cmd = command("POST", Some(file.path().to_string_lossy().into_owned()));
        let err = cmd.read_body().unwrap_err();
        assert!(err.to_string().contains("parse request body as JSON"));
    }
}
