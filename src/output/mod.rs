//
//  bitbucket-cloud-cli
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Formats command results for the terminal or for scripts:
//!
//! - **Table format**: Human-readable tables, the default
//! - **JSON format**: Pretty JSON on stdout, selected with `--json`
//!
//! ## Architecture
//!
//! - [`table`]: Table building with `comfy_table`
//! - [`json`]: JSON serialization with `serde_json`
//! - [`markdown`]: Markdown rendering with `termimad` for `wiki get --render`
//! - [`rows`]: Per-resource table rows decoded from raw listing records
//!
//! Listing records stay raw JSON until they reach this layer. In JSON mode
//! they are printed back untouched; in table mode each one is decoded into
//! the row type for its resource.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bitbucket_cloud_cli::output::{OutputFormat, OutputWriter, RepoRow};
//!
//! # fn example(records: Vec<bitbucket_cloud_cli::api::RawRecord>) -> anyhow::Result<()> {
//! let writer = OutputWriter::new(OutputFormat::Table);
//! writer.write_records::<RepoRow>(&records)?;
//! writer.write_success("Done");
//! # Ok(())
//! # }
//! ```

mod json;
mod markdown;
mod rows;
mod table;

pub use json::*;
pub use markdown::*;
pub use rows::*;
pub use table::*;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::RawRecord;

/// Available output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// A record type that can be shown as one table row.
pub trait TableRow {
    /// Column headers, in cell order.
    const HEADERS: &'static [&'static str];

    /// What one row is, for error messages.
    const NOUN: &'static str;

    /// Cell values for this row.
    fn cells(&self, color: bool) -> Vec<String>;
}

/// Writes command output in the selected format.
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    /// Picks JSON when `json` is set, tables otherwise.
    pub fn from_json_flag(json: bool) -> Self {
        Self::new(if json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        })
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Prints any serializable value as pretty JSON, regardless of format.
    pub fn write_json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        write_json(value)
    }

    /// Prints listing records as a JSON array or as a table of `R` rows.
    pub fn write_records<R>(&self, records: &[RawRecord]) -> anyhow::Result<()>
    where
        R: TableRow + DeserializeOwned,
    {
        match self.format {
            OutputFormat::Json => write_json(&records_to_values(records)?),
            OutputFormat::Table => {
                println!("{}", render_records::<R>(records, self.color)?);
                Ok(())
            }
        }
    }

    /// Prints already-typed rows as a JSON array or a table.
    pub fn write_rows<R>(&self, rows: &[R]) -> anyhow::Result<()>
    where
        R: TableRow + Serialize,
    {
        match self.format {
            OutputFormat::Json => write_json(&rows),
            OutputFormat::Table => {
                println!("{}", render_rows(rows, self.color));
                Ok(())
            }
        }
    }

    pub fn write_info(&self, msg: &str) {
        println!("{}", msg);
    }

    pub fn write_success(&self, msg: &str) {
        use console::style;
        if self.color {
            println!("{} {}", style("✓").green().bold(), msg);
        } else {
            println!("{}", msg);
        }
    }

    pub fn write_warning(&self, msg: &str) {
        use console::style;
        if self.color {
            eprintln!("{} {}", style("warning:").yellow().bold(), msg);
        } else {
            eprintln!("warning: {}", msg);
        }
    }
}

/// Decodes raw records into `R` and renders them as a table.
///
/// # Errors
///
/// Fails on the first record that does not decode as `R`.
pub fn render_records<R>(records: &[RawRecord], color: bool) -> anyhow::Result<String>
where
    R: TableRow + DeserializeOwned,
{
    let rows = records
        .iter()
        .map(|raw| {
            serde_json::from_str::<R>(raw.get()).with_context(|| format!("decode {} row", R::NOUN))
        })
        .collect::<anyhow::Result<Vec<R>>>()?;
    Ok(render_rows(&rows, color))
}

/// Renders typed rows as a table.
pub fn render_rows<R: TableRow>(rows: &[R], color: bool) -> String {
    TableBuilder::new()
        .color(color)
        .headers(R::HEADERS.iter().copied())
        .rows(rows.iter().map(|row| row.cells(color)))
        .render()
}
