//
//  bitbucket-cloud-cli
//  output/table.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Table Output Formatting
//!
//! Builds terminal tables with `comfy_table`: UTF-8 borders, dynamic column
//! widths, cyan headers when colour is enabled.
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_cloud_cli::output::TableBuilder;
//!
//! let rendered = TableBuilder::new()
//!     .color(false)
//!     .headers(["SLUG", "FULL_NAME"])
//!     .row(["widgets", "acme/widgets"])
//!     .render();
//! assert!(rendered.contains("acme/widgets"));
//! ```

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

/// Creates a new styled table with default settings.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// A builder for constructing formatted tables.
pub struct TableBuilder {
    table: Table,
    color: bool,
}

impl TableBuilder {
    /// Creates a builder, with colour following the terminal.
    pub fn new() -> Self {
        Self {
            table: create_table(),
            color: console::colors_enabled(),
        }
    }

    /// Forces colour on or off.
    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Sets the header row.
    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(|s| s.into()).collect();
        if self.color {
            let cells: Vec<Cell> = headers.iter().map(|h| Cell::new(h).fg(Color::Cyan)).collect();
            self.table.set_header(cells);
        } else {
            self.table.set_header(headers);
        }
        self
    }

    /// Adds a single data row.
    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(|s| s.into()).collect();
        self.table.add_row(row);
        self
    }

    /// Adds several rows at once.
    pub fn rows<I, R, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for row in rows {
            self = self.row(row);
        }
        self
    }

    /// Renders the table to a string.
    pub fn render(self) -> String {
        self.table.to_string()
    }

    /// Prints the table to stdout.
    pub fn print(self) {
        println!("{}", self.table);
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Colours a state label by what it means.
///
/// Covers pull request states (`OPEN`, `MERGED`, `DECLINED`), issue states
/// (`new`, `resolved`, `closed`), and pipeline results (`SUCCESSFUL`,
/// `FAILED`). Unknown labels and disabled colour return the input unchanged.
pub fn format_status(status: &str, color: bool) -> String {
    if !color {
        return status.to_string();
    }

    use console::style;
    match status.to_lowercase().as_str() {
        "open" | "new" | "in_progress" | "running" => style(status).green().to_string(),
        "merged" | "resolved" | "successful" | "completed" => style(status).blue().to_string(),
        "declined" | "closed" | "invalid" | "failed" | "error" => style(status).red().to_string(),
        "pending" | "on hold" | "paused" | "stopped" => style(status).yellow().to_string(),
        _ => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain_table() {
        let rendered = TableBuilder::new()
            .color(false)
            .headers(["ID", "TITLE"])
            .rows([["1", "First"], ["2", "Second"]])
            .render();

        assert!(rendered.contains("ID"));
        assert!(rendered.contains("TITLE"));
        assert!(rendered.contains("First"));
        assert!(rendered.contains("Second"));
    }

    #[test]
    fn test_format_status_without_color() {
        assert_eq!(format_status("OPEN", false), "OPEN");
        assert_eq!(format_status("whatever", true), "whatever");
    }
}
