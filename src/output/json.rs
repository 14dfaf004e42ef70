//
//  bitbucket-cloud-cli
//  output/json.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # JSON Output
//!
//! Pretty-printed JSON with two-space indentation and a trailing newline.
//! Listing records are re-indented but otherwise emitted exactly as the
//! server sent them, key order included.

use std::io::{self, Write};

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;

use crate::api::RawRecord;

/// Writes a value as pretty JSON to stdout.
pub fn write_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json_to(&mut handle, value)
}

/// Writes a value as pretty JSON to any writer.
pub fn write_json_to<W: Write, T: Serialize>(writer: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value).context("encode output")?;
    writeln!(writer)?;
    Ok(())
}

/// Converts raw listing records into values for re-indentation.
pub fn records_to_values(records: &[RawRecord]) -> anyhow::Result<Vec<Value>> {
    records
        .iter()
        .map(|raw| serde_json::from_str(raw.get()).context("encode output"))
        .collect()
}
