//
//  bitbucket-cloud-cli
//  auth/token.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Token Input
//!
//! `bb auth login` accepts a token from, in order:
//!
//! 1. `--token <VALUE>`
//! 2. stdin, with `--with-token` or a bare `--token`
//! 3. the `BITBUCKET_TOKEN` environment variable
//! 4. a hidden interactive prompt, when stdin is a terminal
//!
//! ```bash
//! echo "$TOKEN" | bb auth login --with-token --username dev@example.com
//! ```

use std::io::{self, BufRead, IsTerminal};

use anyhow::{bail, Context, Result};
use dialoguer::Password;

/// Environment variable consulted when no token flag was given.
pub const TOKEN_ENV: &str = "BITBUCKET_TOKEN";

/// Environment variable consulted when no `--username` was given.
pub const USERNAME_ENV: &str = "BITBUCKET_USERNAME";

/// Reads a single token line from any buffered reader.
///
/// The line is trimmed; an empty line or end of input is an error.
pub fn read_token_from<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .context("read token from stdin")?;

    let token = line.trim();
    if read == 0 || token.is_empty() {
        bail!("no token provided on stdin");
    }
    Ok(token.to_string())
}

/// Reads a token from the first line of stdin.
pub fn read_token_from_stdin() -> Result<String> {
    let stdin = io::stdin();
    let mut lock = stdin.lock();
    read_token_from(&mut lock)
}

/// Asks for the token without echoing it.
pub fn prompt_token() -> Result<String> {
    let token = Password::new()
        .with_prompt("Bitbucket API token")
        .interact()?;
    Ok(token.trim().to_string())
}

/// True when stdin is attached to a terminal and prompting makes sense.
pub fn can_prompt() -> bool {
    io::stdin().is_terminal()
}

/// Returns the trimmed value of an environment variable, if set and non-empty.
pub fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
