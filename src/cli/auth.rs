//
//  bitbucket-cloud-cli
//  cli/auth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Authentication commands for the Bitbucket CLI.
//!
//! Credentials live in named profiles in the JSON config file. A profile
//! with a username authenticates with Basic auth, one without uses the token
//! as a Bearer token.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::auth::{
    can_prompt, env_value, prompt_token, read_token_from_stdin, AuthCredential, TOKEN_ENV,
    USERNAME_ENV,
};
use crate::config::{Config, DEFAULT_PROFILE};

use super::GlobalOptions;

const NOT_LOGGED_IN: &str = "not logged in: run `bb auth login`";

/// Manage saved credentials.
///
/// The global `--profile` flag selects which profile each subcommand acts on.
#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Save a token under a profile and make it current
    Login(LoginArgs),

    /// Show the active profile
    Status,

    /// Remove a profile
    Logout,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// API token; without a value the token is read from stdin
    #[arg(long, num_args = 0..=1, default_missing_value = "", value_name = "TOKEN")]
    pub token: Option<String>,

    /// Read the token from standard input
    #[arg(long)]
    pub with_token: bool,

    /// Bitbucket username or Atlassian e-mail, enables Basic auth
    #[arg(long, env = USERNAME_ENV)]
    pub username: Option<String>,

    /// API base URL
    #[arg(long)]
    pub base_url: Option<String>,
}

#[derive(Serialize)]
struct StatusReport<'a> {
    profile: &'a str,
    base_url: &'a str,
    auth: String,
    token_configured: bool,
}

impl AuthCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AuthSubcommand::Login(args) => login(args, global),
            AuthSubcommand::Status => status(global),
            AuthSubcommand::Logout => logout(global),
        }
    }
}

fn login(args: &LoginArgs, global: &GlobalOptions) -> Result<()> {
    let token = resolve_token(args)?;
    let username = args
        .username
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    let name = global
        .profile
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_PROFILE);

    let mut config = Config::load().context("load config")?;
    config.set_profile(name, &username, &token, args.base_url.as_deref().unwrap_or_default());
    config.save().context("save config")?;

    println!("authenticated profile {:?}", name);
    if let Some(credential) = AuthCredential::from_parts(&username, &token) {
        println!("auth mode: {}", credential.mode_label());
    }
    Ok(())
}

fn resolve_token(args: &LoginArgs) -> Result<String> {
    let explicit = args.token.as_deref().map(str::trim).unwrap_or_default();
    if !explicit.is_empty() {
        return Ok(explicit.to_string());
    }
    // A bare `--token` means the same as `--with-token`.
    if args.with_token || args.token.is_some() {
        return read_token_from_stdin();
    }
    if let Some(token) = env_value(TOKEN_ENV) {
        return Ok(token);
    }
    if can_prompt() {
        let token = prompt_token()?;
        if !token.is_empty() {
            return Ok(token);
        }
    }
    bail!("token is required: use --token <value>, --with-token, or BITBUCKET_TOKEN")
}

fn status(global: &GlobalOptions) -> Result<()> {
    let config = Config::load().context("load config")?;
    let (name, profile) = config
        .active_profile(global.profile.as_deref())
        .map_err(|_| anyhow!(NOT_LOGGED_IN))?;

    let auth = match profile.username.trim() {
        "" => "bearer token".to_string(),
        user => format!("basic ({})", user),
    };

    if global.json {
        return global.output().write_json(&StatusReport {
            profile: &name,
            base_url: &profile.base_url,
            auth,
            token_configured: profile.has_token(),
        });
    }

    println!("Profile: {}", name);
    println!("Base URL: {}", profile.base_url);
    println!("Auth: {}", auth);
    println!(
        "Token: {}",
        if profile.has_token() {
            "configured"
        } else {
            "not configured"
        }
    );
    Ok(())
}

fn logout(global: &GlobalOptions) -> Result<()> {
    let mut config = Config::load().context("load config")?;
    let requested = global.profile.as_deref().unwrap_or_default();

    let (removed, ok) = config.remove_profile(requested);
    if !ok {
        if removed.trim().is_empty() {
            bail!(NOT_LOGGED_IN);
        }
        bail!("profile {:?} not found", removed);
    }
    config.save().context("save config")?;

    println!("logged out profile {:?}", removed);
    if !config.current.trim().is_empty() {
        println!("active profile: {:?}", config.current);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn login_args(argv: &[&str]) -> LoginArgs {
        let mut full = vec!["bb", "auth", "login"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            crate::cli::Commands::Auth(AuthCommand {
                command: AuthSubcommand::Login(args),
            }) => args,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_token_with_value() {
        let args = login_args(&["--token", "  secret  "]);
        assert_eq!(resolve_token(&args).unwrap(), "secret");
    }

    #[test]
    fn test_bare_token_flag_parses_as_empty() {
        let args = login_args(&["--token", "--username", "dev@example.com"]);
        assert_eq!(args.token.as_deref(), Some(""));
        assert_eq!(args.username.as_deref(), Some("dev@example.com"));
    }
}
