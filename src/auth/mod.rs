//
//  bitbucket-cloud-cli
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Bitbucket Cloud accepts two ways of presenting an API token:
//!
//! - **Bearer**: `Authorization: Bearer <token>`, used for repository,
//!   project, and workspace access tokens.
//! - **Basic**: `Authorization: Basic base64(<username>:<token>)`, used for
//!   personal API tokens and app passwords, where the token stands in for
//!   the password.
//!
//! The mode is chosen statically from the stored profile: a non-empty
//! username selects Basic, otherwise the token is sent as Bearer. Nothing is
//! negotiated with the server.
//!
//! ## Module Structure
//!
//! - [`token`]: Reading tokens from stdin, the environment, or a prompt
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_cloud_cli::auth::AuthCredential;
//!
//! let basic = AuthCredential::from_parts("dev@example.com", "secret");
//! assert!(matches!(basic, Some(AuthCredential::Basic { .. })));
//!
//! let bearer = AuthCredential::from_parts("", "secret");
//! assert!(matches!(bearer, Some(AuthCredential::Bearer { .. })));
//!
//! assert!(AuthCredential::from_parts("dev", "").is_none());
//! ```

mod token;

pub use token::*;

use std::fmt;

use reqwest::RequestBuilder;

/// Credentials attached to every API request.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthCredential {
    /// HTTP Basic authentication with the token as the password.
    Basic {
        /// Bitbucket username or Atlassian account e-mail.
        username: String,
        /// API token or app password.
        password: String,
    },
    /// Bearer token authentication.
    Bearer {
        /// The access token.
        token: String,
    },
}

impl AuthCredential {
    /// Picks the auth mode for a username/token pair.
    ///
    /// Returns `None` when the token is empty: the request then goes out
    /// unauthenticated and the server decides what that means. Surrounding
    /// whitespace on the username is ignored.
    pub fn from_parts(username: &str, token: &str) -> Option<Self> {
        if token.is_empty() {
            return None;
        }

        let username = username.trim();
        if username.is_empty() {
            Some(Self::Bearer {
                token: token.to_string(),
            })
        } else {
            Some(Self::Basic {
                username: username.to_string(),
                password: token.to_string(),
            })
        }
    }

    /// Adds the `Authorization` header for this credential.
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
            Self::Bearer { token } => request.bearer_auth(token),
        }
    }

    /// Short human-readable description of the mode, without secrets.
    pub fn mode_label(&self) -> String {
        match self {
            Self::Basic { username, .. } => format!("basic ({})", username),
            Self::Bearer { .. } => "bearer token".to_string(),
        }
    }
}

// Keep secrets out of debug logs.
impl fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Self::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
        }
    }
}
