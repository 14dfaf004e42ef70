//
//  bitbucket-cloud-cli
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the Bitbucket Cloud client
//!
//! This module holds the error taxonomy shared by every client operation and
//! the listing page shape used while following pagination.
//!
//! # Overview
//!
//! - [`ClientError`] - Everything a client call can fail with
//! - [`ErrorKind`] - The three disjoint error kinds callers branch on
//! - [`ApiError`] - A failure reported by the remote service (status >= 400)
//! - [`ListPage`] - One page of a paginated listing (re-exported from [`pagination`])
//!
//! # Example
//!
//! ```rust
//! use bitbucket_cloud_cli::api::common::{ApiError, ClientError, ErrorKind};
//!
//! fn describe(err: &ClientError) -> &'static str {
//!     match err.kind() {
//!         ErrorKind::Transport => "could not reach Bitbucket",
//!         ErrorKind::Api => "Bitbucket rejected the request",
//!         ErrorKind::Decode => "Bitbucket sent something unexpected",
//!     }
//! }
//!
//! let err = ClientError::from(ApiError::new(404, "not found"));
//! assert_eq!(describe(&err), "Bitbucket rejected the request");
//! ```

use std::fmt;

use thiserror::Error;

mod pagination;

pub use pagination::*;

/// Maximum number of bytes of an error response body kept in an [`ApiError`].
pub const ERROR_BODY_LIMIT: usize = 4 * 1024;

/// A failure reported by the remote service.
///
/// Carries the HTTP status code and a trimmed excerpt of the response body,
/// capped at [`ERROR_BODY_LIMIT`] bytes. The client applies no special
/// handling per status code; the helpers below exist so callers can pick an
/// exit code or hint without matching on numbers.
///
/// # Example
///
/// ```rust
/// use bitbucket_cloud_cli::api::common::ApiError;
///
/// let err = ApiError::new(400, "bad request");
/// assert_eq!(err.to_string(), "api request failed: status 400: bad request");
///
/// let empty = ApiError::new(502, "");
/// assert_eq!(empty.to_string(), "api request failed: status 502");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code, always >= 400.
    pub status: u16,
    /// Trimmed, size-capped response body. May be empty.
    pub body: String,
}

impl ApiError {
    /// Creates an API error from a status code and body excerpt.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Builds an error from a raw (possibly truncated) body.
    ///
    /// Invalid UTF-8 left over from truncating mid-character is replaced
    /// rather than rejected.
    pub fn from_raw_body(status: u16, raw: &[u8]) -> Self {
        let limit = raw.len().min(ERROR_BODY_LIMIT);
        let text = String::from_utf8_lossy(&raw[..limit]);
        Self::new(status, text.trim())
    }

    /// 401 Unauthorized: the credentials were rejected.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// 403 Forbidden: authenticated but lacking permission.
    pub fn is_forbidden(&self) -> bool {
        self.status == 403
    }

    /// 404 Not Found: bad path or an inaccessible resource.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// 429 Too Many Requests.
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.is_empty() {
            write!(f, "api request failed: status {}", self.status)
        } else {
            write!(f, "api request failed: status {}: {}", self.status, self.body)
        }
    }
}

impl std::error::Error for ApiError {}

/// The three disjoint ways a client call can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No HTTP response was obtained (bad URL, DNS, connect, TLS, cancelled).
    Transport,
    /// The service answered with a status >= 400.
    Api,
    /// The service answered successfully but the body did not decode.
    Decode,
}

/// Error type for all [`ApiClient`](crate::api::ApiClient) operations.
///
/// Every variant maps onto exactly one [`ErrorKind`]; use
/// [`ClientError::kind`] to branch without string matching. None of these
/// are retried inside the client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The target could not be turned into a valid URL.
    #[error("parse URL {url:?}: {source}")]
    InvalidUrl {
        /// The URL text that failed to parse.
        url: String,
        /// The parser's complaint.
        #[source]
        source: url::ParseError,
    },

    /// The request could not be sent or no response arrived.
    #[error("execute request: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response body stream failed before it was fully read.
    #[error("read response: {0}")]
    ReadBody(#[source] reqwest::Error),

    /// The service reported a failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A successful response carried a body that did not match the target.
    #[error("{context}: {source}")]
    Decode {
        /// Which decode phase failed.
        context: &'static str,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Returns the error kind for this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUrl { .. } | Self::Transport(_) | Self::ReadBody(_) => {
                ErrorKind::Transport
            }
            Self::Api(_) => ErrorKind::Api,
            Self::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// Returns the API error when the service reported one.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// True when a deadline or cancellation ended the request.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(err) | Self::ReadBody(err) => err.is_timeout(),
            _ => false,
        }
    }
}
