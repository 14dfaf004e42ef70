//
//  bitbucket-cloud-cli
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Types for Bitbucket Cloud Responses
//!
//! Bitbucket Cloud paginates listings with a server-supplied `next` link:
//! every page is a JSON object with a `values` array and, when more data
//! exists, a fully-qualified `next` URL that already encodes the cursor.
//!
//! ```json
//! {
//!     "values": [{"slug": "repo1"}, {"slug": "repo2"}],
//!     "pagelen": 2,
//!     "next": "https://api.bitbucket.org/2.0/repositories/acme?page=2"
//! }
//! ```
//!
//! The client never constructs page numbers itself; it only follows `next`.
//! An absent, `null`, or empty `next` ends the listing.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// A listing record exactly as the server sent it.
pub type RawRecord = Box<RawValue>;

/// One page of a Bitbucket Cloud listing.
///
/// Records are kept as raw JSON so the client stays schema-agnostic: callers
/// decide what shape to impose when they render them. Pages are decoded,
/// drained of their `values`, and dropped.
///
/// # Example
///
/// ```rust
/// use bitbucket_cloud_cli::api::common::ListPage;
///
/// let json = r#"{
///     "values": [{"slug": "repo1"}],
///     "next": "https://api.bitbucket.org/2.0/repositories/acme?page=2"
/// }"#;
///
/// let page: ListPage = serde_json::from_str(json).unwrap();
/// assert_eq!(page.values.len(), 1);
/// assert_eq!(
///     page.next_url(),
///     Some("https://api.bitbucket.org/2.0/repositories/acme?page=2")
/// );
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ListPage {
    /// Records in this page, in server order.
    #[serde(default)]
    pub values: Vec<RawRecord>,

    /// Absolute URL of the following page.
    #[serde(default)]
    pub next: Option<String>,
}

impl ListPage {
    /// Returns the continuation link, treating an empty string as absent.
    pub fn next_url(&self) -> Option<&str> {
        self.next.as_deref().filter(|next| !next.trim().is_empty())
    }

    /// Checks if another page follows this one.
    pub fn has_next(&self) -> bool {
        self.next_url().is_some()
    }
}
