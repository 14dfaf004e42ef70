//
//  bitbucket-cloud-cli
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the HTTP client every command talks to Bitbucket
//! Cloud through (REST API v2.0 at `api.bitbucket.org`).
//!
//! ## Architecture
//!
//! - [`client`]: Request building, authentication, status checking, decoding, pagination
//! - [`common`]: Shared types (error taxonomy, listing pages)
//!
//! The client is schema-agnostic. Commands pick the paths and the shapes
//! they decode into; the client only knows about `values` and `next`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bitbucket_cloud_cli::api::{ApiClient, ClientConfig};
//!
//! let client = ApiClient::from_config(
//!     ClientConfig::new("https://api.bitbucket.org/2.0").with_token("your-token"),
//! )
//! .expect("Failed to create client");
//! ```
//!
//! ## Error Handling
//!
//! Every operation fails with a [`ClientError`] whose [`ErrorKind`] is one of:
//!
//! - `Transport`: no response (bad URL, network, TLS, cancellation)
//! - `Api`: status >= 400, carrying an [`ApiError`] with the status and body excerpt
//! - `Decode`: a successful response whose body did not decode

/// Core HTTP client wrapper for the Bitbucket Cloud API.
pub mod client;

/// Types shared by all client operations.
pub mod common;

pub use client::{ApiClient, ClientConfig, Query, DEFAULT_BASE_URL};

pub use common::{ApiError, ClientError, ErrorKind, ListPage, RawRecord};
