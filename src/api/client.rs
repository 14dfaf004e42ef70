//
//  bitbucket-cloud-cli
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for the Bitbucket Cloud API
//!
//! This module provides the request/response pipeline every command goes
//! through. It offers three operations, each building on the previous one:
//!
//! - [`ApiClient::request`]: one authenticated exchange, returning the live response
//! - [`ApiClient::do_json`] / [`ApiClient::do_discard`]: the same exchange with
//!   status checking, body release, and JSON decoding
//! - [`ApiClient::get_all_values`]: follows `next` links until a listing is complete
//!
//! ## Targets
//!
//! A target is either a path relative to the configured base URL
//! (`/repositories/acme`) or an absolute `http://`/`https://` URL, such as a
//! `next` link handed back by the server. Query parameters supplied by the
//! caller are appended in both cases and never replace ones already present.
//!
//! ## Headers
//!
//! Every request carries `Accept: application/json` and the client's
//! user agent. `Authorization` comes from the configured credential (see
//! [`AuthCredential`]). `Content-Type: application/json` is sent only when a
//! body is.

use std::fmt;

use anyhow::Result;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use super::common::{ApiError, ClientError, ListPage, RawRecord, ERROR_BODY_LIMIT};
use crate::auth::AuthCredential;

/// Default API root for Bitbucket Cloud.
pub const DEFAULT_BASE_URL: &str = "https://api.bitbucket.org/2.0";

/// Query parameters in the order they should be appended.
///
/// Keys may repeat; every pair is sent.
pub type Query = Vec<(String, String)>;

/// Returns the user agent sent with every request.
pub fn default_user_agent() -> String {
    format!("bb-cli/{}", crate::VERSION)
}

/// Connection settings for an [`ApiClient`].
///
/// Built once per invocation from the active profile and never modified
/// afterwards; the builder methods consume and return `self`.
///
/// # Example
///
/// ```rust
/// use bitbucket_cloud_cli::api::ClientConfig;
///
/// let config = ClientConfig::new("https://api.bitbucket.org/2.0///")
///     .with_token("secret")
///     .with_username("dev@example.com");
///
/// assert_eq!(config.base_url(), "https://api.bitbucket.org/2.0");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    token: Option<String>,
    username: Option<String>,
    user_agent: String,
}

impl ClientConfig {
    /// Creates a configuration for the given API root.
    ///
    /// Trailing slashes are stripped; a blank value falls back to
    /// [`DEFAULT_BASE_URL`].
    pub fn new(base_url: &str) -> Self {
        let trimmed = base_url.trim();
        let base_url = if trimmed.is_empty() {
            DEFAULT_BASE_URL
        } else {
            trimmed.trim_end_matches('/')
        };

        Self {
            base_url: base_url.to_string(),
            token: None,
            username: None,
            user_agent: default_user_agent(),
        }
    }

    /// Sets the API token. An empty token is the same as none.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.is_empty()).then_some(token);
        self
    }

    /// Sets the Basic auth username. Blank usernames select Bearer auth.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        let username = username.into().trim().to_string();
        self.username = (!username.is_empty()).then_some(username);
        self
    }

    /// Overrides the user agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The API root without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The configured username, if any.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// True when a token is configured.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// The user agent sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The credential requests will carry, if any.
    pub fn credential(&self) -> Option<AuthCredential> {
        AuthCredential::from_parts(
            self.username.as_deref().unwrap_or_default(),
            self.token.as_deref().unwrap_or_default(),
        )
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("username", &self.username)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// The HTTP client for the Bitbucket Cloud REST API.
///
/// The transport is injected so tests and callers control its settings;
/// [`ApiClient::from_config`] builds a default one. Calls are independent of
/// each other and the client holds no mutable state.
///
/// # Example
///
/// ```rust,no_run
/// use bitbucket_cloud_cli::api::{ApiClient, ClientConfig};
/// use reqwest::Method;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = ApiClient::from_config(ClientConfig::new("").with_token("secret"))?;
///
/// let user: serde_json::Value = client.do_json(Method::GET, "/user", &[], None).await?;
/// let repos = client.get_all_values("/repositories/acme", &[]).await?;
/// println!("{} owns {} repositories", user["display_name"], repos.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ApiClient {
    /// The underlying HTTP transport
    http: Client,
    /// Connection settings
    config: ClientConfig,
    /// Credential resolved from the settings
    auth: Option<AuthCredential>,
}

impl ApiClient {
    /// Creates a client over an existing transport.
    pub fn new(config: ClientConfig, http: Client) -> Self {
        let auth = config.credential();
        Self { http, config, auth }
    }

    /// Creates a client with a freshly built transport.
    ///
    /// No timeout is configured on the transport; deadlines belong to the
    /// caller.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent().to_string())
            .build()?;
        Ok(Self::new(config, http))
    }

    /// The settings this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolves a target into the URL that will be requested.
    ///
    /// Absolute `http://` and `https://` targets are used as they are.
    /// Anything else is joined to the base URL with exactly one slash. In
    /// both cases `query` is appended after any query string already on
    /// the target.
    pub fn build_url(&self, target: &str, query: &[(String, String)]) -> Result<Url, ClientError> {
        let raw = if is_absolute_url(target) {
            target.to_string()
        } else {
            let path = target.trim().trim_start_matches('/');
            format!("{}/{}", self.config.base_url, path)
        };

        let mut url = Url::parse(&raw).map_err(|source| ClientError::InvalidUrl {
            url: raw.clone(),
            source,
        })?;

        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        Ok(url)
    }

    /// Performs one authenticated request and returns the unread response.
    ///
    /// The status is not inspected. The response body is released when the
    /// returned [`Response`] is consumed or dropped.
    ///
    /// # Errors
    ///
    /// Returns a transport-kind [`ClientError`] when the URL is invalid or
    /// no response was received (DNS, connect, TLS, timeout, cancellation).
    pub async fn request(
        &self,
        method: Method,
        target: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Response, ClientError> {
        let url = self.build_url(target, query)?;
        debug!(%method, %url, "api request");

        let mut request = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, self.config.user_agent());

        if let Some(auth) = &self.auth {
            request = auth.apply_to_request(request);
        }

        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_string());
        }

        let response = request.send().await.map_err(ClientError::Transport)?;
        debug!(status = response.status().as_u16(), "api response");
        Ok(response)
    }

    /// Performs a request and decodes the JSON response into `T`.
    ///
    /// # Errors
    ///
    /// - transport failures as in [`ApiClient::request`]
    /// - [`ClientError::Api`] for status >= 400, with up to 4 KiB of the body
    /// - [`ClientError::Decode`] (`decode response`) when a successful body
    ///   is not valid JSON for `T`
    pub async fn do_json<T: DeserializeOwned>(
        &self,
        method: Method,
        target: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<T, ClientError> {
        self.fetch_json(method, target, query, body, "decode response")
            .await
    }

    /// Performs a request whose response body is not wanted.
    ///
    /// The body is read to the end and dropped so the connection can be
    /// reused. Error handling matches [`ApiClient::do_json`] minus decoding.
    pub async fn do_discard(
        &self,
        method: Method,
        target: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<(), ClientError> {
        let response = self.request(method, target, query, body).await?;
        let mut response = ensure_success(response).await?;

        while response
            .chunk()
            .await
            .map_err(ClientError::ReadBody)?
            .is_some()
        {}

        Ok(())
    }

    /// Fetches every page of a listing and returns all records in order.
    ///
    /// `query` is sent with the first request only. Later requests go to the
    /// server's `next` link as given, since it already carries the cursor and
    /// the original filters.
    ///
    /// # Errors
    ///
    /// The first failing page aborts the walk and its error is returned;
    /// records from earlier pages are discarded. A listing page that does not
    /// decode yields [`ClientError::Decode`] (`decode listing page`).
    pub async fn get_all_values(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Vec<RawRecord>, ClientError> {
        let mut next = Some(path.to_string());
        let mut current_query = query;
        let mut all = Vec::new();
        let mut pages = 0usize;

        while let Some(target) = next.take() {
            let page: ListPage = self
                .fetch_json(Method::GET, &target, current_query, None, "decode listing page")
                .await?;

            pages += 1;
            next = page.next_url().map(str::to_string);
            trace!(page = pages, records = page.values.len(), has_next = next.is_some(), "listing page");

            all.extend(page.values);
            current_query = &[];
        }

        debug!(pages, records = all.len(), "listing complete");
        Ok(all)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        method: Method,
        target: &str,
        query: &[(String, String)],
        body: Option<&Value>,
        context: &'static str,
    ) -> Result<T, ClientError> {
        let response = self.request(method, target, query, body).await?;
        let response = ensure_success(response).await?;

        let bytes = response.bytes().await.map_err(ClientError::ReadBody)?;
        serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode { context, source })
    }
}

/// Passes successful responses through and turns the rest into [`ApiError`].
///
/// At most [`ERROR_BODY_LIMIT`] bytes of an error body are read; a read
/// failure part-way keeps whatever arrived.
async fn ensure_success(mut response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.as_u16() < 400 {
        return Ok(response);
    }

    let mut captured = Vec::new();
    while captured.len() < ERROR_BODY_LIMIT {
        match response.chunk().await {
            Ok(Some(chunk)) => captured.extend_from_slice(&chunk),
            Ok(None) => break,
            Err(err) => {
                debug!(error = %err, "error body read interrupted");
                break;
            }
        }
    }

    Err(ApiError::from_raw_body(status.as_u16(), &captured).into())
}

fn is_absolute_url(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::ErrorKind;
    use base64::Engine;
    use mockito::Matcher;
    use serde_json::json;

    fn client(config: ClientConfig) -> ApiClient {
        ApiClient::new(config, Client::new())
    }

    fn base(server: &mockito::ServerGuard) -> String {
        format!("{}/2.0", server.url())
    }

    fn q(pairs: &[(&str, &str)]) -> Query {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn raw_strings(values: &[RawRecord]) -> Vec<String> {
        values.iter().map(|v| v.get().to_string()).collect()
    }

    #[test]
    fn test_config_defaults_and_trimming() {
        let config = ClientConfig::new("   ");
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert!(!config.has_token());
        assert!(config.credential().is_none());
        assert_eq!(config.user_agent(), default_user_agent());

        let config = ClientConfig::new("https://example.com/api//").with_username("  ");
        assert_eq!(config.base_url(), "https://example.com/api");
        assert_eq!(config.username(), None);
    }

    #[test]
    fn test_config_debug_hides_token() {
        let config = ClientConfig::new("").with_token("s3cr3t");
        assert!(!format!("{:?}", config).contains("s3cr3t"));
    }

    #[test]
    fn test_build_url_joins_with_single_slash() {
        let expected = "https://api.example.com/2.0/repositories/acme";
        for (base_url, path) in [
            ("https://api.example.com/2.0", "repositories/acme"),
            ("https://api.example.com/2.0/", "/repositories/acme"),
            ("https://api.example.com/2.0//", "//repositories/acme"),
            ("https://api.example.com/2.0", "  /repositories/acme  "),
        ] {
            let client = ApiClient::new(ClientConfig::new(base_url), Client::new());
            let url = client.build_url(path, &[]).unwrap();
            assert_eq!(url.as_str(), expected, "base {base_url:?} path {path:?}");
        }
    }

    #[test]
    fn test_build_url_sets_query_on_relative_path() {
        let client = ApiClient::new(ClientConfig::new("https://api.example.com/2.0"), Client::new());
        let url = client
            .build_url("/repositories/acme", &q(&[("q", "name ~ \"x\""), ("sort", "-updated_on")]))
            .unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, q(&[("q", "name ~ \"x\""), ("sort", "-updated_on")]));
        assert_eq!(url.path(), "/2.0/repositories/acme");
    }

    #[test]
    fn test_build_url_merges_query_into_absolute_url() {
        let client = ApiClient::new(ClientConfig::new("https://api.example.com/2.0"), Client::new());
        let url = client
            .build_url("https://other.example.com/x?from=next", &q(&[("page", "2")]))
            .unwrap();
        assert_eq!(url.host_str(), Some("other.example.com"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("from".to_string(), "next".to_string())));
        assert!(pairs.contains(&("page".to_string(), "2".to_string())));
    }

    #[test]
    fn test_build_url_keeps_absolute_url_without_query() {
        let client = ApiClient::new(ClientConfig::new(""), Client::new());
        let url = client
            .build_url("http://example.com/2.0/pages?cursor=abc", &[])
            .unwrap();
        assert_eq!(url.as_str(), "http://example.com/2.0/pages?cursor=abc");
    }

    #[test]
    fn test_build_url_rejects_malformed_absolute_url() {
        let client = ApiClient::new(ClientConfig::new(""), Client::new());
        let err = client.build_url("http://[::1", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_bearer_auth_and_fixed_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/2.0/user")
            .match_header("authorization", "Bearer tok")
            .match_header("accept", "application/json")
            .match_header("user-agent", default_user_agent().as_str())
            .match_header("content-type", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"username": "alice"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client(ClientConfig::new(&base(&server)).with_token("tok"));
        let user: Value = client.do_json(Method::GET, "/user", &[], None).await.unwrap();

        assert_eq!(user["username"], "alice");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_basic_auth_when_username_configured() {
        let mut server = mockito::Server::new_async().await;
        let encoded = base64::engine::general_purpose::STANDARD.encode("alice@example.com:tok");
        let mock = server
            .mock("GET", "/2.0/user")
            .match_header("authorization", format!("Basic {}", encoded).as_str())
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let config = ClientConfig::new(&base(&server))
            .with_username("alice@example.com")
            .with_token("tok");
        let client = client(config);
        let _: Value = client.do_json(Method::GET, "user", &[], None).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_authorization_without_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/2.0/repositories")
            .match_header("authorization", Matcher::Missing)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let client = client(ClientConfig::new(&base(&server)));
        client
            .do_discard(Method::GET, "/repositories", &[], None)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_body_sets_content_type() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/2.0/repositories/acme/widgets/issues")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"title": "Broken"})))
            .with_status(201)
            .with_body(r#"{"id": 7}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client(ClientConfig::new(&base(&server)).with_token("tok"));
        let body = json!({"title": "Broken"});
        let created: Value = client
            .do_json(Method::POST, "/repositories/acme/widgets/issues", &[], Some(&body))
            .await
            .unwrap();

        assert_eq!(created["id"], 7);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_request_returns_raw_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/2.0/thing")
            .with_status(404)
            .with_body("nope")
            .create_async()
            .await;

        let client = client(ClientConfig::new(&base(&server)));
        let response = client.request(Method::GET, "thing", &[], None).await.unwrap();
        assert_eq!(response.status().as_u16(), 404);
        assert_eq!(response.text().await.unwrap(), "nope");
    }

    #[tokio::test]
    async fn test_api_error_carries_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/2.0/bad")
            .with_status(400)
            .with_body("  bad request \n")
            .create_async()
            .await;

        let client = client(ClientConfig::new(&base(&server)));
        let err = client
            .do_json::<Value>(Method::GET, "/bad", &[], None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.as_api_error(), Some(&ApiError::new(400, "bad request")));
        let message = err.to_string();
        assert!(message.contains("400"));
        assert!(message.contains("bad request"));
    }

    #[tokio::test]
    async fn test_api_error_body_is_capped() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/2.0/huge")
            .with_status(500)
            .with_body("e".repeat(ERROR_BODY_LIMIT * 4))
            .create_async()
            .await;

        let client = client(ClientConfig::new(&base(&server)));
        let err = client
            .do_discard(Method::GET, "/huge", &[], None)
            .await
            .unwrap_err();

        let api = err.as_api_error().unwrap();
        assert_eq!(api.status, 500);
        assert_eq!(api.body.len(), ERROR_BODY_LIMIT);
    }

    #[tokio::test]
    async fn test_empty_error_body_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/2.0/gone")
            .with_status(503)
            .create_async()
            .await;

        let client = client(ClientConfig::new(&base(&server)));
        let err = client
            .do_discard(Method::DELETE, "/gone", &[], None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "api request failed: status 503");
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/2.0/broken")
            .with_status(200)
            .with_body("{invalid")
            .create_async()
            .await;

        let client = client(ClientConfig::new(&base(&server)));
        let err = client
            .do_json::<Value>(Method::GET, "/broken", &[], None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.as_api_error().is_none());
        assert!(err.to_string().starts_with("decode response: "));
    }

    #[tokio::test]
    async fn test_discard_ignores_non_json_success_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/2.0/hook")
            .with_status(204)
            .with_body("not json at all")
            .create_async()
            .await;

        let client = client(ClientConfig::new(&base(&server)));
        client
            .do_discard(Method::POST, "/hook", &[], Some(&json!({})))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_closed_port_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = ApiClient::new(
            ClientConfig::new(&format!("http://127.0.0.1:{}/2.0", port)),
            Client::new(),
        );
        let err = client
            .do_json::<Value>(Method::GET, "/user", &[], None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.as_api_error().is_none());
        assert!(err.to_string().starts_with("execute request: "));
    }

    #[tokio::test]
    async fn test_get_all_values_follows_next_links_in_order() {
        let mut server = mockito::Server::new_async().await;
        let page2 = format!("{}/2.0/repositories/acme?page=2", server.url());
        let page3 = format!("{}/2.0/repositories/acme?page=3", server.url());

        let first = server
            .mock("GET", "/2.0/repositories/acme")
            .match_query(Matcher::UrlEncoded("q".into(), "is_private=true".into()))
            .with_body(json!({"values": [{"slug": "a"}, {"slug": "b"}], "next": page2}).to_string())
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/2.0/repositories/acme")
            .match_query(Matcher::Exact("page=2".into()))
            .with_body(json!({"values": [{"slug": "c"}], "next": page3}).to_string())
            .expect(1)
            .create_async()
            .await;
        let third = server
            .mock("GET", "/2.0/repositories/acme")
            .match_query(Matcher::Exact("page=3".into()))
            .with_body(json!({"values": [{"slug": "d"}], "next": ""}).to_string())
            .expect(1)
            .create_async()
            .await;

        let client = client(ClientConfig::new(&base(&server)).with_token("tok"));
        let values = client
            .get_all_values("/repositories/acme", &q(&[("q", "is_private=true")]))
            .await
            .unwrap();

        assert_eq!(
            raw_strings(&values),
            vec![
                r#"{"slug":"a"}"#,
                r#"{"slug":"b"}"#,
                r#"{"slug":"c"}"#,
                r#"{"slug":"d"}"#,
            ]
        );
        first.assert_async().await;
        second.assert_async().await;
        third.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_all_values_single_page() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/2.0/repositories/acme/widgets/issues")
            .with_body(r#"{"values": []}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client(ClientConfig::new(&base(&server)));
        let values = client
            .get_all_values("repositories/acme/widgets/issues", &[])
            .await
            .unwrap();

        assert!(values.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_all_values_fails_without_partial_results() {
        let mut server = mockito::Server::new_async().await;
        let page2 = format!("{}/2.0/pages/2", server.url());
        server
            .mock("GET", "/2.0/pages")
            .with_body(json!({"values": [1, 2, 3], "next": page2}).to_string())
            .create_async()
            .await;
        server
            .mock("GET", "/2.0/pages/2")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = client(ClientConfig::new(&base(&server)));
        let result = client.get_all_values("/pages", &[]).await;

        let err = result.unwrap_err();
        assert_eq!(err.as_api_error(), Some(&ApiError::new(500, "boom")));
    }

    #[tokio::test]
    async fn test_get_all_values_bad_page_is_listing_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/2.0/pages")
            .with_body(r#"{"values": "not a list"}"#)
            .create_async()
            .await;

        let client = client(ClientConfig::new(&base(&server)));
        let err = client.get_all_values("/pages", &[]).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.to_string().starts_with("decode listing page: "));
    }

    #[tokio::test]
    async fn test_get_all_values_unreachable_next_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut server = mockito::Server::new_async().await;
        let dead_next = format!("http://127.0.0.1:{}/2.0/pages?page=2", port);
        server
            .mock("GET", "/2.0/pages")
            .with_body(json!({"values": [1], "next": dead_next}).to_string())
            .create_async()
            .await;

        let client = client(ClientConfig::new(&base(&server)));
        let err = client.get_all_values("/pages", &[]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
