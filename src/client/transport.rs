//! Network transport used by the fetch client
//!
//! The [`Transport`] trait is the seam between retry logic and the network:
//! the fetch client only sees a status code and a body, or a transport
//! error. [`ReqwestTransport`] is the production implementation.

use crate::client::ProxyPool;
use crate::config::FetchConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, PRAGMA};
use reqwest::{Client, Proxy};
use std::collections::HashMap;
use thiserror::Error;

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Failure below the HTTP status level
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("no client configured for proxy {0}")]
    UnknownProxy(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}

/// Issues a single GET request, optionally through a proxy
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, proxy: Option<&str>) -> Result<TransportResponse, TransportError>;
}

/// reqwest-backed transport
///
/// reqwest binds proxies at client construction, so one pooled client is
/// built per proxy plus one for direct traffic.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    direct: Client,
    proxied: HashMap<String, Client>,
}

impl ReqwestTransport {
    /// Builds clients for direct traffic and for every proxy in the pool
    ///
    /// # Returns
    ///
    /// * `Ok(ReqwestTransport)` - All clients built
    /// * `Err(reqwest::Error)` - A client or proxy could not be configured
    pub fn new(config: &FetchConfig, proxies: &ProxyPool) -> Result<Self, reqwest::Error> {
        let direct = build_http_client(config, None)?;

        let mut proxied = HashMap::with_capacity(proxies.len());
        for proxy in proxies.iter() {
            let client = build_http_client(config, Some(Proxy::all(proxy)?))?;
            proxied.insert(proxy.to_string(), client);
        }

        Ok(Self { direct, proxied })
    }

    fn client_for(&self, proxy: Option<&str>) -> Result<&Client, TransportError> {
        match proxy {
            None => Ok(&self.direct),
            Some(p) => self
                .proxied
                .get(p)
                .ok_or_else(|| TransportError::UnknownProxy(p.to_string())),
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, proxy: Option<&str>) -> Result<TransportResponse, TransportError> {
        let client = self.client_for(proxy)?;
        let response = client.get(url).send().await?;
        let status = response.status().as_u16();
        // Lossy decoding: malformed bytes never fail a fetch
        let bytes = response.bytes().await?;
        let body = String::from_utf8_lossy(&bytes).into_owned();
        Ok(TransportResponse { status, body })
    }
}

/// Browser-like headers sent with every request
fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers
}

/// Builds an HTTP client with the configured identity and timeouts
pub fn build_http_client(config: &FetchConfig, proxy: Option<Proxy>) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(default_headers())
        .timeout(config.request_timeout())
        .connect_timeout(config.connect_timeout())
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = proxy {
        builder = builder.proxy(proxy);
    }

    builder.build()
}
