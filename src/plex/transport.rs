//! HTTP transport seam.
//!
//! `HttpTransport` is the only place an outbound request happens. The real
//! implementation drives an async `reqwest` client on a private
//! current-thread Tokio runtime, so callers stay synchronous.

use std::time::Duration;

use reqwest::header::ACCEPT;
use tracing::{debug, trace};
use url::Url;

use super::redact::Redactor;
use crate::error::NetworkError;

/// Fixed timeout for a single URL command.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Raw result of one GET (any status code).
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One blocking GET. Non-2xx statuses are returned, not raised; only
/// transport-level failures become errors here.
pub trait HttpTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, NetworkError>;
}

pub struct ReqwestTransport {
    rt: tokio::runtime::Runtime,
    client: reqwest::Client,
    timeout: Duration,
    redactor: Redactor,
}

impl ReqwestTransport {
    pub fn new(redactor: Redactor) -> Result<Self, NetworkError> {
        Self::with_timeout(redactor, HTTP_TIMEOUT)
    }

    pub fn with_timeout(redactor: Redactor, timeout: Duration) -> Result<Self, NetworkError> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| NetworkError::Client(e.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("plexctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NetworkError::Client(e.without_url().to_string()))?;
        Ok(Self {
            rt,
            client,
            timeout,
            redactor,
        })
    }

    fn classify(&self, url: &Url, err: reqwest::Error) -> NetworkError {
        let base = base_of(url);
        if err.is_timeout() {
            return NetworkError::Timeout {
                base,
                secs: self.timeout.as_secs().max(1),
            };
        }
        let reason = self.redactor.redact(&error_chain(err.without_url()));
        NetworkError::Unreachable { base, reason }
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, NetworkError> {
        debug!(url = %self.redactor.redact_url(url), "GET");
        self.rt.block_on(async {
            let resp = self
                .client
                .get(url.clone())
                .header(ACCEPT, "application/json")
                .send()
                .await
                .map_err(|e| self.classify(url, e))?;
            let status = resp.status().as_u16();
            let body = resp.text().await.map_err(|e| self.classify(url, e))?;
            trace!(status, bytes = body.len(), "response received");
            Ok::<_, NetworkError>(HttpResponse { status, body })
        })
    }
}

/// Scheme + authority + path, no query (never carries the token).
pub fn base_of(url: &Url) -> String {
    let mut base = url.clone();
    base.set_query(None);
    base.set_fragment(None);
    base.to_string()
}

// reqwest's top-level Display is terse ("error sending request"); the cause
// ("connection refused") lives in the source chain.
fn error_chain(err: reqwest::Error) -> String {
    let mut msg = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(s) = source {
        msg.push_str(": ");
        msg.push_str(&s.to_string());
        source = s.source();
    }
    msg
}
