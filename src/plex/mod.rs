//! Plex URL commands.
//!
//! PlexClient -> build_url / command / sections / refresh
//! Every URL carries `X-Plex-Token` as its first query parameter; anything
//! echoed back goes through [`redact::Redactor`].

pub mod redact;
pub mod transport;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::error::NetworkError;
use redact::{Redactor, TOKEN_PARAM};
use transport::HttpTransport;

/// A library section as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Outcome of a successful URL command.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub url: Url,
    pub status: u16,
    pub body: String,
}

/// Parameters of a library refresh.
#[derive(Debug, Clone, Default)]
pub struct RefreshRequest {
    pub section: String,
    pub force: bool,
    pub path: Option<String>,
}

pub struct PlexClient<'a> {
    config: &'a Config,
    transport: &'a dyn HttpTransport,
    redactor: Redactor,
}

impl<'a> PlexClient<'a> {
    pub fn new(config: &'a Config, transport: &'a dyn HttpTransport) -> Self {
        Self {
            config,
            transport,
            redactor: Redactor::new(config.token.clone()),
        }
    }

    pub fn redactor(&self) -> &Redactor {
        &self.redactor
    }

    /// Base URL + path segments (each percent-encoded) + token + params.
    pub fn build_url(&self, segments: &[&str], params: &[(&str, &str)]) -> Url {
        let mut url = self.config.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        // http(s) URLs always have a path base; validated at config load.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(TOKEN_PARAM, &self.config.token);
            for (k, v) in params {
                query.append_pair(k, v);
            }
        }
        url
    }

    /// Issue one GET URL command; non-2xx becomes [`NetworkError::Status`].
    pub fn command(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<CommandOutcome, NetworkError> {
        let url = self.build_url(segments, params);
        debug!(url = %self.redactor.redact_url(&url), "issuing URL command");
        let resp = self.transport.get(&url)?;
        if !resp.is_success() {
            return Err(NetworkError::Status {
                status: resp.status,
                url: self.redactor.redact_url(&url),
            });
        }
        Ok(CommandOutcome {
            url,
            status: resp.status,
            body: resp.body,
        })
    }

    /// List library sections.
    pub fn sections(&self) -> Result<Vec<Section>, NetworkError> {
        let outcome = self.command(&["library", "sections"], &[])?;
        let sections = parse_sections(&outcome.body)?;
        info!(count = sections.len(), "fetched sections");
        Ok(sections)
    }

    /// Trigger a section refresh, optionally forced and/or scoped to a path.
    pub fn refresh(&self, req: &RefreshRequest) -> Result<CommandOutcome, NetworkError> {
        let mut params: Vec<(&str, &str)> = Vec::new();
        if req.force {
            params.push(("force", "1"));
        }
        if let Some(p) = req.path.as_deref() {
            params.push(("path", p));
        }
        let outcome = self.command(
            &["library", "sections", req.section.as_str(), "refresh"],
            &params,
        )?;
        info!(section = %req.section, status = outcome.status, "refresh triggered");
        Ok(outcome)
    }
}

/* ---- Response decoding ---- */

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "MediaContainer")]
    media_container: MediaContainer,
}

#[derive(Deserialize, Default)]
struct MediaContainer {
    #[serde(rename = "Directory", default)]
    directory: Vec<Directory>,
}

#[derive(Deserialize)]
struct Directory {
    key: Option<serde_json::Value>,
    title: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Decode the `MediaContainer` listing. Directories without a key are skipped.
pub fn parse_sections(body: &str) -> Result<Vec<Section>, NetworkError> {
    let env: Envelope = serde_json::from_str(body)
        .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;
    let sections = env
        .media_container
        .directory
        .into_iter()
        .filter_map(|d| {
            let id = match d.key {
                Some(serde_json::Value::String(s)) => s,
                Some(serde_json::Value::Number(n)) => n.to_string(),
                _ => {
                    warn!(title = ?d.title, "skipping section without a key");
                    return None;
                }
            };
            Some(Section {
                id,
                title: d.title.unwrap_or_default(),
                kind: d.kind.unwrap_or_default(),
            })
        })
        .collect();
    Ok(sections)
}
