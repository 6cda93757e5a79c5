//! Token masking for anything echoed to the user or to logs.

use url::Url;
use url::form_urlencoded::byte_serialize;

/// Query parameter carrying the auth token.
pub const TOKEN_PARAM: &str = "X-Plex-Token";

/// Replacement shown instead of the token.
pub const MASK: &str = "****";

/// Replace the value of every `X-Plex-Token` query parameter with [`MASK`].
///
/// Strings that do not parse as URLs are returned unchanged.
pub fn mask_token_in_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };
    if !url.query_pairs().any(|(k, _)| k == TOKEN_PARAM) {
        return raw.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .into_owned()
        .map(|(k, v)| {
            if k == TOKEN_PARAM {
                (k, MASK.to_string())
            } else {
                (k, v)
            }
        })
        .collect();
    url.query_pairs_mut().clear().extend_pairs(pairs);
    url.into()
}

/// Masks a known token anywhere in free text (URLs, error messages).
#[derive(Clone)]
pub struct Redactor {
    token: String,
    encoded: String,
}

impl Redactor {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let encoded = byte_serialize(token.as_bytes()).collect::<String>();
        Self { token, encoded }
    }

    /// Mask the token parameter in URLs, then every literal occurrence of
    /// the token (raw or form-encoded).
    ///
    /// A token that is itself a substring of the mask cannot be told apart
    /// from it, so only the parameter pass applies then.
    pub fn redact(&self, text: &str) -> String {
        let mut out = mask_query_params(text);
        for needle in [&self.token, &self.encoded] {
            if needle.is_empty() || MASK.contains(needle.as_str()) {
                continue;
            }
            out = out.replace(needle.as_str(), MASK);
        }
        out
    }

    /// Mask a URL the client built. The token only ever travels in the
    /// query parameter, so host and path are left alone.
    pub fn redact_url(&self, url: &Url) -> String {
        mask_token_in_url(url.as_str())
    }
}

impl std::fmt::Debug for Redactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Redactor(****)")
    }
}

// Textual pass over `X-Plex-Token=<value>` so URLs embedded in longer
// messages are covered too.
fn mask_query_params(text: &str) -> String {
    let marker = format!("{TOKEN_PARAM}=");
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find(&marker) {
        let value_start = idx + marker.len();
        out.push_str(&rest[..value_start]);
        let tail = &rest[value_start..];
        let value_end = tail
            .find(|c: char| matches!(c, '&' | '#' | ' ' | ')' | '"' | '\'' | '\n'))
            .unwrap_or(tail.len());
        out.push_str(MASK);
        rest = &tail[value_end..];
    }
    out.push_str(rest);
    out
}
