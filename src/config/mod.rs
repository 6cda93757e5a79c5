//! Configuration loading (`.env` file + process environment + defaults).
//!
//! Precedence per key: process environment > env file > built-in default.
//! Empty / whitespace-only values count as unset. `PLEX_TOKEN` has no
//! default; loading fails without it, before any issuer exists.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:32400";
pub const DEFAULT_CONTAINER: &str = "plex";
pub const DEFAULT_RUNTIME: &str = "docker";
pub const DEFAULT_SCANNER_PATH: &str = "/usr/lib/plexmediaserver/Plex Media Scanner";
pub const DEFAULT_ENV_FILE: &str = ".env";

pub const KEY_BASE_URL: &str = "PLEX_BASE_URL";
pub const KEY_TOKEN: &str = "PLEX_TOKEN";
pub const KEY_CONTAINER: &str = "PLEX_CONTAINER";
pub const KEY_RUNTIME: &str = "PLEX_RUNTIME";
pub const KEY_SCANNER_PATH: &str = "PLEX_SCANNER_PATH";

/// Immutable settings for one invocation.
#[derive(Clone)]
pub struct Config {
    pub base_url: Url,
    pub token: String,
    pub container: String,
    pub runtime: String,
    pub scanner_path: String,
}

// Manual impl keeps the token out of debug output.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"****")
            .field("container", &self.container)
            .field("runtime", &self.runtime)
            .field("scanner_path", &self.scanner_path)
            .finish()
    }
}

impl Config {
    /// Load from an env file and the real process environment.
    ///
    /// `explicit` is the user-supplied `--env-file`; when absent the default
    /// `.env` in the working directory is tried and silently skipped if missing.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let file_vars = match explicit {
            Some(path) => read_env_file(path)?,
            None => {
                let path = PathBuf::from(DEFAULT_ENV_FILE);
                if path.is_file() {
                    read_env_file(&path)?
                } else {
                    debug!("no {} file in working directory", DEFAULT_ENV_FILE);
                    HashMap::new()
                }
            }
        };
        Self::resolve(&file_vars, |k| std::env::var(k).ok())
    }

    /// Merge file values under an environment lookup and apply defaults.
    pub fn resolve<F>(file_vars: &HashMap<String, String>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |v: Option<String>| {
            v.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };
        let lookup = |key: &str| -> Option<String> {
            present(env(key)).or_else(|| present(file_vars.get(key).cloned()))
        };

        let token = lookup(KEY_TOKEN).ok_or(ConfigError::MissingKey { key: KEY_TOKEN })?;
        let raw_base = lookup(KEY_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&raw_base)?;

        Ok(Config {
            base_url,
            token,
            container: lookup(KEY_CONTAINER).unwrap_or_else(|| DEFAULT_CONTAINER.to_string()),
            runtime: lookup(KEY_RUNTIME).unwrap_or_else(|| DEFAULT_RUNTIME.to_string()),
            scanner_path: lookup(KEY_SCANNER_PATH)
                .unwrap_or_else(|| DEFAULT_SCANNER_PATH.to_string()),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
        key: KEY_BASE_URL,
        message: format!("'{raw}' is not a valid URL ({e})"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidValue {
            key: KEY_BASE_URL,
            message: format!("unsupported scheme '{other}' (expected http or https)"),
        }),
    }
}

/// Read and parse an env file.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded env file");
    Ok(parse_env(&content))
}

/// Parse `KEY=VALUE` lines. Comments, blank lines and lines without `=` are
/// skipped; an `export ` prefix and matching outer quotes are stripped.
pub fn parse_env(content: &str) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        vars.insert(key.to_string(), strip_quotes(value).to_string());
    }
    vars
}

fn strip_quotes(value: &str) -> &str {
    let v = value.trim();
    let b = v.as_bytes();
    if b.len() >= 2 && (b[0] == b'"' || b[0] == b'\'') && b[0] == b[b.len() - 1] {
        return &v[1..v.len() - 1];
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn vars(content: &str) -> HashMap<String, String> {
        parse_env(content)
    }

    #[test]
    fn parse_env_basic() {
        let v = vars(
            r#"
# comment
PLEX_TOKEN=abc123
export PLEX_CONTAINER = "plex-server"
PLEX_BASE_URL='http://10.0.0.2:32400'
garbage line
=novalue
"#,
        );
        assert_eq!(v.get("PLEX_TOKEN").map(String::as_str), Some("abc123"));
        assert_eq!(
            v.get("PLEX_CONTAINER").map(String::as_str),
            Some("plex-server")
        );
        assert_eq!(
            v.get("PLEX_BASE_URL").map(String::as_str),
            Some("http://10.0.0.2:32400")
        );
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn strip_quotes_only_matching_pairs() {
        assert_eq!(strip_quotes("\"x\""), "x");
        assert_eq!(strip_quotes("'x'"), "x");
        assert_eq!(strip_quotes("\"x'"), "\"x'");
        assert_eq!(strip_quotes("\""), "\"");
    }

    #[test]
    fn missing_token_is_config_error() {
        for content in ["", "PLEX_BASE_URL=http://h:1\n", "PLEX_TOKEN=\n", "PLEX_TOKEN=   \n"] {
            let err = Config::resolve(&vars(content), no_env).unwrap_err();
            assert!(
                matches!(err, ConfigError::MissingKey { key: KEY_TOKEN }),
                "content {content:?} should fail"
            );
        }
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = Config::resolve(&vars("PLEX_TOKEN=t"), no_env).unwrap();
        assert_eq!(cfg.base_url.as_str(), "http://127.0.0.1:32400/");
        assert_eq!(cfg.container, DEFAULT_CONTAINER);
        assert_eq!(cfg.runtime, DEFAULT_RUNTIME);
        assert_eq!(cfg.scanner_path, DEFAULT_SCANNER_PATH);
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let cfg = Config::resolve(
            &vars("PLEX_TOKEN=t\nPLEX_BASE_URL=\nPLEX_CONTAINER=  \n"),
            no_env,
        )
        .unwrap();
        assert_eq!(cfg.base_url.as_str(), "http://127.0.0.1:32400/");
        assert_eq!(cfg.container, "plex");
    }

    #[test]
    fn environment_overrides_file() {
        let env = |k: &str| match k {
            "PLEX_TOKEN" => Some("from-env".to_string()),
            "PLEX_CONTAINER" => Some("".to_string()),
            _ => None,
        };
        let cfg = Config::resolve(
            &vars("PLEX_TOKEN=from-file\nPLEX_CONTAINER=pms\n"),
            env,
        )
        .unwrap();
        assert_eq!(cfg.token, "from-env");
        // empty env value does not shadow the file
        assert_eq!(cfg.container, "pms");
    }

    #[test]
    fn environment_values_are_trimmed() {
        let env = |k: &str| match k {
            "PLEX_TOKEN" => Some(" t ".to_string()),
            "PLEX_CONTAINER" => Some(" plex ".to_string()),
            "PLEX_RUNTIME" => Some("\tpodman\n".to_string()),
            "PLEX_SCANNER_PATH" => Some(" /opt/Plex Media Scanner ".to_string()),
            _ => None,
        };
        let cfg = Config::resolve(&HashMap::new(), env).unwrap();
        assert_eq!(cfg.token, "t");
        assert_eq!(cfg.container, "plex");
        assert_eq!(cfg.runtime, "podman");
        assert_eq!(cfg.scanner_path, "/opt/Plex Media Scanner");
    }

    #[test]
    fn invalid_base_url_rejected() {
        let err = Config::resolve(&vars("PLEX_TOKEN=t\nPLEX_BASE_URL=not a url\n"), no_env)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: KEY_BASE_URL, .. }));

        let err = Config::resolve(&vars("PLEX_TOKEN=t\nPLEX_BASE_URL=ftp://h/\n"), no_env)
            .unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn debug_hides_token() {
        let cfg = Config::resolve(&vars("PLEX_TOKEN=supersecret"), no_env).unwrap();
        assert!(!format!("{cfg:?}").contains("supersecret"));
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.env"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }

    #[test]
    fn read_env_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "PLEX_TOKEN=disk\n").unwrap();
        let v = read_env_file(&path).unwrap();
        assert_eq!(v.get("PLEX_TOKEN").map(String::as_str), Some("disk"));
    }
}
