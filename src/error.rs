//! Error taxonomy.
//!
//! One enum per failure domain plus the top-level [`CliError`] that `main`
//! turns into a message and an exit code:
//!
//!   usage   (2) unknown subcommand, bad or missing flag
//!   config  (3) missing / invalid setting, unreadable env file
//!   network (4) unreachable server, timeout, non-2xx, undecodable body
//!   command (5) runtime missing, container missing, non-zero exit
//!   io      (1) stdout went away mid-write

use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read env file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "Missing required environment variable {key}. \
         Create a .env file (see .env.example) or export it in your shell."
    )]
    MissingKey { key: &'static str },
    #[error("Invalid {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

/// Failures of a single HTTP URL command.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Plex is not reachable at {base} ({reason})")]
    Unreachable { base: String, reason: String },
    #[error("Request to {base} timed out after {secs} seconds")]
    Timeout { base: String, secs: u64 },
    #[error("Plex returned HTTP {status} for {url}")]
    Status { status: u16, url: String },
    #[error("Failed to decode Plex response: {0}")]
    InvalidResponse(String),
    #[error("Failed to initialise HTTP client: {0}")]
    Client(String),
}

/// Failures of a container-runtime invocation.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{runtime} CLI not found in PATH")]
    RuntimeMissing { runtime: String },
    #[error("Container '{container}' not found (is it created? check PLEX_CONTAINER)")]
    ContainerNotFound { container: String },
    #[error("Command failed (exit code {code}): {command}{}", detail(.stderr))]
    Failed {
        command: String,
        code: i32,
        stderr: String,
    },
    #[error("Failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

fn detail(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{trimmed}")
    }
}

/// Top-level error surfaced by a single CLI invocation.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Stable machine-readable kind used in JSON error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            CliError::Usage(_) => "usage",
            CliError::Config(_) => "config",
            CliError::Network(_) => "network",
            CliError::Command(_) => "command",
            CliError::Output(_) => "io",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            CliError::Config(_) => 3,
            CliError::Network(_) => 4,
            CliError::Command(_) => 5,
            CliError::Output(_) => 1,
        }
    }
}
