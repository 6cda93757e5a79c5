/*!
shared.rs - state and helpers shared by every subcommand.

  - Context: config + transports + output mode, passed explicitly
  - print_json: pretty JSON to the output sink
  - captured_json: subprocess result fields for JSON payloads
*/

use std::io::Write;

use crate::cmd::format::StyleOptions;
use crate::config::Config;
use crate::docker::{ContainerRuntime, OutputMode, ProcessRunner, RunOutcome};
use crate::error::CliError;
use crate::plex::PlexClient;
use crate::plex::transport::HttpTransport;

/// Everything a handler needs for one invocation.
pub struct Context<'a> {
    pub config: &'a Config,
    pub http: &'a dyn HttpTransport,
    pub runner: &'a dyn ProcessRunner,
    pub json: bool,
    pub style: StyleOptions,
}

impl<'a> Context<'a> {
    pub fn new(
        config: &'a Config,
        http: &'a dyn HttpTransport,
        runner: &'a dyn ProcessRunner,
        json: bool,
    ) -> Self {
        Self {
            config,
            http,
            runner,
            json,
            style: StyleOptions::detect(),
        }
    }

    pub fn plex(&self) -> PlexClient<'a> {
        PlexClient::new(self.config, self.http)
    }

    pub fn runtime(&self) -> ContainerRuntime<'a> {
        ContainerRuntime::new(self.config, self.runner)
    }

    /// JSON mode collects subprocess output so it can be embedded.
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Capture
        } else {
            OutputMode::Stream
        }
    }
}

/// Uniform handler result.
pub type CmdResult = Result<(), CliError>;

pub fn print_json(out: &mut dyn Write, value: &serde_json::Value) -> CmdResult {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    writeln!(out, "{text}")?;
    Ok(())
}

/// Insert `exit_code`, `invocation`, `stdout`, `stderr` into a JSON object.
pub fn captured_json(base: &mut serde_json::Value, outcome: &RunOutcome) {
    if let serde_json::Value::Object(map) = base {
        map.insert("invocation".into(), outcome.command.clone().into());
        map.insert("exit_code".into(), outcome.code.into());
        if let Some(out) = &outcome.output {
            map.insert("stdout".into(), out.stdout.clone().into());
            map.insert("stderr".into(), out.stderr.clone().into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker::Captured;
    use serde_json::json;

    #[test]
    fn captured_json_fields() {
        let mut v = json!({"status":"ok"});
        captured_json(
            &mut v,
            &RunOutcome {
                command: "docker restart plex".into(),
                code: 0,
                output: Some(Captured {
                    code: 0,
                    stdout: "plex\n".into(),
                    stderr: String::new(),
                }),
            },
        );
        assert_eq!(v["invocation"], "docker restart plex");
        assert_eq!(v["exit_code"], 0);
        assert_eq!(v["stdout"], "plex\n");
    }

    #[test]
    fn streamed_outcome_has_no_output_fields() {
        let mut v = json!({});
        captured_json(
            &mut v,
            &RunOutcome {
                command: "docker logs -n 5 plex".into(),
                code: 0,
                output: None,
            },
        );
        assert!(v.get("stdout").is_none());
    }

    #[test]
    fn print_json_is_pretty() {
        let mut buf = Vec::new();
        print_json(&mut buf, &json!({"a": 1})).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "{\n  \"a\": 1\n}\n");
    }
}
