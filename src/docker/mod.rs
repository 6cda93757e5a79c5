//! Container-runtime invocations (`docker` by default, any compatible CLI).
//!
//! ContainerRuntime -> ensure_exists / logs / restart / exec / scanner
//!
//! `exec` and `scanner` forward caller-supplied arguments verbatim to the
//! runtime. Nothing is sanitised here; the runtime's own isolation is the
//! only boundary.

use std::io;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::config::Config;
use crate::error::CommandError;

/// Exit status and captured output of one subprocess.
#[derive(Debug, Clone, Default)]
pub struct Captured {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Process spawning seam.
pub trait ProcessRunner {
    /// Run with inherited stdio; returns the exit code.
    fn stream(&self, program: &str, args: &[String]) -> io::Result<i32>;
    /// Run with piped stdout/stderr.
    fn capture(&self, program: &str, args: &[String]) -> io::Result<Captured>;
}

/// Spawns real processes via `std::process::Command`.
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn stream(&self, program: &str, args: &[String]) -> io::Result<i32> {
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        Ok(status.code().unwrap_or(-1))
    }

    fn capture(&self, program: &str, args: &[String]) -> io::Result<Captured> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;
        Ok(Captured {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Whether output goes straight to the terminal or is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Stream,
    Capture,
}

/// Successful invocation. `output` is `None` for streamed runs.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub command: String,
    pub code: i32,
    pub output: Option<Captured>,
}

pub struct ContainerRuntime<'a> {
    config: &'a Config,
    runner: &'a dyn ProcessRunner,
}

impl<'a> ContainerRuntime<'a> {
    pub fn new(config: &'a Config, runner: &'a dyn ProcessRunner) -> Self {
        Self { config, runner }
    }

    pub fn container(&self) -> &str {
        &self.config.container
    }

    pub fn logs_args(&self, lines: u32, follow: bool) -> Vec<String> {
        let mut args = vec!["logs".to_string(), "-n".to_string(), lines.to_string()];
        if follow {
            args.push("-f".to_string());
        }
        args.push(self.config.container.clone());
        args
    }

    pub fn restart_args(&self) -> Vec<String> {
        vec!["restart".to_string(), self.config.container.clone()]
    }

    pub fn exec_args(&self, argv: &[String], interactive: bool) -> Vec<String> {
        let mut args = vec!["exec".to_string()];
        if interactive {
            args.push("-i".to_string());
        }
        args.push(self.config.container.clone());
        args.extend(argv.iter().cloned());
        args
    }

    pub fn scanner_args(&self, list: bool, passthrough: &[String]) -> Vec<String> {
        let mut argv = vec![self.config.scanner_path.clone()];
        if list {
            argv.push("--list".to_string());
        }
        argv.extend(passthrough.iter().cloned());
        self.exec_args(&argv, true)
    }

    /// `<runtime> inspect <container>`; fails if the container is unknown.
    pub fn ensure_exists(&self) -> Result<(), CommandError> {
        let args = vec!["inspect".to_string(), self.config.container.clone()];
        let captured = self
            .runner
            .capture(&self.config.runtime, &args)
            .map_err(|e| self.spawn_error(&args, e))?;
        if captured.code != 0 {
            debug!(code = captured.code, "inspect failed");
            return Err(CommandError::ContainerNotFound {
                container: self.config.container.clone(),
            });
        }
        Ok(())
    }

    pub fn logs(
        &self,
        lines: u32,
        follow: bool,
        mode: OutputMode,
    ) -> Result<RunOutcome, CommandError> {
        self.ensure_exists()?;
        self.run(self.logs_args(lines, follow), mode)
    }

    pub fn restart(&self) -> Result<RunOutcome, CommandError> {
        self.ensure_exists()?;
        let outcome = self.run(self.restart_args(), OutputMode::Capture)?;
        info!(container = %self.config.container, "container restarted");
        Ok(outcome)
    }

    pub fn exec(
        &self,
        argv: &[String],
        interactive: bool,
        mode: OutputMode,
    ) -> Result<RunOutcome, CommandError> {
        self.ensure_exists()?;
        self.run(self.exec_args(argv, interactive), mode)
    }

    pub fn scanner(
        &self,
        list: bool,
        passthrough: &[String],
        mode: OutputMode,
    ) -> Result<RunOutcome, CommandError> {
        self.ensure_exists()?;
        self.run(self.scanner_args(list, passthrough), mode)
    }

    /// Shell-quoted rendering of `<runtime> <args...>` for messages.
    pub fn render(&self, args: &[String]) -> String {
        shell_words::join(
            std::iter::once(self.config.runtime.as_str()).chain(args.iter().map(String::as_str)),
        )
    }

    fn run(&self, args: Vec<String>, mode: OutputMode) -> Result<RunOutcome, CommandError> {
        let command = self.render(&args);
        debug!(%command, ?mode, "running");
        let (code, output) = match mode {
            OutputMode::Stream => {
                let code = self
                    .runner
                    .stream(&self.config.runtime, &args)
                    .map_err(|e| self.spawn_error(&args, e))?;
                (code, None)
            }
            OutputMode::Capture => {
                let captured = self
                    .runner
                    .capture(&self.config.runtime, &args)
                    .map_err(|e| self.spawn_error(&args, e))?;
                (captured.code, Some(captured))
            }
        };
        if code != 0 {
            return Err(CommandError::Failed {
                command,
                code,
                stderr: output.map(|c| c.stderr).unwrap_or_default(),
            });
        }
        Ok(RunOutcome {
            command,
            code,
            output,
        })
    }

    fn spawn_error(&self, args: &[String], err: io::Error) -> CommandError {
        if err.kind() == io::ErrorKind::NotFound {
            CommandError::RuntimeMissing {
                runtime: self.config.runtime.clone(),
            }
        } else {
            CommandError::Spawn {
                command: self.render(args),
                source: err,
            }
        }
    }
}
