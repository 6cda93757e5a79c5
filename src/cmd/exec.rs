/*!
`exec.rs`

Implements `plexctl exec [-i] -- <COMMAND...>`: run an arbitrary command
inside the container via `<runtime> exec [-i] <container> <COMMAND...>`.

A single COMMAND argument is split with shell-word rules, so both forms work:
  plexctl exec -- ls -la /config
  plexctl exec "ls -la '/config/Library/Application Support'"

The command is forwarded as given. No filtering happens here; the container
runtime is the only isolation boundary.

JSON output:
{
  "status": "ok",
  "command": "exec",
  "container": "plex",
  "argv": ["ls", "-la", "/config"],
  "invocation": "docker exec plex ls -la /config",
  "exit_code": 0,
  "stdout": "...",
  "stderr": ""
}
*/

use std::io::Write;

use clap::Args;

use crate::cmd::shared::{CmdResult, Context, captured_json, print_json};
use crate::error::CliError;

/// CLI arguments for `plexctl exec`
#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Keep stdin open (docker exec -i)
    #[arg(short, long)]
    pub interactive: bool,

    /// Command to run inside the container
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

/// Resolve the argv: one argument is shell-split, several are taken as-is.
pub fn command_argv(raw: &[String]) -> Result<Vec<String>, CliError> {
    let argv = match raw {
        [single] => shell_words::split(single)
            .map_err(|e| CliError::usage(format!("Failed to parse command '{single}': {e}")))?,
        many => many.to_vec(),
    };
    if argv.first().is_none_or(|p| p.trim().is_empty()) {
        return Err(CliError::usage("exec requires a non-empty command"));
    }
    Ok(argv)
}

pub fn execute_exec(ctx: &Context, out: &mut dyn Write, args: ExecArgs) -> CmdResult {
    let argv = command_argv(&args.command)?;
    let runtime = ctx.runtime();
    let outcome = runtime.exec(&argv, args.interactive, ctx.output_mode())?;

    if ctx.json {
        let mut payload = serde_json::json!({
            "status": "ok",
            "command": "exec",
            "container": runtime.container(),
            "argv": argv,
        });
        captured_json(&mut payload, &outcome);
        return print_json(out, &payload);
    }
    Ok(())
}
