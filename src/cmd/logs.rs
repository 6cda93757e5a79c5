/*!
`logs.rs`

Implements `plexctl logs [-n COUNT] [-f]`: `<runtime> logs -n COUNT <container>`.

Text mode streams straight to the terminal. JSON mode captures output:
{
  "status": "ok",
  "command": "logs",
  "container": "plex",
  "count": 200,
  "invocation": "docker logs -n 200 plex",
  "exit_code": 0,
  "stdout": "...",
  "stderr": "...",
  "lines": ["...", "..."],
  "stderr_lines": ["..."]
}

The runtime splits the container's two streams, so their relative order is
lost. `lines` holds stdout, `stderr_lines` holds stderr.
*/

use std::io::Write;

use clap::Args;

use crate::cmd::shared::{CmdResult, Context, captured_json, print_json};
use crate::error::CliError;

/// CLI arguments for `plexctl logs`
#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Number of log lines
    #[arg(
        short = 'n',
        default_value_t = 200,
        value_name = "COUNT",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub n: u32,

    /// Keep following new log output
    #[arg(short, long)]
    pub follow: bool,
}

pub fn execute_logs(ctx: &Context, out: &mut dyn Write, args: LogsArgs) -> CmdResult {
    if args.follow && ctx.json {
        return Err(CliError::usage("--follow cannot be combined with --json"));
    }

    let runtime = ctx.runtime();
    let outcome = runtime.logs(args.n, args.follow, ctx.output_mode())?;

    if ctx.json {
        let (lines, stderr_lines): (Vec<&str>, Vec<&str>) = outcome
            .output
            .as_ref()
            .map(|c| (c.stdout.lines().collect(), c.stderr.lines().collect()))
            .unwrap_or_default();
        let mut payload = serde_json::json!({
            "status": "ok",
            "command": "logs",
            "container": runtime.container(),
            "count": args.n,
            "lines": lines,
            "stderr_lines": stderr_lines,
        });
        captured_json(&mut payload, &outcome);
        return print_json(out, &payload);
    }
    Ok(())
}
