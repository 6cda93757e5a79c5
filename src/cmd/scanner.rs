/*!
`scanner.rs`

Implements `plexctl scanner [--list] [-- ARGS...]`: runs the media scanner
binary inside the container via `<runtime> exec -i <container> <scanner> ...`.

Arguments after `--` are passed to the scanner untouched. On failure in text
mode a hint (command tried + common causes) is written to stderr.
*/

use std::io::Write;

use clap::Args;

use crate::cmd::shared::{CmdResult, Context, captured_json, print_json};
use crate::error::{CliError, CommandError};

/// CLI arguments for `plexctl scanner`
#[derive(Args, Debug)]
pub struct ScannerArgs {
    /// List scanner sections
    #[arg(long)]
    pub list: bool,

    /// Extra scanner arguments (after --)
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

pub fn execute_scanner(ctx: &Context, out: &mut dyn Write, args: ScannerArgs) -> CmdResult {
    if !args.list && args.args.is_empty() {
        return Err(CliError::usage(
            "Missing --list (or scanner arguments after --)",
        ));
    }

    let runtime = ctx.runtime();
    let outcome = match runtime.scanner(args.list, &args.args, ctx.output_mode()) {
        Ok(o) => o,
        Err(CommandError::Failed {
            command,
            code,
            stderr,
        }) => {
            if !ctx.json {
                eprintln!("{}", failure_hint(&command, code));
            }
            return Err(CommandError::Failed {
                command,
                code,
                stderr,
            }
            .into());
        }
        Err(e) => return Err(e.into()),
    };

    if ctx.json {
        let mut payload = serde_json::json!({
            "status": "ok",
            "command": "scanner",
            "container": runtime.container(),
            "scanner_path": ctx.config.scanner_path,
        });
        captured_json(&mut payload, &outcome);
        return print_json(out, &payload);
    }
    Ok(())
}

fn failure_hint(command: &str, code: i32) -> String {
    format!(
        "Scanner command failed (exit code {code}).\n\
         Tried: {command}\n\
         \n\
         Notes:\n\
         - Some Plex images use a different scanner path (set PLEX_SCANNER_PATH).\n\
         - Ensure the container is running and includes Plex Media Scanner."
    )
}
