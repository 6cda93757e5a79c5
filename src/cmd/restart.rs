//! `plexctl restart`: `<runtime> restart <container>`, captured.

use std::io::Write;

use clap::Args;

use crate::cmd::format::{Role, color};
use crate::cmd::shared::{CmdResult, Context, captured_json, print_json};

#[derive(Args, Debug, Default)]
pub struct RestartArgs {}

pub fn execute_restart(ctx: &Context, out: &mut dyn Write, _args: RestartArgs) -> CmdResult {
    let runtime = ctx.runtime();
    let outcome = runtime.restart()?;

    if ctx.json {
        let mut payload = serde_json::json!({
            "status": "ok",
            "command": "restart",
            "container": runtime.container(),
        });
        captured_json(&mut payload, &outcome);
        return print_json(out, &payload);
    }

    writeln!(
        out,
        "{}",
        color(
            Role::Success,
            format!("Restarted container '{}'", runtime.container()),
            &ctx.style
        )
    )?;
    Ok(())
}
