/*!
`refresh.rs`

Implements `plexctl refresh --section <id> [--force] [--path <abs path>]`
via GET /library/sections/{id}/refresh.

Validation (usage errors, before any request):
  - --section must not be blank
  - --path, when given, must be non-empty and absolute

JSON output:
{
  "status": "ok",
  "command": "refresh",
  "section": "1",
  "force": false,
  "path": null,
  "http_status": 200,
  "url": "http://127.0.0.1:32400/library/sections/1/refresh?X-Plex-Token=****"
}
*/

use std::io::Write;

use clap::Args;

use crate::cmd::format::{Role, color};
use crate::cmd::shared::{CmdResult, Context, print_json};
use crate::error::CliError;
use crate::plex::RefreshRequest;

/// CLI arguments for `plexctl refresh`
#[derive(Args, Debug)]
pub struct RefreshArgs {
    /// Section id
    #[arg(long, value_name = "ID")]
    pub section: String,

    /// Force refresh (force=1)
    #[arg(long)]
    pub force: bool,

    /// Absolute folder path to refresh (path=...)
    #[arg(long, value_name = "PATH")]
    pub path: Option<String>,
}

impl RefreshArgs {
    fn validate(self) -> Result<RefreshRequest, CliError> {
        let section = self.section.trim().to_string();
        if section.is_empty() {
            return Err(CliError::usage("--section must not be empty"));
        }
        if let Some(p) = &self.path {
            if p.trim().is_empty() {
                return Err(CliError::usage("--path was provided but empty"));
            }
            if !p.starts_with('/') {
                return Err(CliError::usage(format!(
                    "--path must be an absolute path (start with '/'): {p}"
                )));
            }
        }
        Ok(RefreshRequest {
            section,
            force: self.force,
            path: self.path,
        })
    }
}

pub fn execute_refresh(ctx: &Context, out: &mut dyn Write, args: RefreshArgs) -> CmdResult {
    let req = args.validate()?;
    let plex = ctx.plex();
    let outcome = plex.refresh(&req)?;
    let safe_url = plex.redactor().redact_url(&outcome.url);

    if ctx.json {
        return print_json(
            out,
            &serde_json::json!({
                "status": "ok",
                "command": "refresh",
                "section": req.section,
                "force": req.force,
                "path": req.path,
                "http_status": outcome.status,
                "url": safe_url,
            }),
        );
    }

    writeln!(
        out,
        "{}",
        color(
            Role::Success,
            format!("Refresh triggered successfully (HTTP {})", outcome.status),
            &ctx.style
        )
    )?;
    writeln!(out, "URL: {safe_url}")?;
    Ok(())
}
