/*!
`sections.rs`

Implements `plexctl sections`: list library sections via
GET /library/sections.

JSON output (--json): array of sections
[
  { "id": "1", "title": "Movies", "type": "movie" }
]

Text output: ID / TYPE / TITLE table, or "No sections found."
*/

use std::io::Write;

use clap::Args;

use crate::cmd::format::table;
use crate::cmd::shared::{CmdResult, Context, print_json};
use crate::plex::Section;

/// CLI arguments for `plexctl sections`
#[derive(Args, Debug, Default)]
pub struct SectionsArgs {}

pub fn execute_sections(ctx: &Context, out: &mut dyn Write, _args: SectionsArgs) -> CmdResult {
    let sections = ctx.plex().sections()?;

    if ctx.json {
        return print_json(out, &serde_json::to_value(&sections).unwrap_or_default());
    }

    writeln!(out, "{}", render_sections(&sections, ctx))?;
    Ok(())
}

fn render_sections(sections: &[Section], ctx: &Context) -> String {
    if sections.is_empty() {
        return "No sections found.".to_string();
    }
    let rows: Vec<Vec<String>> = sections
        .iter()
        .map(|s| vec![s.id.clone(), s.kind.clone(), s.title.clone()])
        .collect();
    table(&["ID", "TYPE", "TITLE"], &rows, &ctx.style)
}
