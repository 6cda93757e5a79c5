/*!
format.rs

Human-readable output helpers for `plexctl`.

  - StyleOptions::detect()  NO_COLOR / non-terminal stdout disable ANSI
  - color(role, text, &style)
  - table(headers, rows, &style)              two-space separated columns
  - error_payload / render_error               error reporting for main

JSON output paths do not use the styling helpers.
*/

use std::borrow::Cow;
use std::io::IsTerminal;

use crate::error::CliError;

/* -------------------------------------------------------------------------- */
/* Style Options                                                              */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
}

impl StyleOptions {
    pub fn detect() -> Self {
        let use_color =
            std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal();
        StyleOptions { use_color }
    }

    pub fn plain() -> Self {
        StyleOptions { use_color: false }
    }
}

/* -------------------------------------------------------------------------- */
/* Color                                                                      */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Accent,
    Success,
    Error,
    Dim,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Accent => "38;5;213",
        Role::Success => "38;5;82",
        Role::Error => "38;5;196",
        Role::Dim => "2",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

/* -------------------------------------------------------------------------- */
/* Table Rendering                                                            */
/* -------------------------------------------------------------------------- */

/// Header, dashed separator, then rows. Columns are separated by two spaces
/// and the last column is never padded.
pub fn table(headers: &[&str], rows: &[Vec<String>], style: &StyleOptions) -> String {
    if headers.is_empty() {
        return String::new();
    }
    let col_count = headers.len();

    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render_row(headers, &widths, Some(Role::Accent), style));
    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    lines.push(color(Role::Dim, sep.join("  "), style));
    for row in rows {
        let cells: Vec<&str> = (0..col_count)
            .map(|c| row.get(c).map(String::as_str).unwrap_or(""))
            .collect();
        lines.push(render_row(&cells, &widths, None, style));
    }
    lines.join("\n")
}

fn render_row(cells: &[&str], widths: &[usize], role: Option<Role>, style: &StyleOptions) -> String {
    let mut line = String::new();
    for (i, raw) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        let cell = if i + 1 == cells.len() {
            raw.to_string()
        } else {
            pad(raw, widths[i])
        };
        match role {
            Some(r) => line.push_str(&color(r, cell, style)),
            None => line.push_str(&cell),
        }
    }
    line
}

fn pad(s: &str, width: usize) -> String {
    let len = display_width(s);
    if len < width {
        format!("{s}{}", " ".repeat(width - len))
    } else {
        s.to_string()
    }
}

/* -------------------------------------------------------------------------- */
/* Errors                                                                     */
/* -------------------------------------------------------------------------- */

/// `{"status":"error","kind":...,"message":...}`
pub fn error_payload(err: &CliError) -> serde_json::Value {
    serde_json::json!({
        "status": "error",
        "kind": err.kind(),
        "message": err.to_string(),
    })
}

/// Text form for stderr.
pub fn render_error(err: &CliError, style: &StyleOptions) -> String {
    let mut msg = format!("{} {err}", color(Role::Error, "Error:", style));
    if matches!(err, CliError::Usage(_)) {
        msg.push_str("\n\nFor more information, try '--help'.");
    }
    msg
}

/* -------------------------------------------------------------------------- */
/* ANSI / Width Utilities                                                     */
/* -------------------------------------------------------------------------- */

fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }
    let mut buf = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for n in chars.by_ref() {
                if n.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        buf.push(c);
    }
    Cow::Owned(buf)
}

fn display_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}
