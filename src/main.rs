use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing::debug;

mod cmd;
mod config;
mod docker;
mod error;
mod plex;
mod utils;

use cmd::format::{StyleOptions, error_payload, render_error};
use cmd::{
    CmdResult, Context, ExecArgs, LogsArgs, RefreshArgs, RestartArgs, ScannerArgs, SectionsArgs,
};
use config::Config;
use docker::SystemRunner;
use error::CliError;
use plex::redact::Redactor;
use plex::transport::ReqwestTransport;

/// plexctl - small local CLI to control Plex
///
///   plexctl sections [--json]
///   plexctl refresh --section <ID> [--force] [--path <ABS PATH>]
///   plexctl logs [-n 200] [-f]
///   plexctl restart
///   plexctl scanner --list [-- ARGS...]
///   plexctl exec [-i] -- <COMMAND...>
///
/// Configuration (environment wins over the env file):
///   PLEX_TOKEN         required
///   PLEX_BASE_URL      default http://127.0.0.1:32400
///   PLEX_CONTAINER     default plex
///   PLEX_RUNTIME       default docker
///   PLEX_SCANNER_PATH  default /usr/lib/plexmediaserver/Plex Media Scanner
///
/// Exit codes: 0 ok, 2 usage, 3 config, 4 network, 5 command.
#[derive(Parser, Debug)]
#[command(
    name = "plexctl",
    version,
    author,
    about = "Small local CLI to control Plex (Plex Media Server URL Commands + docker)",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Errors only
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output JSON (results and errors)
    #[arg(long, global = true)]
    json: bool,

    /// Env file with PLEX_* settings (default: ./.env if present)
    #[arg(long = "env-file", global = true, value_name = "PATH")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List Plex libraries (sections)
    Sections(SectionsArgs),

    /// Refresh a Plex section
    Refresh(RefreshArgs),

    /// Show Plex container logs
    Logs(LogsArgs),

    /// Restart Plex container
    Restart(RestartArgs),

    /// Run Plex Media Scanner in the container
    Scanner(ScannerArgs),

    /// Run a command inside the Plex container
    Exec(ExecArgs),
}

fn main() {
    let code = real_main(std::env::args_os().collect());
    std::process::exit(code);
}

fn real_main(argv: Vec<OsString>) -> i32 {
    let json_hint = argv.iter().any(|a| a == "--json");
    let cli = match Cli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return report_parse_error(e, json_hint),
    };

    let level = utils::derive_level(cli.verbose, cli.quiet);
    if let Err(e) = utils::init_logging(level) {
        eprintln!("warning: {e}");
    }

    let json = cli.json;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run(cli, &mut out) {
        Ok(()) => 0,
        Err(err) => report(&err, json, &mut out),
    }
}

/// Load configuration, build the real issuers and dispatch.
fn run(cli: Cli, out: &mut dyn Write) -> CmdResult {
    let config = Config::load(cli.env_file.as_deref())?;
    debug!(?config, "configuration loaded");
    let http = ReqwestTransport::new(Redactor::new(config.token.clone()))?;
    let runner = SystemRunner;
    let ctx = Context::new(&config, &http, &runner, cli.json);
    dispatch(&ctx, out, cli.command)
}

fn dispatch(ctx: &Context, out: &mut dyn Write, command: Commands) -> CmdResult {
    match command {
        Commands::Sections(args) => cmd::execute_sections(ctx, out, args),
        Commands::Refresh(args) => cmd::execute_refresh(ctx, out, args),
        Commands::Logs(args) => cmd::execute_logs(ctx, out, args),
        Commands::Restart(args) => cmd::execute_restart(ctx, out, args),
        Commands::Scanner(args) => cmd::execute_scanner(ctx, out, args),
        Commands::Exec(args) => cmd::execute_exec(ctx, out, args),
    }
}

fn report(err: &CliError, json: bool, out: &mut dyn Write) -> i32 {
    if json {
        let payload = error_payload(err);
        let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
        let _ = writeln!(out, "{text}");
    } else {
        eprintln!("{}", render_error(err, &StyleOptions::detect()));
    }
    err.exit_code()
}

fn report_parse_error(e: clap::Error, json: bool) -> i32 {
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        let _ = e.print();
        return 0;
    }
    let err = CliError::usage(clap_message(&e));
    if json {
        let payload = error_payload(&err);
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
        );
    } else {
        let _ = e.print();
    }
    err.exit_code()
}

/// First line of clap's rendering without the `error: ` prefix.
fn clap_message(e: &clap::Error) -> String {
    let rendered = e.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).trim().to_string()
}
