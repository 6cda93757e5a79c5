/*!
Subcommand modules.

  src/cmd/
    mod.rs       (this file: declarations + re-exports)
    shared.rs    Context, JSON helpers
    format.rs    table / color / error rendering
    sections.rs  sections  -> GET /library/sections
    refresh.rs   refresh   -> GET /library/sections/{id}/refresh
    logs.rs      logs      -> <runtime> logs
    restart.rs   restart   -> <runtime> restart
    scanner.rs   scanner   -> <runtime> exec -i <container> <scanner>
    exec.rs      exec      -> <runtime> exec <container> ...

Conventions:
  - Each module exposes one `execute_*(&Context, &mut dyn Write, Args)`
    returning `CmdResult`.
  - Argument structs derive `clap::Args`.
  - Flag validation that clap cannot express returns `CliError::Usage`
    before any external call.
*/

pub mod exec;
pub mod format;
pub mod logs;
pub mod refresh;
pub mod restart;
pub mod scanner;
pub mod sections;
pub mod shared;

pub use exec::{ExecArgs, execute_exec};
pub use logs::{LogsArgs, execute_logs};
pub use refresh::{RefreshArgs, execute_refresh};
pub use restart::{RestartArgs, execute_restart};
pub use scanner::{ScannerArgs, execute_scanner};
pub use sections::{SectionsArgs, execute_sections};
pub use shared::{CmdResult, Context};
