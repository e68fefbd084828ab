//! Stopping and restarting the Windows shell so it re-reads Explorer policies.

use anyhow::Result;
use tracing::{instrument, warn};

use crate::core::invocation::Invocation;
use crate::io::tools::ToolRunner;

pub const SHELL_IMAGE: &str = "explorer.exe";

/// Force-stop every running shell process.
///
/// Returns `false` when `taskkill` did not succeed (most often because the
/// shell was not running). That is not fatal for the caller.
#[instrument(skip_all)]
pub fn stop_shell<R: ToolRunner>(runner: &R) -> bool {
    let inv = Invocation::new("taskkill")
        .arg("/f")
        .arg("/im")
        .arg(SHELL_IMAGE);
    match runner.run(&inv) {
        Ok(output) if output.success() => true,
        Ok(output) => {
            warn!(detail = %output.failure_detail(), "shell stop failed");
            false
        }
        Err(err) => {
            warn!(err = %format!("{err:#}"), "shell stop failed");
            false
        }
    }
}

/// Start a new shell without waiting on it.
#[instrument(skip_all)]
pub fn start_shell<R: ToolRunner>(runner: &R) -> Result<()> {
    runner.launch(&Invocation::new(SHELL_IMAGE))
}
