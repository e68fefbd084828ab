//! Orchestration for `tile-lock`.
//!
//! Changing `NoChangeStartMenu` only takes effect when the shell restarts, so
//! the shell is stopped before the write and started again afterwards. The
//! restart happens even if the write fails, so the user is never left
//! without a taskbar.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::core::menu::{MENU_TEXT, MenuChoice, PROMPT, parse_choice};
use crate::core::types::{TileAction, TileLockState};
use crate::io::registry::{NO_CHANGE_START_MENU, PolicyRegistry};
use crate::io::shell::{start_shell, stop_shell};
use crate::io::tools::ToolRunner;

/// Behaviour switches for [`apply_tile_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileOptions {
    pub restart_shell: bool,
}

/// Result of a successful [`apply_tile_action`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileOutcome {
    pub action: TileAction,
    pub previous: TileLockState,
    pub current: TileLockState,
    /// Whether a running shell was stopped before the write.
    pub shell_stopped: bool,
    /// Whether a new shell was launched after the write.
    pub shell_restarted: bool,
}

pub fn read_tile_state<G: PolicyRegistry>(registry: &G) -> Result<TileLockState> {
    let value = registry
        .read_dword(&NO_CHANGE_START_MENU)
        .context("read tile lock policy")?;
    Ok(TileLockState::from_value(value))
}

/// Lock or unlock tile rearranging.
pub fn apply_tile_action<G: PolicyRegistry, R: ToolRunner>(
    action: TileAction,
    registry: &G,
    runner: &R,
    options: TileOptions,
) -> Result<TileOutcome> {
    let previous = read_tile_state(registry)?;
    info!(?action, %previous, "applying tile action");

    let shell_stopped = options.restart_shell && stop_shell(runner);

    let written = write_policy(action, registry);

    let mut shell_restarted = false;
    if options.restart_shell {
        match start_shell(runner) {
            Ok(()) => shell_restarted = true,
            Err(err) => warn!(err = %format!("{err:#}"), "shell restart failed"),
        }
    }

    written?;
    let current = read_tile_state(registry)?;
    Ok(TileOutcome {
        action,
        previous,
        current,
        shell_stopped,
        shell_restarted,
    })
}

fn write_policy<G: PolicyRegistry>(action: TileAction, registry: &G) -> Result<()> {
    match action {
        TileAction::Lock => registry
            .write_dword(&NO_CHANGE_START_MENU, 1)
            .context("block tile rearranging"),
        TileAction::Unlock => {
            let existed = registry
                .delete_value(&NO_CHANGE_START_MENU)
                .context("unblock tile rearranging")?;
            if !existed {
                info!("tile lock policy already absent");
            }
            Ok(())
        }
    }
}

/// Show the menu until a valid choice is entered.
///
/// Returns `None` when the user quits or input ends.
pub fn run_menu<I: BufRead, O: Write>(mut input: I, mut output: O) -> Result<Option<TileAction>> {
    loop {
        writeln!(output, "{MENU_TEXT}").context("write menu")?;
        write!(output, "{PROMPT}").context("write prompt")?;
        output.flush().context("flush prompt")?;

        let mut line = String::new();
        let read = input.read_line(&mut line).context("read menu choice")?;
        if read == 0 {
            writeln!(output).context("write newline")?;
            return Ok(None);
        }
        match parse_choice(&line) {
            Some(MenuChoice::Apply(action)) => return Ok(Some(action)),
            Some(MenuChoice::Quit) => return Ok(None),
            None => {
                writeln!(output, "Invalid choice '{}'.\n", line.trim()).context("write error")?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::tools::ToolOutput;
    use crate::test_support::{InMemoryRegistry, ScriptedToolRunner};

    const RESTART: TileOptions = TileOptions {
        restart_shell: true,
    };

    #[test]
    fn lock_sets_value_to_one() {
        let registry = InMemoryRegistry::new();
        let runner = ScriptedToolRunner::new();
        let outcome =
            apply_tile_action(TileAction::Lock, &registry, &runner, RESTART).expect("lock");
        assert_eq!(registry.get(&NO_CHANGE_START_MENU), Some(1));
        assert_eq!(outcome.previous, TileLockState::Unlocked);
        assert_eq!(outcome.current, TileLockState::Locked);
        assert!(outcome.shell_stopped);
        assert!(outcome.shell_restarted);
    }

    #[test]
    fn shell_not_running_is_reported_but_not_fatal() {
        let registry = InMemoryRegistry::new();
        let runner = ScriptedToolRunner::new()
            .with_rule(|inv| inv.program == "taskkill", ToolOutput::failed(128, "not found"));
        let outcome =
            apply_tile_action(TileAction::Lock, &registry, &runner, RESTART).expect("lock");
        assert!(!outcome.shell_stopped);
        assert!(outcome.shell_restarted);
        assert_eq!(registry.get(&NO_CHANGE_START_MENU), Some(1));
    }

    #[test]
    fn unlock_removes_value() {
        let registry = InMemoryRegistry::new().with_value(&NO_CHANGE_START_MENU, 1);
        let runner = ScriptedToolRunner::new();
        let outcome =
            apply_tile_action(TileAction::Unlock, &registry, &runner, RESTART).expect("unlock");
        assert_eq!(registry.get(&NO_CHANGE_START_MENU), None);
        assert_eq!(outcome.previous, TileLockState::Locked);
        assert_eq!(outcome.current, TileLockState::Unlocked);
    }

    #[test]
    fn lock_then_unlock_restores_absence() {
        let registry = InMemoryRegistry::new();
        let runner = ScriptedToolRunner::new();
        apply_tile_action(TileAction::Lock, &registry, &runner, RESTART).expect("lock");
        apply_tile_action(TileAction::Unlock, &registry, &runner, RESTART).expect("unlock");
        assert_eq!(registry.get(&NO_CHANGE_START_MENU), None);
    }

    #[test]
    fn unlock_when_absent_is_a_no_op() {
        let registry = InMemoryRegistry::new();
        let runner = ScriptedToolRunner::new();
        let outcome = apply_tile_action(TileAction::Unlock, &registry, &runner, RESTART)
            .expect("unlock");
        assert_eq!(outcome.previous, TileLockState::Unlocked);
        assert_eq!(outcome.current, TileLockState::Unlocked);
    }

    #[test]
    fn shell_is_bounced_around_the_write() {
        let registry = InMemoryRegistry::new();
        let runner = ScriptedToolRunner::new();
        apply_tile_action(TileAction::Lock, &registry, &runner, RESTART).expect("lock");
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "taskkill");
        assert_eq!(runner.launches().len(), 1);
        assert_eq!(runner.launches()[0].program, "explorer.exe");
    }

    #[test]
    fn no_restart_leaves_shell_alone() {
        let registry = InMemoryRegistry::new();
        let runner = ScriptedToolRunner::new();
        let outcome = apply_tile_action(
            TileAction::Lock,
            &registry,
            &runner,
            TileOptions {
                restart_shell: false,
            },
        )
        .expect("lock");
        assert!(!outcome.shell_stopped);
        assert!(!outcome.shell_restarted);
        assert!(runner.calls().is_empty());
        assert!(runner.launches().is_empty());
    }

    #[test]
    fn shell_restarts_even_when_write_fails() {
        let registry = InMemoryRegistry::read_only();
        let runner = ScriptedToolRunner::new();
        let err = apply_tile_action(TileAction::Lock, &registry, &runner, RESTART)
            .expect_err("write should fail");
        assert!(format!("{err:#}").contains("block tile rearranging"));
        assert_eq!(runner.launches().len(), 1);
    }

    #[test]
    fn menu_reprompts_until_valid() {
        let input = b"x\n3\n1\n".as_slice();
        let mut output = Vec::new();
        let choice = run_menu(input, &mut output).expect("menu");
        assert_eq!(choice, Some(TileAction::Lock));
        let printed = String::from_utf8(output).expect("utf8");
        assert!(printed.contains("Invalid choice 'x'."));
        assert!(printed.contains("Invalid choice '3'."));
        assert_eq!(printed.matches(PROMPT).count(), 3);
    }

    #[test]
    fn menu_returns_none_on_quit_or_eof() {
        let mut output = Vec::new();
        assert_eq!(run_menu(b"q\n".as_slice(), &mut output).expect("menu"), None);
        assert_eq!(run_menu(b"".as_slice(), &mut output).expect("menu"), None);
    }
}
