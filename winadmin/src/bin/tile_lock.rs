//! `tile-lock`: block or unblock rearranging Start-menu tiles for the current user.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use winadmin::core::types::TileAction;
use winadmin::exit_codes;
use winadmin::io::config::load_cli_config;
use winadmin::io::registry::RegExeRegistry;
use winadmin::io::tools::SystemToolRunner;
use winadmin::logging;
use winadmin::tiles::{TileOptions, apply_tile_action, read_tile_state, run_menu};

#[derive(Parser)]
#[command(
    name = "tile-lock",
    version,
    about = "Block or unblock rearranging Start-menu tiles"
)]
struct Cli {
    /// Config file (default: ./winadmin.toml, if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Do not restart explorer.exe; the change applies at next sign-in.
    #[arg(long, global = true)]
    no_restart: bool,

    /// Runs the interactive menu when omitted.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Block rearranging tiles.
    Lock,
    /// Allow rearranging tiles again.
    Unlock,
    /// Print whether tiles are currently locked.
    Status,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Usage errors share the INVALID code instead of clap's default of 2.
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            return Ok(exit_codes::INVALID);
        }
        Err(err) => err.exit(),
    };
    let cfg = load_cli_config(cli.config.as_deref())?;
    let runner = SystemToolRunner::from_config(&cfg);
    let registry = RegExeRegistry::new(&runner);

    let action = match cli.command {
        Some(Command::Status) => {
            println!("Start menu tiles: {}", read_tile_state(&registry)?);
            return Ok(exit_codes::OK);
        }
        Some(Command::Lock) => TileAction::Lock,
        Some(Command::Unlock) => TileAction::Unlock,
        None => match run_menu(io::stdin().lock(), io::stdout().lock())? {
            Some(action) => action,
            None => return Ok(exit_codes::OK),
        },
    };

    let options = TileOptions {
        restart_shell: cfg.tiles.restart_shell && !cli.no_restart,
    };
    let outcome = apply_tile_action(action, &registry, &runner, options)?;
    println!(
        "Start menu tiles: {} (was {})",
        outcome.current, outcome.previous
    );
    if options.restart_shell && !outcome.shell_stopped {
        println!("explorer.exe was not running before the change.");
    }
    if !outcome.shell_restarted {
        println!("Sign out or restart explorer.exe for the change to take effect.");
    }
    Ok(exit_codes::OK)
}
