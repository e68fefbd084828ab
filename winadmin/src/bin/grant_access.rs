//! `grant-access`: set the owner of a path and everything below it, and grant
//! an account full, inheritable access.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use winadmin::core::types::{EntryReport, GrantReport, OpOutcome};
use winadmin::exit_codes;
use winadmin::grant::{GrantRequest, grant_access};
use winadmin::io::config::load_cli_config;
use winadmin::io::tools::{DryRunToolRunner, SystemToolRunner, ToolRunner};
use winadmin::logging;

#[derive(Parser)]
#[command(
    name = "grant-access",
    version,
    about = "Take ownership of a path recursively and grant an account full access"
)]
struct Cli {
    /// File or directory to process (recursively).
    path: PathBuf,

    /// Account to own the entries and receive full control (overrides grant.account).
    #[arg(short, long)]
    account: Option<String>,

    /// Config file (default: ./winadmin.toml, if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the icacls commands instead of running them.
    #[arg(long)]
    dry_run: bool,

    /// Print the final report as JSON instead of per-entry lines.
    #[arg(long)]
    json: bool,
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
    let account = cfg.resolve_account(cli.account.as_deref())?;
    let request = GrantRequest {
        root: &cli.path,
        account: &account,
    };

    let report = if cli.dry_run {
        // Planned commands go to stderr when stdout carries JSON.
        if cli.json {
            execute(&request, &DryRunToolRunner::new(io::stderr()), true)?
        } else {
            execute(&request, &DryRunToolRunner::new(io::stdout()), false)?
        }
    } else {
        execute(&request, &SystemToolRunner::from_config(&cfg), cli.json)?
    };

    if cli.json {
        let payload = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{payload}");
    } else {
        println!(
            "processed {} entries for {}: {} failed, {} unreadable",
            report.entries.len(),
            report.account,
            report.failed_count(),
            report.unreadable
        );
    }

    if report.is_clean() {
        Ok(exit_codes::OK)
    } else {
        Ok(exit_codes::PARTIAL)
    }
}

fn execute<R: ToolRunner>(
    request: &GrantRequest<'_>,
    runner: &R,
    quiet: bool,
) -> Result<GrantReport> {
    grant_access(request, runner, |entry| {
        if !quiet {
            print_entry(entry);
        }
    })
}

fn print_entry(entry: &EntryReport) {
    for (label, outcome) in [("owner", &entry.owner), ("grant", &entry.grant)] {
        match outcome {
            OpOutcome::Succeeded => println!("[ok]     {label} {}", entry.path.display()),
            OpOutcome::Failed { detail } => {
                println!("[failed] {label} {}: {detail}", entry.path.display());
            }
        }
    }
}
