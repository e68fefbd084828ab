//! Tool runner abstraction.
//!
//! The [`ToolRunner`] trait decouples orchestration from actually spawning
//! `reg`, `taskkill`, `explorer` or `icacls`. Tests use scripted runners that
//! record invocations and return canned outputs.

use std::io::Write;
use std::process::Command;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, instrument};

use crate::core::invocation::Invocation;
use crate::core::types::OpOutcome;
use crate::io::config::AdminConfig;
use crate::io::process::{run_captured, spawn_detached};

/// Completed tool call, decoded to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl ToolOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
            timed_out: false,
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
            timed_out: false,
        }
    }

    pub fn success(&self) -> bool {
        !self.timed_out && self.code == Some(0)
    }

    /// One-line description of why the call failed.
    pub fn failure_detail(&self) -> String {
        if self.timed_out {
            return "timed out".to_string();
        }
        let code = match self.code {
            Some(code) => format!("exit code {code}"),
            None => "terminated".to_string(),
        };
        let message = first_line(&self.stderr).or_else(|| first_line(&self.stdout));
        match message {
            Some(message) => format!("{code}: {message}"),
            None => code,
        }
    }
}

fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| !line.is_empty())
}

/// Abstraction over how tool invocations are executed.
pub trait ToolRunner {
    /// Run to completion and capture output. `Err` only when the tool could not be run at all.
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput>;

    /// Start without waiting (the shell).
    fn launch(&self, invocation: &Invocation) -> Result<()>;
}

/// Classify a tool call into a per-entry outcome. Never fails.
pub fn run_op<R: ToolRunner + ?Sized>(runner: &R, invocation: &Invocation) -> OpOutcome {
    match runner.run(invocation) {
        Ok(output) if output.success() => OpOutcome::Succeeded,
        Ok(output) => OpOutcome::Failed {
            detail: output.failure_detail(),
        },
        Err(err) => OpOutcome::Failed {
            detail: format!("{err:#}"),
        },
    }
}

/// Runner that spawns real processes.
#[derive(Debug, Clone)]
pub struct SystemToolRunner {
    timeout: Option<Duration>,
    output_limit_bytes: usize,
}

impl SystemToolRunner {
    pub fn new(timeout: Option<Duration>, output_limit_bytes: usize) -> Self {
        Self {
            timeout,
            output_limit_bytes,
        }
    }

    pub fn from_config(cfg: &AdminConfig) -> Self {
        Self::new(cfg.tool_timeout(), cfg.tool_output_limit_bytes)
    }

    fn command(invocation: &Invocation) -> Command {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        cmd
    }
}

impl ToolRunner for SystemToolRunner {
    #[instrument(skip_all, fields(program = %invocation.program))]
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput> {
        let captured = run_captured(
            Self::command(invocation),
            self.timeout,
            self.output_limit_bytes,
        )?;
        Ok(ToolOutput {
            code: captured.status.code(),
            stdout: String::from_utf8_lossy(&captured.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&captured.stderr).into_owned(),
            timed_out: captured.timed_out,
        })
    }

    #[instrument(skip_all, fields(program = %invocation.program))]
    fn launch(&self, invocation: &Invocation) -> Result<()> {
        spawn_detached(Self::command(invocation))
    }
}

/// Runner that prints what it would do and reports success.
pub struct DryRunToolRunner<W: Write> {
    out: std::cell::RefCell<W>,
}

impl<W: Write> DryRunToolRunner<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: std::cell::RefCell::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn print(&self, invocation: &Invocation) -> Result<()> {
        info!(%invocation, "dry run");
        writeln!(self.out.borrow_mut(), "would run: {invocation}")?;
        Ok(())
    }
}

impl<W: Write> ToolRunner for DryRunToolRunner<W> {
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput> {
        self.print(invocation)?;
        Ok(ToolOutput::ok(""))
    }

    fn launch(&self, invocation: &Invocation) -> Result<()> {
        self.print(invocation)
    }
}
