//! Registry adapter for per-user policy values.
//!
//! Values are read and written through `reg.exe` so the same [`ToolRunner`]
//! seam covers every side effect. Tests use an in-memory registry instead.

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, instrument};

use crate::core::invocation::Invocation;
use crate::core::reg_query::parse_dword;
use crate::io::tools::ToolRunner;

pub const REG: &str = "reg";

/// A named `REG_DWORD` under a registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyValue {
    pub key: &'static str,
    pub name: &'static str,
}

/// Per-user switch that stops Start-menu tiles from being rearranged.
pub const NO_CHANGE_START_MENU: PolicyValue = PolicyValue {
    key: r"HKCU\Software\Microsoft\Windows\CurrentVersion\Policies\Explorer",
    name: "NoChangeStartMenu",
};

/// Read/write access to policy DWORDs.
pub trait PolicyRegistry {
    /// Current data, or `None` when the value does not exist.
    fn read_dword(&self, value: &PolicyValue) -> Result<Option<u32>>;

    /// Create or overwrite the value.
    fn write_dword(&self, value: &PolicyValue, data: u32) -> Result<()>;

    /// Remove the value. Returns `false` if it was already absent.
    fn delete_value(&self, value: &PolicyValue) -> Result<bool>;
}

/// [`PolicyRegistry`] backed by `reg query|add|delete`.
pub struct RegExeRegistry<'a, R: ToolRunner> {
    runner: &'a R,
}

impl<'a, R: ToolRunner> RegExeRegistry<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }
}

impl<R: ToolRunner> PolicyRegistry for RegExeRegistry<'_, R> {
    #[instrument(skip_all, fields(name = value.name))]
    fn read_dword(&self, value: &PolicyValue) -> Result<Option<u32>> {
        let output = self
            .runner
            .run(&query_invocation(value))
            .context("run reg query")?;
        match output.code {
            Some(0) if !output.timed_out => parse_dword(&output.stdout, value.name),
            // reg.exe exits 1 when the key or value does not exist. Its message is
            // localized, so the exit code is all we can rely on.
            Some(1) if !output.timed_out => {
                debug!(stderr = %output.stderr.trim(), "registry value absent");
                Ok(None)
            }
            _ => Err(anyhow!(
                "reg query {}\\{}: {}",
                value.key,
                value.name,
                output.failure_detail()
            )),
        }
    }

    #[instrument(skip_all, fields(name = value.name, data = data))]
    fn write_dword(&self, value: &PolicyValue, data: u32) -> Result<()> {
        let output = self
            .runner
            .run(&add_invocation(value, data))
            .context("run reg add")?;
        if !output.success() {
            return Err(anyhow!(
                "reg add {}\\{}: {}",
                value.key,
                value.name,
                output.failure_detail()
            ));
        }
        info!("registry value written");
        Ok(())
    }

    #[instrument(skip_all, fields(name = value.name))]
    fn delete_value(&self, value: &PolicyValue) -> Result<bool> {
        if self.read_dword(value)?.is_none() {
            debug!("registry value already absent");
            return Ok(false);
        }
        let output = self
            .runner
            .run(&delete_invocation(value))
            .context("run reg delete")?;
        if !output.success() {
            return Err(anyhow!(
                "reg delete {}\\{}: {}",
                value.key,
                value.name,
                output.failure_detail()
            ));
        }
        info!("registry value deleted");
        Ok(true)
    }
}

fn query_invocation(value: &PolicyValue) -> Invocation {
    Invocation::new(REG)
        .arg("query")
        .arg(value.key)
        .arg("/v")
        .arg(value.name)
}

fn add_invocation(value: &PolicyValue, data: u32) -> Invocation {
    Invocation::new(REG)
        .arg("add")
        .arg(value.key)
        .arg("/v")
        .arg(value.name)
        .arg("/t")
        .arg("REG_DWORD")
        .arg("/d")
        .arg(data.to_string())
        .arg("/f")
}

fn delete_invocation(value: &PolicyValue) -> Invocation {
    Invocation::new(REG)
        .arg("delete")
        .arg(value.key)
        .arg("/v")
        .arg(value.name)
        .arg("/f")
}
