//! Tool configuration stored in `winadmin.toml`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::core::acl::Account;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "winadmin.toml";

/// Shared configuration (TOML).
///
/// Missing fields default to values that work for interactive use.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AdminConfig {
    /// Wall-clock limit for a single `reg`/`taskkill`/`icacls` call. Unset means
    /// wait for completion: a recursive `icacls /T` over a large tree can take hours.
    pub tool_timeout_secs: Option<u64>,

    /// Keep at most this many bytes of each tool's stdout and stderr.
    pub tool_output_limit_bytes: usize,

    pub tiles: TilesConfig,

    pub grant: GrantConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TilesConfig {
    /// Stop and restart `explorer.exe` around the registry change.
    pub restart_shell: bool,
}

impl Default for TilesConfig {
    fn default() -> Self {
        Self {
            restart_shell: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GrantConfig {
    /// Account used when `--account` is not passed.
    pub account: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            tool_timeout_secs: None,
            tool_output_limit_bytes: 64 * 1024,
            tiles: TilesConfig::default(),
            grant: GrantConfig::default(),
        }
    }
}

impl AdminConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tool_timeout_secs == Some(0) {
            return Err(anyhow!("tool_timeout_secs must be > 0"));
        }
        if self.tool_output_limit_bytes == 0 {
            return Err(anyhow!("tool_output_limit_bytes must be > 0"));
        }
        if let Some(account) = &self.grant.account {
            Account::parse(account).context("grant.account")?;
        }
        Ok(())
    }

    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout_secs.map(Duration::from_secs)
    }

    /// Resolve the grant target: explicit flag first, then config.
    pub fn resolve_account(&self, flag: Option<&str>) -> Result<Account> {
        match flag.or(self.grant.account.as_deref()) {
            Some(raw) => Account::parse(raw),
            None => Err(anyhow!(
                "no target account: pass --account or set grant.account in {DEFAULT_CONFIG_FILE}"
            )),
        }
    }
}

/// Load config for a CLI run.
///
/// An explicit `--config` path must exist. The implicit `winadmin.toml` in the
/// working directory is optional.
pub fn load_cli_config(explicit: Option<&Path>) -> Result<AdminConfig> {
    match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(anyhow!("config file not found: {}", path.display()));
            }
            load_config(path)
        }
        None => load_config(Path::new(DEFAULT_CONFIG_FILE)),
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `AdminConfig::default()`.
pub fn load_config(path: &Path) -> Result<AdminConfig> {
    if !path.exists() {
        let cfg = AdminConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: AdminConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}
