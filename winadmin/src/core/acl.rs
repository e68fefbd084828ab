//! `icacls` command lines for ownership and grants.

use std::fmt;
use std::path::Path;

use anyhow::{Result, anyhow};

use crate::core::invocation::Invocation;
use crate::core::types::EntryKind;

pub const ICACLS: &str = "icacls";

/// Validated account name, e.g. `alice`, `CORP\alice`, `BUILTIN\Administrators`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account(String);

impl Account {
    pub fn parse(raw: &str) -> Result<Self> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(anyhow!("account name must not be empty"));
        }
        // `icacls /grant` splits `<account>:<perm>` on the colon.
        if name.contains(':') {
            return Err(anyhow!("account name {name:?} must not contain ':'"));
        }
        if name.chars().any(char::is_control) {
            return Err(anyhow!("account name {name:?} contains control characters"));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `icacls <path> /setowner <account> [/L] /C /Q`
///
/// Links get `/L` so the link itself changes owner, not its target.
pub fn set_owner_invocation(path: &Path, kind: EntryKind, account: &Account) -> Invocation {
    let inv = Invocation::new(ICACLS)
        .path_arg(path)
        .arg("/setowner")
        .arg(account.as_str());
    with_link_flag(inv, kind).arg("/C").arg("/Q")
}

/// Full control for `account`.
///
/// Directories get object+container inheritance and `/T` so existing children
/// are covered too. Files reject inheritance flags, so they get plain `F`.
/// Links get plain `F` plus `/L`, which keeps icacls off the link target.
pub fn grant_full_invocation(path: &Path, kind: EntryKind, account: &Account) -> Invocation {
    let inv = Invocation::new(ICACLS).path_arg(path).arg("/grant");
    match kind {
        EntryKind::Directory => inv
            .arg(format!("{account}:(OI)(CI)F"))
            .arg("/T")
            .arg("/C")
            .arg("/Q"),
        EntryKind::File => inv.arg(format!("{account}:F")).arg("/C").arg("/Q"),
        EntryKind::Link => inv
            .arg(format!("{account}:F"))
            .arg("/L")
            .arg("/C")
            .arg("/Q"),
    }
}

fn with_link_flag(inv: Invocation, kind: EntryKind) -> Invocation {
    match kind {
        EntryKind::Link => inv.arg("/L"),
        EntryKind::Directory | EntryKind::File => inv,
    }
}
