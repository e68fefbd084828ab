//! Shared deterministic types for both tools.
//!
//! These are the stable contracts between orchestration, the I/O adapters and
//! the console/JSON output. None of them touch external state.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// What the user asked `tile-lock` to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileAction {
    /// Prevent tiles from being rearranged (`NoChangeStartMenu = 1`).
    Lock,
    /// Allow rearranging again (value removed).
    Unlock,
}

/// Effective tile policy as read from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileLockState {
    Locked,
    Unlocked,
}

impl TileLockState {
    /// Classify a raw `NoChangeStartMenu` value. Absent or zero means unlocked.
    pub fn from_value(value: Option<u32>) -> Self {
        match value {
            Some(v) if v != 0 => Self::Locked,
            _ => Self::Unlocked,
        }
    }
}

impl fmt::Display for TileLockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked => f.write_str("locked"),
            Self::Unlocked => f.write_str("unlocked"),
        }
    }
}

/// Kind of filesystem entry visited by `grant-access`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
    /// Symlink or junction. Changed in place, never followed.
    Link,
}

/// Result of one tool call against one entry.
///
/// Failures never abort a grant run; they are recorded here and reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OpOutcome {
    Succeeded,
    Failed { detail: String },
}

impl OpOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Both operations applied to a single entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryReport {
    pub path: PathBuf,
    pub kind: EntryKind,
    pub owner: OpOutcome,
    pub grant: OpOutcome,
}

impl EntryReport {
    pub fn is_failed(&self) -> bool {
        self.owner.is_failed() || self.grant.is_failed()
    }
}

/// Summary of a whole `grant-access` run.
///
/// `entries` is in visit order: the root first, then descendants depth-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantReport {
    pub root: PathBuf,
    pub account: String,
    pub entries: Vec<EntryReport>,
    /// Directory entries that could not be enumerated and were skipped.
    pub unreadable: usize,
}

impl GrantReport {
    pub fn failed_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_failed()).count()
    }

    pub fn is_clean(&self) -> bool {
        self.failed_count() == 0
    }
}
