//! Orchestration for `grant-access`.
//!
//! Every entry under the root gets two `icacls` calls: set the owner, then
//! grant full control. A failing call is recorded in the report and the run
//! moves on; only a missing root stops it, and that happens before any tool
//! is invoked.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info, instrument};

use crate::core::acl::{Account, grant_full_invocation, set_owner_invocation};
use crate::core::types::{EntryReport, GrantReport};
use crate::io::tools::{ToolRunner, run_op};
use crate::io::walk::EntryWalker;

/// Inputs for [`grant_access`].
#[derive(Debug, Clone)]
pub struct GrantRequest<'a> {
    pub root: &'a Path,
    pub account: &'a Account,
}

/// The root path passed to `grant-access` does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingPathError {
    pub path: PathBuf,
}

impl fmt::Display for MissingPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path does not exist: {}", self.path.display())
    }
}

impl std::error::Error for MissingPathError {}

/// Take ownership of and grant full access on `request.root` and everything below it.
///
/// `on_entry` sees each entry report as soon as both operations have run, so
/// callers can print progress on large trees.
#[instrument(skip_all, fields(root = %request.root.display(), account = %request.account))]
pub fn grant_access<R: ToolRunner, F: FnMut(&EntryReport)>(
    request: &GrantRequest<'_>,
    runner: &R,
    mut on_entry: F,
) -> Result<GrantReport> {
    // symlink_metadata so a dangling link at the root still counts as present.
    if request.root.symlink_metadata().is_err() {
        return Err(MissingPathError {
            path: request.root.to_path_buf(),
        }
        .into());
    }

    let mut walker = EntryWalker::new(request.root);
    let mut entries = Vec::new();
    for entry in walker.by_ref() {
        debug!(path = %entry.path.display(), depth = entry.depth, "processing entry");
        let owner = run_op(
            runner,
            &set_owner_invocation(&entry.path, entry.kind, request.account),
        );
        let grant = run_op(
            runner,
            &grant_full_invocation(&entry.path, entry.kind, request.account),
        );
        let report = EntryReport {
            path: entry.path,
            kind: entry.kind,
            owner,
            grant,
        };
        on_entry(&report);
        entries.push(report);
    }

    let report = GrantReport {
        root: request.root.to_path_buf(),
        account: request.account.to_string(),
        entries,
        unreadable: walker.unreadable(),
    };
    info!(
        entries = report.entries.len(),
        failed = report.failed_count(),
        unreadable = report.unreadable,
        "grant finished"
    );
    Ok(report)
}
