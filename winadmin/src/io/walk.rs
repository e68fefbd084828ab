//! Depth-first enumeration of a path and all of its descendants.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::core::types::EntryKind;

/// One visited entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
    pub depth: usize,
}

/// Iterator over `root` and its descendants.
///
/// Parents come before their children and siblings are sorted by file name.
/// Symlinks and junctions (the root included) are reported as
/// [`EntryKind::Link`] but not followed. Entries that cannot
/// be enumerated are skipped and counted in [`EntryWalker::unreadable`].
pub struct EntryWalker {
    inner: walkdir::IntoIter,
    unreadable: usize,
}

impl EntryWalker {
    pub fn new(root: &Path) -> Self {
        let inner = WalkDir::new(root)
            .follow_links(false)
            .follow_root_links(false)
            .sort_by_file_name()
            .into_iter();
        Self {
            inner,
            unreadable: 0,
        }
    }

    pub fn unreadable(&self) -> usize {
        self.unreadable
    }
}

impl Iterator for EntryWalker {
    type Item = WalkEntry;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(entry) => {
                    // Checked first: with follow_links(false) a link to a
                    // directory is neither is_dir nor a regular file.
                    let kind = if entry.path_is_symlink() {
                        EntryKind::Link
                    } else if entry.file_type().is_dir() {
                        EntryKind::Directory
                    } else {
                        EntryKind::File
                    };
                    return Some(WalkEntry {
                        depth: entry.depth(),
                        path: entry.into_path(),
                        kind,
                    });
                }
                Err(err) => {
                    self.unreadable += 1;
                    debug!(path = ?err.path(), err = %err, "skipping unreadable entry");
                }
            }
        }
    }
}
