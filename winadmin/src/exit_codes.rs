//! Stable exit codes for the `tile-lock` and `grant-access` binaries.

/// Command succeeded (every operation applied, or the user quit the menu).
pub const OK: i32 = 0;
/// Invalid arguments, missing path or account, config errors, or a failed registry write.
pub const INVALID: i32 = 1;
/// `grant-access` visited every entry but at least one operation failed.
pub const PARTIAL: i32 = 2;
