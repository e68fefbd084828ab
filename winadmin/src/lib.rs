//! Small Windows administration utilities.
//!
//! Two independent tools share this crate:
//!
//! - **tile-lock** toggles the per-user policy that stops Start-menu tiles
//!   from being rearranged, restarting the shell so it takes effect.
//! - **grant-access** walks a path and, for every entry, sets its owner and
//!   grants a named account full, inheritable access.
//!
//! The layout keeps the same split throughout:
//!
//! - **[`core`]**: Pure logic (menu parsing, `reg` output parsing, `icacls`
//!   argument building, outcome types). No I/O.
//! - **[`io`]**: Side effects (config file, child processes, registry and
//!   shell adapters, directory walking), behind traits so tests can script them.
//!
//! [`tiles`] and [`grant`] coordinate the two to implement the binaries.

pub mod core;
pub mod exit_codes;
pub mod grant;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tiles;
