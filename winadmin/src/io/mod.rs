//! I/O adapters for both tools.

pub mod config;
pub mod process;
pub mod registry;
pub mod shell;
pub mod tools;
pub mod walk;
