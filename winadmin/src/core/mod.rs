//! Deterministic, pure logic shared by both tools.
//!
//! Core modules must be free of I/O side effects. They build command lines,
//! parse tool output and classify results so everything here is testable on
//! any platform.

pub mod acl;
pub mod invocation;
pub mod menu;
pub mod reg_query;
pub mod types;
