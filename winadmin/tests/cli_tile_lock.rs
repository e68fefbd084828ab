//! CLI tests for the `tile-lock` binary's interactive menu.
//!
//! Quitting the menu never touches the registry or the shell, so these run
//! on any platform.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use winadmin::exit_codes;

fn tile_lock_with_input(args: &[&str], input: &[u8]) -> Output {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut child = Command::new(env!("CARGO_BIN_EXE_tile-lock"))
        .current_dir(temp.path())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn tile-lock");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input)
        .expect("write stdin");
    child.wait_with_output().expect("wait tile-lock")
}

#[test]
fn menu_reprompts_then_quits() {
    let out = tile_lock_with_input(&[], b"x\nq\n");
    assert_eq!(out.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Invalid choice 'x'."), "stdout: {stdout}");
    assert_eq!(stdout.matches("1) Block rearranging tiles").count(), 2);
}

#[test]
fn menu_exits_cleanly_on_eof() {
    let out = tile_lock_with_input(&[], b"");
    assert_eq!(out.status.code(), Some(exit_codes::OK));
}

#[test]
fn unknown_subcommand_is_invalid() {
    let out = tile_lock_with_input(&["toggle"], b"");
    assert_eq!(out.status.code(), Some(exit_codes::INVALID));
}
