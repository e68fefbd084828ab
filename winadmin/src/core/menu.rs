//! Choice parsing for the interactive `tile-lock` menu.

use crate::core::types::TileAction;

/// Menu body printed before every prompt.
pub const MENU_TEXT: &str = "\
Start menu tiles
  1) Block rearranging tiles
  2) Unblock rearranging tiles
  q) Quit";

pub const PROMPT: &str = "Select [1-2, q]: ";

/// One accepted line of menu input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Apply(TileAction),
    Quit,
}

/// Parse one line of input. Returns `None` for anything the menu must re-prompt on.
pub fn parse_choice(line: &str) -> Option<MenuChoice> {
    match line.trim() {
        "1" => Some(MenuChoice::Apply(TileAction::Lock)),
        "2" => Some(MenuChoice::Apply(TileAction::Unlock)),
        "q" | "Q" => Some(MenuChoice::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_map_to_actions() {
        assert_eq!(parse_choice("1\n"), Some(MenuChoice::Apply(TileAction::Lock)));
        assert_eq!(parse_choice("  2 "), Some(MenuChoice::Apply(TileAction::Unlock)));
        assert_eq!(parse_choice("Q"), Some(MenuChoice::Quit));
    }

    #[test]
    fn anything_else_is_rejected() {
        for line in ["", "3", "12", "lock", "1 2"] {
            assert_eq!(parse_choice(line), None, "line {line:?}");
        }
    }
}
