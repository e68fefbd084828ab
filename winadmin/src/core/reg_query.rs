//! Parsing for `reg query <key> /v <name>` output.
//!
//! A matching line looks like `    NoChangeStartMenu    REG_DWORD    0x1`.
//! Only `REG_DWORD` values are understood; anything else is an error so a
//! policy set to an unexpected type is never silently misread.

use anyhow::{Context, Result, anyhow};

/// Extract the DWORD data for `name` from `reg query` stdout.
///
/// Returns `Ok(None)` when no line names the value.
pub fn parse_dword(stdout: &str, name: &str) -> Result<Option<u32>> {
    for line in stdout.lines() {
        let mut fields = line.split_whitespace();
        let Some(value_name) = fields.next() else {
            continue;
        };
        if !value_name.eq_ignore_ascii_case(name) {
            continue;
        }
        let kind = fields
            .next()
            .ok_or_else(|| anyhow!("missing type for registry value {name}"))?;
        if kind != "REG_DWORD" {
            return Err(anyhow!("registry value {name} has type {kind}, expected REG_DWORD"));
        }
        let data = fields
            .next()
            .ok_or_else(|| anyhow!("missing data for registry value {name}"))?;
        let hex = data
            .strip_prefix("0x")
            .or_else(|| data.strip_prefix("0X"))
            .unwrap_or(data);
        let parsed = u32::from_str_radix(hex, 16)
            .with_context(|| format!("parse registry data {data:?} for {name}"))?;
        return Ok(Some(parsed));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESENT: &str = "\r\n\
HKEY_CURRENT_USER\\Software\\Microsoft\\Windows\\CurrentVersion\\Policies\\Explorer\r\n\
    NoChangeStartMenu    REG_DWORD    0x1\r\n\
\r\n";

    #[test]
    fn reads_present_dword() {
        let value = parse_dword(PRESENT, "NoChangeStartMenu").expect("parse");
        assert_eq!(value, Some(1));
    }

    #[test]
    fn value_name_match_is_case_insensitive() {
        let value = parse_dword(PRESENT, "nochangestartmenu").expect("parse");
        assert_eq!(value, Some(1));
    }

    #[test]
    fn missing_value_is_none() {
        let stdout = "HKEY_CURRENT_USER\\Software\\Policies\r\n    Other    REG_DWORD    0x0\r\n";
        assert_eq!(parse_dword(stdout, "NoChangeStartMenu").expect("parse"), None);
        assert_eq!(parse_dword("", "NoChangeStartMenu").expect("parse"), None);
    }

    #[test]
    fn rejects_non_dword_type() {
        let stdout = "    NoChangeStartMenu    REG_SZ    1\r\n";
        let err = parse_dword(stdout, "NoChangeStartMenu").expect_err("should fail");
        assert!(err.to_string().contains("expected REG_DWORD"));
    }

    #[test]
    fn rejects_garbage_data() {
        let stdout = "    NoChangeStartMenu    REG_DWORD    0xZZ\r\n";
        assert!(parse_dword(stdout, "NoChangeStartMenu").is_err());
    }
}
