//! Version query against the network scanner.
//!
//! The scanner is only ever asked for its version string; scan execution is
//! out of scope for this front end.

use std::process::Command;

use crate::utils::config::SCANNER_BIN;

/// First line of `nmap --version`, or None when the binary is unavailable
pub fn version() -> Option<String> {
    let output = Command::new(SCANNER_BIN).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }

    String::from_utf8(output.stdout)
        .ok()?
        .lines()
        .next()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
}
