//! Wrapper around the packet-dissection tool.
//!
//! The dissector is consumed strictly through its CLI contract: read a
//! capture file, apply the fixed display filter, and print one tab-separated
//! row of the fixed field set per matching frame. Capture-format parsing
//! stays entirely on the tool's side.

use std::path::Path;
use std::process::Command;

use log::debug;

use crate::utils::config::{DISSECTOR_BIN, DISSECT_FIELDS, DISSECT_FILTER};
use crate::utils::error::ExtractError;

/// Seam between the bulk processor and the external dissector, so tests can
/// substitute a canned extractor.
pub trait FieldExtractor {
    /// Column names, in output order
    fn header(&self) -> &[&str];

    /// Extract one row per matching frame from `capture`
    fn extract(&self, capture: &Path) -> Result<Vec<Vec<String>>, ExtractError>;
}

/// Production extractor invoking `tshark`
#[derive(Debug, Default)]
pub struct TsharkExtractor;

impl FieldExtractor for TsharkExtractor {
    fn header(&self) -> &[&str] {
        DISSECT_FIELDS
    }

    fn extract(&self, capture: &Path) -> Result<Vec<Vec<String>>, ExtractError> {
        let mut cmd = Command::new(DISSECTOR_BIN);
        cmd.arg("-r")
            .arg(capture)
            .args(["-Y", DISSECT_FILTER, "-T", "fields"]);

        for field in DISSECT_FIELDS {
            cmd.args(["-e", *field]);
        }
        cmd.args(["-E", "separator=/t"]);

        debug!("running dissector: {cmd:?}");

        let output = cmd.output()?;
        if !output.status.success() {
            return Err(ExtractError::ToolFailed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| ExtractError::BadOutput)?;
        Ok(parse_rows(&stdout, DISSECT_FIELDS.len()))
    }
}

/// Parse tab-separated tool output into fixed-width rows.
///
/// Short rows are padded so every row carries one cell per field; trailing
/// blank lines are dropped.
pub fn parse_rows(output: &str, width: usize) -> Vec<Vec<String>> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut row: Vec<String> = line.split('\t').map(str::to_string).collect();
            row.resize(width, String::new());
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_rows_basic() {
        let rows = parse_rows("aa:bb\tnet1\t2412\t-40\ncc:dd\tnet2\t2437\t-55\n", 4);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["aa:bb", "net1", "2412", "-40"]);
    }

    #[test]
    fn test_parse_rows_pads_short_lines() {
        let rows = parse_rows("aa:bb\tnet1\n", 4);
        assert_eq!(rows[0], vec!["aa:bb", "net1", "", ""]);
    }

    #[test]
    fn test_parse_rows_skips_blank_lines() {
        let rows = parse_rows("\n\naa:bb\t\t\t\n", 4);
        assert_eq!(rows.len(), 1);
    }
}
