//! Interface-hint resolution.
//!
//! Short human-supplied tokens ("wlan0", "pi-ext", ...) are resolved into
//! fully qualified capture-source arguments through an external JSON mapping
//! table. A hint absent from the table passes through verbatim — downstream
//! tooling accepts raw source strings, so the fall-through is the documented
//! contract, not an error path.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use log::debug;
use serde::Deserialize;

/// One mapping-table entry
#[derive(Debug, Clone, Deserialize)]
pub struct HintEntry {
    /// Hardware address or device node of the capture source
    pub device_address: String,

    /// Suffix appended to the address (capture-source options), may be empty
    #[serde(default)]
    pub argument_suffix: String,
}

/// Lazily loaded hint-to-source table
#[derive(Debug, Default)]
pub struct HintResolver {
    path: std::path::PathBuf,
    table: OnceLock<HashMap<String, HintEntry>>,
}

impl HintResolver {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: OnceLock::new(),
        }
    }

    /// Resolver backed by an in-memory table, for tests and library callers
    pub fn from_table(table: HashMap<String, HintEntry>) -> Self {
        let resolver = Self::default();
        let _ = resolver.table.set(table);
        resolver
    }

    fn table(&self) -> &HashMap<String, HintEntry> {
        self.table.get_or_init(|| match load_table(&self.path) {
            Ok(table) => table,
            Err(err) => {
                debug!(
                    "hint mapping {} unavailable ({err}); all hints pass through",
                    self.path.display()
                );
                HashMap::new()
            }
        })
    }

    /// Resolve one hint to its argument fragment.
    ///
    /// Known hints become `-c <device_address><argument_suffix>`; unknown
    /// hints are returned unchanged.
    pub fn resolve(&self, hint: &str) -> String {
        match self.table().get(hint) {
            Some(entry) => format!("-c {}{}", entry.device_address, entry.argument_suffix),
            None => hint.to_string(),
        }
    }

    /// Build the composite capture-argument string for an ordered hint list.
    ///
    /// Fragments keep input order, duplicates are preserved, empty fragments
    /// are skipped, and the result is space-joined. Resolution never fails.
    pub fn resolve_hints(&self, hints: &[String]) -> String {
        hints
            .iter()
            .map(|hint| self.resolve(hint))
            .filter(|fragment| !fragment.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn load_table(path: &Path) -> anyhow::Result<HashMap<String, HintEntry>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolver_with(entries: &[(&str, &str, &str)]) -> HintResolver {
        let table = entries
            .iter()
            .map(|(hint, addr, suffix)| {
                (
                    hint.to_string(),
                    HintEntry {
                        device_address: addr.to_string(),
                        argument_suffix: suffix.to_string(),
                    },
                )
            })
            .collect();
        HintResolver::from_table(table)
    }

    #[test]
    fn test_unknown_hint_passes_through() {
        let resolver = resolver_with(&[]);
        assert_eq!(resolver.resolve_hints(&["eth0".to_string()]), "eth0");
    }

    #[test]
    fn test_known_hint_expands() {
        let resolver = resolver_with(&[("known", "AA:BB", ":monitor")]);
        assert_eq!(
            resolver.resolve_hints(&["known".to_string()]),
            "-c AA:BB:monitor"
        );
    }

    #[test]
    fn test_order_preserved_and_mixed() {
        let resolver = resolver_with(&[("known", "AA:BB", ":monitor")]);
        let hints = vec!["known".to_string(), "unknown".to_string()];
        assert_eq!(resolver.resolve_hints(&hints), "-c AA:BB:monitor unknown");
    }

    #[test]
    fn test_duplicates_not_deduplicated() {
        let resolver = resolver_with(&[("w0", "wlan0", "")]);
        let hints = vec!["w0".to_string(), "w0".to_string()];
        assert_eq!(resolver.resolve_hints(&hints), "-c wlan0 -c wlan0");
    }

    #[test]
    fn test_empty_fragments_skipped() {
        let resolver = resolver_with(&[]);
        let hints = vec!["".to_string(), "eth0".to_string(), "".to_string()];
        assert_eq!(resolver.resolve_hints(&hints), "eth0");
    }

    #[test]
    fn test_no_hints_is_empty_string() {
        let resolver = resolver_with(&[("known", "AA:BB", "")]);
        assert_eq!(resolver.resolve_hints(&[]), "");
    }

    #[test]
    fn test_missing_mapping_file_degrades_to_pass_through() {
        let resolver = HintResolver::new("/nonexistent/sources.json");
        assert_eq!(resolver.resolve_hints(&["wlan1".to_string()]), "wlan1");
    }

    #[test]
    fn test_table_loaded_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.json");
        std::fs::write(
            &path,
            r#"{"pi": {"device_address": "00:11:22:33:44:55", "argument_suffix": ":type=linuxwifi"}}"#,
        )
        .unwrap();

        let resolver = HintResolver::new(&path);
        assert_eq!(
            resolver.resolve_hints(&["pi".to_string()]),
            "-c 00:11:22:33:44:55:type=linuxwifi"
        );
    }
}
