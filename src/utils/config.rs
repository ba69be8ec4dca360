//! Configuration and constants for the CLI.
//!
//! All environment lookups happen once, here, in `Config::from_env`.
//! Handlers receive the resulting struct by reference and never consult
//! the environment themselves.

use std::path::PathBuf;
use std::time::Duration;

use crate::report::Channel;

/// Default duration of one capture segment written by the stream pipeline
pub const DEFAULT_SEGMENT_SECS: u64 = 300;

/// Default endpoint the stream-fetch task pulls from
pub const DEFAULT_STREAM_URL: &str = "http://127.0.0.1:2501/stream.pcap";

/// Prefix for segmented capture output files
pub const SEGMENT_PREFIX: &str = "aircap";

/// Process name of the wireless-survey daemon, used for graceful shutdown
pub const SURVEY_DAEMON: &str = "kismet_server";

/// Fixed base flags passed to the survey daemon on launch
pub const SURVEY_BASE_FLAGS: &[&str] = &["--no-ncurses", "--daemonize"];

/// Binary name of the network scanner (queried for its version only)
pub const SCANNER_BIN: &str = "nmap";

/// Binary name of the packet-dissection tool
pub const DISSECTOR_BIN: &str = "tshark";

/// Display filter handed to the dissector: management beacons and probe responses
pub const DISSECT_FILTER: &str = "wlan.fc.type_subtype == 0x0008 || wlan.fc.type_subtype == 0x0005";

/// Fields extracted per frame, in column order
pub const DISSECT_FIELDS: &[&str] = &[
    "wlan.sa",
    "wlan.ssid",
    "radiotap.channel.freq",
    "radiotap.dbm_antsignal",
];

/// File suffixes recognized as capture files by the bulk processor
pub const CAPTURE_SUFFIXES: &[&str] = &[".pcap", ".pcapng", ".cap"];

/// Suffix appended to an input file's stem for extraction output
pub const EXTRACT_SUFFIX: &str = "-fields.tsv";

/// Timeout for the streaming HTTP connect (the body read itself is unbounded)
pub const STREAM_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable process-wide configuration, built once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for transient files
    pub work_dir: PathBuf,

    /// Path to the hint-mapping table (JSON)
    pub sources_file: PathBuf,

    /// Path to the stream credentials file (`key=value` lines)
    pub credentials_file: PathBuf,

    /// Endpoint the fetch task streams from
    pub stream_url: String,

    /// Directory segment files are written to
    pub segment_dir: PathBuf,

    /// Seconds per capture segment
    pub segment_secs: u64,

    /// Per-channel sink command overrides, indexed by `Channel as usize`
    pub sink_overrides: [Option<String>; Channel::COUNT],
}

impl Config {
    /// Build configuration from `AIRCAP_*` environment variables.
    ///
    /// Missing variables fall back to the documented defaults; a malformed
    /// `AIRCAP_SEGMENT_SECS` falls back rather than failing startup.
    pub fn from_env() -> Self {
        let work_dir = std::env::var_os("AIRCAP_WORK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        let sources_file = std::env::var_os("AIRCAP_SOURCES")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/etc/aircap/sources.json"));

        let credentials_file = std::env::var_os("AIRCAP_CREDENTIALS")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/etc/aircap/stream.conf"));

        let stream_url = std::env::var("AIRCAP_STREAM_URL")
            .unwrap_or_else(|_| DEFAULT_STREAM_URL.to_string());

        let segment_dir = std::env::var_os("AIRCAP_SEGMENT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| work_dir.clone());

        let segment_secs = std::env::var("AIRCAP_SEGMENT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SEGMENT_SECS);

        let mut sink_overrides: [Option<String>; Channel::COUNT] = Default::default();
        for channel in Channel::ALL {
            sink_overrides[channel as usize] = std::env::var(channel.env_var()).ok();
        }

        Self {
            work_dir,
            sources_file,
            credentials_file,
            stream_url,
            segment_dir,
            segment_secs,
            sink_overrides,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: std::env::temp_dir(),
            sources_file: PathBuf::from("/etc/aircap/sources.json"),
            credentials_file: PathBuf::from("/etc/aircap/stream.conf"),
            stream_url: DEFAULT_STREAM_URL.to_string(),
            segment_dir: std::env::temp_dir(),
            segment_secs: DEFAULT_SEGMENT_SECS,
            sink_overrides: Default::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.segment_secs, DEFAULT_SEGMENT_SECS);
        assert_eq!(config.stream_url, DEFAULT_STREAM_URL);
        assert!(config.sink_overrides.iter().all(|o| o.is_none()));
    }

    #[test]
    fn test_dissect_fields_nonempty() {
        assert!(!DISSECT_FIELDS.is_empty());
        assert!(CAPTURE_SUFFIXES.iter().all(|s| s.starts_with('.')));
    }
}
