//! Background capture pipeline.
//!
//! Two long-running stages connected by a bounded byte channel: a fetch task
//! streams from the network endpoint, a segment task rolls the bytes into
//! time-bounded capture files. The channel bound gives the pipeline its
//! backpressure — a slow writer blocks the fetch. The stages share no state
//! beyond the channel and have no cancellation API of their own; they wind
//! down when the remote stream ends or the survey daemon is stopped.

pub mod fetch;
pub mod segment;

pub use fetch::{read_credentials, StreamCredentials};
pub use segment::{SegmentStats, SegmentWriter};

use std::sync::mpsc::sync_channel;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;

use crate::report::{Channel, Registry};
use crate::tools::SurveyDaemon;
use crate::utils::config::{Config, SEGMENT_PREFIX};
use crate::utils::error::{FetchError, SegmentError};

/// Chunks buffered between the stages before the producer blocks
const CHANNEL_DEPTH: usize = 64;

/// Handle on a launched pipeline; both stages are already running
pub struct Pipeline {
    fetch: JoinHandle<Result<u64, FetchError>>,
    segment: JoinHandle<Result<SegmentStats, SegmentError>>,
}

impl Pipeline {
    /// Await both stages and return (bytes fetched, segment stats).
    ///
    /// A panicked stage surfaces as an error rather than propagating the
    /// unwind into the supervisor.
    pub fn join(self) -> Result<(u64, SegmentStats)> {
        let fetched = self
            .fetch
            .join()
            .map_err(|_| anyhow::anyhow!("fetch task panicked"))?
            .context("stream fetch failed")?;
        let stats = self
            .segment
            .join()
            .map_err(|_| anyhow::anyhow!("segment task panicked"))?
            .context("segment writer failed")?;
        Ok((fetched, stats))
    }
}

/// Launch both pipeline stages and return once they are running.
///
/// Credentials come from the configured `key=value` file. The call is
/// non-blocking: the stages are long-running and are supervised through the
/// returned handle.
pub fn start_stream_capture(config: &Config) -> Result<Pipeline> {
    let credentials = read_credentials(&config.credentials_file)
        .context("reading stream credentials")?;

    let (tx, rx) = sync_channel::<Vec<u8>>(CHANNEL_DEPTH);

    let url = config.stream_url.clone();
    let fetch = std::thread::spawn(move || fetch::fetch_stream(&url, &credentials, tx));

    let writer = SegmentWriter::new(
        config.segment_dir.clone(),
        SEGMENT_PREFIX,
        Duration::from_secs(config.segment_secs),
    );
    let segment = std::thread::spawn(move || writer.run(rx));

    info!(
        "capture pipeline launched: {} -> {} ({}s segments)",
        config.stream_url,
        config.segment_dir.display(),
        config.segment_secs
    );

    Ok(Pipeline { fetch, segment })
}

/// Request pipeline shutdown by signaling the external survey daemon.
///
/// Best-effort and asynchronous: the daemon is addressed by process name and
/// no confirmation is awaited. The pipeline stages are not signaled directly;
/// they terminate when the daemon's stream closes.
pub fn shutdown(registry: &Registry) {
    registry.report(Channel::Info, "requesting survey daemon shutdown");
    SurveyDaemon.signal_stop();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_fails_without_credentials() {
        let config = Config {
            credentials_file: "/nonexistent/stream.conf".into(),
            ..Config::default()
        };
        assert!(start_stream_capture(&config).is_err());
    }
}
