//! Segment-writer stage of the capture pipeline.
//!
//! Drains the pipeline channel and rolls the byte stream into time-bounded
//! segment files. Rotation happens on the first chunk past the segment
//! boundary, so a segment is never split mid-chunk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use chrono::Utc;
use log::{debug, info};

use crate::utils::error::SegmentError;

/// Totals reported when the stream closes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentStats {
    pub segments: usize,
    pub bytes: u64,
}

/// Writes the incoming stream as rotating time-bounded files
#[derive(Debug)]
pub struct SegmentWriter {
    dir: PathBuf,
    prefix: String,
    duration: Duration,
    sequence: usize,
}

impl SegmentWriter {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, duration: Duration) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            duration,
            sequence: 0,
        }
    }

    /// Consume `rx` until the sending side closes, rotating on the segment
    /// duration. Returns segment and byte totals.
    pub fn run(mut self, rx: Receiver<Vec<u8>>) -> Result<SegmentStats, SegmentError> {
        let mut stats = SegmentStats {
            segments: 0,
            bytes: 0,
        };
        let mut current: Option<(BufWriter<File>, Instant)> = None;

        while let Ok(chunk) = rx.recv() {
            let rotate = match &current {
                Some((_, opened)) => opened.elapsed() >= self.duration,
                None => true,
            };

            if rotate {
                if let Some((mut writer, _)) = current.take() {
                    writer.flush()?;
                }
                let path = self.next_segment_path();
                debug!("opening segment {}", path.display());
                current = Some((BufWriter::new(File::create(&path)?), Instant::now()));
                stats.segments += 1;
            }

            if let Some((writer, _)) = &mut current {
                writer.write_all(&chunk)?;
                stats.bytes += chunk.len() as u64;
            }
        }

        if let Some((mut writer, _)) = current.take() {
            writer.flush()?;
        }

        info!(
            "stream closed: {} bytes across {} segment(s)",
            stats.bytes, stats.segments
        );
        Ok(stats)
    }

    /// `<dir>/<prefix>-<UTC timestamp>-<seq>.cap`; the sequence keeps names
    /// unique when segments rotate within one second.
    fn next_segment_path(&mut self) -> PathBuf {
        self.sequence += 1;
        let stamp = Utc::now().format("%Y%m%d-%H%M%S");
        self.dir
            .join(format!("{}-{stamp}-{:04}.cap", self.prefix, self.sequence))
    }
}

/// Segment files currently present under `dir` for `prefix`, sorted
pub fn list_segments(dir: &Path, prefix: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut segments: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix) && n.ends_with(".cap"))
        })
        .collect();
    segments.sort();
    Ok(segments)
}
