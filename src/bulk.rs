//! Bulk capture-file processing.
//!
//! Walks a file tree for capture files, then runs the single-file extraction
//! over each one in sequence: dissect, drop fully-empty rows, deduplicate,
//! and write header plus body next to the input. One file's failure is
//! downgraded to a warning so the rest of the batch still runs. Files are
//! processed strictly sequentially, which keeps the sibling output writes
//! race-free.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::cleanup::CleanupScope;
use crate::report::{Channel, Registry};
use crate::tools::FieldExtractor;
use crate::utils::config::{CAPTURE_SUFFIXES, EXTRACT_SUFFIX};

/// Batch totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkOutcome {
    pub processed: usize,
    pub failed: usize,
}

/// Recursively enumerate capture files under `root`, sorted.
///
/// The result is a materialized snapshot: files appearing after enumeration
/// are not picked up by the batch.
pub fn collect_captures(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    walk(root, &mut found)?;
    found.sort();
    Ok(found)
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, found)?;
        } else if is_capture_file(&path) {
            found.push(path);
        }
    }
    Ok(())
}

fn is_capture_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| CAPTURE_SUFFIXES.iter().any(|s| name.ends_with(s)))
}

/// Output path for an input capture: sibling `<stem><EXTRACT_SUFFIX>`
pub fn output_path_for(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("capture");
    input.with_file_name(format!("{stem}{EXTRACT_SUFFIX}"))
}

/// Remove rows that are empty across every field.
///
/// Returns the surviving rows and the dropped count; the caller surfaces the
/// count as a warning so an all-empty dissection is visible rather than
/// silently shrinking.
pub fn drop_empty_rows(rows: Vec<Vec<String>>) -> (Vec<Vec<String>>, usize) {
    let before = rows.len();
    let kept: Vec<Vec<String>> = rows
        .into_iter()
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

/// Deduplicate rows preserving first-occurrence order. Idempotent.
pub fn dedup_rows(rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let mut seen = std::collections::HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect()
}

/// Render header plus rows as tab-separated lines with a trailing newline
pub fn render_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    out.push_str(&header.join("\t"));
    out.push('\n');
    for row in rows {
        out.push_str(&row.join("\t"));
        out.push('\n');
    }
    out
}

/// Extract one capture file to its sibling output.
///
/// The table is staged as a transient file in `work_dir` (registered with the
/// cleanup scope, so a failure never strands it) and only then copied into
/// place.
pub fn extract_file(
    capture: &Path,
    extractor: &dyn FieldExtractor,
    registry: &Registry,
    scope: &CleanupScope,
    work_dir: &Path,
) -> Result<PathBuf> {
    let rows = extractor
        .extract(capture)
        .with_context(|| format!("dissecting {}", capture.display()))?;

    let (rows, dropped) = drop_empty_rows(rows);
    if dropped > 0 {
        registry.report(
            Channel::Warning,
            &format!("{}: dropped {dropped} fully-empty row(s)", capture.display()),
        );
    }

    let rows = dedup_rows(rows);
    let table = render_table(extractor.header(), &rows);

    let output = output_path_for(capture);
    let staging = work_dir.join(format!(
        ".{}.staging",
        output
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("extract.tsv")
    ));

    scope.register(&staging);
    std::fs::write(&staging, &table)
        .with_context(|| format!("staging {}", staging.display()))?;
    std::fs::copy(&staging, &output)
        .with_context(|| format!("writing {}", output.display()))?;
    let _ = std::fs::remove_file(&staging);
    scope.release(&staging);

    debug!(
        "{} -> {} ({} row(s))",
        capture.display(),
        output.display(),
        rows.len()
    );
    Ok(output)
}

/// Process every capture file under `root` sequentially.
///
/// Skip-and-continue policy: a failing file is reported on the Warning
/// channel and the batch moves on.
pub fn bulk_process(
    root: &Path,
    extractor: &dyn FieldExtractor,
    registry: &Registry,
    scope: &CleanupScope,
    work_dir: &Path,
) -> Result<BulkOutcome> {
    let snapshot = collect_captures(root)
        .with_context(|| format!("enumerating captures under {}", root.display()))?;

    registry.report(
        Channel::Info,
        &format!("bulk: {} capture file(s) under {}", snapshot.len(), root.display()),
    );

    let mut outcome = BulkOutcome::default();
    for capture in &snapshot {
        match extract_file(capture, extractor, registry, scope, work_dir) {
            Ok(_) => outcome.processed += 1,
            Err(err) => {
                outcome.failed += 1;
                registry.report(
                    Channel::Warning,
                    &format!("skipping {}: {err:#}", capture.display()),
                );
            }
        }
    }

    Ok(outcome)
}
