//! Extraction handlers: single capture file and bulk tree.

use std::path::Path;

use super::{CommandTable, Ctx};
use crate::bulk;
use crate::report::Channel;
use crate::tools::TsharkExtractor;
use crate::utils::error::AppError;

/// `extract <file>` — dissect one capture into its sibling field table
pub fn handle_extract(_table: &CommandTable, ctx: &Ctx, args: &[String]) -> Result<(), AppError> {
    let [capture] = args else {
        return Err(AppError::InvalidUsage(
            "extract takes exactly one capture file".to_string(),
        ));
    };

    let output = bulk::extract_file(
        Path::new(capture),
        &TsharkExtractor,
        ctx.registry,
        ctx.cleanup,
        &ctx.config.work_dir,
    )?;

    ctx.registry
        .report(Channel::Info, &format!("wrote {}", output.display()));
    Ok(())
}

/// `bulk <dir>` — extract every capture under a tree, skip-and-continue
pub fn handle_bulk(_table: &CommandTable, ctx: &Ctx, args: &[String]) -> Result<(), AppError> {
    let [root] = args else {
        return Err(AppError::InvalidUsage(
            "bulk takes exactly one directory".to_string(),
        ));
    };

    let outcome = bulk::bulk_process(
        Path::new(root),
        &TsharkExtractor,
        ctx.registry,
        ctx.cleanup,
        &ctx.config.work_dir,
    )?;

    ctx.registry.report(
        Channel::Info,
        &format!(
            "bulk finished: {} processed, {} skipped",
            outcome.processed, outcome.failed
        ),
    );
    Ok(())
}
