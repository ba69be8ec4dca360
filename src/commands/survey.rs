//! Survey daemon and stream capture handlers.

use anyhow::Context as _;

use super::{CommandTable, Ctx};
use crate::pipeline;
use crate::report::Channel;
use crate::tools::SurveyDaemon;
use crate::utils::error::AppError;

/// `start <hint>...` — resolve the hinted capture sources and launch the
/// survey daemon with the derived argument string.
pub fn handle_start(_table: &CommandTable, ctx: &Ctx, args: &[String]) -> Result<(), AppError> {
    let capture_args = ctx.hints.resolve_hints(args);
    if capture_args.is_empty() {
        // Non-fatal: the daemon still comes up on its configured defaults.
        ctx.registry.report(
            Channel::Warning,
            "hint resolution produced no capture arguments",
        );
    } else {
        ctx.registry
            .report(Channel::Info, &format!("capture sources: {capture_args}"));
    }

    SurveyDaemon
        .launch(&capture_args)
        .context("launching survey daemon")?;
    Ok(())
}

/// `stop` — best-effort graceful shutdown of the survey daemon by name
pub fn handle_stop(_table: &CommandTable, ctx: &Ctx, _args: &[String]) -> Result<(), AppError> {
    pipeline::shutdown(ctx.registry);
    Ok(())
}

/// `stream` — launch the fetch and segment tasks, then supervise them until
/// the remote stream closes.
pub fn handle_stream(_table: &CommandTable, ctx: &Ctx, _args: &[String]) -> Result<(), AppError> {
    let handle = pipeline::start_stream_capture(ctx.config)?;

    // Both stages are running; block here as their supervisor. They end when
    // the daemon's stream closes (see `stop`).
    let (fetched, stats) = handle.join()?;
    ctx.registry.report(
        Channel::Info,
        &format!(
            "stream capture complete: {fetched} bytes into {} segment(s)",
            stats.segments
        ),
    );
    Ok(())
}
