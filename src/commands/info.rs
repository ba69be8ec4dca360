//! Version information for this tool and its collaborators.

use super::{CommandTable, Ctx};
use crate::report::Channel;
use crate::tools::{scanner, SurveyDaemon};
use crate::utils::error::AppError;

/// `info` / `version` — report our version plus collaborator versions.
///
/// An absent collaborator degrades to "unavailable" with a Caution report;
/// info never fails.
pub fn handle_info(_table: &CommandTable, ctx: &Ctx, _args: &[String]) -> Result<(), AppError> {
    println!("aircap v{}", env!("CARGO_PKG_VERSION"));

    match scanner::version() {
        Some(version) => println!("scanner:       {version}"),
        None => {
            ctx.registry
                .report(Channel::Caution, "network scanner not available");
            println!("scanner:       unavailable");
        }
    }

    match SurveyDaemon.version() {
        Ok(version) if !version.is_empty() => println!("survey daemon: {version}"),
        _ => {
            ctx.registry
                .report(Channel::Caution, "survey daemon not available");
            println!("survey daemon: unavailable");
        }
    }

    Ok(())
}
