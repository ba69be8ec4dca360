//! Handle on the external wireless-survey daemon.
//!
//! The daemon self-daemonizes, so launching it is spawn-and-forget; stopping
//! it is a graceful TERM addressed by process name rather than pid, because
//! the pid belongs to the daemonized child, not to the process we spawned.

use std::process::{Command, Stdio};

use log::{debug, info};

use crate::utils::config::{SURVEY_BASE_FLAGS, SURVEY_DAEMON};
use crate::utils::error::DaemonError;

/// Control surface for the survey daemon
#[derive(Debug, Default)]
pub struct SurveyDaemon;

impl SurveyDaemon {
    /// Launch the daemon with its fixed base flags plus the derived
    /// capture-argument string.
    ///
    /// `capture_args` is whitespace-split into individual arguments; an empty
    /// string contributes nothing beyond the base flags.
    pub fn launch(&self, capture_args: &str) -> Result<(), DaemonError> {
        let mut cmd = Command::new(SURVEY_DAEMON);
        cmd.args(SURVEY_BASE_FLAGS)
            .args(capture_args.split_whitespace())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        debug!("launching survey daemon: {cmd:?}");

        cmd.spawn().map_err(DaemonError::LaunchFailed)?;
        info!("survey daemon launched");
        Ok(())
    }

    /// First line of the daemon's `--version` output
    pub fn version(&self) -> Result<String, DaemonError> {
        let output = Command::new(SURVEY_DAEMON)
            .arg("--version")
            .output()
            .map_err(DaemonError::VersionFailed)?;

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string())
    }

    /// Request a graceful stop by signaling the daemon process by name.
    ///
    /// Best-effort and asynchronous: the signal is dispatched and not awaited,
    /// and an absent daemon is not an error.
    pub fn signal_stop(&self) {
        match Command::new("pkill")
            .args(["-TERM", "-x", SURVEY_DAEMON])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(_) => info!("sent TERM to {SURVEY_DAEMON}"),
            Err(err) => debug!("could not signal {SURVEY_DAEMON}: {err}"),
        }
    }
}
