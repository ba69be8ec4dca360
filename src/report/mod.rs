//! Tiered diagnostic reporting.
//!
//! Six severity channels, each bound once at startup to a sink: the default
//! Error and Warning sinks route through the `log` macros, the remaining four
//! default to no-op, and any channel can be rebound to an external sink
//! command via configuration. `report` is fire-and-forget by contract — a
//! failing sink must never disturb the caller's control flow.

pub mod event;

pub use event::{Phase, TraceEvent};

use std::process::{Command, Stdio};

use log::{debug, error, warn};

use crate::utils::config::Config;

/// Severity channels, in decreasing severity order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Error = 0,
    Warning = 1,
    Caution = 2,
    Info = 3,
    Telemetry = 4,
    Debug = 5,
}

impl Channel {
    pub const COUNT: usize = 6;

    pub const ALL: [Channel; Channel::COUNT] = [
        Channel::Error,
        Channel::Warning,
        Channel::Caution,
        Channel::Info,
        Channel::Telemetry,
        Channel::Debug,
    ];

    /// Environment variable that overrides this channel's sink command
    pub fn env_var(self) -> &'static str {
        match self {
            Channel::Error => "AIRCAP_SINK_ERROR",
            Channel::Warning => "AIRCAP_SINK_WARN",
            Channel::Caution => "AIRCAP_SINK_CAUTION",
            Channel::Info => "AIRCAP_SINK_INFO",
            Channel::Telemetry => "AIRCAP_SINK_TELEMETRY",
            Channel::Debug => "AIRCAP_SINK_DEBUG",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Channel::Error => "error",
            Channel::Warning => "warning",
            Channel::Caution => "caution",
            Channel::Info => "info",
            Channel::Telemetry => "telemetry",
            Channel::Debug => "debug",
        }
    }
}

/// Where a channel's messages go
#[derive(Debug, Clone)]
enum Sink {
    /// Discard
    Noop,

    /// Route through the `log` facade at the channel's severity
    Log,

    /// Spawn an external command with the message as its final argument
    Command(String),
}

/// Channel-to-sink bindings, resolved once from configuration
#[derive(Debug, Clone)]
pub struct Registry {
    sinks: [Sink; Channel::COUNT],
}

impl Registry {
    /// Resolve every channel's sink from `config.sink_overrides`.
    ///
    /// Error and Warning always have a non-no-op default; the other four
    /// channels stay silent unless explicitly bound.
    pub fn from_config(config: &Config) -> Self {
        let mut sinks = [
            Sink::Log,  // Error
            Sink::Log,  // Warning
            Sink::Noop, // Caution
            Sink::Noop, // Info
            Sink::Noop, // Telemetry
            Sink::Noop, // Debug
        ];

        for channel in Channel::ALL {
            if let Some(cmd) = &config.sink_overrides[channel as usize] {
                if !cmd.trim().is_empty() {
                    sinks[channel as usize] = Sink::Command(cmd.clone());
                }
            }
        }

        Self { sinks }
    }

    /// Registry with only the default sinks, for tests and library use
    pub fn with_defaults() -> Self {
        Self::from_config(&Config::default())
    }

    /// Deliver `message` on `channel`.
    ///
    /// Never fails: a sink command that cannot be spawned degrades to a
    /// best-effort stderr print for Error and Warning and is swallowed for
    /// the quieter channels.
    pub fn report(&self, channel: Channel, message: &str) {
        match &self.sinks[channel as usize] {
            Sink::Noop => {}
            Sink::Log => match channel {
                Channel::Error => error!("{message}"),
                Channel::Warning => warn!("{message}"),
                _ => debug!("[{}] {message}", channel.label()),
            },
            Sink::Command(cmd) => {
                if let Err(err) = run_sink_command(cmd, message) {
                    match channel {
                        Channel::Error | Channel::Warning => {
                            eprintln!("[{}] {message} (sink failed: {err})", channel.label());
                        }
                        _ => debug!("sink for {} failed: {err}", channel.label()),
                    }
                }
            }
        }
    }

    /// Emit the Enter boundary pair for an operation: the event without its
    /// arguments on Telemetry, the full event on Debug.
    pub fn trace_enter(&self, operation: &str, arguments: &[String]) {
        let event = TraceEvent::new(operation, arguments, Phase::Enter);
        self.emit_trace(&event);
    }

    /// Emit the Exit boundary pair for an operation
    pub fn trace_exit(&self, operation: &str, arguments: &[String]) {
        let event = TraceEvent::new(operation, arguments, Phase::Exit);
        self.emit_trace(&event);
    }

    fn emit_trace(&self, event: &TraceEvent) {
        self.report(Channel::Telemetry, &event.without_arguments().to_json());
        self.report(Channel::Debug, &event.to_json());
    }
}

/// Spawn a sink command with the message appended as the last argument.
///
/// The command string is split on whitespace; sink commands are operator
/// supplied plumbing, not a shell escape hatch.
fn run_sink_command(cmd: &str, message: &str) -> std::io::Result<()> {
    let mut parts = cmd.split_whitespace();
    let program = parts.next().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty sink command")
    })?;

    Command::new(program)
        .args(parts)
        .arg(message)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sinks() {
        let registry = Registry::with_defaults();
        assert!(matches!(registry.sinks[Channel::Error as usize], Sink::Log));
        assert!(matches!(registry.sinks[Channel::Warning as usize], Sink::Log));
        assert!(matches!(registry.sinks[Channel::Telemetry as usize], Sink::Noop));
        assert!(matches!(registry.sinks[Channel::Debug as usize], Sink::Noop));
    }

    #[test]
    fn test_override_binds_command() {
        let mut config = Config::default();
        config.sink_overrides[Channel::Telemetry as usize] = Some("logger -t aircap".to_string());
        let registry = Registry::from_config(&config);
        assert!(matches!(
            registry.sinks[Channel::Telemetry as usize],
            Sink::Command(_)
        ));
    }

    #[test]
    fn test_blank_override_ignored() {
        let mut config = Config::default();
        config.sink_overrides[Channel::Info as usize] = Some("   ".to_string());
        let registry = Registry::from_config(&config);
        assert!(matches!(registry.sinks[Channel::Info as usize], Sink::Noop));
    }

    #[test]
    fn test_report_never_panics_on_bad_sink() {
        let mut config = Config::default();
        config.sink_overrides[Channel::Error as usize] =
            Some("/nonexistent/sink-binary".to_string());
        let registry = Registry::from_config(&config);
        // Must not panic or propagate
        registry.report(Channel::Error, "boom");
    }

    #[test]
    fn test_trace_events_are_silent_by_default() {
        let registry = Registry::with_defaults();
        registry.trace_enter("extract", &["a.pcap".to_string()]);
        registry.trace_exit("extract", &["a.pcap".to_string()]);
    }
}
