//! Structured trace events emitted at operation boundaries.
//!
//! The dispatcher records handler entry and exit as machine-checkable JSON
//! lines rather than free text, so the telemetry stream can be diffed and
//! asserted on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether the event marks entering or leaving an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Enter,
    Exit,
}

/// One operation-boundary record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Operation (verb) name
    pub operation: String,

    /// Arguments as given to the handler, verbatim
    pub arguments: Vec<String>,

    /// Wall-clock time the boundary was crossed
    pub timestamp: DateTime<Utc>,

    pub phase: Phase,
}

impl TraceEvent {
    pub fn new(operation: &str, arguments: &[String], phase: Phase) -> Self {
        Self {
            operation: operation.to_string(),
            arguments: arguments.to_vec(),
            timestamp: Utc::now(),
            phase,
        }
    }

    /// A copy with the argument vector stripped, for the telemetry channel
    pub fn without_arguments(&self) -> Self {
        Self {
            arguments: Vec::new(),
            ..self.clone()
        }
    }

    /// Serialize to a single JSON line.
    ///
    /// Serialization of this struct cannot fail; the fallback keeps the
    /// reporting path infallible regardless.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"operation\":\"{}\"}}", self.operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_round_trip() {
        let event = TraceEvent::new("extract", &["a.pcap".to_string()], Phase::Enter);
        let line = event.to_json();
        let back: TraceEvent = serde_json::from_str(&line).unwrap();
        assert_eq!(back.operation, "extract");
        assert_eq!(back.arguments, vec!["a.pcap"]);
        assert_eq!(back.phase, Phase::Enter);
    }

    #[test]
    fn test_without_arguments() {
        let event = TraceEvent::new("bulk", &["dir".to_string()], Phase::Exit);
        let stripped = event.without_arguments();
        assert!(stripped.arguments.is_empty());
        assert_eq!(stripped.operation, "bulk");
        assert_eq!(stripped.timestamp, event.timestamp);
    }
}
