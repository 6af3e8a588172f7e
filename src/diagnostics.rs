//! Engine diagnostics: out-of-band notifications about pipeline health.
//!
//! Failed operations and stream termination do not flow through the
//! snapshot history; they are emitted on a separate diagnostics channel
//! that interested consumers can drain (UIs, logs, tests).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A timestamped engine notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineEvent {
    pub when: DateTime<Utc>,
    pub kind: EngineEventKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEventKind {
    /// A list fetch failed; the view degrades to its failure surface.
    LoadFailed { detail: String },
    /// A single mutation failed. The pipeline keeps running; the
    /// operation is simply not reflected in any snapshot.
    OpFailed { category: String, detail: String },
    /// The response stream ended; no further snapshots will be
    /// published. `last_version` is the final fold version.
    StreamEnded { last_version: u64 },
}

impl EngineEvent {
    pub fn load_failed(detail: impl Into<String>) -> Self {
        Self {
            when: Utc::now(),
            kind: EngineEventKind::LoadFailed {
                detail: detail.into(),
            },
        }
    }

    pub fn op_failed(category: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            when: Utc::now(),
            kind: EngineEventKind::OpFailed {
                category: category.into(),
                detail: detail.into(),
            },
        }
    }

    pub fn stream_ended(last_version: u64) -> Self {
        Self {
            when: Utc::now(),
            kind: EngineEventKind::StreamEnded { last_version },
        }
    }

    /// True for events that report a failed operation.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self.kind,
            EngineEventKind::LoadFailed { .. } | EngineEventKind::OpFailed { .. }
        )
    }

    /// Compact JSON rendering for log shipping.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for EngineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EngineEventKind::LoadFailed { detail } => {
                write!(f, "load failed: {detail}")
            }
            EngineEventKind::OpFailed { category, detail } => {
                write!(f, "{category} failed: {detail}")
            }
            EngineEventKind::StreamEnded { last_version } => {
                write!(f, "stream ended at version {last_version}")
            }
        }
    }
}
