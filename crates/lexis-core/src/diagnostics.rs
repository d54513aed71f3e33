//! Diagnostic sinks
//!
//! The orchestrator never logs on its own. It reports lifecycle events to a
//! [`DiagnosticSink`] supplied by the caller, which decides where they go:
//! - [`TracingSink`]: structured `tracing` events
//! - [`RecordingSink`]: in-memory capture
//! - [`NullSink`]: discard

use crate::types::RequestId;
use parking_lot::Mutex;

/// Something that happened while producing one decomposition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// A generation call is about to be made
    AttemptStarted {
        request_id: RequestId,
        word: String,
        attempt: u32,
        max_attempts: u32,
        feedback_entries: usize,
    },
    /// The capability failed; the attempt is spent without feedback
    TransportFailed {
        request_id: RequestId,
        word: String,
        attempt: u32,
        error: String,
    },
    /// A candidate failed validation and joins the feedback transcript
    CandidateRejected {
        request_id: RequestId,
        word: String,
        attempt: u32,
        violations: Vec<String>,
    },
    /// A candidate passed validation
    CandidateAccepted {
        request_id: RequestId,
        word: String,
        attempt: u32,
    },
    /// Budget spent; the latest rejected candidate is returned
    BestEffortReturned {
        request_id: RequestId,
        word: String,
        attempts: u32,
        violations: usize,
    },
    /// Budget spent without any candidate; the default record is returned
    FallbackReturned {
        request_id: RequestId,
        word: String,
        attempts: u32,
    },
    /// Budget spent without any candidate and no fallback applies
    Failed {
        request_id: RequestId,
        word: String,
        attempts: u32,
        error: String,
    },
}

impl DiagnosticEvent {
    /// Request the event belongs to
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        match self {
            Self::AttemptStarted { request_id, .. }
            | Self::TransportFailed { request_id, .. }
            | Self::CandidateRejected { request_id, .. }
            | Self::CandidateAccepted { request_id, .. }
            | Self::BestEffortReturned { request_id, .. }
            | Self::FallbackReturned { request_id, .. }
            | Self::Failed { request_id, .. } => *request_id,
        }
    }
}

/// Destination for diagnostic events
pub trait DiagnosticSink: Send + Sync {
    /// Receive one event
    fn record(&self, event: DiagnosticEvent);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&self, _event: DiagnosticEvent) {}
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: DiagnosticEvent) {
        match event {
            DiagnosticEvent::AttemptStarted {
                request_id,
                word,
                attempt,
                max_attempts,
                feedback_entries,
            } => tracing::info!(
                %request_id,
                %word,
                attempt,
                max_attempts,
                feedback_entries,
                "generation attempt started"
            ),
            DiagnosticEvent::TransportFailed {
                request_id,
                word,
                attempt,
                error,
            } => tracing::warn!(%request_id, %word, attempt, %error, "generation failed"),
            DiagnosticEvent::CandidateRejected {
                request_id,
                word,
                attempt,
                violations,
            } => {
                tracing::info!(
                    %request_id,
                    %word,
                    attempt,
                    violations = violations.len(),
                    "candidate rejected"
                );
                for violation in &violations {
                    tracing::debug!(%request_id, %violation, "violation");
                }
            }
            DiagnosticEvent::CandidateAccepted {
                request_id,
                word,
                attempt,
            } => tracing::info!(%request_id, %word, attempt, "candidate accepted"),
            DiagnosticEvent::BestEffortReturned {
                request_id,
                word,
                attempts,
                violations,
            } => tracing::warn!(
                %request_id,
                %word,
                attempts,
                violations,
                "returning result despite validation errors"
            ),
            DiagnosticEvent::FallbackReturned {
                request_id,
                word,
                attempts,
            } => tracing::warn!(
                %request_id,
                %word,
                attempts,
                "falling back to default record"
            ),
            DiagnosticEvent::Failed {
                request_id,
                word,
                attempts,
                error,
            } => tracing::error!(%request_id, %word, attempts, %error, "decomposition failed"),
        }
    }
}

/// Keeps every event in memory, in arrival order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl RecordingSink {
    /// Create an empty recorder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events
    #[must_use]
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().clone()
    }

    /// Drain recorded events
    pub fn take(&self) -> Vec<DiagnosticEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, event: DiagnosticEvent) {
        self.events.lock().push(event);
    }
}
