//! Retry orchestrator
//!
//! Drives a [`GenerationCapability`] through the structural validator with a
//! bounded attempt budget:
//!
//! ```text
//! Attempting ──ok──▶ Validating ──clean──▶ Accepted
//!     ▲  │                │
//!     │  └─err─┐          └─violations─┐
//!     │        ▼                       ▼
//!     └──── budget left? ◀─────────────┘
//!              │ no
//!              ▼
//!          Exhausted ─▶ best effort │ fallback │ error
//! ```
//!
//! Only validation outcomes enter the feedback history; transport failures
//! consume an attempt and nothing else. History lives for one call.

use crate::capability::GenerationCapability;
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, NullSink};
use crate::error::{DecompositionError, GenerationError};
use crate::instruction::{build_instruction, RejectedCandidate};
use crate::types::{Decomposition, DecompositionStatus, RequestId};
use lexis_record::DecompositionRecord;
use lexis_validator::StructuralValidator;
use std::sync::Arc;

/// Default attempt budget
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Orchestration states
#[derive(Debug)]
enum State {
    Attempting,
    Validating(DecompositionRecord),
    Accepted(DecompositionRecord),
    Exhausted,
}

/// Per-call bookkeeping, dropped when the call returns
#[derive(Debug, Default)]
struct Run {
    attempt: u32,
    history: Vec<RejectedCandidate>,
    last_failure: Option<GenerationError>,
}

/// Bounded, feedback-driven generation loop
#[derive(Clone)]
pub struct RetryOrchestrator {
    max_attempts: u32,
    validator: StructuralValidator,
    sink: Arc<dyn DiagnosticSink>,
}

impl std::fmt::Debug for RetryOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryOrchestrator")
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl RetryOrchestrator {
    /// Create an orchestrator with the given attempt budget
    ///
    /// A budget of zero is raised to one.
    #[inline]
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            validator: StructuralValidator::new(),
            sink: Arc::new(NullSink),
        }
    }

    /// With diagnostic sink
    #[inline]
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Attempt budget
    #[inline]
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Produce a decomposition of `word`
    ///
    /// Returns as soon as a candidate validates. When the budget runs out the
    /// latest rejected candidate is returned as best effort; if no candidate
    /// was ever produced, `is_user_retry` selects the default record.
    ///
    /// # Errors
    /// `DecompositionError::Exhausted` when every attempt failed in transport
    /// and this is not a user retry.
    pub async fn run<C>(
        &self,
        word: &str,
        capability: &C,
        is_user_retry: bool,
    ) -> Result<Decomposition, DecompositionError>
    where
        C: GenerationCapability + ?Sized,
    {
        let request_id = RequestId::new();
        let mut run = Run::default();
        let mut state = State::Attempting;

        loop {
            state = match state {
                State::Attempting => {
                    run.attempt += 1;
                    self.sink.record(DiagnosticEvent::AttemptStarted {
                        request_id,
                        word: word.to_string(),
                        attempt: run.attempt,
                        max_attempts: self.max_attempts,
                        feedback_entries: run.history.len(),
                    });

                    let instruction = build_instruction(&run.history);
                    match capability.generate(word, &instruction).await {
                        Ok(candidate) => State::Validating(candidate),
                        Err(error) => {
                            self.sink.record(DiagnosticEvent::TransportFailed {
                                request_id,
                                word: word.to_string(),
                                attempt: run.attempt,
                                error: error.to_string(),
                            });
                            run.last_failure = Some(error);
                            self.next_after_failure(&run)
                        }
                    }
                }

                State::Validating(candidate) => {
                    let violations: Vec<String> = self
                        .validator
                        .check(word, &candidate)
                        .iter()
                        .map(ToString::to_string)
                        .collect();

                    if violations.is_empty() {
                        State::Accepted(candidate)
                    } else {
                        self.sink.record(DiagnosticEvent::CandidateRejected {
                            request_id,
                            word: word.to_string(),
                            attempt: run.attempt,
                            violations: violations.clone(),
                        });
                        run.history.push(RejectedCandidate {
                            candidate,
                            violations,
                        });
                        self.next_after_failure(&run)
                    }
                }

                State::Accepted(record) => {
                    self.sink.record(DiagnosticEvent::CandidateAccepted {
                        request_id,
                        word: word.to_string(),
                        attempt: run.attempt,
                    });
                    return Ok(Decomposition {
                        request_id,
                        record,
                        status: DecompositionStatus::Accepted,
                        attempts: run.attempt,
                        violations: Vec::new(),
                    });
                }

                State::Exhausted => return self.exhaust(request_id, word, run, is_user_retry),
            };
        }
    }

    fn next_after_failure(&self, run: &Run) -> State {
        if run.attempt < self.max_attempts {
            State::Attempting
        } else {
            State::Exhausted
        }
    }

    /// Apply the fallback ladder: best effort, then default record, then error
    fn exhaust(
        &self,
        request_id: RequestId,
        word: &str,
        mut run: Run,
        is_user_retry: bool,
    ) -> Result<Decomposition, DecompositionError> {
        let attempts = run.attempt;

        if let Some(latest) = run.history.pop() {
            self.sink.record(DiagnosticEvent::BestEffortReturned {
                request_id,
                word: word.to_string(),
                attempts,
                violations: latest.violations.len(),
            });
            return Ok(Decomposition {
                request_id,
                record: latest.candidate,
                status: DecompositionStatus::BestEffort,
                attempts,
                violations: latest.violations,
            });
        }

        if is_user_retry {
            self.sink.record(DiagnosticEvent::FallbackReturned {
                request_id,
                word: word.to_string(),
                attempts,
            });
            return Ok(Decomposition {
                request_id,
                record: DecompositionRecord::fallback(),
                status: DecompositionStatus::Fallback,
                attempts,
                violations: Vec::new(),
            });
        }

        let source = run
            .last_failure
            .unwrap_or_else(|| GenerationError::Other("no generation attempt was made".into()));
        self.sink.record(DiagnosticEvent::Failed {
            request_id,
            word: word.to_string(),
            attempts,
            error: source.to_string(),
        });
        Err(DecompositionError::Exhausted { attempts, source })
    }
}

impl Default for RetryOrchestrator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

/// Produce a decomposition record for `word` through `capability`
///
/// Convenience form of [`RetryOrchestrator::run`] that returns only the record.
///
/// # Errors
/// See [`RetryOrchestrator::run`].
pub async fn produce_decomposition_with<C>(
    word: &str,
    capability: &C,
    max_attempts: u32,
    is_user_retry: bool,
) -> Result<DecompositionRecord, DecompositionError>
where
    C: GenerationCapability + ?Sized,
{
    RetryOrchestrator::new(max_attempts)
        .run(word, capability, is_user_retry)
        .await
        .map(Decomposition::into_record)
}
