//! Decomposition service
//!
//! Entry point used by front ends: normalizes the raw selection, builds the
//! orchestrator from configuration and runs it against a capability.

use crate::capability::GenerationCapability;
use crate::config::LexisConfig;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::DecompositionError;
use crate::openai::OpenAiCapability;
use crate::orchestrator::RetryOrchestrator;
use crate::types::{Decomposition, ModelSelector, Word};
use lexis_record::DecompositionRecord;
use std::sync::Arc;

/// Configured decomposition service
///
/// Cheap to clone; concurrent requests share nothing but the capability.
#[derive(Clone)]
pub struct Deconstructor {
    config: LexisConfig,
    capability: Arc<dyn GenerationCapability>,
    sink: Arc<dyn DiagnosticSink>,
}

impl std::fmt::Debug for Deconstructor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deconstructor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Deconstructor {
    /// Create a service over any capability, reporting to `tracing`
    #[must_use]
    pub fn new(config: LexisConfig, capability: Arc<dyn GenerationCapability>) -> Self {
        Self {
            config,
            capability,
            sink: Arc::new(TracingSink),
        }
    }

    /// Create a service backed by the OpenAI capability
    ///
    /// # Errors
    /// `DecompositionError::Capability` if the HTTP client cannot be built.
    pub fn openai(config: LexisConfig, api_key: Option<String>) -> Result<Self, DecompositionError> {
        let capability =
            OpenAiCapability::new(&config, api_key).map_err(DecompositionError::Capability)?;
        Ok(Self::new(config, Arc::new(capability)))
    }

    /// With diagnostic sink
    #[inline]
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &LexisConfig {
        &self.config
    }

    fn orchestrator(&self) -> RetryOrchestrator {
        RetryOrchestrator::new(self.config.max_attempts).with_sink(Arc::clone(&self.sink))
    }

    /// Decompose a raw selection
    ///
    /// `attempt_seed` counts user-initiated retries of the same word; any
    /// value above zero enables the default-record fallback.
    ///
    /// # Errors
    /// - `DecompositionError::InvalidWord` if the selection is not one word
    /// - `DecompositionError::Exhausted` as for [`RetryOrchestrator::run`]
    pub async fn deconstruct(
        &self,
        raw_word: &str,
        attempt_seed: u32,
    ) -> Result<Decomposition, DecompositionError> {
        let word = Word::parse(raw_word)?;
        self.orchestrator()
            .run(word.as_str(), self.capability.as_ref(), attempt_seed > 0)
            .await
    }
}

/// Produce a decomposition record with the OpenAI capability
///
/// Uses default configuration for everything except the model.
///
/// # Errors
/// See [`Deconstructor::deconstruct`]; a blank credential surfaces as
/// exhaustion, or the default record on a user retry.
pub async fn produce_decomposition(
    word: &str,
    api_credential: &str,
    attempt_seed: u32,
    model_selector: &ModelSelector,
) -> Result<DecompositionRecord, DecompositionError> {
    let config = LexisConfig::default().with_model(model_selector.clone());
    Deconstructor::openai(config, Some(api_credential.to_string()))?
        .deconstruct(word, attempt_seed)
        .await
        .map(Decomposition::into_record)
}
