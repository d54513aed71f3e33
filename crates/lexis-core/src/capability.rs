//! Generation capability abstraction
//!
//! The retry protocol treats the generator as opaque: given the word and an
//! instruction, it either yields a candidate record already shaped by the
//! schema boundary, or fails.

use crate::error::GenerationError;
use async_trait::async_trait;
use lexis_record::DecompositionRecord;
use std::sync::Arc;

/// Producer of candidate decomposition records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationCapability: Send + Sync {
    /// Generate one candidate for `word` following `instruction`
    ///
    /// # Errors
    /// Any failure to obtain a schema-conformant record. The caller counts it
    /// against its attempt budget.
    async fn generate(
        &self,
        word: &str,
        instruction: &str,
    ) -> Result<DecompositionRecord, GenerationError>;
}

#[async_trait]
impl<T: GenerationCapability + ?Sized> GenerationCapability for Arc<T> {
    async fn generate(
        &self,
        word: &str,
        instruction: &str,
    ) -> Result<DecompositionRecord, GenerationError> {
        (**self).generate(word, instruction).await
    }
}

#[async_trait]
impl<T: GenerationCapability + ?Sized> GenerationCapability for Box<T> {
    async fn generate(
        &self,
        word: &str,
        instruction: &str,
    ) -> Result<DecompositionRecord, GenerationError> {
        (**self).generate(word, instruction).await
    }
}
