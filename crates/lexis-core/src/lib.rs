//! Lexis Core - bounded, feedback-driven decomposition generation
//!
//! Ties a generation capability to the structural validator:
//! - Normalizes the selected word
//! - Generates candidates under a fixed attempt budget
//! - Feeds violations back verbatim into the next instruction
//! - Degrades to best effort, then to the default record, when attempts run out
//!
//! # Example
//!
//! ```rust,ignore
//! use lexis_core::{Deconstructor, LexisConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LexisConfig::default().with_env_overrides()?;
//! let api_key = config.api_key();
//! let service = Deconstructor::openai(config, api_key)?;
//!
//! let result = service.deconstruct("deconstructor", 0).await?;
//! println!("{} after {} attempt(s)", result.record.thought, result.attempts);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod capability;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod instruction;
pub mod openai;
pub mod orchestrator;
pub mod service;
pub mod types;

// Re-exports for convenience
pub use capability::GenerationCapability;
pub use config::LexisConfig;
pub use diagnostics::{DiagnosticEvent, DiagnosticSink, NullSink, RecordingSink, TracingSink};
pub use error::{ConfigError, DecompositionError, GenerationError, WordError};
pub use instruction::{build_instruction, RejectedCandidate, FIX_DIRECTIVE, STRUCTURAL_RULES};
pub use openai::OpenAiCapability;
pub use orchestrator::{produce_decomposition_with, RetryOrchestrator, DEFAULT_MAX_ATTEMPTS};
pub use service::{produce_decomposition, Deconstructor};
pub use types::{
    Decomposition, DecompositionStatus, ModelSelector, RequestId, Word, DEFAULT_MODEL,
    KNOWN_MODELS,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Lexis Core
    pub use crate::{
        Decomposition, DecompositionError, DecompositionStatus, Deconstructor,
        GenerationCapability, LexisConfig, ModelSelector, RetryOrchestrator,
    };
    pub use lexis_record::DecompositionRecord;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
