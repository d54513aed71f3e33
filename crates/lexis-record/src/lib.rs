//! Lexis Record Model
//!
//! Data model for etymological word decompositions.
//!
//! # Core Concepts
//!
//! - [`WordPart`]: atomic fragment of the input word with its etymology
//! - [`Combination`]: node merging earlier parts or combinations
//! - [`DecompositionRecord`]: parts plus ordered combination layers
//! - [`GraphProjection`]: renderer-facing node/edge lists
//!
//! # Example
//!
//! ```rust
//! use lexis_record::{Combination, DecompositionRecord, WordPart};
//!
//! let record = DecompositionRecord::new()
//!     .with_part(WordPart::new("re", "re", "re-").with_origin("Latin"))
//!     .with_part(WordPart::new("do", "do", "don").with_origin("Old English"))
//!     .with_layer(vec![Combination::new("redo", "redo", ["re", "do"])]);
//!
//! assert_eq!(record.spelled_text(), "redo");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod fallback;
mod record;
mod schema;

/// Visualization graph projection
pub mod graph;

// Re-exports
pub use fallback::FALLBACK_WORD;
pub use graph::{GraphEdge, GraphError, GraphNode, GraphProjection, NodeKind};
pub use record::{Combination, CombinationLayer, DecompositionRecord, NodeRef, WordPart};
pub use schema::{record_json_schema, SchemaError, SCHEMA_DESCRIPTION, SCHEMA_NAME};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
