//! Lexis Structural Validator
//!
//! Checks a [`DecompositionRecord`](lexis_record::DecompositionRecord)
//! against the word it claims to decompose:
//!
//! - coverage: parts spell the word
//! - uniqueness: no id is defined twice
//! - terminal layer: the last layer holds exactly one combination
//! - terminal identity: that combination spells the word
//! - DAG closure: sources resolve to parts or strictly earlier layers
//!
//! Validation is pure and deterministic. Results are returned, never logged.
//!
//! # Example
//!
//! ```rust
//! use lexis_record::DecompositionRecord;
//! use lexis_validator::validate;
//!
//! let record = DecompositionRecord::fallback();
//! assert!(validate("deconstructor", &record).is_empty());
//! assert_eq!(validate("constructor", &record).len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod validator;
mod violation;

pub use validator::{validate, StructuralValidator};
pub use violation::{IdLocation, Rule, Violation};
