//! Testing utilities for Lexis workspace
//!
//! Shared fixtures and a scripted generation capability.

#![allow(missing_docs)]

use async_trait::async_trait;
use lexis_core::{GenerationCapability, GenerationError};
use lexis_record::{Combination, DecompositionRecord, WordPart};
use parking_lot::Mutex;

/// The three-part `deconstructor` record, fully valid
pub fn deconstructor_record() -> DecompositionRecord {
    DecompositionRecord::fallback()
}

/// `deconstructor` record whose final layer spells `deconstruct`
pub fn truncated_terminal_record() -> DecompositionRecord {
    let mut record = deconstructor_record();
    if let Some(last) = record.combinations.last_mut().and_then(|l| l.first_mut()) {
        last.text = "deconstruct".to_string();
    }
    record
}

/// Valid single-layer record for any word: one part per character
pub fn record_for(word: &str) -> DecompositionRecord {
    let mut record = DecompositionRecord::new().with_thought(format!("split {word}"));
    let mut ids = Vec::new();
    for (idx, ch) in word.chars().enumerate() {
        let id = format!("c{idx}");
        record = record.with_part(WordPart::new(id.clone(), ch.to_string(), ch.to_string()));
        ids.push(id);
    }
    record.with_layer(vec![Combination::new(format!("{word}-whole"), word, ids)])
}

/// One scripted response
#[derive(Debug, Clone)]
pub enum Step {
    /// Return this record
    Record(DecompositionRecord),
    /// Fail with `GenerationError::Other` carrying this message
    Fail(String),
}

/// A call observed by [`ScriptedCapability`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub word: String,
    pub instruction: String,
}

/// Capability replaying a fixed script
///
/// The last step repeats once the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedCapability {
    steps: Vec<Step>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedCapability {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always return `record`
    pub fn always(record: DecompositionRecord) -> Self {
        Self::new([Step::Record(record)])
    }

    /// Always fail
    pub fn failing(message: &str) -> Self {
        Self::new([Step::Fail(message.to_string())])
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn instructions(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.instruction.clone()).collect()
    }
}

#[async_trait]
impl GenerationCapability for ScriptedCapability {
    async fn generate(
        &self,
        word: &str,
        instruction: &str,
    ) -> Result<DecompositionRecord, GenerationError> {
        let index = {
            let mut calls = self.calls.lock();
            calls.push(Call {
                word: word.to_string(),
                instruction: instruction.to_string(),
            });
            calls.len() - 1
        };

        match self.steps.get(index).or_else(|| self.steps.last()) {
            Some(Step::Record(record)) => Ok(record.clone()),
            Some(Step::Fail(message)) => Err(GenerationError::Other(message.clone())),
            None => Err(GenerationError::EmptyResponse),
        }
    }
}
