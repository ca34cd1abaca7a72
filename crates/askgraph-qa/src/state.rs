//! The accumulating state record threaded through the pipeline.
//!
//! Fields are populated strictly in stage order and set exactly once;
//! each stage consumes the state by value and returns a new one with
//! its field filled in. There is no shared mutable state.

use serde::Serialize;

/// Result of the execution stage.
///
/// A driver fault is captured as data rather than raised, so the summary
/// stage always runs. The tag keeps the degraded path visible; both
/// variants render to the same prompt text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum QueryOutcome {
    /// JSON-serialized row set, one object per row.
    Rows(String),
    /// The fault's display text.
    Fault(String),
}

impl QueryOutcome {
    pub fn as_text(&self) -> &str {
        match self {
            Self::Rows(s) | Self::Fault(s) => s,
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }
}

/// Session state for one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineState {
    question: String,
    cypher_statement: Option<String>,
    query_result: Option<QueryOutcome>,
    answer: Option<String>,
}

impl PipelineState {
    /// Create a fresh state carrying only the question.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            cypher_statement: None,
            query_result: None,
            answer: None,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn cypher_statement(&self) -> Option<&str> {
        self.cypher_statement.as_deref()
    }

    pub fn query_result(&self) -> Option<&QueryOutcome> {
        self.query_result.as_ref()
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    /// The execution outcome as prompt text; empty before execution.
    pub fn outcome_text(&self) -> &str {
        self.query_result
            .as_ref()
            .map(QueryOutcome::as_text)
            .unwrap_or("")
    }

    pub fn with_cypher(mut self, cypher: impl Into<String>) -> Self {
        self.cypher_statement = Some(cypher.into());
        self
    }

    pub fn with_result(mut self, outcome: QueryOutcome) -> Self {
        self.query_result = Some(outcome);
        self
    }

    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }
}
