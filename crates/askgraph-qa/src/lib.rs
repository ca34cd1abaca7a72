//! askgraph-qa: natural-language question answering over the knowledge graph.
//!
//! Three sequential stages over an accumulating state record:
//! generate a Cypher statement from the question and the live schema,
//! execute it, summarize the outcome into a direct answer. Execution
//! faults are captured as data and forwarded to the summary stage
//! (fail-soft); every other fault terminates the pipeline.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod state;

pub use error::PipelineError;
pub use pipeline::Pipeline;
pub use state::{PipelineState, QueryOutcome};
