//! Error types for the askgraph-qa crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Language model error: {0}")]
    Llm(#[from] askgraph_llm::LlmError),

    #[error("Graph error: {0}")]
    Graph(#[from] askgraph_graph::GraphError),

    #[error("Language model returned an empty Cypher statement")]
    EmptyGeneration,
}

pub type Result<T> = std::result::Result<T, PipelineError>;
