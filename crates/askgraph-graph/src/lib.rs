//! AskGraph Graph — Neo4j client for the question answering pipeline.
//!
//! This crate is the single point of contact with Neo4j. It provides
//! connection management, schema introspection (the text that grounds
//! Cypher generation), and raw statement execution with JSON row
//! serialization.

pub mod client;
pub mod execute;
pub mod schema;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use schema::GraphSchema;
