//! AskGraph LLM — stateless chat-completion client.
//!
//! Prompt in, generated text out. The provider (Groq, OpenAI, Anthropic)
//! is inferred from the model name; Groq hosts the default model.

pub mod client;

pub use client::{ChatClient, LlmConfig, LlmError, LlmProvider, DEFAULT_MODEL};
