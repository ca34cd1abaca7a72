//! Configuration for the question answering pipeline.
//!
//! Loaded from `askgraph.toml` and/or `ASKGRAPH__`-prefixed environment
//! variables (e.g. `ASKGRAPH__NEO4J__URI`). The Neo4j section is
//! required; missing credentials abort startup before any connection
//! attempt.

use serde::Deserialize;

/// Top-level settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub neo4j: Neo4jSettings,

    #[serde(default)]
    pub llm: LlmSettings,
}

/// Neo4j connection settings. URI, user, and password have no defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Neo4jSettings {
    pub uri: String,
    pub user: String,
    pub password: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

/// Language model settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    /// Model name; the provider is inferred from it.
    #[serde(default = "default_model")]
    pub model: String,

    /// API key. Falls back to the provider's conventional environment
    /// variable (GROQ_API_KEY, OPENAI_API_KEY, ANTHROPIC_API_KEY).
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

fn default_model() -> String {
    askgraph_llm::DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    0.1
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            temperature: default_temperature(),
        }
    }
}

/// Load settings from the config file (if present) and the environment.
pub fn load_settings(file_prefix: &str) -> Result<Settings, config::ConfigError> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("ASKGRAPH")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    cfg.try_deserialize()
}
