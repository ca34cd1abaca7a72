//! Chat-completion client over HTTPS.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MAX_TOKENS: u32 = 4096;

/// Default model: the Groq-hosted coder model the pipeline was tuned on.
pub const DEFAULT_MODEL: &str = "qwen-2.5-coder-32b";

/// Errors from language model calls.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API key not set: {var}")]
    MissingApiKey { var: &'static str },

    #[error("{provider} request failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned {status}: {body}")]
    Api {
        provider: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to decode {provider} response: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{provider} response contained no generated text")]
    EmptyResponse { provider: &'static str },
}

/// LLM provider, inferred from the model name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Groq,
    OpenAi,
    Anthropic,
}

impl LlmProvider {
    /// Infer the provider from a model name. Groq is the default host
    /// for the open-weight models (qwen, llama, mixtral, gemma).
    pub fn infer(model: &str) -> Self {
        if model.starts_with("claude") || model.starts_with("anthropic") {
            Self::Anthropic
        } else if model.starts_with("gpt") || model.starts_with("o1") || model.starts_with("o3") {
            Self::OpenAi
        } else {
            Self::Groq
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Groq => "Groq",
            Self::OpenAi => "OpenAI",
            Self::Anthropic => "Anthropic",
        }
    }

    /// The conventional environment variable holding this provider's API key.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

/// Configuration for the chat client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: String,
    pub temperature: f32,
}

impl LlmConfig {
    /// Resolve a config from settings, falling back to the provider's
    /// conventional environment variable for the API key.
    pub fn resolve(
        model: String,
        api_key: Option<String>,
        temperature: f32,
    ) -> Result<Self, LlmError> {
        let provider = LlmProvider::infer(&model);
        let api_key = match api_key {
            Some(key) if !key.is_empty() => key,
            _ => std::env::var(provider.api_key_var()).map_err(|_| LlmError::MissingApiKey {
                var: provider.api_key_var(),
            })?,
        };

        Ok(Self {
            model,
            api_key,
            temperature,
        })
    }
}

/// Stateless chat-completion client. Clone is cheap (inner reqwest pool).
#[derive(Clone)]
pub struct ChatClient {
    config: LlmConfig,
    provider: LlmProvider,
    client: Client,
}

/// OpenAI-compatible chat completion response (Groq uses the same shape).
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Anthropic messages response.
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}

impl ChatClient {
    pub fn new(config: LlmConfig) -> Self {
        let provider = LlmProvider::infer(&config.model);
        Self {
            config,
            provider,
            client: Client::new(),
        }
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Submit a system + user prompt pair and return the generated text.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        tracing::debug!(provider = self.provider.name(), model = %self.config.model, "LLM request");
        match self.provider {
            LlmProvider::Groq => self.call_openai_compatible(GROQ_CHAT_URL, system, user).await,
            LlmProvider::OpenAi => {
                self.call_openai_compatible(OPENAI_CHAT_URL, system, user)
                    .await
            }
            LlmProvider::Anthropic => self.call_anthropic(system, user).await,
        }
    }

    async fn call_openai_compatible(
        &self,
        url: &str,
        system: &str,
        user: &str,
    ) -> Result<String, LlmError> {
        let provider = self.provider.name();

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&json!({
                "model": self.config.model,
                "messages": [
                    {"role": "system", "content": system},
                    {"role": "user", "content": user}
                ],
                "temperature": self.config.temperature
            }))
            .send()
            .await
            .map_err(|source| LlmError::Request { provider, source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| LlmError::Request { provider, source })?;

        if !status.is_success() {
            return Err(LlmError::Api {
                provider,
                status,
                body,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|source| LlmError::Decode { provider, source })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse { provider })
    }

    async fn call_anthropic(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let provider = self.provider.name();

        let response = self
            .client
            .post(ANTHROPIC_MESSAGES_URL)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&json!({
                "model": self.config.model,
                "max_tokens": ANTHROPIC_MAX_TOKENS,
                "system": system,
                "messages": [
                    {"role": "user", "content": user}
                ],
                "temperature": self.config.temperature
            }))
            .send()
            .await
            .map_err(|source| LlmError::Request { provider, source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| LlmError::Request { provider, source })?;

        if !status.is_success() {
            return Err(LlmError::Api {
                provider,
                status,
                body,
            });
        }

        let parsed: MessagesResponse =
            serde_json::from_str(&body).map_err(|source| LlmError::Decode { provider, source })?;

        parsed
            .content
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or(LlmError::EmptyResponse { provider })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_inference() {
        assert_eq!(LlmProvider::infer("qwen-2.5-coder-32b"), LlmProvider::Groq);
        assert_eq!(LlmProvider::infer("llama-3.3-70b"), LlmProvider::Groq);
        assert_eq!(LlmProvider::infer("gpt-4o"), LlmProvider::OpenAi);
        assert_eq!(LlmProvider::infer("o3-mini"), LlmProvider::OpenAi);
        assert_eq!(
            LlmProvider::infer("claude-sonnet-4-5"),
            LlmProvider::Anthropic
        );
    }

    #[test]
    fn test_resolve_prefers_explicit_key() {
        let config = LlmConfig::resolve(
            DEFAULT_MODEL.to_string(),
            Some("sk-test".to_string()),
            0.1,
        )
        .unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_parse_chat_response() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "MATCH (n) RETURN count(n)"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 8}
        }"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.choices[0].message.content,
            "MATCH (n) RETURN count(n)"
        );
    }

    #[test]
    fn test_parse_messages_response() {
        let body = r#"{
            "id": "msg_1",
            "content": [{"type": "text", "text": "There are 42 nodes."}],
            "model": "claude-sonnet-4-5",
            "stop_reason": "end_turn"
        }"#;
        let parsed: MessagesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.content[0].text, "There are 42 nodes.");
    }
}
