use serde::{Deserialize, Serialize};

use super::ChatMessage;
use crate::config::LlmConfig;
use crate::error::AppError;

#[derive(Debug)]
pub enum ChatError {
    Transport(String),
    Http { status: u16, body: String },
    EmptyResponse,
}

impl std::fmt::Display for ChatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatError::Transport(msg) => write!(f, "LLM request failed: {msg}"),
            ChatError::Http { status, body } => write!(f, "LLM returned {status}: {body}"),
            ChatError::EmptyResponse => write!(f, "LLM returned no choices"),
        }
    }
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        tracing::error!("Chat completion failed: {err}");
        AppError::Upstream("The assistant is unavailable right now".to_string())
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Completion {
    pub reply: String,
    pub model: String,
}

/// OpenAI-compatible chat completions client.
pub struct ChatClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    system_prompt: String,
}

impl ChatClient {
    pub fn new(config: &LlmConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
        })
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion, ChatError> {
        let body = CompletionRequest {
            model: &self.model,
            messages,
            temperature: 0.7,
            max_tokens: 1024,
        };

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(512)
                .collect();
            return Err(ChatError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = resp
            .json()
            .await
            .map_err(|e| ChatError::Transport(format!("invalid response body: {e}")))?;

        let reply = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(ChatError::EmptyResponse)?;

        Ok(Completion {
            reply,
            model: parsed.model.unwrap_or_else(|| self.model.clone()),
        })
    }
}
