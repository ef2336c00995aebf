pub mod llm;
pub mod mcp;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const MAX_MESSAGES: usize = 20;
pub const MAX_CONTENT_CHARS: usize = 4000;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'`]+"#).expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Check a client-supplied conversation. System messages are reserved for the server.
pub fn validate_conversation(messages: &[ChatMessage]) -> Result<(), String> {
    if messages.is_empty() {
        return Err("At least one message is required".to_string());
    }
    if messages.len() > MAX_MESSAGES {
        return Err(format!("At most {MAX_MESSAGES} messages are allowed"));
    }
    for message in messages {
        if message.role == Role::System {
            return Err("System messages are not allowed".to_string());
        }
        if message.content.trim().is_empty() {
            return Err("Messages must not be empty".to_string());
        }
        if message.content.chars().count() > MAX_CONTENT_CHARS {
            return Err(format!(
                "Messages must be at most {MAX_CONTENT_CHARS} characters"
            ));
        }
    }
    match messages.last() {
        Some(last) if last.role == Role::User => Ok(()),
        _ => Err("The last message must come from the user".to_string()),
    }
}

/// First http(s) URL in `text`, without trailing sentence punctuation.
pub fn first_url(text: &str) -> Option<String> {
    URL_PATTERN
        .find(text)
        .map(|m| {
            m.as_str()
                .trim_end_matches(['.', ',', ';', ':', '!', '?', ')', ']'])
                .to_string()
        })
        .filter(|u| url::Url::parse(u).is_ok_and(|p| p.host_str().is_some()))
}

pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}\n\n[truncated]", &s[..idx]),
        None => s.to_string(),
    }
}

/// System prompt, optional scraped page context, then the conversation.
pub fn build_prompt(
    system_prompt: &str,
    scraped: Option<(&str, &str)>,
    history: &[ChatMessage],
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_prompt));
    if let Some((url, content)) = scraped {
        messages.push(ChatMessage::system(format!(
            "Content of {url} (converted to markdown):\n\n{content}"
        )));
    }
    messages.extend_from_slice(history);
    messages
}
