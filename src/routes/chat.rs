use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::chat::{self, ChatMessage, Role};
use crate::error::AppError;
use crate::middleware::client_ip::ClientIp;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scraped_url: Option<String>,
}

pub async fn chat(
    State(state): State<SharedState>,
    ClientIp(ip): ClientIp,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let client = state
        .chat
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("The assistant is not configured".to_string()))?;

    if let Err(retry_after) = state.chat_limiter.check(ip) {
        return Err(AppError::RateLimited(format!(
            "Too many messages. Try again in {retry_after} seconds."
        )));
    }

    chat::validate_conversation(&req.messages).map_err(AppError::BadRequest)?;

    let question = req
        .messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .unwrap_or_default();

    let mut scraped: Option<(String, String)> = None;
    if let (Some(scraper), Some(url)) = (state.scraper.as_ref(), chat::first_url(question)) {
        match scraper.scrape(&url).await {
            Ok(content) => {
                tracing::info!(%url, chars = content.chars().count(), "Scraped page for chat");
                scraped = Some((url, content));
            }
            Err(e) => tracing::warn!(%url, "Scrape failed, answering without page content: {e}"),
        }
    }

    let prompt = chat::build_prompt(
        client.system_prompt(),
        scraped.as_ref().map(|(u, c)| (u.as_str(), c.as_str())),
        &req.messages,
    );
    let completion = client.complete(&prompt).await?;

    Ok(Json(ChatResponse {
        reply: completion.reply,
        model: completion.model,
        scraped_url: scraped.map(|(url, _)| url),
    }))
}
