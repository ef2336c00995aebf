//! Minimal MCP client for the remote scraping server: `initialize`, then one
//! `tools/call`. The server may answer either with a JSON body or with a
//! Server-Sent Events stream carrying the JSON-RPC message.

use serde_json::{Value, json};

use crate::config::ScraperConfig;

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SCRAPE_TOOL: &str = "scrape_as_markdown";
const SESSION_HEADER: &str = "mcp-session-id";

#[derive(Debug)]
pub enum McpError {
    Transport(String),
    Http { status: u16, body: String },
    Protocol(String),
    Rpc { code: i64, message: String },
    Tool(String),
}

impl std::fmt::Display for McpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            McpError::Transport(msg) => write!(f, "MCP request failed: {msg}"),
            McpError::Http { status, body } => write!(f, "MCP server returned {status}: {body}"),
            McpError::Protocol(msg) => write!(f, "MCP protocol error: {msg}"),
            McpError::Rpc { code, message } => write!(f, "MCP error {code}: {message}"),
            McpError::Tool(msg) => write!(f, "MCP tool failed: {msg}"),
        }
    }
}

/// Split an SSE body into the `data` payload of each event.
pub fn sse_events(body: &str) -> Vec<String> {
    let mut events = Vec::new();
    let mut data: Vec<&str> = Vec::new();

    for line in body.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            if !data.is_empty() {
                events.push(data.join("\n"));
                data.clear();
            }
            continue;
        }
        if let Some(rest) = line.strip_prefix("data:") {
            data.push(rest.strip_prefix(' ').unwrap_or(rest));
        }
        // event:, id:, retry: and comment lines carry nothing we need
    }
    if !data.is_empty() {
        events.push(data.join("\n"));
    }
    events
}

fn looks_like_sse(content_type: &str, body: &str) -> bool {
    if content_type.contains("text/event-stream") {
        return true;
    }
    let start = body.trim_start();
    start.starts_with("event:") || start.starts_with("data:")
}

/// Pick the JSON-RPC response with `id` out of a JSON or SSE body and return
/// its `result`, or the RPC error.
pub fn parse_rpc_response(content_type: &str, body: &str, id: u64) -> Result<Value, McpError> {
    let message = if looks_like_sse(content_type, body) {
        sse_events(body)
            .iter()
            .filter_map(|data| serde_json::from_str::<Value>(data).ok())
            .flat_map(|value| match value {
                Value::Array(batch) => batch,
                single => vec![single],
            })
            .find(|msg| msg.get("id").and_then(Value::as_u64) == Some(id))
            .ok_or_else(|| {
                McpError::Protocol(format!("no response with id {id} in event stream"))
            })?
    } else {
        serde_json::from_str::<Value>(body)
            .map_err(|e| McpError::Protocol(format!("invalid JSON response: {e}")))?
    };

    if let Some(error) = message.get("error") {
        return Err(McpError::Rpc {
            code: error.get("code").and_then(Value::as_i64).unwrap_or(0),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        });
    }

    message
        .get("result")
        .cloned()
        .ok_or_else(|| McpError::Protocol("response has neither result nor error".to_string()))
}

/// Concatenate the text parts of a `tools/call` result.
pub fn tool_text(result: &Value) -> Result<String, McpError> {
    let text = result
        .get("content")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter(|p| p.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();

    if result.get("isError").and_then(Value::as_bool) == Some(true) {
        return Err(McpError::Tool(if text.is_empty() {
            "tool reported an error".to_string()
        } else {
            text
        }));
    }
    if text.trim().is_empty() {
        return Err(McpError::Protocol("tool returned no text content".to_string()));
    }
    Ok(text)
}

pub struct McpScraper {
    client: reqwest::Client,
    endpoint: String,
    max_chars: usize,
}

struct RpcReply {
    session_id: Option<String>,
    result: Value,
}

impl McpScraper {
    pub fn new(config: &ScraperConfig) -> Result<Self, String> {
        let mut endpoint = url::Url::parse(&config.mcp_url)
            .map_err(|e| format!("Invalid BRIGHTDATA_MCP_URL: {e}"))?;
        endpoint
            .query_pairs_mut()
            .append_pair("token", &config.api_token);

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(45))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            max_chars: config.max_chars,
        })
    }

    /// Fetch `url` as markdown, truncated to the configured length.
    pub async fn scrape(&self, url: &str) -> Result<String, McpError> {
        let init = self
            .call(
                None,
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "method": "initialize",
                    "params": {
                        "protocolVersion": PROTOCOL_VERSION,
                        "capabilities": {},
                        "clientInfo": {
                            "name": env!("CARGO_PKG_NAME"),
                            "version": env!("CARGO_PKG_VERSION"),
                        },
                    },
                }),
                1,
            )
            .await?;
        let session_id = init.session_id;

        self.notify_initialized(session_id.as_deref()).await;

        let reply = self
            .call(
                session_id.as_deref(),
                json!({
                    "jsonrpc": "2.0",
                    "id": 2,
                    "method": "tools/call",
                    "params": {
                        "name": SCRAPE_TOOL,
                        "arguments": { "url": url },
                    },
                }),
                2,
            )
            .await?;

        let text = tool_text(&reply.result)?;
        Ok(super::truncate_chars(&text, self.max_chars))
    }

    fn request(&self, session_id: Option<&str>) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json, text/event-stream");
        if let Some(session_id) = session_id {
            req = req.header(SESSION_HEADER, session_id);
        }
        req
    }

    async fn call(
        &self,
        session_id: Option<&str>,
        body: Value,
        id: u64,
    ) -> Result<RpcReply, McpError> {
        let resp = self
            .request(session_id)
            .json(&body)
            .send()
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;

        let status = resp.status();
        let returned_session = resp
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let text = resp
            .text()
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(McpError::Http {
                status: status.as_u16(),
                body: text.chars().take(512).collect(),
            });
        }

        Ok(RpcReply {
            session_id: returned_session.or_else(|| session_id.map(str::to_string)),
            result: parse_rpc_response(&content_type, &text, id)?,
        })
    }

    async fn notify_initialized(&self, session_id: Option<&str>) {
        let result = self
            .request(session_id)
            .json(&json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }))
            .send()
            .await;
        match result {
            Ok(resp) if !resp.status().is_success() => {
                tracing::debug!("MCP initialized notification returned {}", resp.status());
            }
            Err(e) => tracing::debug!("MCP initialized notification failed: {e}"),
            Ok(_) => {}
        }
    }
}
