use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::warn;

use hotelier_core::config::LlmConfig;

use crate::tools::ToolDefinition;

#[derive(Clone, Debug, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChatMessage {
    System(String),
    User(String),
    Assistant(String),
    AssistantToolCalls(Vec<ToolCall>),
    ToolResult { call_id: String, content: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolDefinition>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LlmReply {
    Text(String),
    ToolCalls(Vec<ToolCall>),
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<LlmReply>;
}

/// Chat-completions client for OpenAI, Groq and Ollama, which share one wire format.
pub struct OpenAiCompatibleClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<SecretString>,
    max_retries: u32,
}

impl OpenAiCompatibleClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .context("building llm http client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.resolved_base_url()),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            max_retries: config.max_retries,
        })
    }

    async fn send_once(&self, body: &Value) -> Result<Value, Attempt> {
        let mut builder = self.client.post(&self.endpoint).json(body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|error| Attempt::Retry(error.into()))?;
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(Attempt::Retry(anyhow!("llm endpoint returned {status}")));
        }
        if !status.is_success() {
            return Err(Attempt::Fatal(anyhow!("llm endpoint returned {status}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|error| Attempt::Fatal(anyhow!("failed to decode llm response: {error}")))
    }
}

enum Attempt {
    Retry(anyhow::Error),
    Fatal(anyhow::Error),
}

#[async_trait]
impl LlmClient for OpenAiCompatibleClient {
    async fn complete(&self, request: &ChatRequest) -> Result<LlmReply> {
        let body = encode_request(&self.model, request);
        let mut attempt = 0u32;

        loop {
            match self.send_once(&body).await {
                Ok(payload) => return parse_reply(&payload),
                Err(Attempt::Retry(error)) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        event_name = "llm.retry",
                        attempt,
                        error = %error,
                        "llm request failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(250 * u64::from(attempt))).await;
                }
                Err(Attempt::Retry(error) | Attempt::Fatal(error)) => return Err(error),
            }
        }
    }
}

pub fn encode_request(model: &str, request: &ChatRequest) -> Value {
    let messages: Vec<Value> = request.messages.iter().map(encode_message).collect();
    let mut body = json!({
        "model": model,
        "temperature": 0,
        "messages": messages,
    });

    if !request.tools.is_empty() {
        let tools: Vec<Value> = request
            .tools
            .iter()
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name,
                        "description": tool.description,
                        "parameters": tool.parameters,
                    }
                })
            })
            .collect();
        body["tools"] = Value::Array(tools);
    }
    body
}

fn encode_message(message: &ChatMessage) -> Value {
    match message {
        ChatMessage::System(content) => json!({ "role": "system", "content": content }),
        ChatMessage::User(content) => json!({ "role": "user", "content": content }),
        ChatMessage::Assistant(content) => json!({ "role": "assistant", "content": content }),
        ChatMessage::AssistantToolCalls(calls) => json!({
            "role": "assistant",
            "content": Value::Null,
            "tool_calls": calls
                .iter()
                .map(|call| json!({
                    "id": call.id,
                    "type": "function",
                    "function": { "name": call.name, "arguments": call.arguments.to_string() }
                }))
                .collect::<Vec<_>>(),
        }),
        ChatMessage::ToolResult { call_id, content } => {
            json!({ "role": "tool", "tool_call_id": call_id, "content": content })
        }
    }
}

/// Reads the first choice. Tool calls win over text when both are present.
pub fn parse_reply(payload: &Value) -> Result<LlmReply> {
    let message = payload
        .pointer("/choices/0/message")
        .ok_or_else(|| anyhow!("llm response has no choices"))?;

    if let Some(calls) = message.get("tool_calls").and_then(Value::as_array) {
        if !calls.is_empty() {
            let calls = calls.iter().map(parse_tool_call).collect::<Result<Vec<_>>>()?;
            return Ok(LlmReply::ToolCalls(calls));
        }
    }

    match message.get("content").and_then(Value::as_str) {
        Some(text) => Ok(LlmReply::Text(text.to_string())),
        None => bail!("llm response has neither content nor tool calls"),
    }
}

fn parse_tool_call(call: &Value) -> Result<ToolCall> {
    let name = call
        .pointer("/function/name")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("tool call without a function name"))?;
    let id = call.get("id").and_then(Value::as_str).unwrap_or(name);

    // Arguments arrive as a JSON-encoded string; some local models send an object.
    let arguments = match call.pointer("/function/arguments") {
        Some(Value::String(raw)) if raw.trim().is_empty() => json!({}),
        Some(Value::String(raw)) => serde_json::from_str(raw).unwrap_or(Value::Null),
        Some(other) => other.clone(),
        None => json!({}),
    };

    Ok(ToolCall { id: id.to_string(), name: name.to_string(), arguments })
}

/// Replays canned replies in order and records every request it saw.
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<LlmReply, String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLlm {
    pub fn new<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = LlmReply>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Ok).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with `reason`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err(reason.into())])),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().map(|requests| requests.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, request: &ChatRequest) -> Result<LlmReply> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let mut replies = self.replies.lock().map_err(|_| anyhow!("script lock poisoned"))?;
        match replies.front() {
            Some(Err(reason)) => bail!("{reason}"),
            Some(Ok(_)) => match replies.pop_front() {
                Some(Ok(reply)) => Ok(reply),
                _ => bail!("script exhausted"),
            },
            None => bail!("script exhausted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{encode_request, parse_reply, ChatMessage, ChatRequest, LlmReply, ToolCall};
    use crate::tools::ToolDefinition;

    #[test]
    fn request_encodes_tool_round_trip_messages() {
        let request = ChatRequest {
            messages: vec![
                ChatMessage::System("be brief".to_string()),
                ChatMessage::User("rooms for 2025-01-10?".to_string()),
                ChatMessage::AssistantToolCalls(vec![ToolCall {
                    id: "call_1".to_string(),
                    name: "check_availability".to_string(),
                    arguments: json!({ "start_date": "2025-01-10", "end_date": "2025-01-12" }),
                }]),
                ChatMessage::ToolResult {
                    call_id: "call_1".to_string(),
                    content: "{\"status\":\"ok\"}".to_string(),
                },
            ],
            tools: vec![ToolDefinition {
                name: "check_availability".to_string(),
                description: "Checks availability".to_string(),
                parameters: json!({ "type": "object" }),
            }],
        };

        let body = encode_request("llama3.1", &request);
        assert_eq!(body["model"], "llama3.1");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][2]["tool_calls"][0]["function"]["name"], "check_availability");
        let arguments = body["messages"][2]["tool_calls"][0]["function"]["arguments"]
            .as_str()
            .expect("arguments encoded as string");
        assert!(arguments.contains("2025-01-12"));
        assert_eq!(body["messages"][3]["role"], "tool");
        assert_eq!(body["messages"][3]["tool_call_id"], "call_1");
        assert_eq!(body["tools"][0]["type"], "function");
    }

    #[test]
    fn request_without_tools_omits_tool_list() {
        let request =
            ChatRequest { messages: vec![ChatMessage::User("hi".to_string())], tools: vec![] };
        assert!(encode_request("m", &request).get("tools").is_none());
    }

    #[test]
    fn reply_parses_text_and_tool_calls() {
        let text = json!({ "choices": [{ "message": { "role": "assistant", "content": "Hello!" } }] });
        assert_eq!(parse_reply(&text).expect("text"), LlmReply::Text("Hello!".to_string()));

        let calls = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_9",
                        "type": "function",
                        "function": { "name": "hotel_stats", "arguments": "" }
                    }, {
                        "id": "call_10",
                        "type": "function",
                        "function": { "name": "book_room", "arguments": "{\"room_number\":\"101\"}" }
                    }]
                }
            }]
        });
        let reply = parse_reply(&calls).expect("tool calls");
        let LlmReply::ToolCalls(calls) = reply else {
            panic!("expected tool calls");
        };
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].arguments, json!({}));
        assert_eq!(calls[1].arguments["room_number"], "101");
    }

    #[test]
    fn empty_choices_are_an_error() {
        assert!(parse_reply(&json!({ "choices": [] })).is_err());
    }
}
