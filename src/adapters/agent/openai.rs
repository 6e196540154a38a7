//! OpenAI Runtime - AgentRuntime over an OpenAI-compatible chat completions API.
//!
//! Drives the function-calling loop: the staff tools are published as
//! function definitions, every `tool_calls` entry in a reply is executed
//! through [`ToolSet::invoke`] and its result is sent back as a `tool`
//! message, until the model answers in plain content or the turn budget
//! runs out.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIRuntimeConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let runtime = OpenAIRuntime::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::conversation::{AgentOutput, Role, Turn};
use crate::domain::foundation::DomainError;
use crate::domain::tools::ToolSet;
use crate::ports::{AgentError, AgentRequest, AgentRuntime, RuntimeInfo};

/// Configuration for the OpenAI runtime.
#[derive(Debug, Clone)]
pub struct OpenAIRuntimeConfig {
    api_key: Secret<String>,
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Timeout for one HTTP round trip.
    pub timeout: Duration,
    /// Retries per round trip on transient failures.
    pub max_retries: u32,
}

impl OpenAIRuntimeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 2,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Agent runtime backed by an OpenAI-compatible API.
pub struct OpenAIRuntime {
    config: OpenAIRuntimeConfig,
    client: Client,
}

impl OpenAIRuntime {
    pub fn new(config: OpenAIRuntimeConfig) -> Result<Self, AgentError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AgentError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// One chat completion, retried with exponential backoff.
    async fn complete(&self, body: &ChatRequest<'_>) -> Result<ChatMessage, AgentError> {
        let mut retry_count = 0;

        loop {
            let result = match self.send(body).await {
                Ok(response) => self.parse_response(response).await,
                Err(err) => Err(err),
            };

            match result {
                Ok(message) => return Ok(message),
                Err(err) if err.is_retryable() && retry_count < self.config.max_retries => {
                    // 1s, 2s, 4s, ...
                    let delay = Duration::from_secs(1 << retry_count);
                    warn!(error = %err, retry_count, "Chat completion failed, retrying");
                    sleep(delay).await;
                    retry_count += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send(&self, body: &ChatRequest<'_>) -> Result<Response, AgentError> {
        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AgentError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AgentError::Network(format!("Connection failed: {}", e))
                } else {
                    AgentError::Network(e.to_string())
                }
            })
    }

    async fn parse_response(&self, response: Response) -> Result<ChatMessage, AgentError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Parse(format!("Failed to parse response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| AgentError::Parse("No choices in response".to_string()))
    }
}

#[async_trait]
impl AgentRuntime for OpenAIRuntime {
    async fn run(&self, request: AgentRequest, tools: &ToolSet) -> Result<AgentOutput, AgentError> {
        let tool_defs = tools.openai_tools();
        let mut messages = initial_messages(&request);

        for turn in 0..request.max_turns {
            let body = ChatRequest {
                model: &self.config.model,
                messages: &messages,
                tools: &tool_defs,
            };
            let reply = self.complete(&body).await?;

            if reply.tool_calls.is_empty() {
                debug!(turn, "Agent produced final output");
                return Ok(AgentOutput::from_model_text(reply.content.unwrap_or_default()));
            }

            let calls = reply.tool_calls.clone();
            messages.push(reply);
            for call in calls {
                let content = execute_tool_call(tools, &call);
                messages.push(ChatMessage::tool_result(call.id, content));
            }
        }

        Err(AgentError::MaxTurnsExceeded {
            max_turns: request.max_turns,
        })
    }

    fn runtime_info(&self) -> RuntimeInfo {
        RuntimeInfo::new("openai", self.config.model.clone())
    }
}

/// Runs one requested tool call; failures become a JSON error for the model.
fn execute_tool_call(tools: &ToolSet, call: &ToolCall) -> String {
    match tools.invoke_raw(&call.function.name, &call.function.arguments) {
        Ok(result) => result.to_string(),
        Err(err) => {
            let err = DomainError::from(err);
            json!({"error": err.message, "code": err.code.to_string()}).to_string()
        }
    }
}

fn initial_messages(request: &AgentRequest) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(request.input.len() + 1);
    if !request.instructions.is_empty() {
        messages.push(ChatMessage::text("system", &request.instructions));
    }
    messages.extend(request.input.iter().map(turn_message));
    messages
}

fn turn_message(turn: &Turn) -> ChatMessage {
    let role = match turn.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    };
    ChatMessage::text(role, &turn.content)
}

/// Maps a non-success HTTP status to an agent error.
fn status_error(status: u16, body: &str) -> AgentError {
    match status {
        401 | 403 => AgentError::AuthenticationFailed,
        429 => AgentError::RateLimited {
            retry_after_secs: parse_retry_after(body),
        },
        400..=499 => AgentError::InvalidRequest(format!("status {}: {}", status, body)),
        500..=599 => AgentError::unavailable(format!("Server error {}: {}", status, body)),
        _ => AgentError::Network(format!("Unexpected status {}: {}", status, body)),
    }
}

/// Extracts "try again in Ns" from an error body, defaulting to 30.
fn parse_retry_after(body: &str) -> u32 {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|parsed| {
            let message = parsed.get("error")?.get("message")?.as_str()?.to_string();
            let idx = message.find("try again in ")?;
            let digits: String = message[idx + 13..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().ok()
        })
        .unwrap_or(30)
}

// ════════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [Value],
}

fn no_tools(tools: &&[Value]) -> bool {
    tools.is_empty()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl ChatMessage {
    fn text(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.to_string()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    fn tool_result(tool_call_id: String, content: String) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ToolCall {
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: FunctionCall,
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::{ToolEvent, ToolObserver, ToolPhase};
    use std::sync::{Arc, Mutex};

    #[test]
    fn config_builder_works() {
        let config = OpenAIRuntimeConfig::new("sk-test")
            .with_model("gpt-4o")
            .with_base_url("http://localhost:8080/v1/")
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(0);

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.api_key(), "sk-test");

        let runtime = OpenAIRuntime::new(config).unwrap();
        assert_eq!(runtime.completions_url(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(runtime.runtime_info(), RuntimeInfo::new("openai", "gpt-4o"));
    }

    #[test]
    fn messages_start_with_instructions() {
        let request = AgentRequest::new(
            "Command_Agent",
            "You are the Command Agent.",
            vec![Turn::system("unit is 2/5"), Turn::user("status?")],
        );

        let messages = initial_messages(&request);

        let roles: Vec<&str> = messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "system", "user"]);
        assert_eq!(messages[2].content.as_deref(), Some("status?"));
    }

    #[test]
    fn request_serializes_tools_and_omits_empty_fields() {
        let tools = ToolSet::unmonitored();
        let defs = tools.openai_tools();
        let messages = vec![ChatMessage::text("user", "hi")];
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: &messages,
            tools: &defs,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["tools"].as_array().unwrap().len(), tools.len());
        assert_eq!(value["tools"][0]["type"], "function");
        assert!(value["messages"][0].get("tool_calls").is_none());
        assert!(value["messages"][0].get("tool_call_id").is_none());
    }

    #[test]
    fn tool_call_reply_parses() {
        let body = r#"{
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "check_comms_status", "arguments": "{}"}
                    }]
                }
            }]
        }"#;

        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        let message = &parsed.choices[0].message;
        assert!(message.content.is_none());
        assert_eq!(message.tool_calls[0].function.name, "check_comms_status");
    }

    #[test]
    fn tool_calls_return_results_or_errors_as_json() {
        let tools = ToolSet::unmonitored();
        let call = |name: &str, arguments: &str| ToolCall {
            id: "c".into(),
            kind: function_kind(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        };

        let ok: Value = serde_json::from_str(&execute_tool_call(
            &tools,
            &call("check_vehicle_status", r#"{"vehicle_type":"LAV","unit":"1st LAR"}"#),
        ))
        .unwrap();
        assert_eq!(ok["operational"], 8);

        let unknown: Value =
            serde_json::from_str(&execute_tool_call(&tools, &call("launch", "{}"))).unwrap();
        assert!(unknown["error"].as_str().unwrap().contains("launch"));
        assert_eq!(unknown["code"], "TOOL_NOT_FOUND");

        let bad: Value =
            serde_json::from_str(&execute_tool_call(&tools, &call("check_comms_status", "{oops")))
                .unwrap();
        assert!(bad["error"].as_str().unwrap().contains("invalid JSON arguments"));
        assert_eq!(bad["code"], "VALIDATION_FAILED");

        let empty: Value =
            serde_json::from_str(&execute_tool_call(&tools, &call("check_comms_status", "")))
                .unwrap();
        assert!(empty.get("error").is_none());
    }

    #[test]
    fn malformed_tool_arguments_are_observed() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let seen = events.clone();
        let observer: Arc<dyn ToolObserver> = Arc::new(move |event: &ToolEvent| {
            seen.lock().unwrap().push(event.phase());
        });
        let tools = ToolSet::with_seed(observer, 3);
        let call = ToolCall {
            id: "c".into(),
            kind: function_kind(),
            function: FunctionCall {
                name: "check_unit_readiness".into(),
                arguments: "{bad".into(),
            },
        };

        let reply: Value = serde_json::from_str(&execute_tool_call(&tools, &call)).unwrap();

        assert_eq!(reply["code"], "VALIDATION_FAILED");
        assert_eq!(*events.lock().unwrap(), vec![ToolPhase::Start, ToolPhase::Error]);
    }

    #[test]
    fn status_codes_map_to_errors() {
        assert!(matches!(status_error(401, ""), AgentError::AuthenticationFailed));
        assert!(matches!(status_error(429, ""), AgentError::RateLimited { retry_after_secs: 30 }));
        assert!(status_error(503, "down").is_retryable());
        assert!(!status_error(400, "bad").is_retryable());
    }

    #[test]
    fn parse_retry_after_from_message() {
        let body = r#"{"error":{"message":"Rate limit reached. Please try again in 12s."}}"#;
        assert_eq!(parse_retry_after(body), 12);
        assert_eq!(parse_retry_after("not json"), 30);
    }
}
