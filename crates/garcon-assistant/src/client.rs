//! `OpenAI` Assistants v2 client implementing [`AssistantRuntime`].
//!
//! Threads, runs, run steps, and messages over reqwest with Bearer auth and
//! the `OpenAI-Beta: assistants=v2` header. Transient failures (timeouts,
//! 429, 5xx) get a small bounded retry with jittered backoff; everything
//! else surfaces immediately.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use garcon_core::ids::{RunId, ThreadId};

use crate::errors::AssistantError;
use crate::types::{AssistantRuntime, RunSnapshot, RunStatus, ToolCall, ToolOutput};

/// Beta opt-in header required by the Assistants API.
const BETA_HEADER: &str = "assistants=v2";

/// Base backoff between transient retries.
const RETRY_BASE: Duration = Duration::from_millis(250);

/// Configuration for [`OpenAiAssistants`].
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API base URL (`https://api.openai.com/v1`).
    pub base_url: String,
    /// Secret API key.
    pub api_key: Option<String>,
    /// ID of the pre-configured assistant runs are started against.
    pub assistant_id: Option<String>,
    /// Maximum retries for transient failures per request.
    pub max_transient_retries: u32,
}

/// Assistants v2 client.
pub struct OpenAiAssistants {
    base_url: String,
    api_key: String,
    assistant_id: String,
    max_transient_retries: u32,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiAssistants {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiAssistants")
            .field("base_url", &self.base_url)
            .field("assistant_id", &self.assistant_id)
            .field("max_transient_retries", &self.max_transient_retries)
            .finish_non_exhaustive()
    }
}

// --- Wire shapes (only the fields we read) ---

#[derive(Deserialize)]
struct IdObject {
    id: String,
}

#[derive(Deserialize)]
struct RunObject {
    id: String,
    status: RunStatus,
    required_action: Option<RequiredAction>,
}

#[derive(Deserialize)]
struct RequiredAction {
    submit_tool_outputs: SubmitToolOutputs,
}

#[derive(Deserialize)]
struct SubmitToolOutputs {
    tool_calls: Vec<WireToolCall>,
}

#[derive(Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    function: Option<WireFunction>,
}

#[derive(Deserialize)]
struct WireFunction {
    name: String,
    /// JSON object, double-encoded as a string on the wire.
    arguments: String,
}

#[derive(Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

#[derive(Deserialize)]
struct RunStep {
    step_details: StepDetails,
}

#[derive(Deserialize)]
struct StepDetails {
    #[serde(rename = "type")]
    kind: String,
    message_creation: Option<MessageCreation>,
}

#[derive(Deserialize)]
struct MessageCreation {
    message_id: String,
}

#[derive(Deserialize)]
struct MessageObject {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<TextBlock>,
}

#[derive(Deserialize)]
struct TextBlock {
    value: String,
}

impl OpenAiAssistants {
    /// Build a client from config.
    ///
    /// Missing credentials are a configuration error surfaced here, not at
    /// first use.
    pub fn new(config: OpenAiConfig) -> Result<Self, AssistantError> {
        let api_key = config
            .api_key
            .ok_or(AssistantError::MissingCredential("assistant.apiKey"))?;
        let assistant_id = config
            .assistant_id
            .ok_or(AssistantError::MissingCredential("assistant.assistantId"))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            assistant_id,
            max_transient_retries: config.max_transient_retries,
            client: reqwest::Client::new(),
        })
    }

    fn build_headers(&self) -> Result<HeaderMap, AssistantError> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let _ = headers.insert("OpenAI-Beta", HeaderValue::from_static(BETA_HEADER));
        let auth = format!("Bearer {}", self.api_key);
        let _ = headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|_| AssistantError::MissingCredential("assistant.apiKey"))?,
        );
        Ok(headers)
    }

    /// Execute a request, retrying transient failures with jittered backoff.
    async fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, AssistantError> {
        let url = format!("{}{path}", self.base_url);
        let mut attempt = 0u32;
        loop {
            let result = self.send_once(method.clone(), &url, body).await;
            match result {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_transient_retries => {
                    attempt += 1;
                    let jitter = rand::rng().random_range(0..100);
                    let delay = RETRY_BASE * 2u32.saturating_pow(attempt - 1)
                        + Duration::from_millis(jitter);
                    warn!(%url, attempt, error = %e, "transient assistant error, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Value, AssistantError> {
        let mut req = self
            .client
            .request(method, url)
            .headers(self.build_headers()?);
        if let Some(body) = body {
            req = req.json(body);
        }
        let response = req.send().await?;
        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            let message = payload
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("no error message")
                .to_string();
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(payload)
    }

    fn parse<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, AssistantError> {
        serde_json::from_value(value).map_err(|e| AssistantError::UnexpectedResponse(e.to_string()))
    }

    fn snapshot_from_run(run: RunObject) -> RunSnapshot {
        let tool_calls = run
            .required_action
            .map(|ra| ra.submit_tool_outputs.tool_calls)
            .unwrap_or_default()
            .into_iter()
            .filter(|tc| tc.kind == "function")
            .filter_map(|tc| {
                let function = tc.function?;
                // Malformed argument JSON becomes Null; the handler reports
                // it as an argument error for that one call.
                let arguments = serde_json::from_str(&function.arguments).unwrap_or(Value::Null);
                Some(ToolCall {
                    id: tc.id,
                    name: function.name,
                    arguments,
                })
            })
            .collect();
        RunSnapshot {
            id: RunId::new(run.id),
            status: run.status,
            tool_calls,
        }
    }
}

#[async_trait]
impl AssistantRuntime for OpenAiAssistants {
    async fn create_thread(&self) -> Result<ThreadId, AssistantError> {
        let value = self
            .send_json(reqwest::Method::POST, "/threads", Some(&json!({})))
            .await?;
        let obj: IdObject = Self::parse(value)?;
        debug!(thread_id = %obj.id, "thread created");
        Ok(ThreadId::new(obj.id))
    }

    async fn add_user_message(&self, thread: &ThreadId, text: &str) -> Result<(), AssistantError> {
        // Timestamp prefix so the assistant can reason about message timing.
        let stamped = format!("{} - {}", chrono::Local::now().format("%d/%m/%Y, %H:%M"), text);
        let body = json!({ "role": "user", "content": stamped });
        let _ = self
            .send_json(
                reqwest::Method::POST,
                &format!("/threads/{thread}/messages"),
                Some(&body),
            )
            .await?;
        Ok(())
    }

    async fn create_run(
        &self,
        thread: &ThreadId,
        instructions: &str,
    ) -> Result<RunId, AssistantError> {
        let body = json!({
            "assistant_id": self.assistant_id,
            "additional_instructions": instructions,
        });
        let value = self
            .send_json(
                reqwest::Method::POST,
                &format!("/threads/{thread}/runs"),
                Some(&body),
            )
            .await?;
        let obj: IdObject = Self::parse(value)?;
        debug!(thread_id = %thread, run_id = %obj.id, "run created");
        Ok(RunId::new(obj.id))
    }

    async fn retrieve_run(
        &self,
        thread: &ThreadId,
        run: &RunId,
    ) -> Result<RunSnapshot, AssistantError> {
        let value = self
            .send_json(
                reqwest::Method::GET,
                &format!("/threads/{thread}/runs/{run}"),
                None,
            )
            .await?;
        let obj: RunObject = Self::parse(value)?;
        Ok(Self::snapshot_from_run(obj))
    }

    async fn submit_tool_outputs(
        &self,
        thread: &ThreadId,
        run: &RunId,
        outputs: &[ToolOutput],
    ) -> Result<(), AssistantError> {
        let body = json!({ "tool_outputs": outputs });
        let _ = self
            .send_json(
                reqwest::Method::POST,
                &format!("/threads/{thread}/runs/{run}/submit_tool_outputs"),
                Some(&body),
            )
            .await?;
        Ok(())
    }

    async fn list_run_messages(
        &self,
        thread: &ThreadId,
        run: &RunId,
    ) -> Result<Vec<String>, AssistantError> {
        let value = self
            .send_json(
                reqwest::Method::GET,
                &format!("/threads/{thread}/runs/{run}/steps"),
                None,
            )
            .await?;
        let steps: ListResponse<RunStep> = Self::parse(value)?;

        // Steps arrive newest-first; keep that order, the driver reverses.
        let mut texts = Vec::new();
        for step in steps.data {
            if step.step_details.kind != "message_creation" {
                continue;
            }
            let Some(creation) = step.step_details.message_creation else {
                continue;
            };
            let value = self
                .send_json(
                    reqwest::Method::GET,
                    &format!("/threads/{thread}/messages/{}", creation.message_id),
                    None,
                )
                .await?;
            let message: MessageObject = Self::parse(value)?;
            for block in message.content {
                if block.kind != "text" {
                    continue;
                }
                if let Some(text) = block.text {
                    texts.push(text.value);
                }
            }
        }
        Ok(texts)
    }
}
