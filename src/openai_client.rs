use async_trait::async_trait;
use backoff::{future::retry, ExponentialBackoff};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::assistant::{AssistantApi, ContentSegment, Run};
use crate::error::ChatError;

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Thread {
    id: String,
}

#[derive(Debug, Serialize)]
struct CreateMessageRequest<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateRunRequest<'a> {
    assistant_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessageList {
    data: Vec<ThreadMessage>,
}

#[derive(Debug, Deserialize)]
struct ThreadMessage {
    role: String,
    #[serde(default)]
    content: Vec<MessageContent>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum MessageContent {
    Text { text: TextContent },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct TextContent {
    value: String,
}

impl From<MessageContent> for ContentSegment {
    fn from(content: MessageContent) -> Self {
        match content {
            MessageContent::Text { text } => ContentSegment::Text(text.value),
            MessageContent::Other => ContentSegment::NonText,
        }
    }
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into(),
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ChatError> {
        let url = format!("{}{}", self.base_url, path);

        // Configure exponential backoff for retries
        let backoff_config = ExponentialBackoff {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(10),
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(60)),
            ..Default::default()
        };

        let url = &url;
        let method = &method;
        let body = &body;

        // Retry logic for transient errors (429, 5xx gateway errors, connection errors)
        let operation = move || async move {
            let mut request = self
                .client
                .request(method.clone(), url)
                .bearer_auth(&self.api_key)
                .header("OpenAI-Beta", "assistants=v2")
                .timeout(Duration::from_secs(60));
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await.map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    tracing::warn!(url = %url, "Assistant API connection error (retrying): {}", e);
                    backoff::Error::transient(ChatError::Transport(e.to_string()))
                } else {
                    tracing::error!(url = %url, "Assistant API request error: {}", e);
                    backoff::Error::permanent(ChatError::Transport(e.to_string()))
                }
            })?;

            let status = response.status();
            let response_text = response
                .text()
                .await
                .map_err(|e| backoff::Error::permanent(ChatError::Transport(e.to_string())))?;

            tracing::trace!("Assistant API response (status {}): {}", status, response_text);

            if matches!(status.as_u16(), 429 | 500 | 502 | 503) {
                tracing::warn!("Assistant API returned {} (retrying): {}", status, response_text);
                return Err(backoff::Error::transient(ChatError::Api {
                    status: status.as_u16(),
                    body: response_text,
                }));
            }

            if !status.is_success() {
                tracing::error!("Assistant API permanent error ({}): {}", status, response_text);
                return Err(backoff::Error::permanent(ChatError::Api {
                    status: status.as_u16(),
                    body: response_text,
                }));
            }

            serde_json::from_str::<T>(&response_text)
                .map_err(|e| backoff::Error::permanent(ChatError::Decode(e)))
        };

        retry(backoff_config, operation).await
    }
}

#[async_trait]
impl AssistantApi for OpenAiClient {
    async fn create_thread(&self) -> Result<String, ChatError> {
        let thread: Thread = self.execute(Method::POST, "/threads", Some(json!({}))).await?;
        Ok(thread.id)
    }

    async fn add_user_message(&self, thread_id: &str, text: &str) -> Result<(), ChatError> {
        let body = serde_json::to_value(CreateMessageRequest { role: "user", content: text })?;
        let _: Value = self
            .execute(Method::POST, &format!("/threads/{}/messages", thread_id), Some(body))
            .await?;
        Ok(())
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, ChatError> {
        let body = serde_json::to_value(CreateRunRequest { assistant_id })?;
        self.execute(Method::POST, &format!("/threads/{}/runs", thread_id), Some(body))
            .await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ChatError> {
        self.execute(Method::GET, &format!("/threads/{}/runs/{}", thread_id, run_id), None)
            .await
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ChatError> {
        self.execute(
            Method::POST,
            &format!("/threads/{}/runs/{}/cancel", thread_id, run_id),
            None,
        )
        .await
    }

    async fn latest_reply(&self, thread_id: &str) -> Result<Option<Vec<ContentSegment>>, ChatError> {
        let list: MessageList = self
            .execute(
                Method::GET,
                &format!("/threads/{}/messages?order=desc&limit=1", thread_id),
                None,
            )
            .await?;
        Ok(latest_assistant_segments(list))
    }
}

fn latest_assistant_segments(list: MessageList) -> Option<Vec<ContentSegment>> {
    let message = list.data.into_iter().next()?;
    if message.role != "assistant" {
        return None;
    }
    Some(message.content.into_iter().map(ContentSegment::from).collect())
}
