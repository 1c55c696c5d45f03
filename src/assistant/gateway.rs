// src/assistant/gateway.rs
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use super::{AssistantApi, ContentSegment, Run, RunStatus};
use crate::error::ChatError;
use crate::session::Turn;

pub const NO_RESPONSE_PLACEHOLDER: &str = "(No assistant response)";
pub const NON_TEXT_PLACEHOLDER: &str = "[Image]";
const CANCEL_TIMEOUT: Duration = Duration::from_secs(10);

/// How a run is waited on.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Upper bound on the whole wait; the run is cancelled once it passes.
    pub max_wait: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            max_wait: Duration::from_secs(300),
        }
    }
}

/// Result of one round trip. Every variant renders to text for the chat history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    Completed(String),
    /// Run reached a terminal state other than `completed`.
    Ended(RunStatus),
    /// Run completed but the thread holds no assistant message.
    NoResponse,
    TimedOut(Duration),
}

impl ReplyOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            ReplyOutcome::Completed(_) => "completed",
            ReplyOutcome::Ended(_) => "ended",
            ReplyOutcome::NoResponse => "no_response",
            ReplyOutcome::TimedOut(_) => "timeout",
        }
    }

    pub fn into_text(self) -> String {
        match self {
            ReplyOutcome::Completed(text) => text,
            ReplyOutcome::Ended(status) => {
                format!("⚠️ Assistant run ended with status **{}**.", status)
            }
            ReplyOutcome::NoResponse => NO_RESPONSE_PLACEHOLDER.to_string(),
            ReplyOutcome::TimedOut(waited) => format!(
                "⚠️ Assistant run timed out after {} seconds.",
                waited.as_secs()
            ),
        }
    }
}

/// Joins message segments with single spaces, swapping non-text parts for a placeholder.
pub fn render_segments(segments: &[ContentSegment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            ContentSegment::Text(text) => text.as_str(),
            ContentSegment::NonText => NON_TEXT_PLACEHOLDER,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Clone)]
pub struct AssistantGateway {
    api: Arc<dyn AssistantApi>,
    assistant_id: String,
    poll: PollPolicy,
}

impl AssistantGateway {
    pub fn new(api: Arc<dyn AssistantApi>, assistant_id: impl Into<String>, poll: PollPolicy) -> Self {
        Self { api, assistant_id: assistant_id.into(), poll }
    }

    /// Sends `text` as a user turn on the session's thread and waits for the reply.
    ///
    /// Transport and API failures are returned as errors; everything the run
    /// itself can end with is reported through [`ReplyOutcome`].
    pub async fn send(&self, turn: &Turn<'_>, text: &str) -> Result<ReplyOutcome, ChatError> {
        let thread_id = turn.ensure_thread(self.api.as_ref()).await?;

        self.api.add_user_message(&thread_id, text).await?;
        let run = self.api.create_run(&thread_id, &self.assistant_id).await?;
        tracing::debug!(thread_id = %thread_id, run_id = %run.id, status = %run.status, "run created");

        let started = Instant::now();
        // The bound covers the polls themselves, including their retries.
        let status = match tokio::time::timeout(self.poll.max_wait, self.wait_for_terminal(&thread_id, &run)).await {
            Ok(status) => status?,
            Err(_) => {
                tracing::warn!(
                    thread_id = %thread_id,
                    run_id = %run.id,
                    waited_secs = started.elapsed().as_secs(),
                    "run did not finish in time, cancelling"
                );
                match tokio::time::timeout(CANCEL_TIMEOUT, self.api.cancel_run(&thread_id, &run.id)).await {
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => tracing::warn!(run_id = %run.id, error = %e, "failed to cancel run"),
                    Err(_) => tracing::warn!(run_id = %run.id, "cancel request timed out"),
                }
                return Ok(ReplyOutcome::TimedOut(self.poll.max_wait));
            }
        };

        if status != RunStatus::Completed {
            tracing::warn!(thread_id = %thread_id, run_id = %run.id, status = %status, "run ended without completing");
            return Ok(ReplyOutcome::Ended(status));
        }

        tracing::info!(
            thread_id = %thread_id,
            run_id = %run.id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "run completed"
        );

        match self.api.latest_reply(&thread_id).await? {
            Some(segments) => Ok(ReplyOutcome::Completed(render_segments(&segments))),
            None => Ok(ReplyOutcome::NoResponse),
        }
    }

    async fn wait_for_terminal(&self, thread_id: &str, run: &Run) -> Result<RunStatus, ChatError> {
        let mut status = run.status.clone();
        while !status.is_terminal() {
            tokio::time::sleep(self.poll.interval).await;
            status = self.api.retrieve_run(thread_id, &run.id).await?.status;
            tracing::trace!(run_id = %run.id, status = %status, "polled run");
        }
        Ok(status)
    }
}
