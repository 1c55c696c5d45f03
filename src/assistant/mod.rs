// src/assistant/mod.rs
//! Remote assistant collaborator: the thread/run capability the gateway drives,
//! plus the run lifecycle types shared by the HTTP client and the gateway.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ChatError;

pub mod gateway;

#[cfg(test)]
pub(crate) mod fake;

pub use gateway::{AssistantGateway, PollPolicy, ReplyOutcome};

/// Status of a single run on a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Completed,
    Failed,
    Cancelled,
    Expired,
    Incomplete,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// States after which polling stops.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Failed | RunStatus::Cancelled | RunStatus::Expired
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Expired => "expired",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
}

/// One piece of an assistant message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSegment {
    Text(String),
    /// Images and any other content the chat cannot show inline.
    NonText,
}

/// Thread/run operations of the remote assistant service.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    async fn create_thread(&self) -> Result<String, ChatError>;

    async fn add_user_message(&self, thread_id: &str, text: &str) -> Result<(), ChatError>;

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, ChatError>;

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ChatError>;

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ChatError>;

    /// Content of the newest assistant message on the thread, `None` if there is none.
    async fn latest_reply(&self, thread_id: &str) -> Result<Option<Vec<ContentSegment>>, ChatError>;
}
