// src/assistant/fake.rs
//! In-memory `AssistantApi` used by unit tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use super::{AssistantApi, ContentSegment, Run, RunStatus};
use crate::error::ChatError;

/// Records every call and answers runs from a script of statuses.
#[derive(Default)]
pub struct FakeAssistant {
    pub threads_created: Mutex<usize>,
    /// (thread_id, text) in submission order.
    pub submitted: Mutex<Vec<(String, String)>>,
    /// Statuses handed out by create/retrieve, front first; the last one repeats.
    pub statuses: Mutex<VecDeque<RunStatus>>,
    pub reply: Mutex<Option<Vec<ContentSegment>>>,
    pub cancelled: Mutex<Vec<String>>,
    pub fail_create_thread: bool,
    pub fail_add_message: bool,
    /// Slows every `retrieve_run` down, like a remote call stuck in retries.
    pub retrieve_delay: Option<Duration>,
}

impl FakeAssistant {
    pub fn replying(text: &str) -> Self {
        let fake = Self::default();
        fake.set_statuses(&[RunStatus::Queued, RunStatus::InProgress, RunStatus::Completed]);
        *fake.reply.lock().unwrap() = Some(vec![ContentSegment::Text(text.to_string())]);
        fake
    }

    pub fn set_statuses(&self, statuses: &[RunStatus]) {
        *self.statuses.lock().unwrap() = statuses.iter().cloned().collect();
    }

    pub fn submitted_texts(&self) -> Vec<String> {
        self.submitted.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }

    fn next_status(&self) -> RunStatus {
        let mut statuses = self.statuses.lock().unwrap();
        if statuses.len() > 1 {
            statuses.pop_front().unwrap()
        } else {
            statuses.front().cloned().unwrap_or(RunStatus::Completed)
        }
    }
}

#[async_trait]
impl AssistantApi for FakeAssistant {
    async fn create_thread(&self) -> Result<String, ChatError> {
        if self.fail_create_thread {
            return Err(ChatError::Transport("connection refused".to_string()));
        }
        let mut count = self.threads_created.lock().unwrap();
        *count += 1;
        Ok(format!("thread_{}", *count))
    }

    async fn add_user_message(&self, thread_id: &str, text: &str) -> Result<(), ChatError> {
        if self.fail_add_message {
            return Err(ChatError::Transport("connection reset".to_string()));
        }
        self.submitted.lock().unwrap().push((thread_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn create_run(&self, _thread_id: &str, _assistant_id: &str) -> Result<Run, ChatError> {
        Ok(Run { id: "run_1".to_string(), status: self.next_status() })
    }

    async fn retrieve_run(&self, _thread_id: &str, run_id: &str) -> Result<Run, ChatError> {
        if let Some(delay) = self.retrieve_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(Run { id: run_id.to_string(), status: self.next_status() })
    }

    async fn cancel_run(&self, _thread_id: &str, run_id: &str) -> Result<Run, ChatError> {
        self.cancelled.lock().unwrap().push(run_id.to_string());
        Ok(Run { id: run_id.to_string(), status: RunStatus::Cancelling })
    }

    async fn latest_reply(&self, _thread_id: &str) -> Result<Option<Vec<ContentSegment>>, ChatError> {
        Ok(self.reply.lock().unwrap().clone())
    }
}
