// src/conversation.rs
//! One conversation core for both front ends; charting is an optional post-processing step.

use serde::Serialize;

use crate::assistant::{AssistantGateway, ReplyOutcome};
use crate::chart;
use crate::config::ChatMode;
use crate::error::ChatError;
use crate::session::SessionHandle;
use crate::types::{ChartRow, Role};

/// What a single submission produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnResult {
    pub reply: String,
    /// `completed`, `ended`, `no_response` or `timeout`.
    pub outcome: &'static str,
    pub chart: Option<Vec<ChartRow>>,
}

#[derive(Clone)]
pub struct ChatService {
    gateway: Option<AssistantGateway>,
    mode: ChatMode,
}

impl ChatService {
    /// `gateway` is `None` when no API key is configured.
    pub fn new(gateway: Option<AssistantGateway>, mode: ChatMode) -> Self {
        Self { gateway, mode }
    }

    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    pub fn is_configured(&self) -> bool {
        self.gateway.is_some()
    }

    /// Runs one user turn to completion and records it in the session.
    ///
    /// Both the user text and the reply are appended only once the round trip
    /// has produced a reply, so a failed transport leaves the history as it was.
    /// Readers of the session are never blocked while the turn is in flight.
    pub async fn submit(&self, session: &SessionHandle, user_text: &str) -> Result<TurnResult, ChatError> {
        let gateway = self.gateway.as_ref().ok_or(ChatError::MissingApiKey)?;

        let outgoing = match self.mode {
            ChatMode::Chat => user_text.to_string(),
            ChatMode::Chart => chart::chart_prompt(user_text),
        };

        let turn = session.begin_turn().await;
        tracing::info!(session_id = %turn.session_id(), mode = %self.mode, chars = user_text.len(), "submitting user turn");
        let outcome: ReplyOutcome = gateway.send(&turn, &outgoing).await?;
        let kind = outcome.kind();
        let reply = outcome.into_text();

        turn.append(Role::User, user_text).await;
        turn.append(Role::Assistant, reply.clone()).await;

        let chart = if self.mode.charts_enabled() { chart::extract(&reply) } else { None };
        if let Some(rows) = &chart {
            tracing::debug!(session_id = %turn.session_id(), rows = rows.len(), "extracted chart data");
        }

        Ok(TurnResult { reply, outcome: kind, chart })
    }
}
