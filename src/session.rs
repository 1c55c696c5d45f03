// src/session.rs
//! Per-session conversation state and the process-wide registry of sessions.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use uuid::Uuid;

use crate::assistant::AssistantApi;
use crate::error::ChatError;
use crate::types::{Message, Role};

/// Conversation state owned by one interactive session.
#[derive(Debug, Default, Clone)]
pub struct Session {
    messages: Vec<Message>,
    thread_id: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message { role, content: content.into() });
    }

    fn user_messages(&self) -> Vec<String> {
        self.messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .collect()
    }
}

/// A live session: state behind a briefly held lock, plus a turn lock that
/// serializes submissions without blocking readers.
#[derive(Debug)]
pub struct SessionHandle {
    id: Uuid,
    state: RwLock<Session>,
    turn: Mutex<()>,
}

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self::with_id(Uuid::new_v4(), session)
    }

    pub fn with_id(id: Uuid, session: Session) -> Self {
        Self { id, state: RwLock::new(session), turn: Mutex::new(()) }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Copy of the current history; never waits on an in-flight submission.
    pub async fn snapshot(&self) -> Vec<Message> {
        self.state.read().await.messages.clone()
    }

    pub async fn thread_id(&self) -> Option<String> {
        self.state.read().await.thread_id.clone()
    }

    /// Waits for any other submission on this session to finish, then claims the session.
    pub async fn begin_turn(&self) -> Turn<'_> {
        let guard = self.turn.lock().await;
        Turn { handle: self, _guard: guard }
    }
}

/// Exclusive write access to a session for the length of one submission.
pub struct Turn<'a> {
    handle: &'a SessionHandle,
    _guard: MutexGuard<'a, ()>,
}

impl Turn<'_> {
    pub fn session_id(&self) -> Uuid {
        self.handle.id
    }

    pub async fn append(&self, role: Role, content: impl Into<String>) {
        self.handle.state.write().await.append(role, content);
    }

    /// Returns the remote thread for this session, creating it on first use.
    ///
    /// A freshly created thread gets every stored user message re-submitted in
    /// order; assistant messages are regenerated remotely and never replayed.
    /// The state lock is not held across remote calls.
    pub async fn ensure_thread(&self, api: &dyn AssistantApi) -> Result<String, ChatError> {
        let replay = {
            let state = self.handle.state.read().await;
            if let Some(thread_id) = &state.thread_id {
                return Ok(thread_id.clone());
            }
            state.user_messages()
        };

        let thread_id = api.create_thread().await?;
        tracing::info!(session_id = %self.handle.id, thread_id = %thread_id, "created assistant thread");

        if !replay.is_empty() {
            tracing::info!(
                session_id = %self.handle.id,
                thread_id = %thread_id,
                count = replay.len(),
                "replaying stored user messages into new thread"
            );
        }
        for text in &replay {
            api.add_user_message(&thread_id, text).await?;
        }

        self.handle.state.write().await.thread_id = Some(thread_id.clone());
        Ok(thread_id)
    }
}

pub type SharedSession = Arc<SessionHandle>;

/// All live sessions of the process, indexed by id.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SharedSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Uuid {
        let handle = SessionHandle::new(Session::new());
        let id = handle.id();
        self.sessions.write().await.insert(id, Arc::new(handle));
        tracing::info!(session_id = %id, "started chat session");
        id
    }

    pub async fn get(&self, id: Uuid) -> Result<SharedSession, ChatError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ChatError::SessionNotFound(id))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
