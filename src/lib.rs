// lib.rs - Main library file that exports all modules
pub mod assistant;
pub mod chart;
pub mod config;
pub mod conversation;
pub mod error;
pub mod export;
pub mod handlers;
pub mod middleware;
pub mod openai_client;
pub mod session;
pub mod types;

use std::sync::Arc;

use assistant::{AssistantGateway, PollPolicy};
use config::AppConfig;
use conversation::ChatService;
use openai_client::OpenAiClient;
use session::SessionStore;

// Re-export commonly used types for convenience
pub use error::ChatError;
pub use types::*;

// AppState holds the configuration, the live sessions and the conversation core
pub struct AppState {
    pub config: AppConfig,
    pub sessions: SessionStore,
    pub chat: ChatService,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> Self {
        let gateway = match config.api_key.as_ref() {
            Some(api_key) => {
                tracing::info!("Initializing assistant client for {}...", config.assistant_id);
                let client = OpenAiClient::new(api_key.clone(), config.base_url.clone());
                let poll = PollPolicy { interval: config.poll_interval, max_wait: config.run_timeout };
                Some(AssistantGateway::new(Arc::new(client), config.assistant_id.clone(), poll))
            }
            None => {
                tracing::warn!("OPENAI_API_KEY not found. Chat requests will be rejected until it is set.");
                None
            }
        };
        let chat = ChatService::new(gateway, config.mode);
        Self::new(config, chat)
    }

    pub fn new(config: AppConfig, chat: ChatService) -> Self {
        Self { config, sessions: SessionStore::new(), chat }
    }
}
