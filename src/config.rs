// src/config.rs
//! Runtime configuration read from the process environment (after `.env` is loaded).

use crate::error::ChatError;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_ASSISTANT_ID: &str = "asst_i9gadw6w4Xd0swmScH5jH4Pv";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Which front end the service behaves as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    /// Plain chat.
    Chat,
    /// Chat plus chart extraction and the chart prompt instruction.
    Chart,
}

impl ChatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Chat => "chat",
            ChatMode::Chart => "chart",
        }
    }

    pub fn charts_enabled(&self) -> bool {
        matches!(self, ChatMode::Chart)
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub assistant_id: String,
    pub base_url: String,
    pub mode: ChatMode,
    pub poll_interval: Duration,
    pub run_timeout: Duration,
    pub bind_addr: String,
    pub app_title: String,
}

// Keeps the API key out of logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("assistant_id", &self.assistant_id)
            .field("base_url", &self.base_url)
            .field("mode", &self.mode)
            .field("poll_interval", &self.poll_interval)
            .field("run_timeout", &self.run_timeout)
            .field("bind_addr", &self.bind_addr)
            .field("app_title", &self.app_title)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ChatError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ChatError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mode = match non_empty("CHAT_MODE").as_deref().map(str::to_ascii_lowercase) {
            None => ChatMode::Chat,
            Some(m) if m == "chat" => ChatMode::Chat,
            Some(m) if m == "chart" => ChatMode::Chart,
            Some(other) => {
                return Err(ChatError::InvalidConfig { key: "CHAT_MODE", value: other });
            }
        };

        let poll_interval_ms = parse_u64(non_empty("POLL_INTERVAL_MS"), "POLL_INTERVAL_MS", 500)?;
        let run_timeout_secs = parse_u64(non_empty("RUN_TIMEOUT_SECS"), "RUN_TIMEOUT_SECS", 300)?;

        Ok(Self {
            api_key: non_empty("OPENAI_API_KEY"),
            assistant_id: non_empty("ASSISTANT_ID").unwrap_or_else(|| DEFAULT_ASSISTANT_ID.to_string()),
            base_url: non_empty("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            mode,
            poll_interval: Duration::from_millis(poll_interval_ms),
            run_timeout: Duration::from_secs(run_timeout_secs),
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            app_title: non_empty("APP_TITLE").unwrap_or_else(|| "AI Assistant".to_string()),
        })
    }
}

fn parse_u64(raw: Option<String>, key: &'static str, default: u64) -> Result<u64, ChatError> {
    match raw {
        None => Ok(default),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(0) | Err(_) => Err(ChatError::InvalidConfig { key, value }),
            Ok(n) => Ok(n),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ChatError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(config.assistant_id, DEFAULT_ASSISTANT_ID);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.mode, ChatMode::Chat);
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.run_timeout, Duration::from_secs(300));
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
    }

    #[test]
    fn test_empty_api_key_counts_as_missing() {
        let config = config_from(&[("OPENAI_API_KEY", "   ")]).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("CHAT_MODE", "Chart"),
            ("POLL_INTERVAL_MS", "250"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1/"),
        ])
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.mode, ChatMode::Chart);
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            config_from(&[("CHAT_MODE", "graph")]),
            Err(ChatError::InvalidConfig { key: "CHAT_MODE", .. })
        ));
        assert!(matches!(
            config_from(&[("RUN_TIMEOUT_SECS", "soon")]),
            Err(ChatError::InvalidConfig { key: "RUN_TIMEOUT_SECS", .. })
        ));
        assert!(matches!(
            config_from(&[("POLL_INTERVAL_MS", "0")]),
            Err(ChatError::InvalidConfig { key: "POLL_INTERVAL_MS", .. })
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = config_from(&[("OPENAI_API_KEY", "sk-secret")]).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
