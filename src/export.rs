// export.rs - Downloadable snapshot of a conversation
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Message;

pub const EXPORT_FILE_NAME: &str = "chat_history.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationExport {
    pub assistant_id: String,
    /// UTC, ISO-8601 with a trailing `Z`.
    pub exported_at: String,
    pub messages: Vec<Message>,
}

impl ConversationExport {
    pub fn new(assistant_id: &str, messages: &[Message]) -> Self {
        Self::at(assistant_id, messages, Utc::now())
    }

    pub fn at(assistant_id: &str, messages: &[Message], when: DateTime<Utc>) -> Self {
        Self {
            assistant_id: assistant_id.to_string(),
            exported_at: format_timestamp(when),
            messages: messages.to_vec(),
        }
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}

fn format_timestamp(when: DateTime<Utc>) -> String {
    when.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_format() {
        let when = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let export = ConversationExport::at("asst_1", &[], when);
        assert_eq!(export.exported_at, "2025-03-14T09:26:53.000000Z");
    }

    #[test]
    fn test_export_round_trip_preserves_messages() {
        let messages = vec![
            Message::user("How much maize?"),
            Message::assistant("Maize: 40"),
            Message::user(""),
            Message::assistant("(No assistant response)"),
        ];
        let export = ConversationExport::new("asst_1", &messages);

        let bytes = export.to_json_bytes().unwrap();
        let restored: ConversationExport = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(restored.messages, messages);
        assert_eq!(restored.assistant_id, "asst_1");
        assert!(restored.exported_at.ends_with('Z'));
    }
}
