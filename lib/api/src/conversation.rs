use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::VecDeque;
use uuid::Uuid;

/// Default number of exchanges kept in memory
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// One user message and the reply it got
#[derive(Debug, Clone, Serialize)]
pub struct ConversationEntry {
    pub id: Uuid,
    pub user_message: String,
    pub bot_response: String,
    /// RFC 3339
    pub timestamp: String,
}

/// Append-only conversation history, oldest entries evicted past capacity
pub struct ConversationLog {
    entries: RwLock<VecDeque<ConversationEntry>>,
    capacity: usize,
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl ConversationLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&self, user_message: &str, bot_response: &str) -> ConversationEntry {
        let entry = ConversationEntry {
            id: Uuid::new_v4(),
            user_message: user_message.to_string(),
            bot_response: bot_response.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        };

        let mut entries = self.entries.write();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry.clone());
        entry
    }

    /// The `limit` most recent entries, oldest first
    pub fn recent(&self, limit: usize) -> Vec<ConversationEntry> {
        let entries = self.entries.read();
        let skip = entries.len().saturating_sub(limit);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_returns_tail() {
        let log = ConversationLog::default();
        for i in 0..5 {
            log.record(&format!("q{}", i), "a");
        }
        let recent = log.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].user_message, "q3");
        assert_eq!(recent[1].user_message, "q4");
        assert_eq!(log.recent(100).len(), 5);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let log = ConversationLog::new(3);
        for i in 0..4 {
            log.record(&format!("q{}", i), "a");
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.recent(1)[0].user_message, "q3");
        assert_eq!(log.recent(3)[0].user_message, "q1");
    }

    #[test]
    fn test_entry_fields() {
        let log = ConversationLog::default();
        let entry = log.record("hi", "hello there");
        assert_eq!(entry.bot_response, "hello there");
        assert!(chrono::DateTime::parse_from_rfc3339(&entry.timestamp).is_ok());
    }
}
