use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::db::{self, queries};
use crate::models::ChatMessage;

/// Prefix for transcript keys; the session id is appended.
pub const TRANSCRIPT_KEY: &str = "trinexa-chat-history";

pub fn transcript_key(session_id: &str) -> String {
    format!("{TRANSCRIPT_KEY}:{session_id}")
}

/// Load/save capability for the chat message list of one session.
pub trait TranscriptStore: Send + Sync {
    fn load(&self, key: &str) -> anyhow::Result<Vec<ChatMessage>>;
    fn save(&self, key: &str, messages: &[ChatMessage]) -> anyhow::Result<()>;
    fn clear(&self, key: &str) -> anyhow::Result<()>;
}

pub struct SqliteTranscriptStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteTranscriptStore {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }
}

impl TranscriptStore for SqliteTranscriptStore {
    fn load(&self, key: &str) -> anyhow::Result<Vec<ChatMessage>> {
        let conn = db::lock(&self.db)?;
        queries::load_transcript(&conn, key)
    }

    fn save(&self, key: &str, messages: &[ChatMessage]) -> anyhow::Result<()> {
        let conn = db::lock(&self.db)?;
        queries::save_transcript(&conn, key, messages)
    }

    fn clear(&self, key: &str) -> anyhow::Result<()> {
        let conn = db::lock(&self.db)?;
        queries::delete_transcript(&conn, key)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_keys_are_scoped_per_session() {
        assert_eq!(transcript_key("abc"), "trinexa-chat-history:abc");
        assert_ne!(transcript_key("a"), transcript_key("b"));
    }

    #[test]
    fn test_sqlite_store_roundtrip() {
        let conn = db::init_db(":memory:").unwrap();
        let store = SqliteTranscriptStore::new(Arc::new(Mutex::new(conn)));
        let key = transcript_key("s1");

        store
            .save(&key, &[ChatMessage::new(Role::User, "hello")])
            .unwrap();
        let loaded = store.load(&key).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].text, "hello");

        store.clear(&key).unwrap();
        assert!(store.load(&key).unwrap().is_empty());
        assert!(store.load(&transcript_key("s2")).unwrap().is_empty());
    }
}
