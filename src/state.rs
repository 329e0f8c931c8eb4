use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::models::ChatSession;
use crate::services::storage::BookingStore;
use crate::services::transcript::TranscriptStore;

/// A session held in memory, with the time it was last touched.
pub struct LiveSession {
    pub handle: Arc<tokio::sync::Mutex<ChatSession>>,
    pub last_seen: Instant,
}

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub bookings: Box<dyn BookingStore>,
    pub transcripts: Box<dyn TranscriptStore>,
    /// Live chat sessions keyed by session id.
    pub sessions: Mutex<HashMap<String, LiveSession>>,
}

impl AppState {
    pub fn new(
        db: Arc<Mutex<Connection>>,
        config: AppConfig,
        bookings: Box<dyn BookingStore>,
        transcripts: Box<dyn TranscriptStore>,
    ) -> Self {
        Self {
            db,
            config,
            bookings,
            transcripts,
            sessions: Mutex::new(HashMap::new()),
        }
    }
}
