use std::env;

use chrono::{FixedOffset, Offset, Utc};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub booking_backend: String,
    pub supabase_url: String,
    pub supabase_key: String,
    pub persist_timeout_secs: u64,
    /// Idle live sessions older than this are dropped from memory.
    pub session_idle_secs: u64,
    /// Offset the availability table's wall-clock times are expressed in.
    pub utc_offset: FixedOffset,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "trinexa.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            booking_backend: env::var("BOOKING_BACKEND").unwrap_or_else(|_| "sqlite".to_string()),
            supabase_url: env::var("SUPABASE_URL").unwrap_or_default(),
            supabase_key: env::var("SUPABASE_KEY").unwrap_or_default(),
            persist_timeout_secs: env::var("PERSIST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            session_idle_secs: env::var("SESSION_IDLE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1800),
            utc_offset: env::var("BUSINESS_UTC_OFFSET")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| Utc.fix()),
        }
    }
}
