use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::models::{ChatMessage, ChatSession, Role};
use crate::services::booking::{self, PERSIST_FAILED};
use crate::services::classifier;
use crate::services::dialogue::{self, Step, CANCEL_ACK};
use crate::services::storage::BookingStore;
use crate::services::transcript::transcript_key;
use crate::state::{AppState, LiveSession};

pub const WELCOME: &str = "Hi! I'm the Trinexa assistant. Ask me about our company and products, or type \"book a demo\" to schedule one.";

pub const BOOKING_INCOMPLETE: &str = "Sorry, some of your booking details got lost. Type \"book a demo\" to start again.";

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub dialogue_active: bool,
    /// Field the dialogue is waiting on, if any.
    pub step: Option<&'static str>,
}

/// Returns the session for `session_id`, loading its transcript the first time it is seen.
///
/// Also drops idle sessions with no booking in progress; their transcripts stay in the store.
pub fn session_handle(
    state: &AppState,
    session_id: &str,
) -> anyhow::Result<Arc<Mutex<ChatSession>>> {
    let mut sessions = state
        .sessions
        .lock()
        .map_err(|_| anyhow::anyhow!("session map lock poisoned"))?;

    let now = Instant::now();
    evict_idle(
        &mut sessions,
        now,
        Duration::from_secs(state.config.session_idle_secs),
        session_id,
    );

    if let Some(live) = sessions.get_mut(session_id) {
        live.last_seen = now;
        return Ok(Arc::clone(&live.handle));
    }

    let mut session = ChatSession {
        transcript: load_transcript(state, session_id),
        ..ChatSession::default()
    };
    if session.transcript.is_empty() {
        session.transcript.push(ChatMessage::new(Role::Bot, WELCOME));
    }

    tracing::debug!(session = session_id, messages = session.transcript.len(), "session started");

    let handle = Arc::new(Mutex::new(session));
    sessions.insert(
        session_id.to_string(),
        LiveSession {
            handle: Arc::clone(&handle),
            last_seen: now,
        },
    );
    Ok(handle)
}

fn load_transcript(state: &AppState, session_id: &str) -> Vec<ChatMessage> {
    state
        .transcripts
        .load(&transcript_key(session_id))
        .unwrap_or_else(|e| {
            tracing::warn!(session = session_id, error = %e, "failed to load transcript");
            Vec::new()
        })
}

fn evict_idle(
    sessions: &mut HashMap<String, LiveSession>,
    now: Instant,
    idle: Duration,
    keep: &str,
) {
    let before = sessions.len();
    sessions.retain(|id, live| {
        if id == keep
            || now.duration_since(live.last_seen) < idle
            || Arc::strong_count(&live.handle) > 1
        {
            return true;
        }
        // Busy sessions and open bookings stay.
        match live.handle.try_lock() {
            Ok(session) => session.dialogue.is_active,
            Err(_) => true,
        }
    });
    let evicted = before - sessions.len();
    if evicted > 0 {
        tracing::debug!(evicted, remaining = sessions.len(), "evicted idle sessions");
    }
}

/// Messages for `session_id` without starting a live session.
pub async fn transcript(state: &AppState, session_id: &str) -> anyhow::Result<Vec<ChatMessage>> {
    let live = state
        .sessions
        .lock()
        .map_err(|_| anyhow::anyhow!("session map lock poisoned"))?
        .get(session_id)
        .map(|live| Arc::clone(&live.handle));

    if let Some(handle) = live {
        return Ok(handle.lock().await.transcript.clone());
    }

    let mut messages = load_transcript(state, session_id);
    if messages.is_empty() {
        messages.push(ChatMessage::new(Role::Bot, WELCOME));
    }
    Ok(messages)
}

pub async fn process_message(
    state: &Arc<AppState>,
    session_id: &str,
    message: &str,
) -> anyhow::Result<ChatReply> {
    let handle = session_handle(state, session_id)?;
    // Held across the booking submit so one session never has two in flight.
    let mut session = handle.lock().await;

    session.transcript.push(ChatMessage::new(Role::User, message));

    let now = Utc::now().with_timezone(&state.config.utc_offset);
    let reply = respond(
        &mut session,
        state.bookings.as_ref(),
        message,
        now,
        Duration::from_secs(state.config.persist_timeout_secs),
    )
    .await;

    session.transcript.push(ChatMessage::new(Role::Bot, reply.clone()));

    if let Err(e) = state
        .transcripts
        .save(&transcript_key(session_id), &session.transcript)
    {
        tracing::warn!(session = session_id, error = %e, "failed to save transcript");
    }

    tracing::info!(
        session = session_id,
        active = session.dialogue.is_active,
        step = session.dialogue.step_index,
        "processed chat message"
    );

    Ok(ChatReply {
        reply,
        dialogue_active: session.dialogue.is_active,
        step: session.dialogue.current_field().map(|f| f.kind.as_str()),
    })
}

/// Forgets the session and its stored transcript.
pub fn reset_session(state: &AppState, session_id: &str) -> anyhow::Result<()> {
    state
        .sessions
        .lock()
        .map_err(|_| anyhow::anyhow!("session map lock poisoned"))?
        .remove(session_id);
    state.transcripts.clear(&transcript_key(session_id))
}

/// Handles one user turn. Every path produces a reply for the user.
pub async fn respond(
    session: &mut ChatSession,
    bookings: &dyn BookingStore,
    message: &str,
    now: DateTime<FixedOffset>,
    persist_timeout: Duration,
) -> String {
    let input = message.trim();

    if session.dialogue.is_active && dialogue::is_cancel_command(input) {
        session.dialogue.reset();
        return CANCEL_ACK.to_string();
    }

    if session.dialogue.is_active {
        return match dialogue::advance(&mut session.dialogue, input) {
            Step::Rejected(e) => e.to_string(),
            Step::Prompt(prompt) => prompt,
            Step::Ready => finalize(session, bookings, now, persist_timeout).await,
        };
    }

    if dialogue::is_booking_intent(input) {
        let prompt = dialogue::start(&mut session.dialogue);
        return format!("Great, let's get your demo booked! {prompt}");
    }

    classifier::respond(input, &mut session.display_name, now)
}

async fn finalize(
    session: &mut ChatSession,
    bookings: &dyn BookingStore,
    now: DateTime<FixedOffset>,
    persist_timeout: Duration,
) -> String {
    let record = match booking::build_record(&session.dialogue.answers, now.date_naive(), now.timezone()) {
        Ok(record) => record,
        Err(e) => {
            tracing::error!(error = %e, "could not build booking from answers");
            session.dialogue.reset();
            return BOOKING_INCOMPLETE.to_string();
        }
    };

    match booking::submit(bookings, &record, persist_timeout).await {
        Ok(stored) => {
            tracing::info!(booking_id = %stored.id, product = %record.product_interest, "demo booked");
            session.dialogue.reset();
            booking::confirmation_message(&record)
        }
        Err(e) => {
            // Dialogue stays on the last field; resending that answer retries the submit.
            tracing::error!(error = %e, "failed to persist booking");
            PERSIST_FAILED.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::models::{BookingRecord, DemoBooking, FieldKind};

    const HAPPY_PATH: [&str; 10] = [
        "demo",
        "Jane Doe",
        "jane@x.com",
        "Acme",
        "+1 555 1234567",
        "Ayura",
        "3",
        "Monday",
        "10",
        "none",
    ];

    #[derive(Default)]
    struct RecordingStore {
        calls: AtomicUsize,
        fail: bool,
        last: std::sync::Mutex<Option<BookingRecord>>,
    }

    #[async_trait]
    impl BookingStore for RecordingStore {
        async fn create_booking(&self, record: &BookingRecord) -> anyhow::Result<DemoBooking> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("storage unavailable");
            }
            *self.last.lock().unwrap() = Some(record.clone());
            Ok(DemoBooking {
                id: "b-1".to_string(),
                name: record.name.clone(),
                email: record.email.clone(),
                company: record.company.clone(),
                phone: record.phone.clone(),
                product_interest: record.product_interest.clone(),
                preferred_date: record.preferred_date_iso(),
                message: Some(record.message()),
                created_at: "2025-06-18 09:00:00".to_string(),
            })
        }
    }

    fn now() -> DateTime<FixedOffset> {
        // A Wednesday
        DateTime::parse_from_rfc3339("2025-06-18T09:00:00+00:00").unwrap()
    }

    async fn send(session: &mut ChatSession, store: &RecordingStore, msg: &str) -> String {
        respond(session, store, msg, now(), Duration::from_secs(1)).await
    }

    #[tokio::test]
    async fn test_happy_path_books_once_and_resets() {
        let store = RecordingStore::default();
        let mut session = ChatSession::default();

        let first = send(&mut session, &store, HAPPY_PATH[0]).await;
        assert!(first.contains("What's your full name?"));
        assert!(session.dialogue.is_active);
        assert_eq!(session.dialogue.step_index, 0);

        let mut last = String::new();
        for msg in &HAPPY_PATH[1..] {
            last = send(&mut session, &store, msg).await;
        }

        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
        let record = store.last.lock().unwrap().clone().unwrap();
        assert_eq!(record.product_interest, "Ayura");
        assert_eq!(record.selected_day, "Monday");
        assert_eq!(record.selected_time, "10:00 AM");
        assert_eq!(record.attendee_count, 3);
        assert_eq!(record.preferred_date_iso().as_deref(), Some("2025-06-23T10:00:00+00:00"));

        assert!(last.contains("Monday") && last.contains("10:00 AM") && last.contains("Ayura"));
        assert!(!session.dialogue.is_active);
        assert_eq!(session.dialogue.step_index, 0);
        assert!(session.dialogue.answers.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_mid_dialogue_returns_to_classifier() {
        let store = RecordingStore::default();
        let mut session = ChatSession::default();
        for msg in &HAPPY_PATH[..5] {
            send(&mut session, &store, msg).await;
        }
        assert_eq!(session.dialogue.step_index, 4);

        assert_eq!(send(&mut session, &store, "cancel").await, CANCEL_ACK);
        assert!(!session.dialogue.is_active);
        assert_eq!(session.dialogue.step_index, 0);
        assert!(session.dialogue.answers.is_empty());

        let reply = send(&mut session, &store, "what is your mission").await;
        assert!(reply.starts_with("Our mission"));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rebooking_starts_clean() {
        let store = RecordingStore::default();
        let mut session = ChatSession::default();
        for msg in HAPPY_PATH {
            send(&mut session, &store, msg).await;
        }

        let reply = send(&mut session, &store, "demo").await;
        assert!(reply.contains("What's your full name?"));
        assert_eq!(session.dialogue.step_index, 0);
        assert!(session.dialogue.answers.is_empty());
    }

    #[tokio::test]
    async fn test_persist_failure_keeps_terminal_step() {
        let store = RecordingStore {
            fail: true,
            ..RecordingStore::default()
        };
        let mut session = ChatSession::default();
        let mut last = String::new();
        for msg in HAPPY_PATH {
            last = send(&mut session, &store, msg).await;
        }

        assert_eq!(last, PERSIST_FAILED);
        assert!(session.dialogue.is_active);
        assert_eq!(session.dialogue.step_index, 8);
        assert_eq!(session.dialogue.answer(FieldKind::SelectedTime), Some("10:00 AM"));

        // Resending the last answer retries the submit.
        send(&mut session, &store, "none").await;
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_validation_error_is_returned_verbatim() {
        let store = RecordingStore::default();
        let mut session = ChatSession::default();
        send(&mut session, &store, "book").await;
        send(&mut session, &store, "Jane Doe").await;

        let reply = send(&mut session, &store, "not-an-email").await;
        assert_eq!(
            reply,
            crate::services::validation::ValidationError::InvalidEmail.to_string()
        );
        assert_eq!(session.dialogue.step_index, 1);
    }

    #[tokio::test]
    async fn test_booking_keyword_mid_dialogue_is_just_an_answer() {
        let store = RecordingStore::default();
        let mut session = ChatSession::default();
        send(&mut session, &store, "schedule").await;
        send(&mut session, &store, "Demo Person").await;
        assert_eq!(session.dialogue.answer(FieldKind::Name), Some("Demo Person"));
        assert_eq!(session.dialogue.step_index, 1);
    }

    #[tokio::test]
    async fn test_unusable_attendee_counts_rejected_before_finalize() {
        for attendees in ["99999999999", "1\u{0663}"] {
            let store = RecordingStore::default();
            let mut session = ChatSession::default();
            for msg in &HAPPY_PATH[..6] {
                send(&mut session, &store, msg).await;
            }

            let reply = send(&mut session, &store, attendees).await;
            assert_eq!(
                reply,
                crate::services::validation::ValidationError::InvalidAttendees.to_string()
            );
            assert_eq!(session.dialogue.step_index, 5);

            for msg in &HAPPY_PATH[6..] {
                send(&mut session, &store, msg).await;
            }
            assert_eq!(store.calls.load(Ordering::SeqCst), 1);
            assert!(!session.dialogue.is_active);
        }
    }

    #[tokio::test]
    async fn test_unbuildable_answers_reset_instead_of_sticking() {
        let store = RecordingStore::default();
        let mut session = ChatSession::default();
        dialogue::start(&mut session.dialogue);
        session.dialogue.step_index = 8;
        session
            .dialogue
            .answers
            .insert(FieldKind::Name, "Jane Doe".to_string());

        let reply = send(&mut session, &store, "none").await;
        assert_eq!(reply, BOOKING_INCOMPLETE);
        assert_ne!(reply, PERSIST_FAILED);
        assert!(!session.dialogue.is_active);
        assert!(session.dialogue.answers.is_empty());
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancel_word_outside_dialogue_is_not_acknowledged() {
        let store = RecordingStore::default();
        let mut session = ChatSession::default();
        for word in ["stop", "exit", "cancel"] {
            let reply = send(&mut session, &store, word).await;
            assert_ne!(reply, CANCEL_ACK);
            assert!(reply.contains("book a demo"));
        }
        assert!(!session.dialogue.is_active);
    }

    #[tokio::test]
    async fn test_name_is_remembered_between_turns() {
        let store = RecordingStore::default();
        let mut session = ChatSession::default();
        send(&mut session, &store, "my name is priya").await;
        let reply = send(&mut session, &store, "hello").await;
        assert!(reply.starts_with("Hello, Priya!"));
    }
}
