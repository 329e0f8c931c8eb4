use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

use crate::models::availability::Weekday;
use crate::models::{BookingRecord, DemoBooking, FieldKind};
use crate::services::scheduling::{next_date_for, parse_slot_time};
use crate::services::storage::BookingStore;

pub const PERSIST_FAILED: &str = "Sorry, something went wrong while saving your booking. Please send your last answer again to retry, or contact support at hello@trinexa.ai.";

const NO_NOTES: [&str; 5] = ["none", "no", "n/a", "na", "-"];

fn required<'a>(answers: &'a BTreeMap<FieldKind, String>, kind: FieldKind) -> anyhow::Result<&'a str> {
    answers
        .get(&kind)
        .map(String::as_str)
        .with_context(|| format!("missing answer for {}", kind.as_str()))
}

/// Date and time of the demo in the business's offset, if the slot parses.
pub fn preferred_date(
    day: Weekday,
    slot: &str,
    today: NaiveDate,
    offset: FixedOffset,
) -> Option<DateTime<FixedOffset>> {
    let time = parse_slot_time(slot)?;
    let date = next_date_for(day, today);
    offset.from_local_datetime(&date.and_time(time)).single()
}

/// Maps a finished dialogue's answers to a record. `today` is in the business's offset.
pub fn build_record(
    answers: &BTreeMap<FieldKind, String>,
    today: NaiveDate,
    offset: FixedOffset,
) -> anyhow::Result<BookingRecord> {
    let selected_day = required(answers, FieldKind::SelectedDay)?;
    let selected_time = required(answers, FieldKind::SelectedTime)?;
    let day = Weekday::parse(selected_day)
        .with_context(|| format!("unknown weekday: {selected_day}"))?;

    let attendee_count = required(answers, FieldKind::Attendees)?
        .parse::<u32>()
        .context("attendee count is not a number")?;

    let notes = answers
        .get(&FieldKind::Notes)
        .map(|n| n.trim())
        .filter(|n| !n.is_empty() && !NO_NOTES.contains(&n.to_lowercase().as_str()))
        .map(str::to_string);

    let preferred_date = preferred_date(day, selected_time, today, offset);
    if preferred_date.is_none() {
        tracing::warn!(slot = selected_time, "could not parse slot time, storing booking without date");
    }

    Ok(BookingRecord {
        name: required(answers, FieldKind::Name)?.to_string(),
        email: required(answers, FieldKind::Email)?.to_string(),
        company: required(answers, FieldKind::Company)?.to_string(),
        phone: required(answers, FieldKind::Phone)?.to_string(),
        product_interest: required(answers, FieldKind::ProductInterest)?.to_string(),
        attendee_count,
        selected_day: selected_day.to_string(),
        selected_time: selected_time.to_string(),
        preferred_date,
        notes,
    })
}

/// Hands the record to the store, failing if it takes longer than `timeout`.
pub async fn submit(
    store: &dyn BookingStore,
    record: &BookingRecord,
    timeout: Duration,
) -> anyhow::Result<DemoBooking> {
    tokio::time::timeout(timeout, store.create_booking(record))
        .await
        .map_err(|_| anyhow::anyhow!("booking store timed out after {timeout:?}"))?
}

pub fn confirmation_message(record: &BookingRecord) -> String {
    let people = if record.attendee_count == 1 {
        "1 attendee".to_string()
    } else {
        format!("{} attendees", record.attendee_count)
    };
    let date = record
        .preferred_date
        .map(|d| format!(" ({})", d.format("%B %-d, %Y")))
        .unwrap_or_default();

    format!(
        "You're all set, {}! Your {} demo is booked for {}{date} at {} for {people}. We'll email the details to {}.",
        record.name, record.product_interest, record.selected_day, record.selected_time, record.email
    )
}
