use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A completed booking dialogue, ready to hand to a `BookingStore`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub product_interest: String,
    pub attendee_count: u32,
    pub selected_day: String,
    pub selected_time: String,
    pub preferred_date: Option<DateTime<FixedOffset>>,
    pub notes: Option<String>,
}

impl BookingRecord {
    pub fn preferred_date_iso(&self) -> Option<String> {
        self.preferred_date.map(|d| d.to_rfc3339())
    }

    /// Free-text `message` column of the `demo_bookings` table.
    pub fn message(&self) -> String {
        let mut message = format!(
            "Attendees: {}\nPreferred slot: {} {}",
            self.attendee_count, self.selected_day, self.selected_time
        );
        if let Some(notes) = &self.notes {
            message.push_str("\nNotes: ");
            message.push_str(notes);
        }
        message
    }
}

/// A row of the `demo_bookings` table as returned by a storage backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoBooking {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub product_interest: String,
    pub preferred_date: Option<String>,
    pub message: Option<String>,
    pub created_at: String,
}
