use chrono::{DateTime, Duration, Utc};

use crate::models::DemoBooking;

pub const DEMO_DURATION_MINUTES: i64 = 60;

/// Renders a single-event iCalendar file, or `None` if the booking has no usable date.
pub fn generate_ics(booking: &DemoBooking) -> Option<String> {
    let start = DateTime::parse_from_rfc3339(booking.preferred_date.as_deref()?)
        .ok()?
        .with_timezone(&Utc);
    let end = start + Duration::minutes(DEMO_DURATION_MINUTES);

    let dtstart = start.format("%Y%m%dT%H%M%SZ").to_string();
    let dtend = end.format("%Y%m%dT%H%M%SZ").to_string();
    let dtstamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    let uid = format!("{}@trinexa", booking.id);

    let summary = format!("Trinexa demo: {}", booking.product_interest);
    let description = booking
        .message
        .as_deref()
        .unwrap_or("No additional notes")
        .replace('\n', "\\n");

    Some(format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Trinexa//Demo Booking//EN\r\n\
         BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:{dtstamp}\r\n\
         DTSTART:{dtstart}\r\n\
         DTEND:{dtend}\r\n\
         SUMMARY:{summary}\r\n\
         DESCRIPTION:{description}\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n"
    ))
}
