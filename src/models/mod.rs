pub mod availability;
pub mod booking;
pub mod conversation;

pub use availability::{AvailabilitySlot, Weekday, AVAILABILITY};
pub use booking::{BookingRecord, DemoBooking};
pub use conversation::{
    ChatMessage, ChatSession, DialogueState, FieldKind, FieldSpec, Role, BOOKING_FIELDS,
};
