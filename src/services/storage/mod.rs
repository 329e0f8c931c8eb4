pub mod sqlite;
pub mod supabase;

use async_trait::async_trait;

use crate::models::{BookingRecord, DemoBooking};

/// Where completed demo bookings end up. One call inserts one row.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create_booking(&self, record: &BookingRecord) -> anyhow::Result<DemoBooking>;
}
