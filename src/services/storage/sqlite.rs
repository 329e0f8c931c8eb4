use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::Connection;

use super::BookingStore;
use crate::db::{self, queries};
use crate::models::{BookingRecord, DemoBooking};

pub struct SqliteBookingStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteBookingStore {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingStore for SqliteBookingStore {
    async fn create_booking(&self, record: &BookingRecord) -> anyhow::Result<DemoBooking> {
        let booking = DemoBooking {
            id: uuid::Uuid::new_v4().to_string(),
            name: record.name.clone(),
            email: record.email.clone(),
            company: record.company.clone(),
            phone: record.phone.clone(),
            product_interest: record.product_interest.clone(),
            preferred_date: record.preferred_date_iso(),
            message: Some(record.message()),
            created_at: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };

        let conn = db::lock(&self.db)?;
        queries::insert_demo_booking(&conn, &booking)?;
        Ok(booking)
    }
}
