use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::BookingStore;
use crate::models::{BookingRecord, DemoBooking};

/// Inserts bookings through the hosted database's REST endpoint.
pub struct SupabaseBookingStore {
    url: String,
    api_key: String,
    client: reqwest::Client,
}

impl SupabaseBookingStore {
    pub fn new(url: String, api_key: String) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl BookingStore for SupabaseBookingStore {
    async fn create_booking(&self, record: &BookingRecord) -> anyhow::Result<DemoBooking> {
        let body = json!({
            "name": record.name,
            "email": record.email,
            "company": record.company,
            "phone": record.phone,
            "product_interest": record.product_interest,
            "preferred_date": record.preferred_date_iso(),
            "message": record.message(),
        });

        let rows: Vec<DemoBooking> = self
            .client
            .post(format!("{}/rest/v1/demo_bookings", self.url))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await
            .context("failed to call Supabase API")?
            .error_for_status()
            .context("Supabase API returned error")?
            .json()
            .await
            .context("failed to parse Supabase response")?;

        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Supabase returned no inserted row"))
    }
}
