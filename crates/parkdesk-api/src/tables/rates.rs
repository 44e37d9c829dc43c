// Rate endpoints
//
// Rates are keyed by `vehicle_type`; writes upsert on that column.

use tracing::debug;

use super::RATES;
use super::tickets::first_row;
use crate::client::RestClient;
use crate::error::Error;
use crate::models::{RateRecord, RateUpsert};
use crate::query::Query;

impl RestClient {
    pub async fn list_rates(&self) -> Result<Vec<RateRecord>, Error> {
        let query = Query::new().order("vehicle_type", false);
        debug!("listing rates");
        self.select(RATES, &query).await
    }

    /// Create or replace the hourly rate for a vehicle type.
    ///
    /// `POST /rest/v1/rates?on_conflict=vehicle_type`
    pub async fn upsert_rate(&self, rate: &RateUpsert) -> Result<RateRecord, Error> {
        debug!(vehicle_type = %rate.vehicle_type, hourly_rate = %rate.hourly_rate, "upserting rate");
        let rows: Vec<RateRecord> = self.upsert(RATES, "vehicle_type", rate).await?;
        first_row(rows, RATES)
    }

    pub async fn delete_rate(&self, vehicle_type: &str) -> Result<Option<RateRecord>, Error> {
        let query = Query::new().eq("vehicle_type", vehicle_type);
        debug!(vehicle_type, "deleting rate");
        let mut rows: Vec<RateRecord> = self.delete(RATES, &query).await?;
        Ok(rows.pop())
    }
}
