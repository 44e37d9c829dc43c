// Monthly pass endpoints

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use super::MONTHLY_PASSES;
use super::tickets::first_row;
use crate::client::RestClient;
use crate::error::Error;
use crate::models::{NewPassRecord, PassPatch, PassRecord};
use crate::query::Query;

impl RestClient {
    /// List all passes, soonest expiry first.
    pub async fn list_passes(&self) -> Result<Vec<PassRecord>, Error> {
        let query = Query::new().order("end_date", false);
        debug!("listing passes");
        self.select(MONTHLY_PASSES, &query).await
    }

    /// Find a pass that exempts `vehicle_number` at `now`.
    ///
    /// `GET /rest/v1/monthly_passes?vehicle_number=eq.{v}&status=eq.Active&end_date=gte.{now}&limit=1`
    ///
    /// `vehicle_number` must already be normalized by the caller.
    pub async fn find_active_pass(
        &self,
        vehicle_number: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PassRecord>, Error> {
        let query = Query::new()
            .eq("vehicle_number", vehicle_number)
            .eq("status", "Active")
            .gte_time("end_date", now)
            .limit(1);
        debug!(vehicle_number, "looking up active pass");
        let mut rows: Vec<PassRecord> = self.select(MONTHLY_PASSES, &query).await?;
        Ok(rows.pop())
    }

    pub async fn insert_pass(&self, pass: &NewPassRecord) -> Result<PassRecord, Error> {
        debug!(vehicle_number = %pass.vehicle_number, "inserting pass");
        let rows: Vec<PassRecord> = self.insert(MONTHLY_PASSES, pass).await?;
        first_row(rows, MONTHLY_PASSES)
    }

    /// Update the editable columns of a pass. `None` if no pass matched.
    pub async fn update_pass(
        &self,
        id: Uuid,
        patch: &PassPatch,
    ) -> Result<Option<PassRecord>, Error> {
        let query = Query::new().eq("id", id);
        debug!(%id, "updating pass");
        let mut rows: Vec<PassRecord> = self.update(MONTHLY_PASSES, &query, patch).await?;
        Ok(rows.pop())
    }

    /// Revoke (delete) a pass.
    pub async fn delete_pass(&self, id: Uuid) -> Result<Option<PassRecord>, Error> {
        let query = Query::new().eq("id", id);
        debug!(%id, "deleting pass");
        let mut rows: Vec<PassRecord> = self.delete(MONTHLY_PASSES, &query).await?;
        Ok(rows.pop())
    }
}
