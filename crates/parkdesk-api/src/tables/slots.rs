// Parking slot endpoints
//
// Occupancy changes are check-and-set updates: `claim_slot` only matches a
// free slot, so two officers racing for the same spot cannot both win.

use tracing::debug;

use super::PARKING_SLOTS;
use crate::client::RestClient;
use crate::error::Error;
use crate::models::{SlotPatch, SlotRecord};
use crate::query::Query;

impl RestClient {
    pub async fn list_slots(&self) -> Result<Vec<SlotRecord>, Error> {
        let query = Query::new().order("slot_number", false);
        debug!("listing slots");
        self.select(PARKING_SLOTS, &query).await
    }

    /// Mark a free slot occupied. `None` if the slot is unknown or taken.
    ///
    /// `PATCH /rest/v1/parking_slots?slot_number=eq.{n}&is_occupied=eq.false`
    pub async fn claim_slot(&self, slot_number: &str) -> Result<Option<SlotRecord>, Error> {
        let query = Query::new()
            .eq("slot_number", slot_number)
            .eq("is_occupied", false);
        debug!(slot_number, "claiming slot");
        let mut rows: Vec<SlotRecord> = self
            .update(PARKING_SLOTS, &query, &SlotPatch { is_occupied: true })
            .await?;
        Ok(rows.pop())
    }

    /// Mark a slot free. `None` if the slot is unknown.
    pub async fn release_slot(&self, slot_number: &str) -> Result<Option<SlotRecord>, Error> {
        let query = Query::new().eq("slot_number", slot_number);
        debug!(slot_number, "releasing slot");
        let mut rows: Vec<SlotRecord> = self
            .update(PARKING_SLOTS, &query, &SlotPatch { is_occupied: false })
            .await?;
        Ok(rows.pop())
    }
}
