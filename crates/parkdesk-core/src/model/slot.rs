// ── Parking slot domain type ──

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical space. `is_occupied` tracks the ticket lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingSlot {
    pub id: Uuid,
    pub slot_number: String,
    pub is_occupied: bool,
}
