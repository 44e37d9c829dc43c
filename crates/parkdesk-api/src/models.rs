// ── Wire records ──
//
// Rows exactly as the record store stores them. Status and vehicle-type
// columns stay as strings here; `parkdesk-core` validates them into
// domain enums.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error body returned by the store on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
    pub details: Option<String>,
    pub hint: Option<String>,
}

// ── tickets ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: Uuid,
    pub license_plate: String,
    pub vehicle_type: String,
    pub spot_id: String,
    pub created_at: DateTime<Utc>,
    pub hours: Decimal,
    pub price: Decimal,
    pub status: String,
    #[serde(default)]
    pub fine_amount: Option<Decimal>,
    #[serde(default)]
    pub is_pass_holder: bool,
    #[serde(default)]
    pub exit_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTicketRecord {
    pub license_plate: String,
    pub vehicle_type: String,
    pub spot_id: String,
    pub created_at: DateTime<Utc>,
    pub hours: Decimal,
    pub price: Decimal,
    pub status: String,
    pub is_pass_holder: bool,
}

/// Columns written when a ticket is marked paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketPaymentPatch {
    pub status: String,
    pub fine_amount: Decimal,
    pub exit_time: DateTime<Utc>,
}

// ── monthly_passes ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassRecord {
    pub id: Uuid,
    pub customer_name: String,
    pub vehicle_number: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPassRecord {
    pub customer_name: String,
    pub vehicle_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: String,
}

/// Editable pass columns. Dates are immutable once a pass exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl PassPatch {
    pub fn is_empty(&self) -> bool {
        self.customer_name.is_none() && self.vehicle_number.is_none() && self.phone.is_none()
    }
}

// ── rates ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub vehicle_type: String,
    pub hourly_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateUpsert {
    pub vehicle_type: String,
    pub hourly_rate: Decimal,
}

// ── parking_slots ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub id: Uuid,
    pub slot_number: String,
    #[serde(default)]
    pub is_occupied: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SlotPatch {
    pub is_occupied: bool,
}
