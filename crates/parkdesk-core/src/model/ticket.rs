// ── Ticket domain types ──

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use super::plate::LicensePlate;
use super::vehicle::VehicleType;

/// Stored ticket status. The only transition is Active → Paid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum TicketStatus {
    Active,
    Paid,
}

/// Status shown to officers, derived on read and never written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
pub enum TicketDisplayStatus {
    Active,
    /// Still Active, but parked longer than the purchased hours.
    Overdue,
    Paid,
}

/// One vehicle's parking session, from entry to payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub license_plate: LicensePlate,
    pub vehicle_type: VehicleType,
    /// Slot number of the occupied parking space.
    pub spot_id: String,
    /// Entry time.
    pub created_at: DateTime<Utc>,
    /// Purchased duration.
    pub hours: Decimal,
    /// Base fee; zero for pass holders.
    pub price: Decimal,
    pub status: TicketStatus,
    /// Overstay fine, set only when the ticket is paid.
    pub fine_amount: Decimal,
    pub is_pass_holder: bool,
    pub exit_time: Option<DateTime<Utc>>,
}

impl Ticket {
    pub fn is_active(&self) -> bool {
        self.status == TicketStatus::Active
    }

    /// Amount collected for a paid ticket.
    pub fn total_charged(&self) -> Decimal {
        self.price + self.fine_amount
    }
}
