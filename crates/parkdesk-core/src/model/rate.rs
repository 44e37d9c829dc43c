// ── Rate domain type ──

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::vehicle::VehicleType;

/// Hourly price for one vehicle type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    pub vehicle_type: VehicleType,
    pub hourly_rate: Decimal,
}
