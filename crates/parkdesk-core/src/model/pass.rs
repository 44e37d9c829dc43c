// ── Monthly pass domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use super::plate::LicensePlate;

/// Pass status. Only `Active` and `Expired` are ever stored;
/// `ExpiringSoon` is produced by on-read derivation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum PassStatus {
    Active,
    Expired,
    #[serde(rename = "Expiring Soon")]
    #[strum(serialize = "Expiring Soon")]
    ExpiringSoon,
}

/// Subscription exempting one vehicle from per-visit base fees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPass {
    pub id: Uuid,
    pub customer_name: String,
    /// Exemption lookup key, normalized like ticket plates.
    pub vehicle_number: LicensePlate,
    pub phone: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: PassStatus,
}

/// Length of a new pass. Fixed when the pass is sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PassDuration {
    OneMonth,
    ThreeMonths,
    SixMonths,
    TwelveMonths,
}

impl PassDuration {
    pub const ALL: [Self; 4] = [
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::TwelveMonths,
    ];

    pub fn months(self) -> u32 {
        match self {
            Self::OneMonth => 1,
            Self::ThreeMonths => 3,
            Self::SixMonths => 6,
            Self::TwelveMonths => 12,
        }
    }
}

impl TryFrom<u32> for PassDuration {
    type Error = String;

    fn try_from(months: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|d| d.months() == months)
            .ok_or_else(|| format!("pass duration must be 1, 3, 6 or 12 months, got {months}"))
    }
}

impl From<PassDuration> for u32 {
    fn from(d: PassDuration) -> Self {
        d.months()
    }
}
