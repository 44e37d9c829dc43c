// ── Vehicle type ──

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vehicle category used to key hourly rates.
///
/// The built-in categories parse case-insensitively; anything else an
/// administrator configures is carried verbatim (trimmed) in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VehicleType {
    Car,
    Bike,
    Truck,
    Other(String),
}

impl VehicleType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Car => "Car",
            Self::Bike => "Bike",
            Self::Truck => "Truck",
            Self::Other(s) => s,
        }
    }

    /// Whether a free-form type string selects this category.
    ///
    /// An empty selection never matches, so it always falls back to the
    /// default rate.
    pub fn matches(&self, raw: &str) -> bool {
        let raw = raw.trim();
        !raw.is_empty() && self.as_str().eq_ignore_ascii_case(raw)
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "car" => Self::Car,
            "bike" => Self::Bike,
            "truck" => Self::Truck,
            _ => Self::Other(trimmed.to_owned()),
        })
    }
}

impl From<String> for VehicleType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(v) => v,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for VehicleType {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<VehicleType> for String {
    fn from(v: VehicleType) -> Self {
        match v {
            VehicleType::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_parse_case_insensitively() {
        assert_eq!(VehicleType::from("  car "), VehicleType::Car);
        assert_eq!(VehicleType::from("TRUCK"), VehicleType::Truck);
    }

    #[test]
    fn unknown_types_are_kept() {
        assert_eq!(VehicleType::from("Van"), VehicleType::Other("Van".into()));
        assert_eq!(VehicleType::from("Van").to_string(), "Van");
    }

    #[test]
    fn matches_ignores_case_but_not_empty() {
        assert!(VehicleType::Bike.matches("bike"));
        assert!(VehicleType::Other("E-Rickshaw".into()).matches("e-rickshaw"));
        assert!(!VehicleType::Other(String::new()).matches(""));
        assert!(!VehicleType::Car.matches("   "));
    }
}
