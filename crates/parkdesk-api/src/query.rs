// ── Query builder ──
//
// Encodes PostgREST-style filters (`column=op.value`) plus `order`,
// `limit` and `on_conflict` into plain query pairs.

use std::fmt::Display;

use chrono::{DateTime, SecondsFormat, Utc};

/// Ordered list of query pairs for a table request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// `column = value`
    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.push(column, format!("eq.{value}"))
    }

    /// `column >= value`
    pub fn gte(self, column: &str, value: impl Display) -> Self {
        self.push(column, format!("gte.{value}"))
    }

    /// `column >= timestamp`, rendered as RFC 3339 with a `Z` suffix.
    pub fn gte_time(self, column: &str, at: DateTime<Utc>) -> Self {
        self.gte(column, at.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn order(self, column: &str, descending: bool) -> Self {
        let direction = if descending { "desc" } else { "asc" };
        self.push("order", format!("{column}.{direction}"))
    }

    pub fn limit(self, limit: u32) -> Self {
        self.push("limit", limit.to_string())
    }

    /// Conflict target for upserts.
    pub fn on_conflict(self, column: &str) -> Self {
        self.push("on_conflict", column.to_owned())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    fn push(mut self, key: &str, value: String) -> Self {
        self.pairs.push((key.to_owned(), value));
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_owned(), v.to_owned())
    }

    #[test]
    fn filters_keep_insertion_order() {
        let q = Query::new()
            .eq("status", "Active")
            .eq("vehicle_number", "KA01AB1234")
            .limit(1);
        assert_eq!(
            q.pairs(),
            &[
                pair("status", "eq.Active"),
                pair("vehicle_number", "eq.KA01AB1234"),
                pair("limit", "1"),
            ]
        );
    }

    #[test]
    fn gte_time_uses_zulu_suffix() {
        let at = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        let q = Query::new().gte_time("end_date", at);
        assert_eq!(q.pairs(), &[pair("end_date", "gte.2024-06-15T10:30:00Z")]);
    }

    #[test]
    fn order_direction() {
        let q = Query::new().order("created_at", true).order("slot_number", false);
        assert_eq!(
            q.pairs(),
            &[
                pair("order", "created_at.desc"),
                pair("order", "slot_number.asc"),
            ]
        );
    }
}
