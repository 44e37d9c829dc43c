//! Shared helpers for command handlers.

use std::io::IsTerminal;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal on stdin there is nobody to ask, so the action is
/// refused unless `--yes` was given.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Parse a record ID argument.
pub fn parse_id(raw: &str, resource: &str) -> Result<Uuid, CliError> {
    raw.trim().parse().map_err(|_| CliError::Validation {
        field: format!("{resource} id"),
        reason: format!("'{raw}' is not a UUID"),
    })
}

/// Parse a strict, non-negative money amount such as an hourly rate.
pub fn parse_amount(raw: &str, field: &str) -> Result<Decimal, CliError> {
    let amount: Decimal = raw.trim().parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("'{raw}' is not a number"),
    })?;
    if amount < Decimal::ZERO {
        return Err(CliError::Validation {
            field: field.into(),
            reason: "cannot be negative".into(),
        });
    }
    Ok(amount)
}

/// Parse a `YYYY-MM-DD` date as midnight UTC.
pub fn parse_date(raw: &str, field: &str) -> Result<DateTime<Utc>, CliError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
        .map_err(|_| CliError::Validation {
            field: field.into(),
            reason: format!("expected YYYY-MM-DD, got '{raw}'"),
        })
}

/// Short form of a timestamp for tables.
pub fn short_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Informational message on stderr, suppressed by `--quiet`.
pub fn note(quiet: bool, message: &str) {
    if !quiet {
        eprintln!("{message}");
    }
}
