// ── Core error types ──
//
// User-facing errors from parkdesk-core. Consumers never see raw HTTP
// statuses or JSON decode failures: `From<parkdesk_api::Error>` folds
// transport-layer errors into these variants.

use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach record store at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Record store timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Lifecycle conflicts ──────────────────────────────────────────
    #[error("Slot {slot} is occupied or does not exist")]
    SlotOccupied { slot: String },

    #[error("Ticket {id} is no longer active")]
    AlreadyPaid { id: Uuid },

    #[error("Checkout quote for ticket {id} is older than {ttl_secs}s; quote again")]
    StaleQuote { id: Uuid, ttl_secs: u64 },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// Store-specific error code (e.g. `23505` for a unique violation).
        code: Option<String>,
        status: Option<u16>,
    },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn not_found(entity_type: &str, identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_owned(),
            identifier: identifier.to_string(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<parkdesk_api::Error> for CoreError {
    fn from(err: parkdesk_api::Error) -> Self {
        match err {
            parkdesk_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            parkdesk_api::Error::PermissionDenied { message } => {
                CoreError::PermissionDenied { message }
            }
            parkdesk_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            parkdesk_api::Error::Api {
                status,
                code,
                message,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            parkdesk_api::Error::Deserialization { message, .. } => {
                CoreError::Internal(format!("unexpected record shape: {message}"))
            }
            parkdesk_api::Error::InvalidUrl(e) => CoreError::ValidationFailed {
                message: format!("invalid backend URL: {e}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_keep_status_and_code() {
        let err = CoreError::from(parkdesk_api::Error::Api {
            status: 409,
            code: Some("23505".into()),
            message: "duplicate key".into(),
        });
        assert!(matches!(
            err,
            CoreError::Api { status: Some(409), ref code, .. } if code.as_deref() == Some("23505")
        ));
    }

    #[test]
    fn auth_errors_map_to_authentication_failed() {
        let err = CoreError::from(parkdesk_api::Error::Authentication {
            message: "Invalid API key".into(),
        });
        assert_eq!(err.to_string(), "Authentication failed: Invalid API key");
    }
}
