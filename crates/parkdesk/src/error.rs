//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;
use uuid::Uuid;

use parkdesk_config::ConfigError;
use parkdesk_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the record store at {url}")]
    #[diagnostic(
        code(parkdesk::connection_failed),
        help(
            "Check the backend URL and your network connection.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(parkdesk::auth_failed),
        help(
            "Verify the project API key for this profile.\n\
             Re-run: parkdesk config init"
        )
    )]
    AuthFailed { message: String },

    #[error("Permission denied: {message}")]
    #[diagnostic(
        code(parkdesk::permission_denied),
        help("The API key is valid but the store's row policies reject this action.")
    )]
    PermissionDenied { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(parkdesk::no_credentials),
        help(
            "Configure credentials with: parkdesk config init\n\
             Or set the PARKDESK_API_KEY environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(parkdesk::not_found),
        help("Run: parkdesk {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Lifecycle conflicts ──────────────────────────────────────────

    #[error("Slot '{slot}' is occupied or does not exist")]
    #[diagnostic(
        code(parkdesk::slot_occupied),
        help("Run: parkdesk slots list --free")
    )]
    SlotOccupied { slot: String },

    #[error("Ticket {id} has already been paid")]
    #[diagnostic(code(parkdesk::already_paid))]
    AlreadyPaid { id: Uuid },

    #[error("The checkout quote for ticket {id} expired after {ttl_secs}s")]
    #[diagnostic(
        code(parkdesk::stale_quote),
        help("Run the checkout again to get a fresh amount: parkdesk tickets checkout {id}")
    )]
    StaleQuote { id: Uuid, ttl_secs: u64 },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error ({code}): {message}")]
    #[diagnostic(code(parkdesk::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(parkdesk::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(parkdesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: parkdesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No record store configured")]
    #[diagnostic(
        code(parkdesk::no_config),
        help(
            "Create a profile with: parkdesk config init\n\
             Or pass --backend and --api-key.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(parkdesk::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(parkdesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(parkdesk::timeout),
        help("Increase the timeout with --timeout or check the store's status.")
    )]
    Timeout { seconds: u64 },

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::SlotOccupied { .. } | Self::AlreadyPaid { .. } | Self::StaleQuote { .. } => {
                exit_code::CONFLICT
            }
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::ApiError { .. } | Self::NoConfig { .. } | Self::Config { .. } | Self::Io(_) => {
                exit_code::GENERAL
            }
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::PermissionDenied { message } => CliError::PermissionDenied { message },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: format!("{} list", entity_type.to_lowercase() + "s"),
                resource_type: entity_type,
                identifier,
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::SlotOccupied { slot } => CliError::SlotOccupied { slot },

            CoreError::AlreadyPaid { id } => CliError::AlreadyPaid { id },

            CoreError::StaleQuote { id, ttl_secs } => CliError::StaleQuote { id, ttl_secs },

            CoreError::Api { message, code, .. } => CliError::ApiError {
                code: code.unwrap_or_else(|| "unknown".into()),
                message,
            },

            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Io(e) => CliError::Io(e),
            other @ (ConfigError::Serialization(_) | ConfigError::Figment(_)) => {
                CliError::Config {
                    message: other.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_share_exit_code() {
        let slot = CliError::from(CoreError::SlotOccupied { slot: "A-12".into() });
        let paid = CliError::from(CoreError::AlreadyPaid { id: Uuid::nil() });
        assert_eq!(slot.exit_code(), exit_code::CONFLICT);
        assert_eq!(paid.exit_code(), exit_code::CONFLICT);
    }

    #[test]
    fn not_found_points_at_list_command() {
        let err = CliError::from(CoreError::NotFound {
            entity_type: "Pass".into(),
            identifier: "abc".into(),
        });
        assert!(matches!(
            err,
            CliError::NotFound { ref list_command, .. } if list_command == "passes list"
        ));
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn missing_credentials_is_auth_failure() {
        let err = CliError::from(ConfigError::NoCredentials {
            profile: "default".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
