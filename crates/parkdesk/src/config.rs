//! CLI configuration: a thin wrapper around `parkdesk_config` shared types.
//!
//! Adds the resolution step that respects `GlobalOpts` overrides
//! (--backend, --api-key, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use parkdesk_core::{DeskConfig, FeePolicy};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use parkdesk_config::{
    Config, Defaults, Profile, config_path, load_config, save_config, store_api_key,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Build a `DeskConfig` from the config file, the active profile and
/// CLI overrides.
pub fn build_desk_config(global: &GlobalOpts) -> Result<DeskConfig, CliError> {
    let cfg = load_config()?;
    resolve_desk_config(&cfg, global)
}

/// Resolution against an already loaded config.
///
/// Flags beat profile values, profile values beat `[defaults]`. Without a
/// matching profile the store can still be addressed with `--backend` and
/// `--api-key` alone.
pub fn resolve_desk_config(cfg: &Config, global: &GlobalOpts) -> Result<DeskConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, &cfg.defaults, global);
    }

    // An explicitly requested profile must exist
    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(cfg),
        });
    }

    let Some(raw_url) = global.backend.as_deref() else {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    };
    let url = parkdesk_config::parse_backend(raw_url)?;

    let api_key = global
        .api_key
        .clone()
        .map(SecretString::from)
        .ok_or(CliError::NoCredentials {
            profile: profile_name,
        })?;

    Ok(DeskConfig {
        url,
        api_key,
        timeout: Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout)),
        fees: FeePolicy::default(),
    })
}

/// Translate a `Profile` + global flags into a `DeskConfig`.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<DeskConfig, CliError> {
    // 1. Backend URL (flag > env > profile)
    let raw_url = global.backend.as_deref().unwrap_or(&profile.backend);
    let url = parkdesk_config::parse_backend(raw_url)?;

    // 2. API key (flag > profile credential chain)
    let api_key = match global.api_key {
        Some(ref key) => SecretString::from(key.clone()),
        None => parkdesk_config::resolve_api_key(profile, profile_name)?,
    };

    // 3. Timeout (flag > profile > defaults)
    let secs = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(defaults.timeout);

    Ok(DeskConfig {
        url,
        api_key,
        timeout: Duration::from_secs(secs),
        fees: profile.fees.clone().unwrap_or_default(),
    })
}
