// ── Runtime desk configuration ──
//
// Describes *how* to reach the record store and which fee policy to
// apply. Never touches disk: the CLI resolves a profile into a
// `DeskConfig` and hands it to `Desk::new`.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::fee::FeePolicy;

/// Configuration for one desk session.
#[derive(Debug)]
pub struct DeskConfig {
    /// Project root of the hosted store (e.g. `https://abc.example.co`).
    pub url: Url,
    /// Project API key, sent as `apikey` and bearer token.
    pub api_key: SecretString,
    /// Per-request timeout.
    pub timeout: Duration,
    pub fees: FeePolicy,
}

impl DeskConfig {
    pub fn new(url: Url, api_key: SecretString) -> Self {
        Self {
            url,
            api_key,
            timeout: Duration::from_secs(30),
            fees: FeePolicy::default(),
        }
    }
}
