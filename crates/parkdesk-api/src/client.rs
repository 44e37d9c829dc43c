// Record-store HTTP client
//
// Wraps `reqwest::Client` with table URL construction, auth headers and
// error-body mapping. Table endpoints live in `crate::tables::*` as
// inherent methods so this module stays focused on transport mechanics.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::StoreErrorBody;
use crate::query::Query;
use crate::transport::TransportConfig;

/// Path prefix of the REST surface on the hosted store.
const REST_PREFIX: &str = "rest/v1";

/// Raw HTTP client for the hosted record store.
///
/// Every request carries the project key twice: as the `apikey` header
/// (gateway routing) and as a bearer token (row-level policy evaluation).
/// All methods return decoded row arrays.
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
}

impl RestClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the project root (e.g. `https://abc.example.co`);
    /// the `/rest/v1` prefix is appended per request.
    pub fn new(
        base_url: Url,
        api_key: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, api_key))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, api_key: SecretString) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// The store base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/rest/v1/{table}`
    pub(crate) fn table_url(&self, table: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{REST_PREFIX}/{table}"))?)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let key = self.api_key.expose_secret();
        builder.header("apikey", key).bearer_auth(key)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// `GET` rows matching `query`.
    pub(crate) async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
    ) -> Result<Vec<T>, Error> {
        let url = self.table_url(table)?;
        debug!(table, ?query, "GET {}", url);

        let resp = self
            .authorize(self.http.get(url).query(query.pairs()))
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_rows(resp).await
    }

    /// `POST` a new row and return the stored representation.
    pub(crate) async fn insert<T: DeserializeOwned>(
        &self,
        table: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<Vec<T>, Error> {
        let url = self.table_url(table)?;
        debug!(table, "POST {}", url);

        let resp = self
            .authorize(self.http.post(url).json(body))
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_rows(resp).await
    }

    /// `POST` with merge-on-conflict semantics.
    pub(crate) async fn upsert<T: DeserializeOwned>(
        &self,
        table: &str,
        conflict_column: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<Vec<T>, Error> {
        let url = self.table_url(table)?;
        let query = Query::new().on_conflict(conflict_column);
        debug!(table, conflict_column, "POST (upsert) {}", url);

        let resp = self
            .authorize(self.http.post(url).query(query.pairs()).json(body))
            .header("Prefer", "return=representation,resolution=merge-duplicates")
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_rows(resp).await
    }

    /// `PATCH` rows matching `query`; returns the rows actually changed.
    ///
    /// An empty result means the filter matched nothing, which callers use
    /// as the failure signal of a conditional (check-and-set) update.
    pub(crate) async fn update<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
        body: &(impl Serialize + Sync),
    ) -> Result<Vec<T>, Error> {
        let url = self.table_url(table)?;
        debug!(table, ?query, "PATCH {}", url);

        let resp = self
            .authorize(self.http.patch(url).query(query.pairs()).json(body))
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_rows(resp).await
    }

    /// `DELETE` rows matching `query`; returns the rows removed.
    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
    ) -> Result<Vec<T>, Error> {
        let url = self.table_url(table)?;
        debug!(table, ?query, "DELETE {}", url);

        let resp = self
            .authorize(self.http.delete(url).query(query.pairs()))
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_rows(resp).await
    }
}

/// Decode a row array, mapping error statuses onto [`Error`] variants.
async fn parse_rows<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Vec<T>, Error> {
    let status = resp.status();
    let body = resp.text().await.map_err(Error::Transport)?;

    if !status.is_success() {
        let parsed: StoreErrorBody = serde_json::from_str(&body).unwrap_or_default();
        let message = parsed
            .message
            .unwrap_or_else(|| preview(&body).to_owned());

        return Err(match status {
            reqwest::StatusCode::UNAUTHORIZED => Error::Authentication { message },
            reqwest::StatusCode::FORBIDDEN => Error::PermissionDenied { message },
            _ => Error::Api {
                status: status.as_u16(),
                code: parsed.code,
                message,
            },
        });
    }

    // `return=minimal` responses and 204s carry no body.
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body: body.clone(),
    })
}

fn preview(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map_or(body.len(), |(idx, _)| idx);
    &body[..end]
}
