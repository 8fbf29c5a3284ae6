//! Synchronous client for the **World Bank Indicators API (v2)**.
//!
//! Two endpoints are consumed: the country table (`country`) and the
//! per-country series endpoint (`country/{code}/indicator/{id}`). Both return
//! a two-element JSON envelope `[metadata, records]`.
//!
//! Every call is a single blocking round trip; there is no retry and no
//! pagination loop. The page sizes are fixed so one request covers the whole
//! country table (or a full single-country year range).
//!
//! Typical usage:
//! ```no_run
//! # use macroview::{Client, CountryResolver, Indicator, YearRange};
//! let client = Client::default();
//! let mut resolver = CountryResolver::new();
//! resolver.refresh(&client)?;
//! if let Some(country) = resolver.resolve("china") {
//!     let series = client.fetch_series(&country.id, Indicator::Gdp, YearRange::new(1990, 2022))?;
//!     println!("{} observations", series.len());
//! }
//! # Ok::<(), macroview::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::models::{CountryRecord, Entry, Indicator, Meta, Series, YearRange};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::time::Duration;

/// One page covers the full country table (the API lists just under 300 rows).
const COUNTRY_PAGE_SIZE: u32 = 300;
/// Page size for series requests; enough for any single-country year range.
const SERIES_PAGE_SIZE: u32 = 100;

// Allow -, _, . unescaped in code path segments (common in indicator ids)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc(part: &str) -> String {
    percent_encoding::utf8_percent_encode(part.trim(), SAFE).to_string()
}

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("macroview/", env!("CARGO_PKG_VERSION"))) // set user agent
            .build()
            .expect("reqwest client build");
        Self {
            base_url: "https://api.worldbank.org/v2".into(),
            http,
        }
    }
}

impl Client {
    /// GET a URL and parse the body as JSON.
    ///
    /// Transport failures and HTTP error statuses surface as [`Error::Network`];
    /// a body that is not JSON at all surfaces as [`Error::Protocol`].
    fn get_json(&self, url: &str) -> Result<Value> {
        let resp = self.http.get(url).send()?;
        let body = resp.error_for_status()?.text()?;
        serde_json::from_str(&body)
            .map_err(|e| Error::Protocol(format!("response is not valid JSON: {e}")))
    }

    /// Fetch the full country table in a single page.
    ///
    /// ### Errors
    /// - [`Error::Network`] on transport failure or HTTP error status
    /// - [`Error::Protocol`] if the body is not JSON, is an API error payload,
    ///   or lacks the two-element envelope
    pub fn list_countries(&self) -> Result<Vec<CountryRecord>> {
        let url = format!(
            "{}/country?format=json&per_page={}",
            self.base_url, COUNTRY_PAGE_SIZE
        );
        let v = self.get_json(&url)?;
        let arr = v
            .as_array()
            .ok_or_else(|| Error::Protocol("expected a top-level array".into()))?;
        // Error payloads put a "message" object in position 0.
        if let Some(msg) = arr.first().and_then(|m| m.get("message")) {
            return Err(Error::Protocol(format!("api error payload: {msg}")));
        }
        if arr.len() < 2 {
            return Err(Error::Protocol(
                "envelope is missing its records element".into(),
            ));
        }
        let _meta: Meta = serde_json::from_value(arr[0].clone())
            .map_err(|e| Error::Protocol(format!("bad envelope metadata: {e}")))?;
        serde_json::from_value(arr[1].clone())
            .map_err(|e| Error::Protocol(format!("bad country records: {e}")))
    }

    /// Fetch one indicator series for one country code over an inclusive
    /// year range, normalized to ascending years with nulls dropped.
    ///
    /// A body that is valid JSON but not the expected envelope (unknown
    /// country codes, API error payloads, missing records) yields an EMPTY
    /// series rather than an error, so callers can treat "no data" and
    /// "nothing to show" uniformly. Errors are reserved for transport
    /// failures and non-JSON bodies.
    pub fn fetch_series(
        &self,
        country_code: &str,
        indicator: Indicator,
        range: YearRange,
    ) -> Result<Series> {
        let url = format!(
            "{}/country/{}/indicator/{}?format=json&date={}&per_page={}",
            self.base_url,
            enc(country_code),
            indicator.code(),
            range.to_query_param(),
            SERIES_PAGE_SIZE
        );
        let v = self.get_json(&url)?;
        Ok(normalize_series_response(v))
    }
}

/// Fail-soft normalization of a series response body.
///
/// Anything that is not a `[metadata, records]` array with parseable records
/// becomes an empty [`Series`]; otherwise the records are filtered and sorted
/// by [`Series::from_entries`].
pub fn normalize_series_response(v: Value) -> Series {
    let Some(arr) = v.as_array() else {
        return Series::default();
    };
    if arr.len() < 2 {
        return Series::default();
    }
    match serde_json::from_value::<Vec<Entry>>(arr[1].clone()) {
        Ok(entries) => Series::from_entries(entries),
        Err(_) => Series::default(),
    }
}

/// Resolves free-text country names to the API's stable country codes.
///
/// The resolver owns the country table for the session; call [`refresh`] to
/// load or reload it. Matching is a case-insensitive substring test against
/// display names, and the FIRST match in the order the API returned wins
/// ("china" matches "China"; ambiguous inputs like "chi" resolve by upstream
/// ordering, not by any scoring).
///
/// [`refresh`]: CountryResolver::refresh
#[derive(Debug, Clone, Default)]
pub struct CountryResolver {
    records: Vec<CountryRecord>,
}

impl CountryResolver {
    /// An empty resolver; every lookup misses until [`CountryResolver::refresh`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a resolver over an already-fetched country table.
    pub fn from_records(records: Vec<CountryRecord>) -> Self {
        Self { records }
    }

    /// Load (or reload) the country table with a single request.
    pub fn refresh(&mut self, client: &Client) -> Result<()> {
        self.records = client.list_countries()?;
        Ok(())
    }

    /// The held country table, in API order. Empty before the first refresh.
    pub fn records(&self) -> &[CountryRecord] {
        &self.records
    }

    /// First record whose display name contains `name`, ignoring case, or
    /// `None` when nothing matches or the table is empty.
    pub fn resolve(&self, name: &str) -> Option<&CountryRecord> {
        let needle = name.to_lowercase();
        self.records
            .iter()
            .find(|r| r.name.to_lowercase().contains(&needle))
    }
}
