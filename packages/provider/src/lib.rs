#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Typed clients for external real-estate data providers.
//!
//! Each provider is configured via a TOML file in `providers/` and
//! exposed through the [`registry`]:
//!
//! 1. **Zillow** (priority 1) — address autocomplete, property details
//!    with value estimate, nearby-homes search. 2 s between requests.
//! 2. **RentCast** (priority 2) — address search, property records with
//!    sale history, radius listing search. 3 s between requests.
//!
//! All providers normalize their heterogeneous response shapes into the
//! common [`AddressCandidate`] / [`PropertyDetails`] shapes here, and
//! every request is paced through a per-provider [`rate_limit::RequestPacer`]
//! so the upstream rate limits are respected without caller bookkeeping.

pub mod cancel;
pub mod handle;
pub mod progress;
pub mod rate_limit;
pub mod registry;
pub mod rentcast;
pub mod zillow;

use thiserror::Error;

/// Earliest plausible construction year accepted from a provider.
pub const MIN_PLAUSIBLE_YEAR_BUILT: i32 = 1800;

/// An address suggestion returned by a provider's search endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressCandidate {
    /// The provider's canonical form of the address.
    pub address: String,
    /// Provider-stable identifier for detail lookups.
    pub stable_id: String,
    /// Latitude (WGS84), if the provider returned one.
    pub latitude: Option<f64>,
    /// Longitude (WGS84), if the provider returned one.
    pub longitude: Option<f64>,
}

/// Property details for a validated address.
///
/// Every field is optional — providers return partial data and the
/// enrichment coordinator merges field-by-field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyDetails {
    /// Year the structure was built, already plausibility-filtered.
    pub year_built: Option<i32>,
    /// Finished square footage.
    pub square_footage: Option<u32>,
    /// Recorded market/sale price.
    pub market_price: Option<i64>,
    /// Automated value estimate.
    pub estimated_value: Option<i64>,
    /// Bedroom count.
    pub bedrooms: Option<u32>,
    /// Bathroom count.
    pub bathrooms: Option<u32>,
}

/// A raw neighboring property before geospatial classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNeighbor {
    /// Street address of the neighbor.
    pub address: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Recorded market/sale price, if any.
    pub market_price: Option<i64>,
    /// Automated value estimate, if any.
    pub zestimate: Option<i64>,
    /// Finished living area in square feet, if any.
    pub living_area: Option<u32>,
    /// Year built, already plausibility-filtered.
    pub year_built: Option<i32>,
}

/// Options for a neighbor search.
#[derive(Debug, Clone, Copy)]
pub struct NeighborOptions {
    /// Maximum distance in meters from the target.
    pub radius_m: f64,
    /// Maximum number of neighbors to return.
    pub max_results: usize,
    /// Whether across-the-street neighbors are kept.
    pub include_across: bool,
}

/// Errors from provider operations.
///
/// `RateLimited` is distinct from the other variants: the coordinator
/// treats it as "retry this record later" while `Http`/`Parse` trigger
/// fallback to the next provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded (HTTP 429-equivalent).
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// Filters an implausible `year_built` value instead of propagating bad
/// data: years after `current_year` or before
/// [`MIN_PLAUSIBLE_YEAR_BUILT`] become `None`.
#[must_use]
pub fn plausible_year_built(year: i64, current_year: i32) -> Option<i32> {
    let year = i32::try_from(year).ok()?;
    if (MIN_PLAUSIBLE_YEAR_BUILT..=current_year).contains(&year) {
        Some(year)
    } else {
        None
    }
}

/// Extracts an integer currency amount from a JSON value that may be a
/// number or a numeric string.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn json_currency(value: &serde_json::Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.round() as i64))
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<i64>().ok()))
}

/// Extracts a non-negative integer (square footage, bedrooms, ...) from
/// a JSON value that may be a number or a numeric string.
#[must_use]
pub(crate) fn json_u32(value: &serde_json::Value) -> Option<u32> {
    json_currency(value).and_then(|n| u32::try_from(n).ok())
}
