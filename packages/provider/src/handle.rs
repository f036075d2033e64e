//! Runtime provider handle: configuration plus pacing state.
//!
//! A [`ProviderHandle`] pairs a [`ProviderDefinition`] with its
//! [`RequestPacer`] and dispatches the three provider capabilities to
//! the concrete client module for the configured provider type. The
//! enrichment coordinator holds one handle per enabled provider and
//! iterates them in priority order.

use chrono::Datelike as _;
use preplan_geo::NeighborFilter;
use preplan_models::neighbor::NeighborCandidate;

use crate::registry::{ProviderConfig, ProviderDefinition};
use crate::rate_limit::RequestPacer;
use crate::{AddressCandidate, NeighborOptions, PropertyDetails, ProviderError, rentcast, zillow};

/// A configured provider with its pacing state.
pub struct ProviderHandle {
    definition: ProviderDefinition,
    pacer: RequestPacer,
}

impl ProviderHandle {
    /// Wraps a provider definition with a fresh pacer.
    #[must_use]
    pub fn new(definition: ProviderDefinition) -> Self {
        let pacer = RequestPacer::from_millis(definition.rate_limit_ms());
        Self { definition, pacer }
    }

    /// Builds handles for all enabled providers, in priority order.
    #[must_use]
    pub fn fallback_chain() -> Vec<Self> {
        crate::registry::enabled_providers()
            .into_iter()
            .map(Self::new)
            .collect()
    }

    /// The provider's configuration.
    #[must_use]
    pub const fn definition(&self) -> &ProviderDefinition {
        &self.definition
    }

    /// The provider's human-readable name (the provenance tag).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Searches for address suggestions matching a free-form query.
    ///
    /// Paces before the request per the provider's rate limit.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the HTTP request or response parsing
    /// fails, or [`ProviderError::RateLimited`] on HTTP 429.
    pub async fn suggest_addresses(
        &self,
        client: &reqwest::Client,
        query: &str,
    ) -> Result<Vec<AddressCandidate>, ProviderError> {
        self.pacer.pace().await;
        match &self.definition.provider {
            ProviderConfig::Zillow { base_url, .. } => {
                zillow::suggest_addresses(client, base_url, query).await
            }
            ProviderConfig::Rentcast { base_url, .. } => {
                rentcast::suggest_addresses(client, base_url, query).await
            }
        }
    }

    /// Fetches property details for a provider-stable ID.
    ///
    /// Paces before the request per the provider's rate limit.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the HTTP request or response parsing
    /// fails, or [`ProviderError::RateLimited`] on HTTP 429.
    pub async fn get_details(
        &self,
        client: &reqwest::Client,
        stable_id: &str,
    ) -> Result<Option<PropertyDetails>, ProviderError> {
        self.pacer.pace().await;
        let current_year = chrono::Utc::now().year();
        match &self.definition.provider {
            ProviderConfig::Zillow { base_url, .. } => {
                zillow::get_details(client, base_url, stable_id, current_year).await
            }
            ProviderConfig::Rentcast { base_url, .. } => {
                rentcast::get_details(client, base_url, stable_id, current_year).await
            }
        }
    }

    /// Finds and classifies neighbors of a validated target.
    ///
    /// Raw provider results are classified against this provider's
    /// threshold profile, filtered to the caller's radius, optionally
    /// stripped of across-the-street neighbors, sorted by ascending
    /// distance, and truncated to `max_results`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the HTTP request or response parsing
    /// fails, or [`ProviderError::RateLimited`] on HTTP 429.
    pub async fn find_neighbors(
        &self,
        client: &reqwest::Client,
        target_address: &str,
        target_lat: f64,
        target_lon: f64,
        options: &NeighborOptions,
    ) -> Result<Vec<NeighborCandidate>, ProviderError> {
        self.pacer.pace().await;
        let current_year = chrono::Utc::now().year();

        let raw = match &self.definition.provider {
            ProviderConfig::Zillow { base_url, .. } => {
                zillow::find_neighbors(
                    client,
                    base_url,
                    target_lat,
                    target_lon,
                    options.radius_m,
                    current_year,
                )
                .await?
            }
            ProviderConfig::Rentcast { base_url, .. } => {
                rentcast::find_neighbors(
                    client,
                    base_url,
                    target_lat,
                    target_lon,
                    options.radius_m,
                    current_year,
                )
                .await?
            }
        };

        let classified: Vec<NeighborCandidate> = raw
            .into_iter()
            // The target itself often comes back in its own neighbor search.
            .filter(|neighbor| neighbor.address != target_address)
            .map(|neighbor| {
                let classification = preplan_geo::classify(
                    target_lat,
                    target_lon,
                    neighbor.latitude,
                    neighbor.longitude,
                    target_address,
                    &neighbor.address,
                    self.definition.thresholds,
                );
                NeighborCandidate {
                    address: neighbor.address,
                    latitude: neighbor.latitude,
                    longitude: neighbor.longitude,
                    market_price: neighbor.market_price,
                    zestimate: neighbor.zestimate,
                    living_area: neighbor.living_area,
                    year_built: neighbor.year_built,
                    distance_m: classification.distance_m,
                    direction: classification.direction,
                    category: classification.category,
                }
            })
            .collect();

        Ok(preplan_geo::filter_neighbors(
            classified,
            &NeighborFilter {
                radius_m: options.radius_m,
                include_across: options.include_across,
                max_results: options.max_results,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn fallback_chain_matches_registry_order() {
        let chain = ProviderHandle::fallback_chain();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].definition().id, "zillow");
        assert_eq!(chain[1].definition().id, "rentcast");
    }

    #[test]
    fn pacer_interval_comes_from_config() {
        let chain = ProviderHandle::fallback_chain();
        assert_eq!(chain[0].pacer.min_interval(), Duration::from_millis(2_000));
        assert_eq!(chain[1].pacer.min_interval(), Duration::from_millis(3_000));
    }
}
