//! Compile-time registry of provider configurations.
//!
//! Each data provider is defined in a TOML file under `providers/`.
//! The registry embeds these at compile time and exposes them via
//! [`all_providers`] and [`enabled_providers`].

use preplan_geo::ThresholdProfile;
use serde::Deserialize;

/// A provider configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderDefinition {
    /// Unique identifier (e.g., `"zillow"`, `"rentcast"`).
    pub id: String,
    /// Human-readable name, used as the provenance tag.
    pub name: String,
    /// Whether this provider participates in enrichment.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Execution order — lower values run first.
    pub priority: u32,
    /// Neighbor-category threshold profile this provider's classifier
    /// was calibrated against. One profile per classification pass.
    pub thresholds: ThresholdProfile,
    /// Provider-specific configuration.
    pub provider: ProviderConfig,
}

/// Provider-specific configuration, tagged by `type` in TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Zillow property data API.
    Zillow {
        /// API base URL.
        base_url: String,
        /// Minimum delay between requests in milliseconds.
        rate_limit_ms: u64,
    },
    /// RentCast property data API.
    Rentcast {
        /// API base URL.
        base_url: String,
        /// Minimum delay between requests in milliseconds.
        rate_limit_ms: u64,
    },
}

const fn default_true() -> bool {
    true
}

impl ProviderDefinition {
    /// Returns the provider's base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        match &self.provider {
            ProviderConfig::Zillow { base_url, .. } | ProviderConfig::Rentcast { base_url, .. } => {
                base_url
            }
        }
    }

    /// Returns the minimum inter-request interval in milliseconds.
    #[must_use]
    pub const fn rate_limit_ms(&self) -> u64 {
        match &self.provider {
            ProviderConfig::Zillow { rate_limit_ms, .. }
            | ProviderConfig::Rentcast { rate_limit_ms, .. } => *rate_limit_ms,
        }
    }
}

// ── Compile-time embedded TOML files ────────────────────────────────

const PROVIDER_TOMLS: &[(&str, &str)] = &[
    ("zillow", include_str!("../providers/zillow.toml")),
    ("rentcast", include_str!("../providers/rentcast.toml")),
];

#[cfg(test)]
const EXPECTED_PROVIDER_COUNT: usize = 2;

/// Returns all provider configurations (enabled and disabled).
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time
/// guarantee since the configs are embedded).
#[must_use]
pub fn all_providers() -> Vec<ProviderDefinition> {
    PROVIDER_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse provider '{name}': {e}"))
        })
        .collect()
}

/// Returns only enabled providers, sorted by priority (ascending).
///
/// This is the fallback chain: the enrichment coordinator iterates it
/// in order until one provider succeeds.
#[must_use]
pub fn enabled_providers() -> Vec<ProviderDefinition> {
    let mut providers: Vec<ProviderDefinition> =
        all_providers().into_iter().filter(|p| p.enabled).collect();
    providers.sort_by_key(|p| p.priority);
    providers
}
