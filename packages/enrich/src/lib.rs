#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Multi-provider enrichment coordinator.
//!
//! Drives each building record through an explicit state machine:
//!
//! ```text
//! NeedsValidation -> Validated -> NeedsEnrichment -> Enriched | Failed
//! ```
//!
//! Providers are tried in priority order from the registry's fallback
//! chain. Merging fills only absent fields and tags provenance; a
//! secondary provider's data is accepted for critical fields only when
//! its candidate passes an address-token match against the input
//! address. All provider calls are sequential — pacing per provider is
//! the point, so concurrency would only multiply rate-limit rejections.

pub mod merge;

use std::sync::Arc;

use preplan_models::{DataSource, PropertyRecord};
use preplan_provider::cancel::CancelToken;
use preplan_provider::handle::ProviderHandle;
use preplan_provider::progress::{ProgressCallback, null_progress};
use preplan_provider::{AddressCandidate, NeighborOptions, ProviderError};

/// Enrichment progress of a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentState {
    /// The address has not been resolved against any provider yet.
    NeedsValidation,
    /// A provider produced a canonical address candidate.
    Validated,
    /// Details are being pulled and merged.
    NeedsEnrichment,
    /// All available data has been merged.
    Enriched,
    /// No provider could resolve the address.
    Failed(String),
}

/// Caller-supplied context for a batch enrichment run.
pub struct EnrichContext {
    /// When set, each enriched record's neighbors are fetched,
    /// classified, and appended to the batch as new records.
    pub neighbors: Option<NeighborOptions>,
    /// Fired before and after each network suspension point.
    pub progress: Arc<dyn ProgressCallback>,
    /// Checked at each suspension point; a cancelled batch returns the
    /// work completed so far.
    pub cancel: CancelToken,
}

impl Default for EnrichContext {
    fn default() -> Self {
        Self {
            neighbors: None,
            progress: null_progress(),
            cancel: CancelToken::new(),
        }
    }
}

/// Result of a batch enrichment run.
#[derive(Debug)]
pub struct EnrichmentReport {
    /// All records, deduplicated by address (first occurrence wins).
    pub records: Vec<PropertyRecord>,
    /// Addresses that hit a provider rate limit mid-enrichment. Their
    /// records are kept (possibly partially enriched); the caller should
    /// retry them later rather than drop them.
    pub retry_later: Vec<String>,
}

/// Outcome of driving one record through the state machine.
enum RecordOutcome {
    /// Terminal state reached (`Enriched` or `Failed`). The second field
    /// is the provider index to use for this record's neighbor search,
    /// when one applies.
    Done(PropertyRecord, Option<usize>),
    /// A provider rate limit interrupted enrichment.
    RetryLater(PropertyRecord),
    /// The cancel token fired before a suspension point.
    Cancelled(PropertyRecord),
}

/// Orchestrates provider clients in priority order for a batch.
pub struct EnrichmentCoordinator {
    client: reqwest::Client,
    providers: Vec<ProviderHandle>,
}

impl EnrichmentCoordinator {
    /// Creates a coordinator over an explicit provider chain.
    #[must_use]
    pub fn new(client: reqwest::Client, providers: Vec<ProviderHandle>) -> Self {
        Self { client, providers }
    }

    /// Creates a coordinator over all enabled registry providers.
    #[must_use]
    pub fn with_default_providers() -> Self {
        Self::new(reqwest::Client::new(), ProviderHandle::fallback_chain())
    }

    /// Enriches a batch of records sequentially.
    ///
    /// Failure of any single record never fails the batch: the worst
    /// outcome for a record is "kept with missing/flagged fields."
    pub async fn enrich_batch(
        &self,
        records: Vec<PropertyRecord>,
        ctx: &EnrichContext,
    ) -> EnrichmentReport {
        ctx.progress.set_total(records.len() as u64);

        let mut out: Vec<PropertyRecord> = Vec::with_capacity(records.len());
        let mut neighbor_records: Vec<PropertyRecord> = Vec::new();
        let mut retry_later: Vec<String> = Vec::new();

        let mut pending = records.into_iter();
        for record in pending.by_ref() {
            if ctx.cancel.is_cancelled() {
                log::info!("Enrichment cancelled; returning completed work");
                out.push(record);
                break;
            }

            let address = record.address.clone();
            ctx.progress.set_message(format!("Enriching {address}"));

            match self.enrich_record(record, ctx).await {
                RecordOutcome::Done(record, neighbor_provider) => {
                    if let Some(options) = ctx.neighbors
                        && let Some(provider_idx) = neighbor_provider
                    {
                        match self
                            .expand_neighbors(&record, provider_idx, options, ctx)
                            .await
                        {
                            Ok(mut found) => neighbor_records.append(&mut found),
                            Err(ProviderError::RateLimited) => retry_later.push(address),
                            Err(e) => {
                                log::warn!("Neighbor search failed for '{address}': {e}");
                            }
                        }
                    }
                    out.push(record);
                }
                RecordOutcome::RetryLater(record) => {
                    retry_later.push(address);
                    out.push(record);
                }
                RecordOutcome::Cancelled(record) => {
                    out.push(record);
                    break;
                }
            }
            ctx.progress.inc(1);
        }

        // Remainder of a cancelled batch, untouched.
        out.extend(pending);
        out.extend(neighbor_records);

        let records = merge::dedup_records(out);
        ctx.progress.finish(format!("Enriched {} records", records.len()));

        EnrichmentReport {
            records,
            retry_later,
        }
    }

    /// Drives one record from `NeedsValidation` to a terminal state.
    #[allow(clippy::too_many_lines)]
    async fn enrich_record(&self, mut record: PropertyRecord, ctx: &EnrichContext) -> RecordOutcome {
        let mut state = EnrichmentState::NeedsValidation;
        let mut candidate: Option<AddressCandidate> = None;
        let mut validated_by: Option<usize> = None;

        loop {
            match state {
                EnrichmentState::NeedsValidation => {
                    if is_fully_populated(&record) {
                        log::debug!(
                            "'{}' already fully populated; skipping provider lookups",
                            record.address
                        );
                        state = EnrichmentState::Enriched;
                        continue;
                    }

                    if ctx.cancel.is_cancelled() {
                        return RecordOutcome::Cancelled(record);
                    }

                    ctx.progress
                        .set_message(format!("Validating {}", record.address));
                    match self.validate_address(&record.address).await {
                        Ok(Some((found, provider_idx))) => {
                            candidate = Some(found);
                            validated_by = Some(provider_idx);
                            state = EnrichmentState::Validated;
                        }
                        Ok(None) => {
                            state = EnrichmentState::Failed(
                                "address not found in any provider".to_string(),
                            );
                        }
                        Err(ProviderError::RateLimited) => {
                            return RecordOutcome::RetryLater(record);
                        }
                        Err(e) => {
                            log::warn!("Validation failed for '{}': {e}", record.address);
                            state = EnrichmentState::Failed(
                                "address not found in any provider".to_string(),
                            );
                        }
                    }
                }

                EnrichmentState::Validated => {
                    // Adopt coordinates from the canonical candidate;
                    // never overwrite present values.
                    if let Some(found) = &candidate {
                        if record.latitude.is_none() {
                            record.latitude = found.latitude;
                        }
                        if record.longitude.is_none() {
                            record.longitude = found.longitude;
                        }
                    }
                    state = EnrichmentState::NeedsEnrichment;
                }

                EnrichmentState::NeedsEnrichment => {
                    let provider_idx =
                        validated_by.expect("validated records have a validating provider");

                    if ctx.cancel.is_cancelled() {
                        return RecordOutcome::Cancelled(record);
                    }

                    ctx.progress
                        .set_message(format!("Fetching details for {}", record.address));
                    match self
                        .pull_details(&mut record, provider_idx, candidate.as_ref())
                        .await
                    {
                        Ok(()) => state = EnrichmentState::Enriched,
                        Err(ProviderError::RateLimited) => {
                            return RecordOutcome::RetryLater(record);
                        }
                        Err(e) => {
                            // Details failure degrades to a validated but
                            // unenriched record; the address still resolved.
                            log::warn!("Detail fetch failed for '{}': {e}", record.address);
                            state = EnrichmentState::Enriched;
                        }
                    }
                }

                EnrichmentState::Enriched => {
                    if let Some(idx) = validated_by {
                        record.data_source =
                            DataSource::Provider(self.providers[idx].name().to_string());
                    }
                    if record.value.is_none() {
                        preplan_cost::revalue(&mut record);
                    }
                    // A fully-populated record was never validated by a
                    // provider; its neighbor search goes through the
                    // primary provider.
                    let neighbor_provider =
                        validated_by.or_else(|| (!self.providers.is_empty()).then_some(0));
                    return RecordOutcome::Done(record, neighbor_provider);
                }

                EnrichmentState::Failed(reason) => {
                    log::info!("'{}' kept input-only: {reason}", record.address);
                    record.data_source = DataSource::InputOnly;
                    record.missing_market_data = true;
                    if record.value.is_none() {
                        preplan_cost::revalue(&mut record);
                    }
                    return RecordOutcome::Done(record, None);
                }
            }
        }
    }

    /// Tries each provider's address search in priority order; the first
    /// suggestion of the first provider that returns any is canonical.
    async fn validate_address(
        &self,
        address: &str,
    ) -> Result<Option<(AddressCandidate, usize)>, ProviderError> {
        for (idx, provider) in self.providers.iter().enumerate() {
            match provider.suggest_addresses(&self.client, address).await {
                Ok(suggestions) => {
                    if let Some(first) = suggestions.into_iter().next() {
                        return Ok(Some((first, idx)));
                    }
                    log::debug!("{}: no suggestions for '{address}'", provider.name());
                }
                Err(ProviderError::RateLimited) => return Err(ProviderError::RateLimited),
                Err(e) => {
                    log::warn!("{}: address search failed: {e}", provider.name());
                }
            }
        }
        Ok(None)
    }

    /// Pulls details from the validating provider, then fills remaining
    /// critical fields from the next provider behind the address-token
    /// guard.
    async fn pull_details(
        &self,
        record: &mut PropertyRecord,
        provider_idx: usize,
        candidate: Option<&AddressCandidate>,
    ) -> Result<(), ProviderError> {
        let provider = &self.providers[provider_idx];

        if let Some(candidate) = candidate
            && let Some(details) = provider.get_details(&self.client, &candidate.stable_id).await?
        {
            let filled = merge::merge_details(record, &details, provider.name());
            log::debug!(
                "{}: filled {} field(s) for '{}'",
                provider.name(),
                filled.len(),
                record.address
            );
        }

        // Critical structural fields still missing: try exactly one more
        // provider, guarded by an address-token match. A match failure
        // skips the field — never a third source.
        if record.year_built.is_some() && record.square_footage.is_some() {
            return Ok(());
        }
        let Some(secondary) = self.providers.get(provider_idx + 1) else {
            return Ok(());
        };

        let suggestions = match secondary.suggest_addresses(&self.client, &record.address).await {
            Ok(suggestions) => suggestions,
            Err(ProviderError::RateLimited) => return Err(ProviderError::RateLimited),
            Err(e) => {
                log::warn!("{}: secondary search failed: {e}", secondary.name());
                return Ok(());
            }
        };

        let Some(secondary_candidate) = suggestions.into_iter().next() else {
            return Ok(());
        };

        if !merge::addresses_match(&record.address, &secondary_candidate.address) {
            log::info!(
                "{}: candidate '{}' is an ambiguous match for '{}'; skipping",
                secondary.name(),
                secondary_candidate.address,
                record.address
            );
            return Ok(());
        }

        match secondary
            .get_details(&self.client, &secondary_candidate.stable_id)
            .await
        {
            Ok(Some(details)) => {
                let filled = merge::merge_critical_details(record, &details, secondary.name());
                log::debug!(
                    "{}: filled {} critical field(s) for '{}'",
                    secondary.name(),
                    filled.len(),
                    record.address
                );
            }
            Ok(None) => {}
            Err(ProviderError::RateLimited) => return Err(ProviderError::RateLimited),
            Err(e) => log::warn!("{}: secondary details failed: {e}", secondary.name()),
        }

        Ok(())
    }

    /// Fetches, classifies, and converts an enriched record's neighbors.
    async fn expand_neighbors(
        &self,
        record: &PropertyRecord,
        provider_idx: usize,
        options: NeighborOptions,
        ctx: &EnrichContext,
    ) -> Result<Vec<PropertyRecord>, ProviderError> {
        let (Some(latitude), Some(longitude)) = (record.latitude, record.longitude) else {
            return Ok(Vec::new());
        };
        if ctx.cancel.is_cancelled() {
            return Ok(Vec::new());
        }

        let provider = &self.providers[provider_idx];
        let neighbors = provider
            .find_neighbors(&self.client, &record.address, latitude, longitude, &options)
            .await?;

        Ok(neighbors
            .iter()
            .map(|candidate| {
                let mut neighbor = merge::candidate_to_record(candidate, provider.name());
                if neighbor.value.is_none() {
                    preplan_cost::revalue(&mut neighbor);
                }
                neighbor
            })
            .collect())
    }
}

/// A record with nothing left to enrich skips provider lookups
/// entirely; re-running a fully-enriched batch is a fixed point.
fn is_fully_populated(record: &PropertyRecord) -> bool {
    record.latitude.is_some()
        && record.longitude.is_some()
        && record.year_built.is_some()
        && record.square_footage.is_some()
        && record.market_value.is_some()
}
