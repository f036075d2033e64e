#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Batch ingestion pipeline and public API for the fire-preplan engine.
//!
//! [`BatchPipeline::process`] accepts one bounded batch of raw rows,
//! validates them, runs the cost and life-value models, hands building
//! records to the enrichment coordinator, and returns typed results plus
//! a per-row error list. One bad row never aborts a batch.

pub mod validate;

use chrono::Datelike as _;
use preplan_models::PropertyRecord;
use preplan_models::life::LifeSavedRecord;

pub use preplan_enrich::{EnrichContext, EnrichmentCoordinator, EnrichmentReport};
pub use preplan_provider::NeighborOptions;
pub use preplan_provider::cancel::CancelToken;
pub use preplan_provider::progress::{NullProgress, ProgressCallback};
pub use validate::{RawLifeInput, RawPropertyInput, RawRecord, ValidationError};

/// A validated, valued engine record.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineRecord {
    /// A building record.
    Property(PropertyRecord),
    /// A life-saved record.
    Life(LifeSavedRecord),
}

/// A rejected input row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// 1-based position of the row in the input batch.
    pub row: usize,
    /// Why the row was rejected.
    pub reason: ValidationError,
}

/// Result of processing one batch.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Valid records: building records first (deduplicated by address,
    /// enriched when providers are configured), then life records.
    pub results: Vec<EngineRecord>,
    /// Rows rejected at validation, in input order.
    pub errors: Vec<RowError>,
}

/// Computes the replacement-cost valuation for a building record
/// against the current calendar year.
#[must_use]
pub fn valuate_property(record: &PropertyRecord) -> Option<i64> {
    preplan_cost::compute_replacement_value(record, chrono::Utc::now().year())
}

/// Computes the actuarial life-value estimate for a rescued person.
#[must_use]
pub fn valuate_life(record: &LifeSavedRecord) -> i64 {
    preplan_life::compute_life_value(
        record.age,
        record.gender,
        record.incident_type,
        record.incident_severity,
        record.pre_existing_condition,
    )
}

/// Top-level entry point for batch processing.
pub struct BatchPipeline {
    coordinator: EnrichmentCoordinator,
}

impl BatchPipeline {
    /// Creates a pipeline over an explicit enrichment coordinator.
    #[must_use]
    pub const fn new(coordinator: EnrichmentCoordinator) -> Self {
        Self { coordinator }
    }

    /// Creates a pipeline over all enabled registry providers.
    #[must_use]
    pub fn with_default_providers() -> Self {
        Self::new(EnrichmentCoordinator::with_default_providers())
    }

    /// Validates raw rows into typed, valued records.
    ///
    /// Pure stage: no provider calls. Returned building records carry
    /// their cost valuation (or `None` when structural data is
    /// incomplete — that is a result, not an error); life records carry
    /// their computed value.
    #[must_use]
    pub fn validate_batch(inputs: &[RawRecord]) -> (Vec<EngineRecord>, Vec<RowError>) {
        let current_year = chrono::Utc::now().year();
        let mut results = Vec::with_capacity(inputs.len());
        let mut errors = Vec::new();

        for (index, input) in inputs.iter().enumerate() {
            let row = index + 1;
            let validated = match input {
                RawRecord::Property(raw) => {
                    validate::validate_property(raw, current_year).map(|mut record| {
                        preplan_cost::revalue(&mut record);
                        EngineRecord::Property(record)
                    })
                }
                RawRecord::Life(raw) => validate::validate_life(raw).map(|mut record| {
                    preplan_life::revalue(&mut record);
                    EngineRecord::Life(record)
                }),
            };

            match validated {
                Ok(record) => results.push(record),
                Err(reason) => {
                    log::info!("Row {row} rejected: {reason}");
                    errors.push(RowError { row, reason });
                }
            }
        }

        (results, errors)
    }

    /// Processes one bounded batch: validation, valuation, enrichment.
    ///
    /// Provider calls run sequentially with per-provider pacing; `ctx`
    /// carries the progress callback and cancel token honored at each
    /// suspension point.
    pub async fn process(&self, inputs: &[RawRecord], ctx: &EnrichContext) -> BatchOutcome {
        let (validated, errors) = Self::validate_batch(inputs);

        let mut properties = Vec::new();
        let mut lives = Vec::new();
        for record in validated {
            match record {
                EngineRecord::Property(record) => properties.push(record),
                EngineRecord::Life(record) => lives.push(record),
            }
        }

        let report = self.coordinator.enrich_batch(properties, ctx).await;
        if !report.retry_later.is_empty() {
            log::warn!(
                "{} record(s) rate-limited; retry them later: {}",
                report.retry_later.len(),
                report.retry_later.join(", ")
            );
        }

        let results = report
            .records
            .into_iter()
            .map(EngineRecord::Property)
            .chain(lives.into_iter().map(EngineRecord::Life))
            .collect();

        BatchOutcome { results, errors }
    }
}
