//! Field-level merge, provenance tagging, and deduplication.
//!
//! Merging never overwrites a present value: providers only fill holes,
//! and every filled field is tagged with the contributing provider's
//! name so downstream consumers can render transparency notices.

use preplan_models::neighbor::NeighborCandidate;
use preplan_models::{
    Condition, ConstructionType, DataSource, PropertyRecord, PropertyType, ProvenanceField,
    StructureType,
};
use preplan_provider::PropertyDetails;

/// Fills absent fields on `record` from provider `details`, tagging
/// provenance with `provider_name`. Present values are never replaced.
///
/// Returns the [`ProvenanceField`]s that were filled.
pub fn merge_details(
    record: &mut PropertyRecord,
    details: &PropertyDetails,
    provider_name: &str,
) -> Vec<ProvenanceField> {
    let mut filled = Vec::new();

    if record.year_built.is_none()
        && let Some(year_built) = details.year_built
    {
        record.year_built = Some(year_built);
        record.provenance.record(ProvenanceField::YearBuilt, provider_name);
        filled.push(ProvenanceField::YearBuilt);
    }

    if record.square_footage.is_none()
        && let Some(square_footage) = details.square_footage
    {
        record.square_footage = Some(square_footage);
        record
            .provenance
            .record(ProvenanceField::SquareFootage, provider_name);
        filled.push(ProvenanceField::SquareFootage);
    }

    if record.market_value.is_none()
        && let Some(market_value) = details.estimated_value.or(details.market_price)
    {
        record.market_value = Some(market_value);
        record
            .provenance
            .record(ProvenanceField::MarketValue, provider_name);
        filled.push(ProvenanceField::MarketValue);
    }

    filled
}

/// Fills only the critical structural fields (`year_built`,
/// `square_footage`) from a secondary provider's details.
///
/// Used after the address-token guard passed; the market value is left
/// alone because cross-provider value estimates are not comparable
/// enough to mix on a token match.
pub fn merge_critical_details(
    record: &mut PropertyRecord,
    details: &PropertyDetails,
    provider_name: &str,
) -> Vec<ProvenanceField> {
    let mut filled = Vec::new();

    if record.year_built.is_none()
        && let Some(year_built) = details.year_built
    {
        record.year_built = Some(year_built);
        record.provenance.record(ProvenanceField::YearBuilt, provider_name);
        filled.push(ProvenanceField::YearBuilt);
    }

    if record.square_footage.is_none()
        && let Some(square_footage) = details.square_footage
    {
        record.square_footage = Some(square_footage);
        record
            .provenance
            .record(ProvenanceField::SquareFootage, provider_name);
        filled.push(ProvenanceField::SquareFootage);
    }

    filled
}

/// Returns `true` when a secondary provider's candidate address refers
/// to the same property as the input address: equal leading house
/// numbers and overlapping street-name tokens.
///
/// Guards against merging data from a wrong property; a failed match
/// skips the field rather than falling through to another source.
#[must_use]
pub fn addresses_match(input_address: &str, candidate_address: &str) -> bool {
    let (Some(input), Some(candidate)) = (
        preplan_geo::street::parse_address(input_address),
        preplan_geo::street::parse_address(candidate_address),
    ) else {
        return false;
    };

    input.house_number == candidate.house_number
        && preplan_geo::street::same_street(&input, &candidate)
}

/// Converts a classified neighbor candidate into a property record.
///
/// Structural classification is not part of provider neighbor payloads,
/// so neighbors default to the most common profile (residential
/// single-family, wood frame, good condition) until corrected.
#[must_use]
pub fn candidate_to_record(candidate: &NeighborCandidate, provider_name: &str) -> PropertyRecord {
    let mut record = PropertyRecord::new(
        candidate.address.clone(),
        PropertyType::Residential,
        StructureType::SingleFamily,
        ConstructionType::WoodFrame,
        Condition::Good,
    );
    record.latitude = Some(candidate.latitude);
    record.longitude = Some(candidate.longitude);
    record.data_source = DataSource::Provider(provider_name.to_string());

    if let Some(year_built) = candidate.year_built {
        record.year_built = Some(year_built);
        record.provenance.record(ProvenanceField::YearBuilt, provider_name);
    }
    if let Some(living_area) = candidate.living_area {
        record.square_footage = Some(living_area);
        record
            .provenance
            .record(ProvenanceField::SquareFootage, provider_name);
    }
    if let Some(market_value) = candidate.zestimate.or(candidate.market_price) {
        record.market_value = Some(market_value);
        record
            .provenance
            .record(ProvenanceField::MarketValue, provider_name);
    }

    record
}

/// Removes duplicate addresses (case-sensitive exact match), keeping the
/// first occurrence. Collisions are logged, not raised.
#[must_use]
pub fn dedup_records(records: Vec<PropertyRecord>) -> Vec<PropertyRecord> {
    let mut seen = std::collections::BTreeSet::new();
    let mut deduped = Vec::with_capacity(records.len());

    for record in records {
        if seen.contains(&record.address) {
            log::warn!(
                "Duplicate address '{}' dropped (first occurrence wins)",
                record.address
            );
            continue;
        }
        seen.insert(record.address.clone());
        deduped.push(record);
    }

    deduped
}
