#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Deterministic replacement-cost valuation for building records.
//!
//! Implements an NFIRS-style formula:
//!
//! ```text
//! value = sqft x base_unit_cost x construction x condition x depreciation x local
//! ```
//!
//! Base unit cost is a table lookup by (property type, structure type);
//! depreciation is an age-based step function with fixed breakpoints.
//! This crate performs no range validation — the batch pipeline validates
//! inputs before any record reaches a model.

use chrono::Datelike as _;
use preplan_models::{Condition, ConstructionType, PropertyRecord, PropertyType, StructureType};

/// Base unit cost when a (property type, structure type) pair is unmapped.
pub const DEFAULT_UNIT_COST: f64 = 100.0;

/// Age-depreciation breakpoints, scanned in ascending order. The factor
/// of the first threshold the age does not exceed applies; ages past the
/// last breakpoint take [`DEPRECIATION_FLOOR`]. Step function, not
/// interpolation.
const DEPRECIATION_STEPS: &[(u32, f64)] = &[
    (0, 1.00),
    (5, 0.95),
    (10, 0.90),
    (15, 0.85),
    (20, 0.80),
    (30, 0.75),
    (40, 0.70),
    (50, 0.65),
];

/// Depreciation factor for structures older than the last breakpoint.
const DEPRECIATION_FLOOR: f64 = 0.60;

/// Replacement cost per square foot for a structure type.
///
/// Unmapped combinations fall back to [`DEFAULT_UNIT_COST`]. The property
/// type is redundant given a structure type (membership is validated at
/// ingestion) but both are keyed to keep the table aligned with the
/// record schema.
#[must_use]
pub fn base_unit_cost(property_type: PropertyType, structure_type: StructureType) -> f64 {
    match (property_type, structure_type) {
        (PropertyType::Residential, StructureType::SingleFamily) => 120.0,
        (PropertyType::Residential, StructureType::Townhouse) => 115.0,
        (PropertyType::Residential, StructureType::MultiFamily) => 110.0,
        (PropertyType::Residential, StructureType::Apartment) => 100.0,
        (PropertyType::Residential, StructureType::MobileHome) => 60.0,
        (PropertyType::Commercial, StructureType::Office) => 140.0,
        (PropertyType::Commercial, StructureType::Retail) => 120.0,
        (PropertyType::Commercial, StructureType::Restaurant) => 150.0,
        (PropertyType::Commercial, StructureType::Warehouse) => 70.0,
        (PropertyType::Commercial, StructureType::Hotel) => 160.0,
        (PropertyType::Industrial, StructureType::Factory) => 110.0,
        (PropertyType::Industrial, StructureType::ProcessingPlant) => 130.0,
        (PropertyType::Industrial, StructureType::Storage) => 65.0,
        (PropertyType::Institutional, StructureType::School) => 145.0,
        (PropertyType::Institutional, StructureType::Hospital) => 220.0,
        (PropertyType::Institutional, StructureType::Church) => 130.0,
        _ => DEFAULT_UNIT_COST,
    }
}

/// Cost multiplier for a construction method.
#[must_use]
pub const fn construction_multiplier(construction: ConstructionType) -> f64 {
    match construction {
        ConstructionType::WoodFrame => 1.00,
        ConstructionType::Masonry => 1.15,
        ConstructionType::SteelFrame => 1.25,
        ConstructionType::Concrete => 1.30,
        ConstructionType::Mixed => 1.10,
    }
}

/// Cost multiplier for an observed condition.
#[must_use]
pub const fn condition_multiplier(condition: Condition) -> f64 {
    match condition {
        Condition::Excellent => 1.10,
        Condition::Good => 1.00,
        Condition::Fair => 0.85,
        Condition::Poor => 0.65,
    }
}

/// Age-depreciation factor for a structure `age` years old.
///
/// Scans ascending breakpoints `{0, 5, 10, 15, 20, 30, 40, 50}` and takes
/// the factor of the first breakpoint the age does not exceed; older
/// structures bottom out at 0.60.
#[must_use]
pub fn depreciation_factor(age: u32) -> f64 {
    for &(threshold, factor) in DEPRECIATION_STEPS {
        if age <= threshold {
            return factor;
        }
    }
    DEPRECIATION_FLOOR
}

/// Computes the replacement-cost valuation for a record, in whole
/// currency units.
///
/// Returns `None` if `year_built` or `square_footage` is absent —
/// valuation is never guessed from incomplete structural data. A
/// `year_built` beyond `current_year` is treated as age 0.
#[must_use]
pub fn compute_replacement_value(record: &PropertyRecord, current_year: i32) -> Option<i64> {
    let year_built = record.year_built?;
    let square_footage = record.square_footage?;

    let age = u32::try_from(current_year - year_built).unwrap_or(0);

    let value = f64::from(square_footage)
        * base_unit_cost(record.property_type, record.structure_type)
        * construction_multiplier(record.construction_type)
        * condition_multiplier(record.condition)
        * depreciation_factor(age)
        * record.local_multiplier;

    #[allow(clippy::cast_possible_truncation)]
    let rounded = value.round() as i64;
    Some(rounded)
}

/// Computes the replacement-cost valuation against the current calendar
/// year and stores it on the record.
pub fn revalue(record: &mut PropertyRecord) {
    record.value = compute_replacement_value(record, chrono::Utc::now().year());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year_built: Option<i32>, square_footage: Option<u32>) -> PropertyRecord {
        let mut record = PropertyRecord::new(
            "100 MAIN ST",
            PropertyType::Residential,
            StructureType::SingleFamily,
            ConstructionType::WoodFrame,
            Condition::Good,
        );
        record.year_built = year_built;
        record.square_footage = square_footage;
        record
    }

    #[test]
    fn values_recent_single_family() {
        // 2000 sqft x 120/sqft x 0.95 depreciation (age 3) = 228,000
        let record = record(Some(2022), Some(2000));
        assert_eq!(compute_replacement_value(&record, 2025), Some(228_000));
    }

    #[test]
    fn missing_square_footage_yields_none() {
        let record = record(Some(2022), None);
        assert_eq!(compute_replacement_value(&record, 2025), None);
    }

    #[test]
    fn missing_year_built_yields_none() {
        let record = record(None, Some(2000));
        assert_eq!(compute_replacement_value(&record, 2025), None);
    }

    #[test]
    fn depreciation_breakpoints() {
        assert!((depreciation_factor(0) - 1.00).abs() < f64::EPSILON);
        assert!((depreciation_factor(3) - 0.95).abs() < f64::EPSILON);
        assert!((depreciation_factor(5) - 0.95).abs() < f64::EPSILON);
        assert!((depreciation_factor(6) - 0.90).abs() < f64::EPSILON);
        assert!((depreciation_factor(20) - 0.80).abs() < f64::EPSILON);
        assert!((depreciation_factor(21) - 0.75).abs() < f64::EPSILON);
        assert!((depreciation_factor(50) - 0.65).abs() < f64::EPSILON);
        assert!((depreciation_factor(51) - 0.60).abs() < f64::EPSILON);
        assert!((depreciation_factor(200) - 0.60).abs() < f64::EPSILON);
    }

    #[test]
    fn value_monotonically_non_increasing_in_age() {
        let mut previous = i64::MAX;
        for age in 0..=80 {
            let record = record(Some(2025 - age), Some(2000));
            let value = compute_replacement_value(&record, 2025).unwrap();
            assert!(
                value <= previous,
                "value increased at age {age}: {value} > {previous}"
            );
            previous = value;
        }
    }

    #[test]
    fn future_year_built_clamps_to_age_zero() {
        let record = record(Some(2030), Some(2000));
        // Age clamps to 0 -> no depreciation.
        assert_eq!(compute_replacement_value(&record, 2025), Some(240_000));
    }

    #[test]
    fn applies_local_multiplier() {
        let mut record = record(Some(2022), Some(2000));
        record.local_multiplier = 1.5;
        assert_eq!(compute_replacement_value(&record, 2025), Some(342_000));
    }

    #[test]
    fn applies_construction_and_condition_multipliers() {
        let mut record = record(Some(2025), Some(1000));
        record.construction_type = ConstructionType::Concrete;
        record.condition = Condition::Poor;
        // 1000 x 120 x 1.30 x 0.65 x 1.00 = 101,400
        assert_eq!(compute_replacement_value(&record, 2025), Some(101_400));
    }

    #[test]
    fn unmapped_pair_uses_default_unit_cost() {
        // A mismatched pair can't be built through ingestion, but the
        // lookup itself still defaults.
        let cost = base_unit_cost(PropertyType::Residential, StructureType::Factory);
        assert!((cost - DEFAULT_UNIT_COST).abs() < f64::EPSILON);
    }
}
