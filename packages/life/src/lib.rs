#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Actuarial life-value estimation for rescued persons.
//!
//! Scales a Value-of-Statistical-Life base figure by:
//!
//! - remaining life expectancy (linear interpolation over per-cohort
//!   knot tables),
//! - an age-productivity step curve,
//! - a QALY factor for the incident type and severity,
//! - a pre-existing-condition modifier.
//!
//! ```text
//! value = round(VSL x (remaining_years / 77) x age_mult x qaly x condition)
//! ```

pub mod tables;

use preplan_models::life::{
    Gender, IncidentSeverity, IncidentType, LifeSavedRecord, PreExistingCondition,
};

/// Value of Statistical Life base figure, in whole currency units.
pub const VSL_BASE: f64 = 7_000_000.0;

/// Reference full lifespan the VSL base is normalized against.
pub const REFERENCE_LIFESPAN_YEARS: f64 = 77.0;

/// Remaining life expectancy in years for a person of the given age and
/// cohort.
///
/// Linear interpolation between the two bracketing knots of the cohort
/// table; ages at or beyond the last knot (95) take its value with no
/// extrapolation.
#[must_use]
pub fn remaining_life_expectancy(age: u8, gender: Gender) -> f64 {
    let table = tables::life_expectancy_table(gender);

    let (last_age, last_years) = *table.last().expect("knot table is non-empty");
    if age >= last_age {
        return last_years;
    }

    for window in table.windows(2) {
        let (lower_age, lower_years) = window[0];
        let (upper_age, upper_years) = window[1];
        if age >= lower_age && age < upper_age {
            let span = f64::from(upper_age - lower_age);
            let offset = f64::from(age - lower_age);
            return lower_years + (upper_years - lower_years) * (offset / span);
        }
    }

    // Ages below the first knot cannot occur (tables start at 0).
    last_years
}

/// Age-productivity multiplier: the multiplier of the largest bucket
/// boundary not exceeding the age. Step function, not interpolation.
#[must_use]
pub fn age_productivity_multiplier(age: u8) -> f64 {
    let mut multiplier = tables::AGE_PRODUCTIVITY[0].1;
    for &(boundary, bucket_multiplier) in tables::AGE_PRODUCTIVITY {
        if age >= boundary {
            multiplier = bucket_multiplier;
        }
    }
    multiplier
}

/// Computes the life-value estimate for one rescued person, in whole
/// currency units.
#[must_use]
pub fn compute_life_value(
    age: u8,
    gender: Gender,
    incident_type: IncidentType,
    incident_severity: IncidentSeverity,
    pre_existing_condition: PreExistingCondition,
) -> i64 {
    let remaining_years = remaining_life_expectancy(age, gender);

    let value = VSL_BASE * (remaining_years / REFERENCE_LIFESPAN_YEARS)
        * age_productivity_multiplier(age)
        * tables::qaly_factor(incident_type, incident_severity)
        * tables::condition_modifier(pre_existing_condition);

    #[allow(clippy::cast_possible_truncation)]
    let rounded = value.round() as i64;
    rounded
}

/// Computes and stores the life value on a record.
pub fn revalue(record: &mut LifeSavedRecord) {
    record.calculated_value = compute_life_value(
        record.age,
        record.gender,
        record.incident_type,
        record.incident_severity,
        record.pre_existing_condition,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expectancy_at_knot_is_knot_value() {
        assert!((remaining_life_expectancy(0, Gender::Male) - 76.3).abs() < 1e-9);
        assert!((remaining_life_expectancy(35, Gender::Male) - 43.3).abs() < 1e-9);
        assert!((remaining_life_expectancy(35, Gender::Female) - 47.7).abs() < 1e-9);
    }

    #[test]
    fn expectancy_interpolates_between_knots() {
        // Age 40 is midway between the 35 (43.3) and 45 (34.2) knots.
        let expected = 43.3 + (34.2 - 43.3) * 0.5;
        assert!((remaining_life_expectancy(40, Gender::Male) - expected).abs() < 1e-9);
    }

    #[test]
    fn expectancy_caps_at_last_knot() {
        assert!((remaining_life_expectancy(95, Gender::Male) - 3.0).abs() < 1e-9);
        assert!((remaining_life_expectancy(110, Gender::Male) - 3.0).abs() < 1e-9);
        assert!((remaining_life_expectancy(120, Gender::Female) - 3.5).abs() < 1e-9);
    }

    #[test]
    fn productivity_steps() {
        assert!((age_productivity_multiplier(0) - 0.55).abs() < f64::EPSILON);
        assert!((age_productivity_multiplier(17) - 0.70).abs() < f64::EPSILON);
        assert!((age_productivity_multiplier(18) - 1.00).abs() < f64::EPSILON);
        assert!((age_productivity_multiplier(35) - 1.20).abs() < f64::EPSILON);
        assert!((age_productivity_multiplier(39) - 1.20).abs() < f64::EPSILON);
        assert!((age_productivity_multiplier(40) - 1.15).abs() < f64::EPSILON);
        assert!((age_productivity_multiplier(95) - 0.30).abs() < f64::EPSILON);
    }

    #[test]
    fn values_thirty_five_year_old_cardiac_arrest() {
        // Hand-computed reference:
        //   remaining = 43.3 (35 knot, male)
        //   7,000,000 x (43.3 / 77) x 1.20 x 0.85 x 1.00 = 4,015,090.909...
        let value = compute_life_value(
            35,
            Gender::Male,
            IncidentType::CardiacArrest,
            IncidentSeverity::Moderate,
            PreExistingCondition::None,
        );
        assert_eq!(value, 4_015_091);
    }

    #[test]
    fn condition_reduces_value() {
        let healthy = compute_life_value(
            50,
            Gender::Female,
            IncidentType::Trauma,
            IncidentSeverity::Severe,
            PreExistingCondition::None,
        );
        let with_cancer = compute_life_value(
            50,
            Gender::Female,
            IncidentType::Trauma,
            IncidentSeverity::Severe,
            PreExistingCondition::Cancer,
        );
        assert!(with_cancer < healthy);
    }

    #[test]
    fn value_is_positive_across_the_age_range() {
        for age in 0..=120u8 {
            let value = compute_life_value(
                age,
                Gender::Male,
                IncidentType::Other,
                IncidentSeverity::Critical,
                PreExistingCondition::Cancer,
            );
            assert!(value > 0, "value must stay positive at age {age}");
        }
    }

    #[test]
    fn revalue_populates_record() {
        let mut record = LifeSavedRecord {
            age: 35,
            gender: Gender::Male,
            incident_type: IncidentType::CardiacArrest,
            incident_severity: IncidentSeverity::Moderate,
            pre_existing_condition: PreExistingCondition::None,
            calculated_value: 0,
        };
        revalue(&mut record);
        assert_eq!(record.calculated_value, 4_015_091);
    }
}
