//! Actuarial and quality-of-life lookup tables.
//!
//! Life-expectancy knots are period life table values (remaining years at
//! a given age, per cohort). The QALY table encodes expected functional
//! recovery per incident type and severity.

use preplan_models::life::{Gender, IncidentSeverity, IncidentType, PreExistingCondition};

/// Remaining-life-expectancy knot points: `(age, remaining_years)`.
///
/// 13 knots per cohort, ages 0-95, ascending. Values between knots are
/// linearly interpolated; ages at or beyond the last knot take its value
/// with no extrapolation.
pub const MALE_LIFE_EXPECTANCY: &[(u8, f64)] = &[
    (0, 76.3),
    (5, 71.8),
    (10, 66.9),
    (15, 62.0),
    (20, 57.2),
    (25, 52.6),
    (30, 48.0),
    (35, 43.3),
    (45, 34.2),
    (55, 25.6),
    (65, 17.8),
    (75, 11.0),
    (95, 3.0),
];

/// Female cohort counterpart of [`MALE_LIFE_EXPECTANCY`].
pub const FEMALE_LIFE_EXPECTANCY: &[(u8, f64)] = &[
    (0, 81.4),
    (5, 76.8),
    (10, 71.9),
    (15, 67.0),
    (20, 62.1),
    (25, 57.3),
    (30, 52.5),
    (35, 47.7),
    (45, 38.3),
    (55, 29.3),
    (65, 20.8),
    (75, 13.0),
    (95, 3.5),
];

/// Age-productivity buckets: `(lower_boundary, multiplier)`, ascending.
///
/// Piecewise-constant: the multiplier of the largest boundary not
/// exceeding the age applies. Step function, not interpolation.
pub const AGE_PRODUCTIVITY: &[(u8, f64)] = &[
    (0, 0.55),
    (10, 0.70),
    (18, 1.00),
    (25, 1.15),
    (30, 1.20),
    (40, 1.15),
    (50, 1.00),
    (60, 0.80),
    (70, 0.60),
    (80, 0.45),
    (90, 0.30),
];

/// Returns the life-expectancy knot table for a cohort.
#[must_use]
pub const fn life_expectancy_table(gender: Gender) -> &'static [(u8, f64)] {
    match gender {
        Gender::Male => MALE_LIFE_EXPECTANCY,
        Gender::Female => FEMALE_LIFE_EXPECTANCY,
    }
}

/// Quality-adjusted-life-year factor for an incident type and severity.
///
/// Represents expected functional recovery; 44 entries covering the full
/// incident x severity grid.
#[must_use]
pub const fn qaly_factor(incident: IncidentType, severity: IncidentSeverity) -> f64 {
    use IncidentSeverity::{Critical, Mild, Moderate, Severe};
    match (incident, severity) {
        (IncidentType::CardiacArrest, Mild) => 0.95,
        (IncidentType::CardiacArrest, Moderate) => 0.85,
        (IncidentType::CardiacArrest, Severe) => 0.65,
        (IncidentType::CardiacArrest, Critical) => 0.45,

        (IncidentType::SmokeInhalation, Mild) => 0.97,
        (IncidentType::SmokeInhalation, Moderate) => 0.90,
        (IncidentType::SmokeInhalation, Severe) => 0.75,
        (IncidentType::SmokeInhalation, Critical) => 0.55,

        (IncidentType::Burn, Mild) => 0.96,
        (IncidentType::Burn, Moderate) => 0.85,
        (IncidentType::Burn, Severe) => 0.65,
        (IncidentType::Burn, Critical) => 0.40,

        (IncidentType::Trauma, Mild) => 0.95,
        (IncidentType::Trauma, Moderate) => 0.85,
        (IncidentType::Trauma, Severe) => 0.70,
        (IncidentType::Trauma, Critical) => 0.50,

        (IncidentType::Drowning, Mild) => 0.96,
        (IncidentType::Drowning, Moderate) => 0.88,
        (IncidentType::Drowning, Severe) => 0.60,
        (IncidentType::Drowning, Critical) => 0.35,

        (IncidentType::Electrocution, Mild) => 0.96,
        (IncidentType::Electrocution, Moderate) => 0.88,
        (IncidentType::Electrocution, Severe) => 0.72,
        (IncidentType::Electrocution, Critical) => 0.50,

        (IncidentType::Fall, Mild) => 0.97,
        (IncidentType::Fall, Moderate) => 0.90,
        (IncidentType::Fall, Severe) => 0.70,
        (IncidentType::Fall, Critical) => 0.45,

        (IncidentType::HazmatExposure, Mild) => 0.95,
        (IncidentType::HazmatExposure, Moderate) => 0.85,
        (IncidentType::HazmatExposure, Severe) => 0.70,
        (IncidentType::HazmatExposure, Critical) => 0.50,

        (IncidentType::HeatStroke, Mild) => 0.98,
        (IncidentType::HeatStroke, Moderate) => 0.92,
        (IncidentType::HeatStroke, Severe) => 0.80,
        (IncidentType::HeatStroke, Critical) => 0.60,

        (IncidentType::CarbonMonoxide, Mild) => 0.97,
        (IncidentType::CarbonMonoxide, Moderate) => 0.90,
        (IncidentType::CarbonMonoxide, Severe) => 0.75,
        (IncidentType::CarbonMonoxide, Critical) => 0.55,

        (IncidentType::Other, Mild) => 0.95,
        (IncidentType::Other, Moderate) => 0.88,
        (IncidentType::Other, Severe) => 0.75,
        (IncidentType::Other, Critical) => 0.55,
    }
}

/// Life-value modifier for a pre-existing medical condition.
#[must_use]
pub const fn condition_modifier(condition: PreExistingCondition) -> f64 {
    match condition {
        PreExistingCondition::None => 1.00,
        PreExistingCondition::Hypertension => 0.97,
        PreExistingCondition::Asthma => 0.96,
        PreExistingCondition::Obesity => 0.95,
        PreExistingCondition::Diabetes => 0.92,
        PreExistingCondition::Copd => 0.85,
        PreExistingCondition::HeartDisease => 0.82,
        PreExistingCondition::KidneyDisease => 0.80,
        PreExistingCondition::Immunocompromised => 0.78,
        PreExistingCondition::Cancer => 0.70,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knot_tables_have_thirteen_points() {
        assert_eq!(MALE_LIFE_EXPECTANCY.len(), 13);
        assert_eq!(FEMALE_LIFE_EXPECTANCY.len(), 13);
    }

    #[test]
    fn knot_ages_ascend_and_span_zero_to_ninety_five() {
        for table in [MALE_LIFE_EXPECTANCY, FEMALE_LIFE_EXPECTANCY] {
            assert_eq!(table.first().unwrap().0, 0);
            assert_eq!(table.last().unwrap().0, 95);
            for window in table.windows(2) {
                assert!(window[0].0 < window[1].0, "knot ages must ascend");
                assert!(
                    window[0].1 > window[1].1,
                    "remaining years must decrease with age"
                );
            }
        }
    }

    #[test]
    fn productivity_buckets_ascend() {
        assert_eq!(AGE_PRODUCTIVITY.len(), 11);
        assert_eq!(AGE_PRODUCTIVITY.first().unwrap().0, 0);
        assert_eq!(AGE_PRODUCTIVITY.last().unwrap().0, 90);
        for window in AGE_PRODUCTIVITY.windows(2) {
            assert!(window[0].0 < window[1].0, "bucket boundaries must ascend");
        }
    }

    #[test]
    fn qaly_grid_is_complete_and_bounded() {
        for incident in IncidentType::all() {
            for severity in IncidentSeverity::all() {
                let factor = qaly_factor(*incident, *severity);
                assert!(
                    (0.0..=1.0).contains(&factor),
                    "{incident:?}/{severity:?} QALY {factor} out of range"
                );
            }
        }
    }

    #[test]
    fn qaly_decreases_with_severity() {
        for incident in IncidentType::all() {
            let mut previous = f64::MAX;
            for severity in IncidentSeverity::all() {
                let factor = qaly_factor(*incident, *severity);
                assert!(
                    factor < previous,
                    "{incident:?} QALY should decrease with severity"
                );
                previous = factor;
            }
        }
    }

    #[test]
    fn no_condition_is_neutral() {
        assert!((condition_modifier(PreExistingCondition::None) - 1.0).abs() < f64::EPSILON);
        for condition in PreExistingCondition::all() {
            let modifier = condition_modifier(*condition);
            assert!(
                (0.0..=1.0).contains(&modifier),
                "{condition:?} modifier {modifier} out of range"
            );
        }
    }
}
