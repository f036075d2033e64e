//! Life-saved incident record types.
//!
//! A [`LifeSavedRecord`] captures one person rescued during an incident,
//! with the cohort fields the actuarial life-value model keys on.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Actuarial cohort for life-expectancy lookup.
///
/// Binary by necessity: the underlying actuarial tables publish only
/// male/female cohorts. A modeling limitation inherited from the source
/// data, not a design choice.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Gender {
    /// Male actuarial cohort.
    Male,
    /// Female actuarial cohort.
    Female,
}

/// Type of incident the person was rescued from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum IncidentType {
    /// Cardiac arrest with resuscitation
    CardiacArrest,
    /// Smoke inhalation during a structure fire
    SmokeInhalation,
    /// Thermal burn injury
    Burn,
    /// Blunt or penetrating trauma
    Trauma,
    /// Water rescue / near-drowning
    Drowning,
    /// Electrical contact injury
    Electrocution,
    /// Fall from height
    Fall,
    /// Hazardous-materials exposure
    HazmatExposure,
    /// Heat stroke / hyperthermia
    HeatStroke,
    /// Carbon monoxide poisoning
    CarbonMonoxide,
    /// Incidents not fitting other categories
    Other,
}

impl IncidentType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::CardiacArrest,
            Self::SmokeInhalation,
            Self::Burn,
            Self::Trauma,
            Self::Drowning,
            Self::Electrocution,
            Self::Fall,
            Self::HazmatExposure,
            Self::HeatStroke,
            Self::CarbonMonoxide,
            Self::Other,
        ]
    }
}

/// Severity of the incident outcome for the rescued person.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum IncidentSeverity {
    /// Minor injury, full recovery expected
    Mild,
    /// Moderate injury with treatment
    Moderate,
    /// Severe injury, lasting impairment possible
    Severe,
    /// Life-threatening, significant lasting impairment
    Critical,
}

impl IncidentSeverity {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Mild, Self::Moderate, Self::Severe, Self::Critical]
    }
}

/// Pre-existing medical condition of the rescued person.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PreExistingCondition {
    /// No known pre-existing condition
    None,
    /// Diabetes mellitus
    Diabetes,
    /// Cardiovascular disease
    HeartDisease,
    /// Chronic obstructive pulmonary disease
    Copd,
    /// Asthma
    Asthma,
    /// Chronic hypertension
    Hypertension,
    /// Active cancer diagnosis
    Cancer,
    /// Chronic kidney disease
    KidneyDisease,
    /// Clinical obesity
    Obesity,
    /// Immunocompromised state
    Immunocompromised,
}

impl PreExistingCondition {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::None,
            Self::Diabetes,
            Self::HeartDisease,
            Self::Copd,
            Self::Asthma,
            Self::Hypertension,
            Self::Cancer,
            Self::KidneyDisease,
            Self::Obesity,
            Self::Immunocompromised,
        ]
    }
}

/// One person rescued during an incident, with the derived actuarial
/// value estimate.
///
/// Immutable once computed; recomputed only if an input field is edited
/// before the record is added to a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeSavedRecord {
    /// Age in years (0-120).
    pub age: u8,
    /// Actuarial cohort.
    pub gender: Gender,
    /// Type of incident.
    pub incident_type: IncidentType,
    /// Severity of the outcome.
    pub incident_severity: IncidentSeverity,
    /// Pre-existing medical condition.
    pub pre_existing_condition: PreExistingCondition,
    /// Derived life-value estimate in whole currency units.
    pub calculated_value: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn incident_type_count() {
        assert_eq!(IncidentType::all().len(), 11);
    }

    #[test]
    fn condition_count() {
        assert_eq!(PreExistingCondition::all().len(), 10);
    }

    #[test]
    fn parses_snake_case_values() {
        assert_eq!(
            IncidentType::from_str("cardiac_arrest").unwrap(),
            IncidentType::CardiacArrest
        );
        assert_eq!(
            IncidentSeverity::from_str("moderate").unwrap(),
            IncidentSeverity::Moderate
        );
        assert_eq!(
            PreExistingCondition::from_str("none").unwrap(),
            PreExistingCondition::None
        );
        assert_eq!(Gender::from_str("female").unwrap(), Gender::Female);
    }
}
