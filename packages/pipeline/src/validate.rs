//! Row validation: string inputs to typed records.
//!
//! The CSV importer and the manual-entry form both deliver stringly
//! rows. Type coercion, range checks, and required-field checks all
//! happen here, before any model or provider call; a row that fails
//! validation never reaches the cost model or a provider.

use preplan_models::life::{
    Gender, IncidentSeverity, IncidentType, LifeSavedRecord, PreExistingCondition,
};
use preplan_models::{
    Condition, ConstructionType, PropertyRecord, PropertyType, StructureType,
};
use thiserror::Error;

/// Earliest acceptable `year_built` on ingestion.
pub const MIN_YEAR_BUILT: i32 = 1800;

/// Inclusive bounds for `local_multiplier`.
pub const LOCAL_MULTIPLIER_RANGE: (f64, f64) = (0.1, 3.0);

/// Maximum acceptable age for a life-saved record.
pub const MAX_AGE: u8 = 120;

/// A raw building row as produced by the CSV importer or entry form.
///
/// Empty strings and `None` both mean "absent" for optional fields.
#[derive(Debug, Clone, Default)]
pub struct RawPropertyInput {
    /// Street address (required).
    pub address: String,
    /// Property type (required; e.g., `"residential"`).
    pub property_type: String,
    /// Structure type (required; e.g., `"single_family"`).
    pub structure_type: String,
    /// Year built, if known.
    pub year_built: Option<String>,
    /// Square footage, if known.
    pub square_footage: Option<String>,
    /// Story count, if known.
    pub stories: Option<String>,
    /// Construction type (required; e.g., `"wood_frame"`).
    pub construction_type: String,
    /// Condition (required; e.g., `"good"`).
    pub condition: String,
    /// Regional cost multiplier; absent means 1.0.
    pub local_multiplier: Option<String>,
}

/// A raw life-saved row.
#[derive(Debug, Clone, Default)]
pub struct RawLifeInput {
    /// Age in years (required).
    pub age: String,
    /// Actuarial cohort (required; `"male"` or `"female"`).
    pub gender: String,
    /// Incident type (required; e.g., `"cardiac_arrest"`).
    pub incident_type: String,
    /// Incident severity (required; e.g., `"moderate"`).
    pub incident_severity: String,
    /// Pre-existing condition (required; `"none"` when healthy).
    pub pre_existing_conditions: String,
}

/// A raw input row of either kind.
#[derive(Debug, Clone)]
pub enum RawRecord {
    /// A building row.
    Property(RawPropertyInput),
    /// A life-saved row.
    Life(RawLifeInput),
}

/// Why a row was rejected at ingestion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The address field is empty.
    #[error("address is required")]
    MissingAddress,

    /// A field's value could not be parsed into its expected type.
    #[error("invalid {field}: '{value}'")]
    InvalidValue {
        /// Which field failed.
        field: &'static str,
        /// The offending raw value.
        value: String,
    },

    /// `year_built` is outside the acceptable range.
    #[error("year built {year} outside {MIN_YEAR_BUILT}-{max}")]
    YearBuiltOutOfRange {
        /// The rejected year.
        year: i32,
        /// The current calendar year (upper bound).
        max: i32,
    },

    /// `square_footage` must be a positive integer.
    #[error("square footage must be positive, got {value}")]
    NonPositiveSquareFootage {
        /// The rejected value.
        value: i64,
    },

    /// `local_multiplier` is outside `[0.1, 3.0]`.
    #[error("local multiplier {value} outside [0.1, 3.0]")]
    LocalMultiplierOutOfRange {
        /// The rejected value.
        value: f64,
    },

    /// Age is outside `0-120`.
    #[error("age {value} outside 0-{MAX_AGE}")]
    AgeOutOfRange {
        /// The rejected value.
        value: i64,
    },

    /// The structure type does not belong to the property type's option
    /// set.
    #[error("structure type '{structure}' does not belong to property type '{property}'")]
    StructureMismatch {
        /// The parsed structure type.
        structure: StructureType,
        /// The parsed property type.
        property: PropertyType,
    },
}

/// Validates a raw building row into a typed record.
///
/// The returned record has no derived `value` yet; the pipeline runs
/// valuation after validation.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered.
pub fn validate_property(
    input: &RawPropertyInput,
    current_year: i32,
) -> Result<PropertyRecord, ValidationError> {
    let address = input.address.trim();
    if address.is_empty() {
        return Err(ValidationError::MissingAddress);
    }

    let property_type = parse_enum::<PropertyType>("property_type", &input.property_type)?;
    let structure_type = parse_enum::<StructureType>("structure_type", &input.structure_type)?;
    if structure_type.property_type() != property_type {
        return Err(ValidationError::StructureMismatch {
            structure: structure_type,
            property: property_type,
        });
    }

    let construction_type =
        parse_enum::<ConstructionType>("construction_type", &input.construction_type)?;
    let condition = parse_enum::<Condition>("condition", &input.condition)?;

    let year_built = match optional(&input.year_built) {
        None => None,
        Some(raw) => {
            let year = raw
                .parse::<i32>()
                .map_err(|_| invalid("year_built", raw))?;
            if !(MIN_YEAR_BUILT..=current_year).contains(&year) {
                return Err(ValidationError::YearBuiltOutOfRange {
                    year,
                    max: current_year,
                });
            }
            Some(year)
        }
    };

    let square_footage = match optional(&input.square_footage) {
        None => None,
        Some(raw) => {
            let value = raw
                .parse::<i64>()
                .map_err(|_| invalid("square_footage", raw))?;
            if value <= 0 {
                return Err(ValidationError::NonPositiveSquareFootage { value });
            }
            Some(u32::try_from(value).map_err(|_| invalid("square_footage", raw))?)
        }
    };

    let stories = match optional(&input.stories) {
        None => None,
        Some(raw) => Some(raw.parse::<u32>().map_err(|_| invalid("stories", raw))?),
    };

    let local_multiplier = match optional(&input.local_multiplier) {
        None => 1.0,
        Some(raw) => {
            let value = raw
                .parse::<f64>()
                .map_err(|_| invalid("local_multiplier", raw))?;
            let (min, max) = LOCAL_MULTIPLIER_RANGE;
            if !(min..=max).contains(&value) {
                return Err(ValidationError::LocalMultiplierOutOfRange { value });
            }
            value
        }
    };

    let mut record = PropertyRecord::new(
        address,
        property_type,
        structure_type,
        construction_type,
        condition,
    );
    record.year_built = year_built;
    record.square_footage = square_footage;
    record.stories = stories;
    record.local_multiplier = local_multiplier;

    Ok(record)
}

/// Validates a raw life-saved row into a typed record.
///
/// The returned record has `calculated_value = 0`; the pipeline runs the
/// life-value model after validation.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered.
pub fn validate_life(input: &RawLifeInput) -> Result<LifeSavedRecord, ValidationError> {
    let age_raw = input.age.trim();
    let age = age_raw
        .parse::<i64>()
        .map_err(|_| invalid("age", age_raw))?;
    if !(0..=i64::from(MAX_AGE)).contains(&age) {
        return Err(ValidationError::AgeOutOfRange { value: age });
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let age = age as u8;

    Ok(LifeSavedRecord {
        age,
        gender: parse_enum::<Gender>("gender", &input.gender)?,
        incident_type: parse_enum::<IncidentType>("incident_type", &input.incident_type)?,
        incident_severity: parse_enum::<IncidentSeverity>(
            "incident_severity",
            &input.incident_severity,
        )?,
        pre_existing_condition: parse_enum::<PreExistingCondition>(
            "pre_existing_conditions",
            &input.pre_existing_conditions,
        )?,
        calculated_value: 0,
    })
}

fn parse_enum<T: std::str::FromStr>(
    field: &'static str,
    raw: &str,
) -> Result<T, ValidationError> {
    T::from_str(raw.trim()).map_err(|_| invalid(field, raw))
}

fn invalid(field: &'static str, value: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field,
        value: value.to_string(),
    }
}

/// Treats `None` and whitespace-only strings as absent.
fn optional(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
