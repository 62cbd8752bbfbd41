//! Profile setup form
//!
//! The form collects a name, a date of birth split into day / month / year
//! inputs, and weight and height in the user's preferred units. Validation
//! runs in two passes: structural checks from the `validator` derive, then
//! domain checks (age window, measurement limits in SI units) driven by
//! [`CoreSettings`].

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::age::{calculate_age_on, parse_birth_date};
use crate::errors::{CoreError, CoreResult};
use crate::settings::CoreSettings;
use crate::units::{round_half_up, HeightUnit, WeightUnit};
use crate::validation::{validate_height_cm, validate_name, validate_weight_kg, FieldError, MAX_NAME_LENGTH};

/// Raw profile form input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProfileForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub day: String,
    pub month: String,
    pub year: String,
    #[validate(range(exclusive_min = 0.0))]
    pub weight: f64,
    #[serde(default)]
    pub weight_unit: WeightUnit,
    #[validate(range(exclusive_min = 0.0))]
    pub height: f64,
    #[serde(default)]
    pub height_unit: HeightUnit,
}

/// Validated profile, measurements in SI units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileMetrics {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub age_years: i32,
    pub weight_kg: f64,
    pub height_cm: f64,
}

impl ProfileForm {
    /// Validate the form as of `today`
    ///
    /// Every failing field is reported, not just the first one.
    pub fn validate_with(&self, settings: &CoreSettings, today: NaiveDate) -> CoreResult<ProfileMetrics> {
        let mut errors = structural_errors(self);
        let flagged = |errors: &[FieldError], field: &str| errors.iter().any(|e| e.field == field);

        if !flagged(&errors, "name") {
            if let Err(message) = validate_name(&self.name) {
                errors.push(FieldError::new("name", &message));
            }
        }

        let dob = match parse_birth_date(&self.day, &self.month, &self.year) {
            Some(dob) if settings.age.contains(dob, today) => Some(dob),
            Some(_) => {
                errors.push(FieldError::new(
                    "date_of_birth",
                    &format!(
                        "age must be between {} and {} years",
                        settings.age.min_years, settings.age.max_years
                    ),
                ));
                None
            }
            None => {
                errors.push(FieldError::new("date_of_birth", "is not a valid date"));
                None
            }
        };

        let weight_kg = self.weight_unit.to_kg(self.weight);
        if !flagged(&errors, "weight") {
            if let Err(message) = validate_weight_kg(weight_kg, &settings.weight_kg) {
                errors.push(FieldError::new("weight", &message));
            }
        }

        let height_cm = self.height_unit.to_cm(self.height);
        if !flagged(&errors, "height") {
            if let Err(message) = validate_height_cm(height_cm, &settings.height_cm) {
                errors.push(FieldError::new("height", &message));
            }
        }

        match dob {
            Some(date_of_birth) if errors.is_empty() => Ok(ProfileMetrics {
                name: self.name.trim().to_string(),
                date_of_birth,
                age_years: calculate_age_on(date_of_birth, today),
                weight_kg,
                height_cm,
            }),
            _ => {
                debug!(failures = errors.len(), "Profile form rejected");
                Err(CoreError::Validation(errors))
            }
        }
    }

    /// Fill the form from a stored profile, in the user's display units
    pub fn prefill(profile: &ProfileMetrics, weight_unit: WeightUnit, height_unit: HeightUnit) -> Self {
        let weight = round_half_up(weight_unit.from_kg(profile.weight_kg));
        let height = round_half_up(height_unit.from_cm(profile.height_cm));
        let dob = profile.date_of_birth;

        Self {
            name: profile.name.clone(),
            day: dob.day().to_string(),
            month: dob.month().to_string(),
            year: dob.year().to_string(),
            weight,
            weight_unit,
            height,
            height_unit,
        }
    }
}

/// Run the derived checks and turn their output into field errors
fn structural_errors(form: &ProfileForm) -> Vec<FieldError> {
    let Err(report) = form.validate() else {
        return Vec::new();
    };

    let mut errors: Vec<FieldError> = report
        .field_errors()
        .into_iter()
        .flat_map(|(field, failures)| {
            let field: &str = &field;
            failures
                .iter()
                .map(|failure| {
                    let message = match &*failure.code {
                        "length" => format!("must be between 1 and {} characters", MAX_NAME_LENGTH),
                        "range" => "must be greater than zero".to_string(),
                        code => format!("failed check '{}'", code),
                    };
                    FieldError::new(field, &message)
                })
                .collect::<Vec<_>>()
        })
        .collect();
    errors.sort_by(|a, b| a.field.cmp(&b.field));
    errors
}
