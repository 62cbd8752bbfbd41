//! Input validation functions
//!
//! Field-level checks for the profile form. Range limits come from
//! [`CoreSettings`](crate::settings::CoreSettings) so deployments can tune
//! them without touching code.

use serde::{Deserialize, Serialize};

use crate::settings::MeasurementLimits;

/// Maximum length of a display name, in characters
pub const MAX_NAME_LENGTH: usize = 100;

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("cannot be empty".to_string());
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(format!("must be at most {} characters", MAX_NAME_LENGTH));
    }
    Ok(())
}

/// Validate weight value (in kg)
pub fn validate_weight_kg(weight_kg: f64, limits: &MeasurementLimits) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("must be a valid number".to_string());
    }
    if weight_kg < limits.min {
        return Err(format!("must be at least {} kg", limits.min));
    }
    if weight_kg > limits.max {
        return Err(format!("must be at most {} kg", limits.max));
    }
    Ok(())
}

/// Validate height value (in cm)
pub fn validate_height_cm(height_cm: f64, limits: &MeasurementLimits) -> Result<(), String> {
    if height_cm.is_nan() || height_cm.is_infinite() {
        return Err("must be a valid number".to_string());
    }
    if height_cm < limits.min {
        return Err(format!("must be at least {} cm", limits.min));
    }
    if height_cm > limits.max {
        return Err(format!("must be at most {} cm", limits.max));
    }
    Ok(())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn field_display_label(field_name: &str) -> &str {
    match field_name {
        "name" => "Name",
        "weight" | "weight_kg" => "Weight",
        "height" | "height_cm" => "Height",
        "date_of_birth" | "day" | "month" | "year" => "Date of Birth",
        "weight_unit" => "Weight Unit",
        "height_unit" => "Height Unit",
        _ => field_name,
    }
}

/// Validation failure with field context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}
