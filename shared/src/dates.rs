//! Date normalization for exercise records
//!
//! Turns the text date fields of a [`RawExercise`] into [`DateField`] values.
//! The lenient path ([`convert_dates`]) never fails: unparseable text becomes
//! `DateField::Invalid`. The strict path ([`normalize_strict`]) rejects such
//! records at the boundary.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::{CoreError, CoreResult};
use crate::exercise::{DateField, Exercise, RawExercise};

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse one serialized date value
///
/// Accepts RFC 3339, naive date-times (read as UTC) and plain `YYYY-MM-DD`
/// dates (midnight UTC). Absent or blank text is `Missing`.
pub fn parse_date_field(raw: Option<&str>) -> DateField {
    let text = match raw.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => return DateField::Missing,
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return DateField::Valid(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return DateField::Valid(naive.and_utc());
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return DateField::Valid(midnight.and_utc());
    }

    warn!(value = %text, "Unparseable date value");
    DateField::Invalid(text.to_string())
}

/// Normalize the dates of an exercise, its embedded parent and its children
pub fn convert_dates(raw: &RawExercise) -> Exercise {
    Exercise {
        id: raw.id,
        parent_id: raw.parent_id,
        name: raw.name.clone(),
        description: raw.description.clone(),
        notes: raw.notes.clone(),
        position: raw.position,
        metrics: raw.metrics.clone(),
        completed: raw.completed,
        children: raw.children.iter().map(convert_dates).collect(),
        date: parse_date_field(raw.date.as_deref()),
        created_at: parse_date_field(raw.created_at.as_deref()),
        updated_at: parse_date_field(raw.updated_at.as_deref()),
        parent: raw.parent.as_deref().map(|parent| Box::new(convert_dates(parent))),
    }
}

/// Normalize every root of a forest
pub fn convert_forest(raw: &[RawExercise]) -> Vec<Exercise> {
    raw.iter().map(convert_dates).collect()
}

/// Normalize an array that a serializer emitted as an object keyed by index
///
/// Only keys that are non-negative integers are kept; the result is ordered
/// by ascending index.
pub fn convert_dates_from_object(object: &Map<String, Value>) -> CoreResult<Vec<Exercise>> {
    let mut indexed: Vec<(u64, &Value)> = object
        .iter()
        .filter_map(|(key, value)| key.parse::<u64>().ok().map(|index| (index, value)))
        .collect();
    indexed.sort_by_key(|(index, _)| *index);

    indexed
        .into_iter()
        .map(|(_, value)| -> CoreResult<Exercise> {
            let raw = RawExercise::deserialize(value)?;
            Ok(convert_dates(&raw))
        })
        .collect()
}

/// Normalize an exercise, rejecting any date that cannot be parsed
pub fn normalize_strict(raw: &RawExercise) -> CoreResult<Exercise> {
    let exercise = convert_dates(raw);
    exercise.validate_dates()?;
    Ok(exercise)
}

impl Exercise {
    /// Check every date in this tree (parent snapshot before children)
    pub fn validate_dates(&self) -> CoreResult<()> {
        match self.first_invalid_date("") {
            Some((field, value)) => Err(CoreError::InvalidDate { field, value }),
            None => Ok(()),
        }
    }

    fn first_invalid_date(&self, prefix: &str) -> Option<(String, String)> {
        let own = [
            ("date", &self.date),
            ("created_at", &self.created_at),
            ("updated_at", &self.updated_at),
        ];
        for (name, field) in own {
            if let DateField::Invalid(value) = field {
                return Some((format!("{}{}", prefix, name), value.clone()));
            }
        }

        if let Some(found) = self
            .parent
            .as_deref()
            .and_then(|parent| parent.first_invalid_date(&format!("{}parent.", prefix)))
        {
            return Some(found);
        }

        self.children.iter().enumerate().find_map(|(i, child)| {
            child.first_invalid_date(&format!("{}children[{}].", prefix, i))
        })
    }
}
