//! Fitness Tracker WASM Module
//!
//! WebAssembly bindings that let the browser views call the shared domain
//! logic. Exercise data crosses the boundary as JSON strings in the same
//! shape the backend sends; errors surface as JS strings. Ids and positions
//! arrive as plain JS numbers.

use fitness_tracker_shared::{self as shared, validation::FieldError, CoreError, Exercise, RawExercise};
use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;

fn to_js(err: CoreError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_forest(forest_json: &str) -> Result<Vec<Exercise>, CoreError> {
    let raw: Vec<RawExercise> = serde_json::from_str(forest_json)?;
    Ok(shared::dates::convert_forest(&raw))
}

fn parse_exercise(exercise_json: &str) -> Result<Exercise, CoreError> {
    let raw: RawExercise = serde_json::from_str(exercise_json)?;
    Ok(shared::convert_dates(&raw))
}

/// `Number.MAX_SAFE_INTEGER`
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Convert a JS number to an integer id, rejecting fractions, NaN, infinities
/// and values past the safe integer range
fn js_integer(field: &str, value: f64) -> Result<i64, CoreError> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        Ok(value as i64)
    } else {
        Err(CoreError::Validation(vec![FieldError::new(
            field,
            &format!("must be a whole number, got {}", value),
        )]))
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CoreError> {
    Ok(serde_json::to_string(value)?)
}

// ============================================================================
// Exercise trees
// ============================================================================

fn add_child_json(forest_json: &str, parent_id: f64, child_json: &str) -> Result<String, CoreError> {
    let parent_id = js_integer("parent_id", parent_id)?;
    let forest = parse_forest(forest_json)?;
    let child = parse_exercise(child_json)?;
    to_json(&shared::add_child_to_parent(&forest, parent_id, child))
}

fn replace_by_position_json(forest_json: &str, position: f64, exercise_json: &str) -> Result<String, CoreError> {
    let position = js_integer("position", position)?;
    let forest = parse_forest(forest_json)?;
    let updated = parse_exercise(exercise_json)?;
    to_json(&shared::replace_exercise_by_position(&forest, position, &updated))
}

fn update_in_tree_json(forest_json: &str, exercise_json: &str) -> Result<String, CoreError> {
    let forest = parse_forest(forest_json)?;
    let updated = parse_exercise(exercise_json)?;
    to_json(&shared::update_exercise_in_tree(&forest, &updated))
}

fn convert_dates_from_object_json(object_json: &str) -> Result<String, CoreError> {
    let object: Map<String, Value> = serde_json::from_str(object_json)?;
    to_json(&shared::convert_dates_from_object(&object)?)
}

/// Append a child exercise under the first exercise with `parent_id`
#[wasm_bindgen]
pub fn add_child_to_parent(forest_json: &str, parent_id: f64, child_json: &str) -> Result<String, JsValue> {
    add_child_json(forest_json, parent_id, child_json).map_err(to_js)
}

/// Replace every exercise at `position`
#[wasm_bindgen]
pub fn replace_exercise_by_position(forest_json: &str, position: f64, exercise_json: &str) -> Result<String, JsValue> {
    replace_by_position_json(forest_json, position, exercise_json).map_err(to_js)
}

/// Replace every exercise sharing the updated exercise's id
#[wasm_bindgen]
pub fn update_exercise_in_tree(forest_json: &str, exercise_json: &str) -> Result<String, JsValue> {
    update_in_tree_json(forest_json, exercise_json).map_err(to_js)
}

/// Normalize the dates of one exercise record
#[wasm_bindgen]
pub fn convert_dates(exercise_json: &str) -> Result<String, JsValue> {
    parse_exercise(exercise_json).and_then(|e| to_json(&e)).map_err(to_js)
}

/// Normalize an index-keyed object of exercise records into a list
#[wasm_bindgen]
pub fn convert_dates_from_object(object_json: &str) -> Result<String, JsValue> {
    convert_dates_from_object_json(object_json).map_err(to_js)
}

// ============================================================================
// Profile helpers
// ============================================================================

/// Age in full years for a `YYYY-MM-DD` birth date, or `None` if unparseable
#[wasm_bindgen]
pub fn calculate_age(dob: &str) -> Option<i32> {
    chrono::NaiveDate::parse_from_str(dob.trim(), "%Y-%m-%d")
        .ok()
        .map(shared::calculate_age)
}

/// Whether day / month / year inputs describe someone aged 13 to 100
#[wasm_bindgen]
pub fn is_at_least_13_at_most_100(day: &str, month: &str, year: &str) -> bool {
    shared::is_at_least_13_at_most_100(day, month, year)
}

#[wasm_bindgen]
pub fn kg_to_lbs(kg: f64) -> f64 {
    shared::kg_to_lbs(kg)
}

#[wasm_bindgen]
pub fn lbs_to_kg(lbs: f64) -> f64 {
    shared::lbs_to_kg(lbs)
}

#[wasm_bindgen]
pub fn cm_to_inches(cm: f64) -> f64 {
    shared::cm_to_inches(cm)
}

#[wasm_bindgen]
pub fn inches_to_cm(inches: f64) -> f64 {
    shared::inches_to_cm(inches)
}
