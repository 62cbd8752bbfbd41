//! Fitness Tracker Shared Library
//!
//! Pure domain logic behind the profile-setup and exercise-tracking views:
//! exercise tree edits, date normalization of backend records, age checks,
//! unit conversion and profile form validation. Used natively and through
//! the WASM module.

pub mod age;
pub mod dates;
pub mod errors;
pub mod exercise;
pub mod forest;
pub mod profile;
pub mod settings;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use age::{calculate_age, calculate_age_on, is_at_least_13_at_most_100, AgeWindow, MAX_AGE_YEARS};
pub use dates::{convert_dates, convert_dates_from_object, normalize_strict};
pub use errors::*;
pub use exercise::{DateField, Exercise, RawExercise, TreeNode};
pub use forest::{add_child_to_parent, replace_exercise_by_position, update_exercise_in_tree, MatchPolicy};
pub use profile::{ProfileForm, ProfileMetrics};
pub use settings::CoreSettings;
pub use units::*;
