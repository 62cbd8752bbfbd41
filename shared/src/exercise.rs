//! Exercise records
//!
//! Exercises arrive from the backend as nested JSON records whose date fields
//! are plain text. They are kept in two shapes:
//!
//! - [`RawExercise`]: exactly what was received, dates as `Option<String>`
//! - [`Exercise`]: normalized, dates as [`DateField`]
//!
//! Both shapes own their children directly (no back-pointers), so a list of
//! records is a forest of finite trees. The embedded `parent` record, when a
//! serializer includes one, is a snapshot copy and takes no part in tree
//! traversal.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::dates::parse_date_field;

// ============================================================================
// Tree access
// ============================================================================

/// Access to the locator fields and owned children of a tree node
pub trait TreeNode: Sized {
    fn id(&self) -> Option<i64>;

    fn position(&self) -> Option<i64>;

    fn children(&self) -> &[Self];

    fn children_mut(&mut self) -> &mut Vec<Self>;
}

// ============================================================================
// Date field
// ============================================================================

/// A normalized date value
///
/// `Missing` is the explicit "no date" marker. `Invalid` keeps the original
/// text of a value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateField {
    #[default]
    Missing,
    Valid(DateTime<Utc>),
    Invalid(String),
}

impl DateField {
    pub fn is_missing(&self) -> bool {
        matches!(self, DateField::Missing)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, DateField::Invalid(_))
    }

    /// The parsed timestamp, if any
    pub fn value(&self) -> Option<DateTime<Utc>> {
        match self {
            DateField::Valid(dt) => Some(*dt),
            _ => None,
        }
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateField::Missing => write!(f, "none"),
            DateField::Valid(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            DateField::Invalid(raw) => write!(f, "invalid ({})", raw),
        }
    }
}

impl Serialize for DateField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DateField::Missing => serializer.serialize_none(),
            DateField::Valid(dt) => {
                serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            DateField::Invalid(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for DateField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(parse_date_field(raw.as_deref()))
    }
}

// ============================================================================
// Raw record
// ============================================================================

/// Exercise record as received from the backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawExercise {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default)]
    pub children: Vec<RawExercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<RawExercise>>,
}

impl TreeNode for RawExercise {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn position(&self) -> Option<i64> {
        self.position
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }
}

// ============================================================================
// Normalized record
// ============================================================================

/// Exercise record with normalized dates
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Exercise {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default)]
    pub children: Vec<Exercise>,
    #[serde(default)]
    pub date: DateField,
    #[serde(default)]
    pub created_at: DateField,
    #[serde(default)]
    pub updated_at: DateField,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<Exercise>>,
}

impl TreeNode for Exercise {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn position(&self) -> Option<i64> {
        self.position
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }
}
