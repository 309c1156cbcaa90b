//! Typed attribute values

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use super::field::FieldType;

/// A single attribute value of an entity
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// No value
    #[default]
    Null,
    /// Short or long text
    Text(String),
    /// Integer, also used for foreign keys
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Boolean flag
    Boolean(bool),
    /// Calendar date
    Date(NaiveDate),
    /// Time of day
    Time(NaiveTime),
    /// Date and time without zone
    DateTime(NaiveDateTime),
}

impl Value {
    /// Whether this is [`Value::Null`]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Integer content, if any
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric content as a float; integers widen
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Text content, if any
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean content, if any
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Date content, if any (date-times yield their date part)
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            Self::DateTime(dt) => Some(dt.date()),
            _ => None,
        }
    }

    /// Time-of-day content, if any
    #[must_use]
    pub const fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Self::Time(t) => Some(*t),
            _ => None,
        }
    }

    /// Date-time content, if any
    #[must_use]
    pub const fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Boolean(_) => 1,
            Self::Integer(_) | Self::Float(_) => 2,
            Self::Date(_) | Self::DateTime(_) => 3,
            Self::Time(_) => 4,
            Self::Text(_) => 5,
        }
    }

    /// Total order used for sorting: `Null` first, numbers compare across
    /// integer and float, mismatched kinds order by kind.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Integer(a), Self::Float(b)) => (*a as f64).total_cmp(b),
            (Self::Float(a), Self::Integer(b)) => a.total_cmp(&(*b as f64)),
            (Self::Boolean(a), Self::Boolean(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::DateTime(a), Self::DateTime(b)) => a.cmp(b),
            (Self::Date(a), Self::DateTime(b)) => a.cmp(&b.date()),
            (Self::DateTime(a), Self::Date(b)) => a.date().cmp(b),
            (Self::Time(a), Self::Time(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Parse a submitted form value according to a field type
    ///
    /// Blank input yields [`Value::Null`] for every type except text, which
    /// keeps the empty string so presence validation can report it.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when the input does not match the type.
    pub fn parse(field_type: &FieldType, raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        match field_type {
            FieldType::String | FieldType::Text => Ok(Self::Text(raw.to_string())),
            FieldType::Boolean => Ok(Self::Boolean(matches!(
                trimmed.to_ascii_lowercase().as_str(),
                "true" | "1" | "on" | "yes"
            ))),
            _ if trimmed.is_empty() => Ok(Self::Null),
            FieldType::Integer | FieldType::Association { .. } => trimmed
                .parse::<i64>()
                .map(Self::Integer)
                .map_err(|_| "is not a number".to_string()),
            FieldType::Float => trimmed
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Self::Float)
                .ok_or_else(|| "is not a number".to_string()),
            FieldType::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(Self::Date)
                .map_err(|_| "is not a valid date".to_string()),
            FieldType::Time => NaiveTime::parse_from_str(trimmed, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
                .map(Self::Time)
                .map_err(|_| "is not a valid time".to_string()),
            FieldType::DateTime => NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M")
                .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
                .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M"))
                .map(Self::DateTime)
                .map_err(|_| "is not a valid date and time".to_string()),
            FieldType::Relation { .. } => Err("cannot be assigned".to_string()),
        }
    }

    /// Value as it appears in a form control's `value` attribute
    #[must_use]
    pub fn to_form_value(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Text(s) => s.clone(),
            Self::Integer(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::Time(t) => t.format("%H:%M").to_string(),
            Self::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M").to_string(),
        }
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Self::Time(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
