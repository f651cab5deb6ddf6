//! Cell values carried through the join and rollup stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single output cell. Absent values are [`Value::Null`], never omitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

impl Value {
    /// Build a numeric value; non-finite numbers become null.
    pub fn number(value: f64) -> Self {
        if value.is_finite() {
            Self::Number(value)
        } else {
            Self::Null
        }
    }

    pub fn from_option(value: Option<f64>) -> Self {
        value.map_or(Self::Null, Self::number)
    }

    /// Build a text value; blank strings become null.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Self::Null
        } else {
            Self::Text(value)
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the value; text is parsed, null stays `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Null => None,
            Self::Number(v) => Some(*v),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Render for output; null becomes `None`.
    pub fn to_field(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Number(v) => Some(format_number(*v)),
            Self::Text(s) => Some(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Number(v) => f.write_str(&format_number(*v)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl From<Option<f64>> for Value {
    fn from(value: Option<f64>) -> Self {
        Self::from_option(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

/// Shortest round-trip decimal form of a float, without exponent notation.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_numbers_without_trailing_zero() {
        assert_eq!(format_number(150.0), "150");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(1e21), "1000000000000000000000");
    }

    #[test]
    fn blank_and_non_finite_become_null() {
        assert!(Value::text("  ").is_null());
        assert!(Value::number(f64::NAN).is_null());
        assert!(Value::from(None).is_null());
    }

    #[test]
    fn numeric_view_parses_text() {
        assert_eq!(Value::text("12.5").as_f64(), Some(12.5));
        assert_eq!(Value::text("n/a").as_f64(), None);
        assert_eq!(Value::Null.to_field(), None);
    }
}
