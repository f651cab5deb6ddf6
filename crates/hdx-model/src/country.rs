//! Three-letter country codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ModelError;

/// An ISO 3166-1 alpha-3 country code.
///
/// The only way to build one is through [`CountryCode::parse`], which accepts
/// exactly three uppercase ASCII letters. Absence is expressed with
/// `Option<CountryCode>` and rendered as an empty field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CountryCode([u8; 3]);

impl CountryCode {
    /// Parse a code, returning `None` for anything that is not `[A-Z]{3}`.
    pub fn parse(raw: &str) -> Option<Self> {
        let bytes = raw.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_uppercase) {
            return None;
        }
        Some(Self([bytes[0], bytes[1], bytes[2]]))
    }

    /// Parse after trimming and uppercasing; used for registry and config input.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        Self::parse(&raw.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        // Constructed only from ASCII uppercase bytes.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

/// Render an optional code the way it appears in output files.
pub fn country_code_field(code: Option<CountryCode>) -> String {
    code.map(|c| c.as_str().to_string()).unwrap_or_default()
}

/// Name-registry key for a free-text country name.
///
/// Lowercases, then collapses every run of characters outside `[a-z0-9]` into
/// one space: `"Congo, Democratic Republic of the"` becomes
/// `"congo democratic republic of the"`.
pub fn normalize_country_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            pending_space = true;
        }
    }
    out
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountryCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ModelError::InvalidCountryCode(s.to_string()))
    }
}

impl Serialize for CountryCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CountryCode::parse_lenient(&raw)
            .ok_or_else(|| serde::de::Error::custom(ModelError::InvalidCountryCode(raw)))
    }
}
