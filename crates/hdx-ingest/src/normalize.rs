//! Field-level normalization.

use std::str::FromStr;

use hdx_model::format_number;
use rust_decimal::Decimal;

/// Result of normalizing one declared-numeric cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumericField {
    /// Blank input.
    Empty,
    /// Canonical decimal text.
    Parsed(String),
    /// Unparseable input, kept verbatim (trimmed).
    Malformed(String),
}

impl NumericField {
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }

    pub fn into_string(self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Parsed(s) | Self::Malformed(s) => s,
        }
    }
}

/// Canonical decimal text for a numeric cell.
///
/// Thousands separators are dropped and the value is parsed as an exact
/// decimal. Integral values are written without a fractional part, others in
/// minimal fixed-point form (`"1,234.50"` becomes `"1234.5"`). The output is
/// a fixed point of this function.
///
/// Magnitudes beyond the decimal range (about 7.9e28) fall back to `f64`
/// and keep only its 17 significant digits.
pub fn normalize_numeric(raw: &str) -> NumericField {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NumericField::Empty;
    }
    let stripped: String = trimmed.chars().filter(|c| *c != ',').collect();
    let parsed = if stripped.contains(['e', 'E']) {
        Decimal::from_scientific(&stripped)
    } else {
        Decimal::from_str(&stripped)
    };
    match parsed {
        Ok(value) => NumericField::Parsed(canonical_decimal(value)),
        Err(_) => match stripped.parse::<f64>() {
            Ok(value) if value.is_finite() && value.abs() >= 1.0 => {
                NumericField::Parsed(format_number(value))
            }
            _ => NumericField::Malformed(trimmed.to_string()),
        },
    }
}

fn canonical_decimal(value: Decimal) -> String {
    if value.fract().is_zero() {
        value.trunc().normalize().to_string()
    } else {
        value.normalize().to_string()
    }
}

/// Trim and collapse internal whitespace runs to a single space.
pub fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for part in raw.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(part);
    }
    out
}

/// Header names get the same treatment, plus a stray byte-order mark removed.
pub fn normalize_header(raw: &str) -> String {
    normalize_text(raw.trim_matches('\u{feff}'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(raw: &str) -> String {
        normalize_numeric(raw).into_string()
    }

    #[test]
    fn strips_separators_and_trailing_zeros() {
        assert_eq!(parsed("1,234.50"), "1234.5");
        assert_eq!(parsed("1234.5"), "1234.5");
        assert_eq!(parsed(" 2,000 "), "2000");
        assert_eq!(parsed("12.000"), "12");
        assert_eq!(parsed("-0.0"), "0");
        assert_eq!(parsed("0.050"), "0.05");
    }

    #[test]
    fn never_emits_scientific_notation() {
        assert_eq!(parsed("1.5e3"), "1500");
        assert_eq!(parsed("2.5E-4"), "0.00025");
    }

    #[test]
    fn values_beyond_decimal_range_stay_numeric() {
        assert_eq!(parsed("1e30"), "1000000000000000000000000000000");
        let wide = parsed("123,456,789,012,345,678,901,234,567,890");
        assert_eq!(wide.len(), 30);
        assert!(wide.starts_with("1234567890123456"));
        assert_eq!(parsed(&wide), wide);
        assert_eq!(parsed("-1e30"), "-1000000000000000000000000000000");
        assert!(normalize_numeric("1e400").is_malformed());
        assert!(normalize_numeric("inf").is_malformed());
    }

    #[test]
    fn blank_and_malformed_inputs() {
        assert_eq!(normalize_numeric("   "), NumericField::Empty);
        assert_eq!(
            normalize_numeric(" 12.5% "),
            NumericField::Malformed("12.5%".to_string())
        );
        assert!(normalize_numeric("n/a").is_malformed());
    }

    #[test]
    fn text_whitespace_is_collapsed() {
        assert_eq!(normalize_text("  Bor   South \n"), "Bor South");
        assert_eq!(normalize_text("   "), "");
    }

    #[test]
    fn header_line_breaks_are_collapsed() {
        assert_eq!(
            normalize_header("\u{feff}No. of  Male \nadults aged 18 - 60"),
            "No. of Male adults aged 18 - 60"
        );
    }
}
