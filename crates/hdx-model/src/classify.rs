//! Fixed-threshold classification policies.
//!
//! Both policies are constants of the pipeline, not call-time options.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound (inclusive) of the green hunger band, in percent.
pub const HUNGER_GREEN_MAX_PCT: f64 = 10.0;
/// Upper bound (inclusive) of the yellow hunger band, in percent.
pub const HUNGER_YELLOW_MAX_PCT: f64 = 20.0;
/// Scores strictly above this are red.
pub const RISK_RED_ABOVE: f64 = 0.66;
/// Scores strictly above this (and not red) are yellow.
pub const RISK_YELLOW_ABOVE: f64 = 0.33;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HungerStatus {
    Green,
    Yellow,
    Red,
}

impl HungerStatus {
    /// Classify a malnutrition proxy (GAM) percentage.
    pub fn from_proxy_gam(pct: Option<f64>) -> Option<Self> {
        let pct = pct.filter(|v| v.is_finite())?;
        Some(if pct <= HUNGER_GREEN_MAX_PCT {
            Self::Green
        } else if pct <= HUNGER_YELLOW_MAX_PCT {
            Self::Yellow
        } else {
            Self::Red
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

impl fmt::Display for HungerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskStatus {
    Green,
    Yellow,
    Red,
}

impl RiskStatus {
    /// Classify a funding-gap-derived risk score.
    pub fn from_score(score: f64) -> Self {
        if score > RISK_RED_ABOVE {
            Self::Red
        } else if score > RISK_YELLOW_ABOVE {
            Self::Yellow
        } else {
            Self::Green
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
