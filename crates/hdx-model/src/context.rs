//! Externally supplied national risk context.

use serde::{Deserialize, Serialize};

use crate::classify::RiskStatus;
use crate::country::CountryCode;

/// Per-country context produced upstream of this pipeline.
///
/// Read-only input to the rollup. A country without a supplied record is
/// represented by [`RiskContext::unavailable`], never by omission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskContext {
    pub iso3: CountryCode,
    pub risk_score: Option<f64>,
    pub status: Option<String>,
    pub funding_gap_ratio: Option<f64>,
    pub flood_area_pct: Option<f64>,
}

impl RiskContext {
    /// The all-null context for a country the upstream source does not cover.
    pub fn unavailable(iso3: CountryCode) -> Self {
        Self {
            iso3,
            risk_score: None,
            status: None,
            funding_gap_ratio: None,
            flood_area_pct: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.risk_score.is_some()
            || self.status.is_some()
            || self.funding_gap_ratio.is_some()
            || self.flood_area_pct.is_some()
    }

    /// Supplied status label, or the status implied by the risk score.
    pub fn effective_status(&self) -> Option<String> {
        self.status
            .clone()
            .or_else(|| self.risk_score.map(|s| RiskStatus::from_score(s).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ssd() -> CountryCode {
        CountryCode::parse("SSD").unwrap()
    }

    #[test]
    fn unavailable_context_is_all_null() {
        let ctx = RiskContext::unavailable(ssd());
        assert!(!ctx.is_available());
        assert_eq!(ctx.effective_status(), None);
    }

    #[test]
    fn status_falls_back_to_score() {
        let ctx = RiskContext {
            risk_score: Some(0.7),
            ..RiskContext::unavailable(ssd())
        };
        assert_eq!(ctx.effective_status().as_deref(), Some("red"));

        let labelled = RiskContext {
            status: Some("yellow".into()),
            risk_score: Some(0.9),
            ..RiskContext::unavailable(ssd())
        };
        assert_eq!(labelled.effective_status().as_deref(), Some("yellow"));
    }
}
