//! Rescaling of raw decision values into a `[0, 1]` risk score.

/// Decision value at which risk reaches 0.
pub const NORMAL_ANCHOR: f64 = 0.1;
/// Decision value at which risk reaches 1.
pub const ANOMALY_ANCHOR: f64 = -0.3;

/// Risk reported when no model is available.
pub const UNSCORED_RISK: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskScale {
    pub normal_anchor: f64,
    pub anomaly_anchor: f64,
}

impl Default for RiskScale {
    fn default() -> Self {
        Self {
            normal_anchor: NORMAL_ANCHOR,
            anomaly_anchor: ANOMALY_ANCHOR,
        }
    }
}

impl RiskScale {
    /// Affine map of `raw` onto the anchors, clamped to `[0, 1]`.
    pub fn risk(&self, raw: f64) -> f64 {
        let span = self.normal_anchor - self.anomaly_anchor;
        let risk = 1.0 - (raw - self.anomaly_anchor) / span;
        if risk.is_nan() {
            return 1.0;
        }
        risk.clamp(0.0, 1.0)
    }
}

pub fn risk_from_decision(raw: f64) -> f64 {
    RiskScale::default().risk(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchors() {
        assert!(risk_from_decision(0.1).abs() < 1e-12);
        assert!((risk_from_decision(-0.3) - 1.0).abs() < 1e-12);
        assert!((risk_from_decision(-0.1) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_clamped_for_extremes() {
        for raw in [-1e9, -5.0, -0.31, 0.11, 3.0, 1e9, f64::INFINITY, f64::NEG_INFINITY] {
            let r = risk_from_decision(raw);
            assert!((0.0..=1.0).contains(&r), "raw {raw} -> {r}");
        }
        assert_eq!(risk_from_decision(1e9), 0.0);
        assert_eq!(risk_from_decision(-1e9), 1.0);
    }

    #[test]
    fn test_nan_is_max_risk() {
        assert_eq!(risk_from_decision(f64::NAN), 1.0);
    }
}
