//! Position health classification

use console::{style, StyledObject};

/// Health of a position, derived from its collateralization ratio (percent)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    NoPosition,
    VeryHealthy,
    Healthy,
    AtRisk,
    Liquidatable,
}

/// Ratio below which the dashboard suggests adding collateral
pub const WARNING_RATIO_PCT: f64 = 170.0;

impl HealthStatus {
    /// Classify a ratio given in percent. A ratio of 0 means "no position".
    pub fn classify(ratio: f64) -> Self {
        if ratio == 0.0 {
            HealthStatus::NoPosition
        } else if ratio >= 200.0 {
            HealthStatus::VeryHealthy
        } else if ratio >= 170.0 {
            HealthStatus::Healthy
        } else if ratio >= 150.0 {
            HealthStatus::AtRisk
        } else {
            HealthStatus::Liquidatable
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::NoPosition => "No Position",
            HealthStatus::VeryHealthy => "Very Healthy",
            HealthStatus::Healthy => "Healthy",
            HealthStatus::AtRisk => "At Risk",
            HealthStatus::Liquidatable => "Liquidatable",
        }
    }

    /// Apply the status colour to some text
    pub fn paint<D>(&self, text: D) -> StyledObject<D> {
        match self {
            HealthStatus::NoPosition => style(text).dim(),
            HealthStatus::VeryHealthy => style(text).green(),
            HealthStatus::Healthy => style(text).blue(),
            HealthStatus::AtRisk => style(text).yellow(),
            HealthStatus::Liquidatable => style(text).red(),
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Whether the "consider adding collateral" hint applies
pub fn needs_more_collateral(ratio: f64) -> bool {
    ratio > 0.0 && ratio < WARNING_RATIO_PCT
}
