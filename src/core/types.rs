use serde::{Deserialize, Serialize};

pub const MIN_HORIZON_YEARS: u32 = 1;
pub const MAX_HORIZON_YEARS: u32 = 30;
pub const MIN_ANNUAL_RATE_PERCENT: f64 = 1.0;
pub const MAX_ANNUAL_RATE_PERCENT: f64 = 50.0;

const DEFAULT_MONTHLY_CONTRIBUTION: f64 = 5_000.0;
const DEFAULT_HORIZON_YEARS: u32 = 5;
const DEFAULT_ANNUAL_RATE_PERCENT: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionInputs {
    pub monthly_contribution: f64,
    pub horizon_years: u32,
    pub annual_rate_percent: f64,
    pub starting_balance: f64,
}

impl Default for ProjectionInputs {
    fn default() -> Self {
        Self {
            monthly_contribution: DEFAULT_MONTHLY_CONTRIBUTION,
            horizon_years: DEFAULT_HORIZON_YEARS,
            annual_rate_percent: DEFAULT_ANNUAL_RATE_PERCENT,
            starting_balance: 0.0,
        }
    }
}

impl ProjectionInputs {
    /// Applies the calculator's input limits: amounts are clamped to >= 0,
    /// the horizon to 1..=30 years and the rate to 1..=50 percent.
    pub fn sanitized(self) -> Self {
        Self {
            monthly_contribution: sanitize_amount_value(self.monthly_contribution),
            horizon_years: clamp_horizon_years(self.horizon_years),
            annual_rate_percent: clamp_annual_rate_percent(self.annual_rate_percent),
            starting_balance: sanitize_amount_value(self.starting_balance),
        }
    }

    pub fn project(&self) -> Vec<YearlySnapshot> {
        super::engine::project(
            self.monthly_contribution,
            self.horizon_years,
            self.annual_rate_percent,
            self.starting_balance,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlySnapshot {
    pub year: u32,
    pub invested: f64,
    pub returns: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub invested: f64,
    pub returns: f64,
    pub total_value: f64,
}

impl From<&YearlySnapshot> for ProjectionSummary {
    fn from(value: &YearlySnapshot) -> Self {
        Self {
            invested: value.invested,
            returns: value.returns,
            total_value: value.total_value,
        }
    }
}

/// Parses a user-entered amount. Empty, unparseable, negative and
/// non-finite entries all become zero.
pub fn sanitize_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed
        .parse::<f64>()
        .map(sanitize_amount_value)
        .unwrap_or(0.0)
}

pub fn sanitize_amount_value(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

pub fn clamp_horizon_years(years: u32) -> u32 {
    years.clamp(MIN_HORIZON_YEARS, MAX_HORIZON_YEARS)
}

pub fn clamp_annual_rate_percent(rate: f64) -> f64 {
    if !rate.is_finite() {
        return DEFAULT_ANNUAL_RATE_PERCENT;
    }
    rate.clamp(MIN_ANNUAL_RATE_PERCENT, MAX_ANNUAL_RATE_PERCENT)
}
