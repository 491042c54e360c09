mod calculator;
mod engine;
mod format;
mod types;

pub use calculator::{Calculator, ListenerId};
pub use engine::{project, summarize};
pub use format::{format_inr, round_display};
pub use types::{
    MAX_ANNUAL_RATE_PERCENT, MAX_HORIZON_YEARS, MIN_ANNUAL_RATE_PERCENT, MIN_HORIZON_YEARS,
    ProjectionInputs, ProjectionSummary, YearlySnapshot, clamp_annual_rate_percent,
    clamp_horizon_years, sanitize_amount, sanitize_amount_value,
};
