use super::types::{ProjectionSummary, YearlySnapshot};

const MONTHS_PER_YEAR: u32 = 12;

/// Projects a monthly SIP year by year.
///
/// Each month the contribution is added first and the whole balance then
/// grows by one month of the nominal rate, so the last contribution of a
/// year is compounded once before that year's snapshot is taken. Values are
/// never rounded here; callers round for display only.
///
/// No range checks are applied: any horizon (including zero) and any rate
/// (including negative ones) compound as plain arithmetic.
pub fn project(
    monthly_contribution: f64,
    horizon_years: u32,
    annual_rate_percent: f64,
    starting_balance: f64,
) -> Vec<YearlySnapshot> {
    let monthly_rate = annual_rate_percent / 12.0 / 100.0;
    let growth = 1.0 + monthly_rate;
    let yearly_invested = monthly_contribution * MONTHS_PER_YEAR as f64;

    let mut breakdown = Vec::with_capacity(horizon_years as usize);
    let mut current_value = starting_balance;

    for year in 1..=horizon_years {
        for _ in 0..MONTHS_PER_YEAR {
            current_value = (current_value + monthly_contribution) * growth;
        }

        let invested = yearly_invested * year as f64 + starting_balance;
        breakdown.push(YearlySnapshot {
            year,
            invested,
            returns: current_value - invested,
            total_value: current_value,
        });
    }

    breakdown
}

pub fn summarize(breakdown: &[YearlySnapshot]) -> ProjectionSummary {
    breakdown
        .last()
        .map(ProjectionSummary::from)
        .unwrap_or_default()
}
