use super::engine::summarize;
use super::types::{
    ProjectionInputs, ProjectionSummary, YearlySnapshot, clamp_annual_rate_percent,
    clamp_horizon_years, sanitize_amount,
};

pub type ListenerId = usize;

type Listener = Box<dyn FnMut(&ProjectionInputs, &[YearlySnapshot]) + Send>;

/// Live calculator state. Every parameter change re-runs the full
/// projection and hands the new breakdown to each registered listener.
pub struct Calculator {
    inputs: ProjectionInputs,
    breakdown: Vec<YearlySnapshot>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: ListenerId,
}

impl Calculator {
    pub fn new(inputs: ProjectionInputs) -> Self {
        let inputs = inputs.sanitized();
        Self {
            breakdown: inputs.project(),
            inputs,
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    pub fn inputs(&self) -> &ProjectionInputs {
        &self.inputs
    }

    pub fn breakdown(&self) -> &[YearlySnapshot] {
        &self.breakdown
    }

    pub fn summary(&self) -> ProjectionSummary {
        summarize(&self.breakdown)
    }

    pub fn on_change<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ProjectionInputs, &[YearlySnapshot]) + Send + 'static,
    {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn set_monthly_contribution(&mut self, raw: &str) {
        self.update(|inputs| inputs.monthly_contribution = sanitize_amount(raw));
    }

    pub fn set_horizon_years(&mut self, years: u32) {
        self.update(|inputs| inputs.horizon_years = clamp_horizon_years(years));
    }

    pub fn set_annual_rate_percent(&mut self, rate: f64) {
        self.update(|inputs| inputs.annual_rate_percent = clamp_annual_rate_percent(rate));
    }

    pub fn set_starting_balance(&mut self, raw: &str) {
        self.update(|inputs| inputs.starting_balance = sanitize_amount(raw));
    }

    /// Replaces every parameter at once; listeners fire a single time.
    pub fn set_inputs(&mut self, inputs: ProjectionInputs) {
        self.update(|current| *current = inputs.sanitized());
    }

    fn update(&mut self, apply: impl FnOnce(&mut ProjectionInputs)) {
        apply(&mut self.inputs);
        self.breakdown = self.inputs.project();
        log::debug!(
            "recomputed {} year breakdown for {:?}",
            self.breakdown.len(),
            self.inputs
        );
        for (_, listener) in &mut self.listeners {
            listener(&self.inputs, &self.breakdown);
        }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(ProjectionInputs::default())
    }
}
