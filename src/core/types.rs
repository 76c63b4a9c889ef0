use std::num::NonZeroU32;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionInput {
    pub initial_capital: f64,
    pub regular_contribution: f64,
    pub contribution_frequency: u32,
    pub annual_interest_rate: f64,
    pub capitalization_frequency: NonZeroU32,
    pub term_years: u32,
}

impl ProjectionInput {
    pub fn annual_contribution(&self) -> f64 {
        self.regular_contribution * f64::from(self.contribution_frequency)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRecord {
    pub year: u32,
    pub starting_balance: f64,
    pub contribution: f64,
    pub interest: f64,
    pub ending_balance: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub years: Vec<YearRecord>,
    pub final_capital: f64,
    pub total_invested: f64,
    pub total_interest: f64,
}

impl ProjectionResult {
    pub fn performance_pct(&self) -> f64 {
        if self.total_invested > 0.0 {
            self.total_interest / self.total_invested * 100.0
        } else {
            0.0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}
