//! Everything built on top of a finished projection: formatted summaries,
//! exports, chart series and the share text.
//!
//! A [`Calculation`] is the unit of state. It is computed once from an input,
//! never mutated, and simply replaced when the inputs change.

pub mod chart;
pub mod currency;
pub mod document;
pub mod export;

use serde::Serialize;
use thiserror::Error;

use crate::core::{ProjectionInput, ProjectionResult, YearRecord, project};
use currency::CurrencyFormat;

pub use chart::{ChartKind, ChartSeries, chart_series};
pub use document::{ReportDocument, ShareMessage, Summary, report_document, share_message};
pub use export::{CSV_FILE_NAME, breakdown_csv};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("run a calculation first: there is no yearly breakdown to export")]
    NoCalculation,
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv buffer: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv output is not valid utf-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Calculation {
    input: ProjectionInput,
    currency: CurrencyFormat,
    result: ProjectionResult,
}

impl Calculation {
    pub fn compute(input: ProjectionInput, currency: CurrencyFormat) -> Self {
        let result = project(&input);
        Self {
            input,
            currency,
            result,
        }
    }

    pub fn input(&self) -> &ProjectionInput {
        &self.input
    }

    pub fn currency(&self) -> &CurrencyFormat {
        &self.currency
    }

    pub fn result(&self) -> &ProjectionResult {
        &self.result
    }

    pub fn actions_enabled(&self) -> bool {
        !(self.input.term_years == 0
            && self.input.initial_capital == 0.0
            && self.input.regular_contribution == 0.0)
    }

    pub fn view(&self, chart: ChartKind) -> ProjectionView<'_> {
        ProjectionView {
            input: &self.input,
            currency: &self.currency,
            summary: Summary::from_calculation(self),
            performance_pct: self.result.performance_pct(),
            result: &self.result,
            chart: chart_series(self, chart),
            actions_enabled: self.actions_enabled(),
        }
    }

    pub fn breakdown(&self) -> Result<&[YearRecord], ReportError> {
        if self.result.is_empty() {
            return Err(ReportError::NoCalculation);
        }
        Ok(&self.result.years)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionView<'a> {
    pub input: &'a ProjectionInput,
    pub currency: &'a CurrencyFormat,
    pub summary: Summary,
    pub performance_pct: f64,
    pub result: &'a ProjectionResult,
    pub chart: ChartSeries,
    pub actions_enabled: bool,
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::num::NonZeroU32;

    use super::Calculation;
    use super::currency::CurrencyFormat;
    use crate::core::ProjectionInput;

    /// 1000 initial, 100 a year, 50% annual rate, yearly compounding: every
    /// figure is exact in binary floating point.
    pub fn exact_input(term_years: u32) -> ProjectionInput {
        ProjectionInput {
            initial_capital: 1_000.0,
            regular_contribution: 100.0,
            contribution_frequency: 1,
            annual_interest_rate: 0.5,
            capitalization_frequency: NonZeroU32::new(1).unwrap(),
            term_years,
        }
    }

    pub fn exact_calculation(term_years: u32) -> Calculation {
        Calculation::compute(exact_input(term_years), CurrencyFormat::default())
    }
}
