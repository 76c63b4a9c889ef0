use serde::Serialize;

use super::currency::format_percent;
use super::{Calculation, ReportError};

pub const REPORT_TITLE: &str = "Resultados del Cálculo de Interés Compuesto";
pub const REPORT_FILE_NAME: &str = "resultados_interes_compuesto.pdf";
pub const REPORT_COLUMNS: [&str; 5] = [
    "Año",
    "Saldo Inicial",
    "Aportación",
    "Intereses",
    "Saldo Final",
];

pub const SHARE_TITLE: &str = "Resultado del Cálculo de Interés Compuesto";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub final_capital: String,
    pub total_invested: String,
    pub interest_generated: String,
    pub performance: String,
}

impl Summary {
    pub fn from_calculation(calculation: &Calculation) -> Self {
        let format = calculation.currency();
        let result = calculation.result();
        Self {
            final_capital: format.format(result.final_capital),
            total_invested: format.format(result.total_invested),
            interest_generated: format.format(result.total_interest),
            performance: format_percent(result.performance_pct()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub title: &'static str,
    pub file_name: &'static str,
    pub summary_lines: Vec<String>,
    pub columns: [&'static str; 5],
    pub rows: Vec<[String; 5]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareMessage {
    pub title: &'static str,
    pub text: String,
}

pub fn report_document(calculation: &Calculation) -> Result<ReportDocument, ReportError> {
    let breakdown = calculation.breakdown()?;
    let format = calculation.currency();
    let summary = Summary::from_calculation(calculation);

    let summary_lines = vec![
        format!("Capital Final: {}", summary.final_capital),
        format!("Total Invertido: {}", summary.total_invested),
        format!("Intereses Generados: {}", summary.interest_generated),
        format!("Rendimiento: {}", summary.performance),
        format!("Plazo: {} Años", calculation.input().term_years),
    ];

    let rows = breakdown
        .iter()
        .map(|row| {
            [
                row.year.to_string(),
                format.format(row.starting_balance),
                format.format(row.contribution),
                format.format(row.interest),
                format.format(row.ending_balance),
            ]
        })
        .collect();

    Ok(ReportDocument {
        title: REPORT_TITLE,
        file_name: REPORT_FILE_NAME,
        summary_lines,
        columns: REPORT_COLUMNS,
        rows,
    })
}

pub fn share_message(calculation: &Calculation) -> Result<ShareMessage, ReportError> {
    calculation.breakdown()?;
    let summary = Summary::from_calculation(calculation);
    let text = format!(
        "Mi inversión después de {} años será {}, con {} en intereses.\n\nCalculado con la Calculadora de Interés Compuesto.",
        calculation.input().term_years,
        summary.final_capital,
        summary.interest_generated,
    );
    Ok(ShareMessage {
        title: SHARE_TITLE,
        text,
    })
}
