use serde::Serialize;

use super::Calculation;
use crate::core::YearRecord;

const PLACEHOLDER_YEARS: u32 = 10;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: &'static str,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub stacked: bool,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Bar charts stack starting balance, contributions and interest per year; line
/// charts follow the ending balance. Without a breakdown the axis still shows
/// placeholder years at the initial capital.
pub fn chart_series(calculation: &Calculation, kind: ChartKind) -> ChartSeries {
    let rows = &calculation.result().years;
    let initial_capital = calculation.input().initial_capital;
    let display_years = match calculation.input().term_years {
        0 => PLACEHOLDER_YEARS,
        term => term,
    };
    let labels = (1..=display_years).map(|year| year.to_string()).collect();

    let datasets = match kind {
        ChartKind::Bar => vec![
            Dataset {
                label: "Saldo Inicial",
                data: column_values(rows, display_years, initial_capital, |row| {
                    row.starting_balance
                }),
            },
            Dataset {
                label: "Aportaciones",
                data: column_values(rows, display_years, 0.0, |row| row.contribution),
            },
            Dataset {
                label: "Intereses Ganados",
                data: column_values(rows, display_years, 0.0, |row| row.interest),
            },
        ],
        ChartKind::Line => vec![Dataset {
            label: "Saldo Final",
            data: column_values(rows, display_years, initial_capital, |row| {
                row.ending_balance
            }),
        }],
    };

    ChartSeries {
        kind,
        stacked: kind == ChartKind::Bar,
        labels,
        datasets,
    }
}

fn column_values(
    rows: &[YearRecord],
    display_years: u32,
    placeholder: f64,
    pick: fn(&YearRecord) -> f64,
) -> Vec<f64> {
    if rows.is_empty() {
        vec![placeholder; display_years as usize]
    } else {
        rows.iter().map(pick).collect()
    }
}
