use super::{Calculation, ReportError};

pub const CSV_FILE_NAME: &str = "desglose_interes_compuesto.csv";
pub const CSV_HEADER: [&str; 5] = [
    "Año",
    "SaldoInicial",
    "Aportacion",
    "InteresesGanados",
    "SaldoFinal",
];

/// Yearly breakdown with raw, unformatted numbers. Records are joined by `\n`
/// with no terminator after the last row.
pub fn breakdown_csv(calculation: &Calculation) -> Result<String, ReportError> {
    let rows = calculation.breakdown()?;

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record([
            row.year.to_string(),
            raw_number(row.starting_balance),
            raw_number(row.contribution),
            raw_number(row.interest),
            raw_number(row.ending_balance),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let mut csv = String::from_utf8(bytes)?;
    if csv.ends_with('\n') {
        csv.pop();
    }
    Ok(csv)
}

// Shortest round-trip digits in JavaScript number notation:
// `1210.5`, `1e+21`, `1.5e-7`, `Infinity`, `NaN`.
fn raw_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{sign}Infinity");
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let exponent_form = format!("{value:e}");
        return match exponent_form.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => exponent_form,
        };
    }
    value.to_string()
}
