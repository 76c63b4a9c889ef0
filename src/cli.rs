use std::io::{self, Write};
use std::net::{IpAddr, SocketAddr};

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;

use crate::core::input::{self, clamp_count, parse_amount, parse_count};
use crate::core::{InputError, ProjectionInput, RiskProfile};
use crate::report::currency::{CurrencyFormat, DEFAULT_CURRENCY_CODE, DEFAULT_FALLBACK_SYMBOL};
use crate::report::{
    Calculation, ChartKind, ReportError, Summary, breakdown_csv, report_document, share_message,
};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliRiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl From<CliRiskProfile> for RiskProfile {
    fn from(value: CliRiskProfile) -> Self {
        match value {
            CliRiskProfile::Conservative => RiskProfile::Conservative,
            CliRiskProfile::Moderate => RiskProfile::Moderate,
            CliRiskProfile::Aggressive => RiskProfile::Aggressive,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
    Report,
    Share,
}

#[derive(Parser, Debug)]
#[command(
    name = "compound",
    about = "Compound interest calculator (yearly breakdown, CSV export, web UI)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Project an account year by year and print the result
    Project {
        #[command(flatten)]
        args: ProjectArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Serve the web calculator and its JSON API
    Serve(ServeArgs),
}

/// Numeric fields are kept as raw text and parsed with the form rules: anything
/// that does not start with a number counts as 0.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub initial_capital: String,
    #[arg(
        long,
        default_value = "0",
        allow_hyphen_values = true,
        help = "Amount added on each contribution; negative values model withdrawals"
    )]
    pub contribution: String,
    #[arg(
        long,
        default_value = "12",
        allow_hyphen_values = true,
        help = "Contributions per year, 0 for none"
    )]
    pub contribution_frequency: String,
    #[arg(
        long,
        allow_hyphen_values = true,
        help = "Annual interest rate in percent, e.g. 7; defaults to the risk preset or 0"
    )]
    pub rate: Option<String>,
    #[arg(
        long,
        default_value = "12",
        allow_hyphen_values = true,
        help = "Times per year interest is credited, at least 1"
    )]
    pub capitalization_frequency: String,
    #[arg(long, default_value = "0", allow_hyphen_values = true, help = "Term in years")]
    pub term: String,
    #[arg(long, env = "COMPOUND_CURRENCY", default_value = DEFAULT_CURRENCY_CODE)]
    pub currency: String,
    #[arg(
        long,
        default_value = DEFAULT_FALLBACK_SYMBOL,
        help = "Symbol used when the currency code is not recognized"
    )]
    pub fallback_symbol: String,
    #[arg(long, value_enum, help = "Rate preset used when --rate is not given")]
    pub risk: Option<CliRiskProfile>,
}

impl Default for ProjectArgs {
    fn default() -> Self {
        Self {
            initial_capital: "0".to_string(),
            contribution: "0".to_string(),
            contribution_frequency: "12".to_string(),
            rate: None,
            capitalization_frequency: "12".to_string(),
            term: "0".to_string(),
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            fallback_symbol: DEFAULT_FALLBACK_SYMBOL.to_string(),
            risk: None,
        }
    }
}

impl ProjectArgs {
    pub fn currency_format(&self) -> CurrencyFormat {
        CurrencyFormat::new(self.currency.trim(), self.fallback_symbol.as_str())
    }

    pub fn calculation(&self) -> Result<Calculation, InputError> {
        Ok(Calculation::compute(
            build_input(self)?,
            self.currency_format(),
        ))
    }
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(env = "COMPOUND_PORT", default_value_t = 8080)]
    pub port: u16,
    #[arg(long, env = "COMPOUND_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,
}

impl ServeArgs {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

pub fn build_input(args: &ProjectArgs) -> Result<ProjectionInput, InputError> {
    let rate_pct = match (&args.rate, args.risk) {
        (Some(raw), _) => parse_amount(raw),
        (None, Some(risk)) => RiskProfile::from(risk).annual_rate_pct(),
        (None, None) => 0.0,
    };

    Ok(ProjectionInput {
        initial_capital: parse_amount(&args.initial_capital),
        regular_contribution: parse_amount(&args.contribution),
        contribution_frequency: clamp_count(parse_count(&args.contribution_frequency)),
        annual_interest_rate: rate_pct / 100.0,
        capitalization_frequency: input::capitalization_frequency(parse_count(
            &args.capitalization_frequency,
        ))?,
        term_years: input::term_years(parse_count(&args.term))?,
    })
}

pub fn run_project(args: &ProjectArgs, format: OutputFormat) -> Result<(), CliError> {
    let calculation = args.calculation()?;
    let output = render(&calculation, format)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    if !output.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

fn render(calculation: &Calculation, format: OutputFormat) -> Result<String, CliError> {
    let output = match format {
        OutputFormat::Table => render_table(calculation),
        OutputFormat::Csv => breakdown_csv(calculation)?,
        OutputFormat::Json => serde_json::to_string_pretty(&calculation.view(ChartKind::Line))?,
        OutputFormat::Report => serde_json::to_string_pretty(&report_document(calculation)?)?,
        OutputFormat::Share => share_message(calculation)?.text,
    };
    Ok(output)
}

fn render_table(calculation: &Calculation) -> String {
    let summary = Summary::from_calculation(calculation);
    let mut out = format!(
        "Capital Final:       {}\nTotal Invertido:     {}\nIntereses Generados: {}\nRendimiento:         {}\n",
        summary.final_capital,
        summary.total_invested,
        summary.interest_generated,
        summary.performance,
    );

    let Ok(document) = report_document(calculation) else {
        out.push_str("\nSin desglose anual: el plazo es de 0 años.\n");
        return out;
    };

    let mut widths = document.columns.map(|c| c.chars().count());
    for row in &document.rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    out.push('\n');
    push_table_line(&mut out, &document.columns, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_table_line(&mut out, &rule, &widths);
    for row in &document.rows {
        push_table_line(&mut out, row, &widths);
    }
    out
}

fn push_table_line<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:>width$}", cell.as_ref(), width = *width))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_args() -> ProjectArgs {
        ProjectArgs {
            initial_capital: "1000".to_string(),
            contribution: "100".to_string(),
            contribution_frequency: "1".to_string(),
            rate: Some("10".to_string()),
            capitalization_frequency: "1".to_string(),
            term: "1".to_string(),
            ..ProjectArgs::default()
        }
    }

    #[test]
    fn build_input_converts_percent_rate_to_fraction() {
        let input = build_input(&sample_args()).expect("valid input");
        assert_approx(input.initial_capital, 1_000.0);
        assert_approx(input.regular_contribution, 100.0);
        assert_eq!(input.contribution_frequency, 1);
        assert_approx(input.annual_interest_rate, 0.10);
        assert_eq!(input.capitalization_frequency.get(), 1);
        assert_eq!(input.term_years, 1);
    }

    #[test]
    fn build_input_defaults_invalid_amounts_to_zero() {
        let mut args = sample_args();
        args.initial_capital = "abc".to_string();
        args.contribution = String::new();
        args.rate = Some("n/a".to_string());
        args.term = "ten".to_string();

        let input = build_input(&args).expect("valid input");
        assert_approx(input.initial_capital, 0.0);
        assert_approx(input.regular_contribution, 0.0);
        assert_approx(input.annual_interest_rate, 0.0);
        assert_eq!(input.term_years, 0);
    }

    #[test]
    fn build_input_rejects_zero_capitalization_frequency() {
        let mut args = sample_args();
        args.capitalization_frequency = "0".to_string();

        let err = build_input(&args).expect_err("must reject zero periods");
        assert_eq!(err, InputError::CapitalizationFrequency(0));
    }

    #[test]
    fn build_input_clamps_negative_counts() {
        let mut args = sample_args();
        args.contribution_frequency = "-4".to_string();
        args.term = "-2".to_string();

        let input = build_input(&args).expect("valid input");
        assert_eq!(input.contribution_frequency, 0);
        assert_eq!(input.term_years, 0);
    }

    #[test]
    fn build_input_keeps_negative_capital_and_contribution() {
        let mut args = sample_args();
        args.initial_capital = "-500".to_string();
        args.contribution = "-25".to_string();

        let input = build_input(&args).expect("valid input");
        assert_approx(input.initial_capital, -500.0);
        assert_approx(input.regular_contribution, -25.0);
    }

    #[test]
    fn risk_preset_applies_only_without_explicit_rate() {
        let mut args = sample_args();
        args.rate = None;
        args.risk = Some(CliRiskProfile::Moderate);
        let preset = build_input(&args).expect("valid input");
        assert_approx(preset.annual_interest_rate, 0.07);

        args.rate = Some("2.5".to_string());
        let explicit = build_input(&args).expect("valid input");
        assert_approx(explicit.annual_interest_rate, 0.025);
    }

    #[test]
    fn cli_parses_project_flags() {
        let cli = Cli::try_parse_from([
            "compound",
            "project",
            "--initial-capital",
            "-1000",
            "--rate",
            "5",
            "--term",
            "3",
            "--risk",
            "aggressive",
            "--format",
            "csv",
        ])
        .expect("cli should parse");

        let Command::Project { args, format } = cli.command else {
            panic!("expected project command");
        };
        assert_eq!(format, OutputFormat::Csv);
        assert_eq!(args.initial_capital, "-1000");
        assert_eq!(args.rate.as_deref(), Some("5"));
        assert_eq!(args.capitalization_frequency, "12");
        assert_eq!(args.risk, Some(CliRiskProfile::Aggressive));
    }

    #[test]
    fn cli_parses_serve_port_and_bind() {
        let cli = Cli::try_parse_from(["compound", "serve", "9000", "--bind", "127.0.0.1"])
            .expect("cli should parse");
        let Command::Serve(serve) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(serve.addr(), "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn table_output_lists_summary_and_rows() {
        let calculation = sample_args().calculation().expect("valid input");
        let table = render(&calculation, OutputFormat::Table).expect("table");
        assert!(table.contains("Capital Final:       $1,210.00"));
        assert!(table.contains("Rendimiento:         10.00%"));
        assert!(table.contains("Saldo Inicial"));
        assert!(table.contains("$1,210.00"));
        assert_eq!(table.lines().count(), 8);
    }

    #[test]
    fn table_output_notes_missing_breakdown() {
        let mut args = sample_args();
        args.term = "0".to_string();
        let calculation = args.calculation().expect("valid input");
        let table = render(&calculation, OutputFormat::Table).expect("table");
        assert!(table.contains("Sin desglose anual"));
    }

    #[test]
    fn csv_and_share_outputs_reject_zero_term() {
        let mut args = sample_args();
        args.term = "0".to_string();
        let calculation = args.calculation().expect("valid input");

        for format in [OutputFormat::Csv, OutputFormat::Share, OutputFormat::Report] {
            let err = render(&calculation, format).expect_err("must reject empty breakdown");
            assert!(matches!(err, CliError::Report(ReportError::NoCalculation)));
        }
    }

    #[test]
    fn json_output_contains_summary_and_years() {
        let calculation = sample_args().calculation().expect("valid input");
        let json = render(&calculation, OutputFormat::Json).expect("json");
        assert!(json.contains("\"summary\""));
        assert!(json.contains("\"years\""));
        assert!(json.contains("\"endingBalance\""));
        assert!(json.contains("\"actionsEnabled\": true"));
    }
}
