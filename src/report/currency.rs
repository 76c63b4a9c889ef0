use serde::Serialize;

pub const DEFAULT_CURRENCY_CODE: &str = "USD";
pub const DEFAULT_FALLBACK_SYMBOL: &str = "$";

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Jpy,
    Mxn,
    Cad,
    Aud,
    Brl,
    Inr,
    Cop,
    Ars,
    Clp,
}

impl Currency {
    pub fn from_code(code: &str) -> Option<Self> {
        let currency = match code.trim().to_ascii_uppercase().as_str() {
            "USD" => Currency::Usd,
            "EUR" => Currency::Eur,
            "GBP" => Currency::Gbp,
            "JPY" => Currency::Jpy,
            "MXN" => Currency::Mxn,
            "CAD" => Currency::Cad,
            "AUD" => Currency::Aud,
            "BRL" => Currency::Brl,
            "INR" => Currency::Inr,
            "COP" => Currency::Cop,
            "ARS" => Currency::Ars,
            "CLP" => Currency::Clp,
            _ => return None,
        };
        Some(currency)
    }

    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Mxn => "MXN",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
            Currency::Brl => "BRL",
            Currency::Inr => "INR",
            Currency::Cop => "COP",
            Currency::Ars => "ARS",
            Currency::Clp => "CLP",
        }
    }

    /// Prefix used by en-US currency formatting. Currencies without a
    /// narrow symbol show their code followed by a no-break space.
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy => "¥",
            Currency::Mxn => "MX$",
            Currency::Cad => "CA$",
            Currency::Aud => "A$",
            Currency::Brl => "R$",
            Currency::Inr => "₹",
            Currency::Cop => "COP\u{a0}",
            Currency::Ars => "ARS\u{a0}",
            Currency::Clp => "CLP\u{a0}",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyFormat {
    pub code: String,
    pub fallback_symbol: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY_CODE, DEFAULT_FALLBACK_SYMBOL)
    }
}

impl CurrencyFormat {
    pub fn new(code: impl Into<String>, fallback_symbol: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            fallback_symbol: fallback_symbol.into(),
        }
    }

    pub fn currency(&self) -> Option<Currency> {
        Currency::from_code(&self.code)
    }

    pub fn symbol(&self) -> &str {
        match self.currency() {
            Some(currency) => currency.symbol().trim_end_matches('\u{a0}'),
            None => &self.fallback_symbol,
        }
    }

    pub fn format(&self, value: f64) -> String {
        match self.currency() {
            Some(currency) => format_with_locale(value, currency.symbol()),
            None => format_with_symbol(value, &self.fallback_symbol),
        }
    }
}

pub fn format_percent(value: f64) -> String {
    if value == 0.0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", round_cents(value))
}

// Sign goes before the symbol: `-$1,234.50`.
fn format_with_locale(value: f64, symbol: &str) -> String {
    if value == 0.0 {
        return format!("{symbol}0");
    }
    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{sign}{symbol}{}", grouped_magnitude(value))
}

// Manual path: the symbol is glued to the signed number, `$-1,234.50`.
fn format_with_symbol(value: f64, symbol: &str) -> String {
    if value == 0.0 {
        return format!("{symbol}0");
    }
    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{symbol}{sign}{}", grouped_magnitude(value))
}

fn grouped_magnitude(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return "∞".to_string();
    }

    let fixed = format!("{:.2}", round_cents(value.abs()));
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{}.{frac_part}", group_thousands(int_part))
}

// Half-cent ties round away from zero, as en-US number formatting does. Past
// 2^53 / 100 every value is already a whole number of cents.
fn round_cents(value: f64) -> f64 {
    if value.abs() >= 9.0e13 {
        return value;
    }
    (value * 100.0).round() / 100.0
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd() -> CurrencyFormat {
        CurrencyFormat::default()
    }

    #[test]
    fn formats_known_currency_with_grouping_and_two_decimals() {
        assert_eq!(usd().format(1234.5), "$1,234.50");
        assert_eq!(usd().format(1_000_000.0), "$1,000,000.00");
        assert_eq!(usd().format(0.5), "$0.50");
        assert_eq!(usd().format(999.999), "$1,000.00");
    }

    #[test]
    fn zero_renders_without_decimals() {
        assert_eq!(usd().format(0.0), "$0");
        assert_eq!(usd().format(-0.0), "$0");
        assert_eq!(CurrencyFormat::new("EUR", "$").format(0.0), "€0");
    }

    #[test]
    fn negative_sign_precedes_symbol_for_known_currency() {
        assert_eq!(usd().format(-5.0), "-$5.00");
        assert_eq!(CurrencyFormat::new("eur", "$").format(-1234.5), "-€1,234.50");
    }

    #[test]
    fn code_style_symbols_use_no_break_space() {
        let cop = CurrencyFormat::new("COP", "$");
        assert_eq!(cop.format(1500.0), "COP\u{a0}1,500.00");
        assert_eq!(cop.symbol(), "COP");
    }

    #[test]
    fn unknown_code_falls_back_to_symbol_path() {
        let format = CurrencyFormat::new("XYZ", "₡");
        assert_eq!(format.currency(), None);
        assert_eq!(format.format(1234.5), "₡1,234.50");
        assert_eq!(format.format(-1234.5), "₡-1,234.50");
        assert_eq!(format.format(0.0), "₡0");
        assert_eq!(format.symbol(), "₡");
    }

    #[test]
    fn non_finite_values_do_not_break_formatting() {
        assert_eq!(usd().format(f64::INFINITY), "$∞");
        assert_eq!(usd().format(f64::NEG_INFINITY), "-$∞");
        assert_eq!(usd().format(f64::NAN), "$NaN");
        assert_eq!(CurrencyFormat::new("??", "$").format(f64::NEG_INFINITY), "$-∞");
    }

    #[test]
    fn percent_uses_two_decimals() {
        assert_eq!(format_percent(0.0), "0.00%");
        assert_eq!(format_percent(-0.0), "0.00%");
        assert_eq!(format_percent(10.0), "10.00%");
        assert_eq!(format_percent(3.14159), "3.14%");
    }

    #[test]
    fn half_cent_ties_round_away_from_zero() {
        assert_eq!(usd().format(3190.625), "$3,190.63");
        assert_eq!(usd().format(0.125), "$0.13");
        assert_eq!(usd().format(-0.375), "-$0.38");
        assert_eq!(CurrencyFormat::new("XYZ", "$").format(2.875), "$2.88");
        assert_eq!(format_percent(0.125), "0.13%");
        assert_eq!(format_percent(-0.125), "-0.13%");
        assert_eq!(usd().format(1.0e17), "$100,000,000,000,000,000.00");
    }

    #[test]
    fn known_symbols_are_exposed() {
        assert_eq!(usd().symbol(), "$");
        assert_eq!(CurrencyFormat::new("GBP", "$").symbol(), "£");
        assert_eq!(Currency::from_code(" mxn "), Some(Currency::Mxn));
        assert_eq!(Currency::Mxn.code(), "MXN");
    }
}
