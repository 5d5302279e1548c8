//! Duration and currency formatting for fee display.

use std::fmt::Debug;

/// Formats a confirmation time estimate.
pub trait DurationFormatter: Send + Sync + Debug {
    fn format_duration(&self, seconds: u64) -> String;
}

/// Formats a fiat amount.
pub trait CurrencyFormatter: Send + Sync + Debug {
    fn format_currency(&self, amount: f64) -> String;
}

/// Approximate durations: "~ 30 sec", "~ 2 min", "~ 1 hr 5 min".
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxDurationFormatter;

impl DurationFormatter for ApproxDurationFormatter {
    fn format_duration(&self, seconds: u64) -> String {
        if seconds < 60 {
            return format!("~ {seconds} sec");
        }

        let minutes = (seconds + 30) / 60;
        if minutes < 60 {
            return format!("~ {minutes} min");
        }

        let (hours, minutes) = (minutes / 60, minutes % 60);
        if minutes == 0 {
            format!("~ {hours} hr")
        } else {
            format!("~ {hours} hr {minutes} min")
        }
    }
}

/// Number layout for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LocaleStyle {
    group: char,
    decimal: char,
    symbol_first: bool,
}

impl LocaleStyle {
    fn for_locale(locale: &str) -> Self {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();

        match language.as_str() {
            "de" | "es" | "it" | "nl" | "pt" => Self {
                group: '.',
                decimal: ',',
                symbol_first: false,
            },
            "fr" => Self {
                group: ' ',
                decimal: ',',
                symbol_first: false,
            },
            _ => Self {
                group: ',',
                decimal: '.',
                symbol_first: true,
            },
        }
    }
}

/// Locale and currency-code aware formatter.
#[derive(Debug, Clone)]
pub struct LocaleCurrencyFormatter {
    code: String,
    locale: String,
    style: LocaleStyle,
}

impl Default for LocaleCurrencyFormatter {
    fn default() -> Self {
        Self::new("USD", "en-US")
    }
}

impl LocaleCurrencyFormatter {
    /// Create a formatter for an ISO 4217 code and a BCP 47 locale.
    pub fn new(code: &str, locale: &str) -> Self {
        Self {
            code: code.to_uppercase(),
            locale: locale.to_string(),
            style: LocaleStyle::for_locale(locale),
        }
    }

    /// Currency code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Locale tag.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    fn symbol(&self) -> Option<&'static str> {
        match self.code.as_str() {
            "USD" => Some("$"),
            "EUR" => Some("€"),
            "GBP" => Some("£"),
            "JPY" => Some("¥"),
            _ => None,
        }
    }

    fn fraction_digits(&self) -> u32 {
        match self.code.as_str() {
            "JPY" | "KRW" => 0,
            _ => 2,
        }
    }

    fn format_number(&self, amount: f64) -> String {
        let digits = self.fraction_digits();
        let scale = 10u128.pow(digits);
        let scaled = (amount * scale as f64).round();
        let (whole, fraction) = if scaled < u128::MAX as f64 {
            let units = scaled as u128;
            ((units / scale).to_string(), units % scale)
        } else {
            // Past u128 the f64 carries no fraction digits
            (format!("{:.0}", amount.trunc()), 0)
        };

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(self.style.group);
            }
            grouped.push(ch);
        }

        if digits > 0 {
            grouped.push(self.style.decimal);
            grouped.push_str(&format!("{:0width$}", fraction, width = digits as usize));
        }
        grouped
    }

    fn with_symbol(&self, number: &str) -> String {
        match (self.symbol(), self.style.symbol_first) {
            (Some(symbol), true) => format!("{symbol}{number}"),
            (Some(symbol), false) => format!("{number} {symbol}"),
            (None, true) => format!("{} {number}", self.code),
            (None, false) => format!("{number} {}", self.code),
        }
    }
}

impl CurrencyFormatter for LocaleCurrencyFormatter {
    fn format_currency(&self, amount: f64) -> String {
        if !amount.is_finite() {
            return self.with_symbol("–");
        }

        let smallest = 1.0 / 10u32.pow(self.fraction_digits()) as f64;
        if amount > 0.0 && amount < smallest / 2.0 {
            return format!("< {}", self.with_symbol(&self.format_number(smallest)));
        }

        let sign = if amount <= -smallest / 2.0 { "-" } else { "" };
        format!("{sign}{}", self.with_symbol(&self.format_number(amount.abs())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_formatting() {
        let f = ApproxDurationFormatter;
        assert_eq!(f.format_duration(12), "~ 12 sec");
        assert_eq!(f.format_duration(59), "~ 59 sec");
        assert_eq!(f.format_duration(60), "~ 1 min");
        assert_eq!(f.format_duration(150), "~ 3 min");
        assert_eq!(f.format_duration(3600), "~ 1 hr");
        assert_eq!(f.format_duration(3900), "~ 1 hr 5 min");
        // 59.5 minutes rounds up to an hour
        assert_eq!(f.format_duration(3570), "~ 1 hr");
    }

    #[test]
    fn test_usd_formatting() {
        let f = LocaleCurrencyFormatter::default();
        assert_eq!(f.format_currency(2.1), "$2.10");
        assert_eq!(f.format_currency(2000.0), "$2,000.00");
        assert_eq!(f.format_currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(f.format_currency(0.0), "$0.00");
        assert_eq!(f.format_currency(0.001), "< $0.01");
    }

    #[test]
    fn test_extreme_amounts() {
        let f = LocaleCurrencyFormatter::default();

        let huge = f.format_currency(1e40);
        assert!(huge.starts_with("$10,000,000,000,000,000,"));
        assert!(huge.ends_with(".00"));
        assert!(!huge.contains("340,282"));

        assert_eq!(f.format_currency(-2.5), "-$2.50");
        // Rounds to zero: no sign
        assert_eq!(f.format_currency(-0.001), "$0.00");
    }

    #[test]
    fn test_locale_formatting() {
        let de = LocaleCurrencyFormatter::new("eur", "de-DE");
        assert_eq!(de.code(), "EUR");
        assert_eq!(de.format_currency(1234.5), "1.234,50 €");

        let fr = LocaleCurrencyFormatter::new("EUR", "fr_FR");
        assert_eq!(fr.format_currency(1234.5), "1 234,50 €");

        let jpy = LocaleCurrencyFormatter::new("JPY", "en-US");
        assert_eq!(jpy.format_currency(1234.4), "¥1,234");
    }

    #[test]
    fn test_unknown_code_uses_code_prefix() {
        let chf = LocaleCurrencyFormatter::new("CHF", "en-US");
        assert_eq!(chf.format_currency(10.0), "CHF 10.00");

        let chf_de = LocaleCurrencyFormatter::new("CHF", "de-CH");
        assert_eq!(chf_de.format_currency(10.0), "10,00 CHF");
    }
}
