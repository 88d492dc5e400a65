//! Display formatting for KPI values and table cells.
//!
//! Everything is rendered in en-US style: comma thousands separator, period
//! decimal separator, `$` for currency.

use serde::Serialize;

/// How a KPI value is rendered on its card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricFormat {
    Currency,
    Number,
    Percentage,
}

impl MetricFormat {
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Currency => format_currency(value),
            Self::Number => format_number(value),
            Self::Percentage => format_percentage(value),
        }
    }
}

/// Format an amount as US dollars with two decimals.
/// Example: 1234567.891 -> "$1,234,567.89"
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let cents = (value.abs() * 100.0).round() as i64;
    let whole = format_with_thousands(cents / 100, ',');
    let sign = if value < 0.0 && cents != 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, whole, cents % 100)
}

/// Format a count or plain number. Fractions keep up to two decimals.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    format_trimmed(value)
}

/// Format a percentage with up to two decimals.
/// Example: 12.346 -> "12.35%"
pub fn format_percentage(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    format!("{}%", format_trimmed(value))
}

/// Fixed decimals without separators, for score columns.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

fn format_trimmed(value: f64) -> String {
    let hundredths = (value.abs() * 100.0).round() as i64;
    let sign = if value < 0.0 && hundredths != 0 { "-" } else { "" };
    let whole = format_with_thousands(hundredths / 100, ',');
    let fraction = hundredths % 100;

    if fraction == 0 {
        format!("{}{}", sign, whole)
    } else if fraction % 10 == 0 {
        format!("{}{}.{}", sign, whole, fraction / 10)
    } else {
        format!("{}{}.{:02}", sign, whole, fraction)
    }
}

/// Format a number with thousands separators.
fn format_with_thousands(n: i64, sep: char) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let s = n.to_string();
    let chars: Vec<char> = s.chars().rev().collect();
    let mut result = Vec::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(sep);
        }
        result.push(*c);
    }

    result.iter().rev().collect()
}
