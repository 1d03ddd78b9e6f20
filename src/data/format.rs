//! Number formatting for metric cards and tables

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormat {
    #[default]
    Thousands,
    Currency,
    Percentage,
    Plain,
}

impl NumberFormat {
    pub fn apply(&self, value: f64) -> String {
        match self {
            NumberFormat::Thousands => format_thousands(value),
            NumberFormat::Currency => format_currency(value),
            NumberFormat::Percentage => format_percentage(value),
            NumberFormat::Plain => value.to_string(),
        }
    }
}

/// Insert `,` between groups of three integer digits
fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn with_separators(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, group_digits(int_part), frac),
        None => format!("{}{}", sign, group_digits(int_part)),
    }
}

/// `1234567.8` -> `1,234,568`
pub fn format_thousands(value: f64) -> String {
    with_separators(value, 0)
}

/// `1234.5` -> `R$ 1,234.50`
pub fn format_currency(value: f64) -> String {
    format!("R$ {}", with_separators(value, 2))
}

/// `12.34` -> `12.3%`
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(format_thousands(516500.0), "516,500");
        assert_eq!(format_thousands(999.6), "1,000");
        assert_eq!(format_thousands(12.0), "12");
        assert_eq!(format_thousands(-1234.0), "-1,234");
    }

    #[test]
    fn test_currency_and_percentage() {
        assert_eq!(format_currency(5600.0), "R$ 5,600.00");
        assert_eq!(format_percentage(39.87), "39.9%");
        assert_eq!(NumberFormat::Percentage.apply(5.0), "5.0%");
    }
}
