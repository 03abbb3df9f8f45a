//! Display helpers for dashboard-facing amounts and dates

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::NaiveDate;

/// Render an amount as en-US USD: two decimal places, thousands
/// separators, sign ahead of the dollar symbol.
pub fn format_currency(amount: &BigDecimal) -> String {
    let rounded = amount.with_scale_round(2, RoundingMode::HalfUp);
    let text = rounded.to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{frac_part}")
}

/// Render a date as "Jan 5, 2024"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn currency_grouping_and_rounding() {
        assert_eq!(format_currency(&BigDecimal::from(0)), "$0.00");
        assert_eq!(format_currency(&BigDecimal::from(1234567)), "$1,234,567.00");
        assert_eq!(
            format_currency(&BigDecimal::from_str("1234.5").unwrap()),
            "$1,234.50"
        );
        assert_eq!(
            format_currency(&BigDecimal::from_str("99.995").unwrap()),
            "$100.00"
        );
        assert_eq!(
            format_currency(&BigDecimal::from_str("-1234.5").unwrap()),
            "-$1,234.50"
        );
    }

    #[test]
    fn date_rendering() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date(date), "Jan 5, 2024");
    }
}
