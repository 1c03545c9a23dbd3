//! pt-BR display formatting for money and dates

use super::model::YearMonth;
use chrono::{Datelike, Locale, NaiveDate};

const NBSP: char = '\u{a0}';

fn currency_symbol(code: &str) -> &str {
    match code {
        "BRL" => "R$",
        "USD" => "US$",
        "EUR" => "€",
        "GBP" => "£",
        other => other,
    }
}

/// Format a number with `.` thousands and `,` decimal separators and two fraction digits
pub fn format_number(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed.bytes().any(|b| b != b'0' && b != b'.') {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped},{frac_part}")
}

/// Format money the way pt-BR displays it, e.g. `R$ 1.234,56` or `US$ 12,00`
pub fn format_currency(amount: f64, code: &str) -> String {
    let number = format_number(amount);
    match number.strip_prefix('-') {
        Some(abs) => format!("-{}{NBSP}{}", currency_symbol(code), abs),
        None => format!("{}{NBSP}{}", currency_symbol(code), number),
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{}%", format_number(value))
}

/// e.g. `junho de 2025`
pub fn month_long_label(month: YearMonth) -> String {
    month
        .first_day()
        .format_localized("%B de %Y", Locale::pt_BR)
        .to_string()
}

/// e.g. `jun. de 25`
pub fn month_short_label(month: YearMonth) -> String {
    let first = month.first_day();
    format!("{} de {}", short_month(first), first.format("%y"))
}

/// e.g. `15/06`
pub fn day_label(date: NaiveDate) -> String {
    date.format("%d/%m").to_string()
}

/// Week label built from its (Sunday) start date, e.g. `jun./25-S2`
pub fn week_label(week_start: NaiveDate) -> String {
    let week_of_month = week_start.day().div_ceil(7);
    format!(
        "{}/{}-S{}",
        short_month(week_start),
        week_start.format("%y"),
        week_of_month
    )
}

/// Abbreviated pt-BR month with its trailing dot, e.g. `jun.`
fn short_month(date: NaiveDate) -> String {
    let month = date.format_localized("%b", Locale::pt_BR).to_string();
    format!("{}.", month.trim_end_matches('.'))
}
