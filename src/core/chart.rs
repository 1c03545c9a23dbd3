//! Time-bucketed invoice series and month choices.
//!
//! The series is laid out on a fixed scaffold of slots ending today, so a chart always
//! gets a complete, ascending run of periods even when most slots hold no invoices.

use super::filters::Period;
use super::format::{day_label, month_long_label, month_short_label, week_label};
use super::model::{Invoice, YearMonth};
use super::rates::convert_using_record_rate;
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

const TRAILING_DAYS: u64 = 30;
const TRAILING_WEEKS: u64 = 12;
const TRAILING_MONTHS: u32 = 6;
const MONTH_CHOICES: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthOption {
    pub value: YearMonth,
    pub label: String,
}

/// One chart slot. `date` is the bucket key: `YYYY-MM-DD` for days and weeks, `YYYY-MM` for months.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub date: String,
    pub value: f64,
}

/// Months with invoices plus the last twelve calendar months, newest first
pub fn available_months(invoices: &[&Invoice], today: NaiveDate) -> Vec<MonthOption> {
    let current = YearMonth::from_date(today);
    let months: BTreeSet<YearMonth> = invoices
        .iter()
        .map(|i| YearMonth::from_date(i.issue_date))
        .chain((0..MONTH_CHOICES).map(|i| current.months_back(i)))
        .collect();

    months
        .into_iter()
        .rev()
        .map(|value| MonthOption {
            value,
            label: month_long_label(value),
        })
        .collect()
}

/// Sunday starting the week that contains `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(date.weekday().num_days_from_sunday().into())
}

fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn bucket_key(date: NaiveDate, period: Period) -> String {
    match period {
        Period::Day => day_key(date),
        Period::Week => day_key(week_start(date)),
        Period::Month => YearMonth::from_date(date).to_string(),
    }
}

/// BRL invoice totals per period slot.
///
/// `month` only applies to the daily view, where it replaces the trailing 30 days with
/// every day of that month.
pub fn invoices_chart_data(
    invoices: &[&Invoice],
    period: Period,
    month: Option<YearMonth>,
    today: NaiveDate,
) -> Vec<ChartPoint> {
    let month = month.filter(|_| period == Period::Day);

    let mut buckets: HashMap<String, f64> = HashMap::new();
    for invoice in invoices
        .iter()
        .filter(|i| month.is_none_or(|m| YearMonth::from_date(i.issue_date) == m))
    {
        *buckets
            .entry(bucket_key(invoice.issue_date, period))
            .or_default() += convert_using_record_rate(invoice.amount, &invoice.currency);
    }
    log::debug!("{} invoice buckets for {:?}", buckets.len(), period);

    let slots: Vec<(String, String)> = match (period, month) {
        (Period::Day, Some(month)) => month
            .days()
            .map(|date| (day_label(date), day_key(date)))
            .collect(),
        (Period::Day, None) => (0..TRAILING_DAYS)
            .rev()
            .map(|i| today - Days::new(i))
            .map(|date| (day_label(date), day_key(date)))
            .collect(),
        (Period::Week, _) => (0..TRAILING_WEEKS)
            .rev()
            .map(|i| week_start(today - Days::new(i * 7)))
            .map(|start| (week_label(start), day_key(start)))
            .collect(),
        (Period::Month, _) => {
            let current = YearMonth::from_date(today);
            (0..TRAILING_MONTHS)
                .rev()
                .map(|i| current.months_back(i))
                .map(|m| (month_short_label(m), m.to_string()))
                .collect()
        }
    };

    slots
        .into_iter()
        .map(|(label, date)| ChartPoint {
            value: buckets.get(&date).copied().unwrap_or(0.0),
            label,
            date,
        })
        .collect()
}
