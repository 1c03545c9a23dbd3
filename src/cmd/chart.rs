//! Chart and months commands - invoice series per period

use crate::cmd::render_table;
use clap::Args;
use findash::core::{format_currency, ChartPoint, Dashboard};
use tabled::Tabled;

const BAR_WIDTH: usize = 30;

#[derive(Args, Debug)]
pub struct ChartCommand {
    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
pub struct MonthsCommand {
    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct ChartRow {
    #[tabled(rename = "Period")]
    label: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Total (BRL)")]
    value: String,
    #[tabled(rename = "")]
    bar: String,
}

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "Month")]
    value: String,
    #[tabled(rename = "Label")]
    label: String,
}

impl ChartCommand {
    pub fn exec(&self, dashboard: &Dashboard) -> anyhow::Result<()> {
        let snapshot = dashboard.snapshot();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&snapshot.invoices_chart)?);
            return Ok(());
        }

        let max = snapshot
            .invoices_chart
            .iter()
            .map(|p| p.value)
            .fold(0.0, f64::max);
        let rows: Vec<ChartRow> = snapshot
            .invoices_chart
            .iter()
            .map(|point| ChartRow {
                label: point.label.clone(),
                date: point.date.clone(),
                value: format_currency(point.value, "BRL"),
                bar: bar(point, max),
            })
            .collect();

        println!();
        println!("INVOICES ({})", snapshot.period.label().to_uppercase());
        println!();
        println!("{}", render_table(rows));
        Ok(())
    }
}

fn bar(point: &ChartPoint, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let width = (point.value / max * BAR_WIDTH as f64).round() as usize;
    "#".repeat(width)
}

impl MonthsCommand {
    pub fn exec(&self, dashboard: &Dashboard) -> anyhow::Result<()> {
        let snapshot = dashboard.snapshot();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&snapshot.available_months)?);
            return Ok(());
        }

        let rows: Vec<MonthRow> = snapshot
            .available_months
            .iter()
            .map(|m| MonthRow {
                value: m.value.to_string(),
                label: m.label.clone(),
            })
            .collect();

        println!();
        println!("AVAILABLE MONTHS");
        println!();
        println!("{}", render_table(rows));
        Ok(())
    }
}
