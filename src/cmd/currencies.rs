//! Currencies command - payment totals per currency

use crate::cmd::render_table;
use clap::Args;
use findash::core::{format_currency, Dashboard};
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct CurrenciesCommand {
    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct CurrencyRow {
    #[tabled(rename = "Currency")]
    code: String,
    #[tabled(rename = "Payments")]
    count: usize,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Total (BRL)")]
    total_brl: String,
    #[tabled(rename = "Total (rate table)")]
    total_in_base: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

impl CurrenciesCommand {
    pub fn exec(&self, dashboard: &Dashboard) -> anyhow::Result<()> {
        let snapshot = dashboard.snapshot();
        let state = dashboard.state();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&snapshot.stats_by_currency)?);
            return Ok(());
        }

        let rows: Vec<CurrencyRow> = snapshot
            .stats_by_currency
            .iter()
            .map(|s| CurrencyRow {
                code: s.currency.code.clone(),
                count: s.count,
                total: format_currency(s.total, &s.currency.code),
                total_brl: format_currency(s.total_brl, "BRL"),
                total_in_base: format_currency(s.total_in_base, &state.base_currency),
                rate: state
                    .rates
                    .get(&s.currency.code)
                    .map_or_else(|| s.currency.value.to_string(), |r| r.to_string()),
            })
            .collect();

        println!();
        println!("PAYMENTS BY CURRENCY");
        println!();
        println!("{}", render_table(rows));
        Ok(())
    }
}
