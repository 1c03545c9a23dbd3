//! Profits command - revenue, costs and margin per company

use crate::cmd::render_table;
use clap::Args;
use findash::core::{format_currency, format_percent, Dashboard};
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct ProfitsCommand {
    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct ProfitRow {
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Revenue")]
    revenue: String,
    #[tabled(rename = "Costs")]
    costs: String,
    #[tabled(rename = "Profit")]
    profit: String,
    #[tabled(rename = "Margin")]
    margin: String,
}

impl ProfitsCommand {
    pub fn exec(&self, dashboard: &Dashboard) -> anyhow::Result<()> {
        let snapshot = dashboard.snapshot();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&snapshot.profits_by_company)?);
            return Ok(());
        }

        if snapshot.profits_by_company.is_empty() {
            println!("No payments found matching filters");
            return Ok(());
        }

        let rows: Vec<ProfitRow> = snapshot
            .profits_by_company
            .iter()
            .map(|c| ProfitRow {
                company: c.company.clone(),
                revenue: format_currency(c.revenue, "BRL"),
                costs: format_currency(c.costs, "BRL"),
                profit: format_currency(c.profit, "BRL"),
                margin: format_percent(c.profit_margin),
            })
            .collect();

        println!();
        println!("PROFIT BY COMPANY");
        println!();
        println!("{}", render_table(rows));
        Ok(())
    }
}
