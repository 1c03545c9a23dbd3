//! Summary command - dashboard headline figures

use clap::Args;
use findash::core::{
    format_currency, format_percent, Dashboard, DashboardState, Totals, WorkerSalary,
};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct SummaryCommand {
    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// Summary data for JSON output
#[derive(Debug, Serialize)]
struct SummaryData<'a> {
    filters: Vec<String>,
    payments: usize,
    invoices: usize,
    workers: usize,
    base_currency: &'a str,
    #[serde(flatten)]
    totals: &'a Totals,
    #[serde(skip_serializing_if = "Option::is_none")]
    highest_paid_worker: Option<&'a WorkerSalary<'a>>,
}

impl SummaryCommand {
    pub fn exec(&self, dashboard: &Dashboard) -> anyhow::Result<()> {
        let snapshot = dashboard.snapshot();
        let state = dashboard.state();
        let filters = active_filters(state);

        if self.json {
            let data = SummaryData {
                filters,
                payments: snapshot.payments.len(),
                invoices: snapshot.invoices.len(),
                workers: snapshot.workers.len(),
                base_currency: &state.base_currency,
                totals: &snapshot.totals,
                highest_paid_worker: snapshot.highest_paid_worker.as_ref(),
            };
            println!("{}", serde_json::to_string_pretty(&data)?);
            return Ok(());
        }

        let totals = &snapshot.totals;
        let brl = |amount: f64| format_currency(amount, "BRL");

        println!();
        if filters.is_empty() {
            println!("DASHBOARD SUMMARY");
        } else {
            println!("DASHBOARD SUMMARY ({})", filters.join(", "));
        }
        println!();

        println!(
            "RECORDS\n  Payments: {} | Invoices: {} | Workers: {}",
            snapshot.payments.len(),
            snapshot.invoices.len(),
            snapshot.workers.len()
        );
        println!();

        println!("PROFIT");
        println!(
            "  Revenue: {} | Costs: {} | Profit: {}",
            brl(totals.total_revenue),
            brl(totals.total_costs),
            brl(totals.total_profit)
        );
        println!("  Margin: {}", format_percent(totals.overall_profit_margin));
        println!();

        println!("PAYROLL");
        println!(
            "  Monthly cost: {} | Project revenue: {} | Average per project: {}",
            brl(totals.total_monthly_costs),
            brl(totals.total_project_revenue),
            brl(totals.average_project_cost)
        );
        match &snapshot.highest_paid_worker {
            Some(best) => println!(
                "  Highest paid: {} ({}, {}) {}",
                best.worker.name,
                best.worker.role,
                best.worker.company,
                brl(best.monthly_salary_brl)
            ),
            None => println!("  Highest paid: -"),
        }
        println!();

        println!(
            "TOTAL IN {} (rate table): {}",
            state.base_currency,
            format_currency(totals.total_in_base_currency, &state.base_currency)
        );
        println!();
        Ok(())
    }
}

fn active_filters(state: &DashboardState) -> Vec<String> {
    let selection = &state.selection;
    let mut filters = Vec::new();
    if let Some(currency) = &selection.currency {
        filters.push(format!("currency {}", currency));
    }
    if let Some(company) = &selection.company {
        filters.push(format!("company {}", company));
    }
    if let Some(subsidiary) = selection.subsidiary {
        filters.push(subsidiary.display_name().to_string());
    }
    filters
}
