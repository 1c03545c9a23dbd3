//! Invoices command - filtered invoices and the workers they bill

use crate::cmd::render_table;
use clap::Args;
use findash::core::rates::convert_using_record_rate;
use findash::core::{format_currency, Dashboard};
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct InvoicesCommand {
    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Issued")]
    issued: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Amount (BRL)")]
    amount_brl: String,
    #[tabled(rename = "Workers")]
    workers: String,
}

impl InvoicesCommand {
    pub fn exec(&self, dashboard: &Dashboard) -> anyhow::Result<()> {
        let snapshot = dashboard.snapshot();
        let dataset = dashboard.dataset();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&snapshot.invoices)?);
            return Ok(());
        }

        if snapshot.invoices.is_empty() {
            println!("No invoices found matching filters");
            return Ok(());
        }

        let rows: Vec<InvoiceRow> = snapshot
            .invoices
            .iter()
            .map(|i| InvoiceRow {
                number: i.invoice_number.clone(),
                issued: i.issue_date.format("%d/%m/%Y").to_string(),
                due: i.due_date.format("%d/%m/%Y").to_string(),
                company: i.company.clone(),
                status: i.status.as_str(),
                amount: format_currency(i.amount, &i.currency.code),
                amount_brl: format_currency(
                    convert_using_record_rate(i.amount, &i.currency),
                    "BRL",
                ),
                workers: dataset
                    .invoice_workers(i)
                    .iter()
                    .map(|w| w.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
            .collect();

        println!();
        println!("INVOICES");
        println!();
        println!("{}", render_table(rows));
        Ok(())
    }
}
