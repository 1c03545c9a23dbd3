//! Projects command - monthly payroll per project

use crate::cmd::render_table;
use clap::Args;
use findash::core::{format_currency, Dashboard};
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct ProjectsCommand {
    /// Only show this project (company)
    #[arg(long)]
    project: Option<String>,

    /// Output as JSON instead of formatted tables
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct WorkerRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Hours")]
    hours: f64,
    #[tabled(rename = "Hourly Rate")]
    hourly_rate: String,
    #[tabled(rename = "Salary")]
    salary: String,
    #[tabled(rename = "Salary (BRL)")]
    salary_brl: String,
}

impl ProjectsCommand {
    pub fn exec(&self, dashboard: &Dashboard) -> anyhow::Result<()> {
        let snapshot = dashboard.snapshot();
        let projects: Vec<_> = snapshot
            .monthly_salaries_by_project
            .iter()
            .filter(|p| {
                self.project
                    .as_deref()
                    .is_none_or(|name| p.project.eq_ignore_ascii_case(name))
            })
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&projects)?);
            return Ok(());
        }

        if projects.is_empty() {
            println!("No projects found matching filters");
            return Ok(());
        }

        println!();
        println!("MONTHLY SALARIES BY PROJECT");
        println!();

        for project in projects {
            println!(
                "{}: revenue {} | payroll {} | profit {} ({} workers, {} payments)",
                project.project,
                format_currency(project.project_revenue, "BRL"),
                format_currency(project.total_monthly_cost, "BRL"),
                format_currency(project.project_profit, "BRL"),
                project.worker_count,
                project.payments_count
            );

            let rows: Vec<WorkerRow> = project
                .workers
                .iter()
                .map(|s| WorkerRow {
                    name: s.worker.name.clone(),
                    role: s.worker.role.clone(),
                    hours: s.worker.hours_worked,
                    hourly_rate: format_currency(s.worker.hourly_rate, &s.worker.currency.code),
                    salary: format_currency(s.monthly_salary, &s.worker.currency.code),
                    salary_brl: format_currency(s.monthly_salary_brl, "BRL"),
                })
                .collect();
            println!("{}", render_table(rows));
            println!();
        }
        Ok(())
    }
}
