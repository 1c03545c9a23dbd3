//! Companies command - filter choices across the whole dataset

use clap::Args;
use findash::core::Dashboard;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct CompaniesCommand {
    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Choices {
    companies: Vec<String>,
    subsidiaries: Vec<SubsidiaryChoice>,
    roles: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SubsidiaryChoice {
    code: &'static str,
    name: &'static str,
}

impl CompaniesCommand {
    pub fn exec(&self, dashboard: &Dashboard) -> anyhow::Result<()> {
        let dataset = dashboard.dataset();
        let choices = Choices {
            companies: dataset.all_companies(),
            subsidiaries: dataset
                .all_subsidiaries()
                .into_iter()
                .map(|s| SubsidiaryChoice {
                    code: s.code(),
                    name: s.display_name(),
                })
                .collect(),
            roles: dashboard.snapshot().unique_roles.clone(),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&choices)?);
            return Ok(());
        }

        println!();
        println!("COMPANIES");
        for company in &choices.companies {
            println!("  {}", company);
        }
        println!();
        println!("SUBSIDIARIES");
        for subsidiary in &choices.subsidiaries {
            println!("  {:12} {}", subsidiary.code, subsidiary.name);
        }
        println!();
        println!("ROLES");
        for role in &choices.roles {
            println!("  {}", role);
        }
        println!();
        Ok(())
    }
}
