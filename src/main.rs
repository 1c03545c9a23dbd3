mod cmd;

use clap::{Parser, Subcommand};
use findash::core::Dashboard;

#[derive(Parser, Debug)]
#[command(
    name = "findash",
    version,
    about = "Financial dashboard for multi-currency payments, payroll and invoices"
)]
struct Cli {
    #[command(flatten)]
    dashboard: cmd::DashboardArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Revenue, costs, margins and the highest paid worker
    Summary(cmd::summary::SummaryCommand),
    /// Payment totals per currency
    Currencies(cmd::currencies::CurrenciesCommand),
    /// Profit per company
    Profits(cmd::profits::ProfitsCommand),
    /// Monthly salaries per project
    Projects(cmd::projects::ProjectsCommand),
    /// Invoices with their billed workers
    Invoices(cmd::invoices::InvoicesCommand),
    /// Invoice totals per day, week or month
    Chart(cmd::chart::ChartCommand),
    /// Months available for the daily chart
    Months(cmd::chart::MonthsCommand),
    /// Companies and subsidiaries to filter by
    Companies(cmd::companies::CompaniesCommand),
    /// Write CSV exports
    Export(cmd::export::ExportCommand),
    /// Print the dataset JSON schema or the export columns
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    if let Command::Schema(schema) = &cli.command {
        return schema.exec();
    }

    let dataset = cli.dashboard.load_dataset()?;
    let dashboard = Dashboard::new(&dataset, cli.dashboard.state(), cli.dashboard.today());

    match &cli.command {
        Command::Summary(summary) => summary.exec(&dashboard),
        Command::Currencies(currencies) => currencies.exec(&dashboard),
        Command::Profits(profits) => profits.exec(&dashboard),
        Command::Projects(projects) => projects.exec(&dashboard),
        Command::Invoices(invoices) => invoices.exec(&dashboard),
        Command::Chart(chart) => chart.exec(&dashboard),
        Command::Months(months) => months.exec(&dashboard),
        Command::Companies(companies) => companies.exec(&dashboard),
        Command::Export(export) => export.exec(&dashboard),
        Command::Schema(schema) => schema.exec(),
    }
}
