pub mod chart;
pub mod companies;
pub mod currencies;
pub mod export;
pub mod invoices;
pub mod profits;
pub mod projects;
pub mod schema;
pub mod summary;

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use findash::core::{
    parse_rate_override, DashboardState, Dataset, FilterSelection, Period, Subsidiary, YearMonth,
    BASE_CURRENCY,
};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

/// Dataset source and dashboard state, shared by every subcommand
#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Dataset JSON file ("-" for stdin). Uses the bundled sample data when omitted.
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Only records in this currency code ("all" for every currency)
    #[arg(short, long, global = true)]
    currency: Option<String>,

    /// Only records of this company ("all" for every company)
    #[arg(long, global = true)]
    company: Option<String>,

    /// Only records of this subsidiary
    #[arg(short, long, value_enum, global = true)]
    subsidiary: Option<SubsidiaryArg>,

    /// Invoice chart grouping
    #[arg(short, long, value_enum, global = true, default_value_t = PeriodArg::Month)]
    period: PeriodArg,

    /// Month shown by the daily chart (YYYY-MM)
    #[arg(short, long, global = true)]
    month: Option<YearMonth>,

    /// Override a rate table entry, e.g. USD=0.19 (repeatable)
    #[arg(long = "rate", value_name = "CODE=RATE", value_parser = parse_rate_override, global = true)]
    rates: Vec<(String, f64)>,

    /// Currency the rate table converts into
    #[arg(long, global = true, default_value = BASE_CURRENCY)]
    base_currency: String,

    /// Reference date for trailing chart windows (YYYY-MM-DD), defaults to the local date
    #[arg(long, global = true)]
    today: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum PeriodArg {
    Day,
    Week,
    #[default]
    Month,
}

impl From<PeriodArg> for Period {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Day => Period::Day,
            PeriodArg::Week => Period::Week,
            PeriodArg::Month => Period::Month,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SubsidiaryArg {
    All,
    CompanyUsd,
    CompanyEur,
    CompanyBrl,
}

impl From<SubsidiaryArg> for Option<Subsidiary> {
    fn from(arg: SubsidiaryArg) -> Self {
        match arg {
            SubsidiaryArg::All => None,
            SubsidiaryArg::CompanyUsd => Some(Subsidiary::CompanyUsd),
            SubsidiaryArg::CompanyEur => Some(Subsidiary::CompanyEur),
            SubsidiaryArg::CompanyBrl => Some(Subsidiary::CompanyBrl),
        }
    }
}

impl DashboardArgs {
    /// Read the dataset from `--data`, stdin with "-", or the bundled seed
    pub fn load_dataset(&self) -> anyhow::Result<Dataset> {
        match &self.data {
            None => Ok(Dataset::seed()?),
            Some(path) if path.as_os_str() == "-" => read_from_stdin(),
            Some(path) => {
                let file = File::open(path)?;
                Ok(Dataset::read_json(BufReader::new(file))?)
            }
        }
    }

    pub fn state(&self) -> DashboardState {
        let mut state = DashboardState {
            selection: FilterSelection {
                currency: selected(&self.currency).map(|c| c.to_uppercase()),
                company: selected(&self.company).map(str::to_string),
                subsidiary: self.subsidiary.and_then(Option::<Subsidiary>::from),
                period: self.period.into(),
                month: self.month,
            },
            base_currency: self.base_currency.to_uppercase(),
            ..DashboardState::default()
        };
        for (code, rate) in &self.rates {
            state.update_rate(code, *rate);
        }
        state
    }

    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// "all" and empty values select everything
fn selected(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

fn read_from_stdin() -> anyhow::Result<Dataset> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    Ok(Dataset::read_json(io::Cursor::new(buffer))?)
}

/// Rounded table with right-aligned body rows
pub fn render_table<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string()
}
