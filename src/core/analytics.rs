//! Aggregations over filtered records. All money is converted into BRL with the
//! record's own rate unless stated otherwise.

use super::model::{Currency, Payment, Worker};
use super::rates::{convert_using_rate_table, convert_using_record_rate, RateTable};
use serde::Serialize;

/// Payment totals for one currency
#[derive(Debug, Clone, Serialize)]
pub struct CurrencyStats<'a> {
    pub currency: &'a Currency,
    pub count: usize,
    /// Sum in the currency itself
    pub total: f64,
    pub total_brl: f64,
    /// Sum converted with the rate table into the base currency
    pub total_in_base: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyProfit {
    pub company: String,
    pub revenue: f64,
    pub costs: f64,
    pub profit: f64,
    pub profit_margin: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkerSalary<'a> {
    #[serde(flatten)]
    pub worker: &'a Worker,
    pub monthly_salary: f64,
    pub monthly_salary_brl: f64,
}

impl<'a> WorkerSalary<'a> {
    pub fn new(worker: &'a Worker) -> Self {
        let monthly_salary = worker.monthly_salary();
        WorkerSalary {
            worker,
            monthly_salary,
            monthly_salary_brl: convert_using_record_rate(monthly_salary, &worker.currency),
        }
    }
}

/// Payroll and revenue of one company (project)
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSalaries<'a> {
    pub project: String,
    /// Highest BRL salary first
    pub workers: Vec<WorkerSalary<'a>>,
    pub total_monthly_cost: f64,
    pub project_revenue: f64,
    pub project_profit: f64,
    pub worker_count: usize,
    pub payments_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub total_profit: f64,
    pub total_revenue: f64,
    pub total_costs: f64,
    pub overall_profit_margin: f64,
    pub total_monthly_costs: f64,
    pub total_project_revenue: f64,
    pub average_project_cost: f64,
    pub total_in_base_currency: f64,
}

/// Profit as a percentage of revenue, 0 without revenue
pub fn profit_margin(profit: f64, revenue: f64) -> f64 {
    if revenue > 0.0 {
        profit / revenue * 100.0
    } else {
        0.0
    }
}

pub fn stats_by_currency<'a>(
    currencies: &'a [Currency],
    payments: &[&Payment],
    rates: &RateTable,
    base: &str,
) -> Vec<CurrencyStats<'a>> {
    currencies
        .iter()
        .map(|currency| {
            let (count, total) = payments
                .iter()
                .filter(|p| p.currency.code == currency.code)
                .fold((0, 0.0), |(count, total), p| (count + 1, total + p.amount));
            CurrencyStats {
                currency,
                count,
                total,
                total_brl: convert_using_record_rate(total, currency),
                total_in_base: convert_using_rate_table(total, currency, rates, base, currencies),
            }
        })
        .collect()
}

pub fn total_in_base_currency(
    payments: &[&Payment],
    rates: &RateTable,
    base: &str,
    currencies: &[Currency],
) -> f64 {
    payments
        .iter()
        .map(|p| convert_using_rate_table(p.amount, &p.currency, rates, base, currencies))
        .sum()
}

fn revenue_brl<'p>(payments: impl IntoIterator<Item = &'p Payment>) -> f64 {
    payments
        .into_iter()
        .map(|p| convert_using_record_rate(p.amount, &p.currency))
        .sum()
}

pub fn profits_by_company(payments: &[&Payment], workers: &[&Worker]) -> Vec<CompanyProfit> {
    let mut profits: Vec<CompanyProfit> = distinct(payments.iter().map(|p| p.company.as_str()))
        .into_iter()
        .map(|company| {
            let revenue = revenue_brl(payments.iter().copied().filter(|p| p.company == company));
            let costs: f64 = workers
                .iter()
                .filter(|w| w.company == company)
                .map(|w| convert_using_record_rate(w.monthly_salary(), &w.currency))
                .sum();
            let profit = revenue - costs;
            CompanyProfit {
                company: company.to_string(),
                revenue,
                costs,
                profit,
                profit_margin: profit_margin(profit, revenue),
            }
        })
        .collect();
    profits.sort_by(|a, b| b.profit.total_cmp(&a.profit));
    profits
}

pub fn monthly_salaries_by_project<'a>(
    payments: &[&Payment],
    workers: &[&'a Worker],
) -> Vec<ProjectSalaries<'a>> {
    let mut projects: Vec<ProjectSalaries<'a>> = distinct(workers.iter().map(|w| w.company.as_str()))
        .into_iter()
        .map(|project| {
            let mut salaries: Vec<WorkerSalary<'a>> = workers
                .iter()
                .copied()
                .filter(|w| w.company == project)
                .map(WorkerSalary::new)
                .collect();
            salaries.sort_by(|a, b| b.monthly_salary_brl.total_cmp(&a.monthly_salary_brl));

            let project_payments: Vec<&Payment> =
                payments.iter().copied().filter(|p| p.company == project).collect();
            let project_revenue = revenue_brl(project_payments.iter().copied());
            let total_monthly_cost: f64 = salaries.iter().map(|s| s.monthly_salary_brl).sum();

            ProjectSalaries {
                project: project.to_string(),
                worker_count: salaries.len(),
                workers: salaries,
                total_monthly_cost,
                project_revenue,
                project_profit: project_revenue - total_monthly_cost,
                payments_count: project_payments.len(),
            }
        })
        .collect();
    projects.sort_by(|a, b| b.project_revenue.total_cmp(&a.project_revenue));
    projects
}

pub fn totals(
    profits: &[CompanyProfit],
    projects: &[ProjectSalaries],
    total_in_base_currency: f64,
) -> Totals {
    let total_profit: f64 = profits.iter().map(|c| c.profit).sum();
    let total_revenue: f64 = profits.iter().map(|c| c.revenue).sum();
    let total_costs: f64 = profits.iter().map(|c| c.costs).sum();
    let total_monthly_costs: f64 = projects.iter().map(|p| p.total_monthly_cost).sum();
    let total_project_revenue: f64 = projects.iter().map(|p| p.project_revenue).sum();
    let average_project_cost = if projects.is_empty() {
        0.0
    } else {
        total_monthly_costs / projects.len() as f64
    };

    Totals {
        total_profit,
        total_revenue,
        total_costs,
        overall_profit_margin: profit_margin(total_profit, total_revenue),
        total_monthly_costs,
        total_project_revenue,
        average_project_cost,
        total_in_base_currency,
    }
}

/// Best paid worker across all projects; the first one seen wins ties
pub fn highest_paid_worker<'a>(projects: &[ProjectSalaries<'a>]) -> Option<WorkerSalary<'a>> {
    projects
        .iter()
        .flat_map(|p| p.workers.iter())
        .fold(None, |best: Option<&WorkerSalary<'a>>, current| match best {
            Some(b) if current.monthly_salary_brl <= b.monthly_salary_brl => Some(b),
            _ => Some(current),
        })
        .cloned()
}

pub fn unique_companies(payments: &[&Payment]) -> Vec<String> {
    sorted(distinct(payments.iter().map(|p| p.company.as_str())))
}

pub fn unique_roles(workers: &[&Worker]) -> Vec<String> {
    sorted(distinct(workers.iter().map(|w| w.role.as_str())))
}

/// Distinct values in first-appearance order
fn distinct<'s>(values: impl Iterator<Item = &'s str>) -> Vec<&'s str> {
    let mut seen: Vec<&str> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

fn sorted(values: Vec<&str>) -> Vec<String> {
    let mut values: Vec<String> = values.into_iter().map(str::to_string).collect();
    values.sort();
    values
}
