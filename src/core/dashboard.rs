use super::analytics::{
    highest_paid_worker, monthly_salaries_by_project, profits_by_company, stats_by_currency,
    total_in_base_currency, totals, unique_companies, unique_roles, CompanyProfit, CurrencyStats,
    ProjectSalaries, Totals, WorkerSalary,
};
use super::chart::{available_months, invoices_chart_data, ChartPoint, MonthOption};
use super::dataset::Dataset;
use super::filters::{filter_dataset, FilterSelection, Period};
use super::model::{Invoice, Payment, Worker};
use super::rates::{RateTable, BASE_CURRENCY};
use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Everything the derived views depend on besides the dataset
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub selection: FilterSelection,
    pub rates: RateTable,
    pub base_currency: String,
}

impl Default for DashboardState {
    fn default() -> Self {
        DashboardState {
            selection: FilterSelection::default(),
            rates: RateTable::default(),
            base_currency: BASE_CURRENCY.to_string(),
        }
    }
}

impl DashboardState {
    pub fn has_active_filters(&self) -> bool {
        self.selection.has_active_filters()
    }

    pub fn clear_filters(&mut self) {
        self.selection.clear();
    }

    pub fn update_rate(&mut self, code: &str, rate: f64) -> bool {
        self.rates.update(code, rate)
    }

    pub fn reset_rates(&mut self) {
        self.rates.reset();
    }
}

/// All derived views for one state of the dashboard
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub payments: Vec<&'a Payment>,
    pub invoices: Vec<&'a Invoice>,
    pub workers: Vec<&'a Worker>,
    pub stats_by_currency: Vec<CurrencyStats<'a>>,
    pub profits_by_company: Vec<CompanyProfit>,
    pub monthly_salaries_by_project: Vec<ProjectSalaries<'a>>,
    pub totals: Totals,
    pub highest_paid_worker: Option<WorkerSalary<'a>>,
    pub unique_companies: Vec<String>,
    pub unique_roles: Vec<String>,
    pub available_months: Vec<MonthOption>,
    pub period: Period,
    pub invoices_chart: Vec<ChartPoint>,
}

impl<'a> Snapshot<'a> {
    pub fn compute(dataset: &'a Dataset, state: &DashboardState, today: NaiveDate) -> Self {
        let selection = &state.selection;
        let base = state.base_currency.as_str();
        let filtered = filter_dataset(dataset, selection);

        let stats = stats_by_currency(&dataset.currencies, &filtered.payments, &state.rates, base);
        let profits = profits_by_company(&filtered.payments, &filtered.workers);
        let projects = monthly_salaries_by_project(&filtered.payments, &filtered.workers);
        let in_base =
            total_in_base_currency(&filtered.payments, &state.rates, base, &dataset.currencies);

        Snapshot {
            totals: totals(&profits, &projects, in_base),
            highest_paid_worker: highest_paid_worker(&projects),
            unique_companies: unique_companies(&filtered.payments),
            unique_roles: unique_roles(&filtered.workers),
            available_months: available_months(&filtered.invoices, today),
            period: selection.period,
            invoices_chart: invoices_chart_data(
                &filtered.invoices,
                selection.period,
                selection.month,
                today,
            ),
            stats_by_currency: stats,
            profits_by_company: profits,
            monthly_salaries_by_project: projects,
            payments: filtered.payments,
            invoices: filtered.invoices,
            workers: filtered.workers,
        }
    }

    /// Filtered workers of one company
    pub fn company_workers(&self, company: &str) -> usize {
        self.workers.iter().filter(|w| w.company == company).count()
    }

    /// Filtered payments of one company
    pub fn company_payments(&self, company: &str) -> usize {
        self.payments.iter().filter(|p| p.company == company).count()
    }
}

/// Dashboard session: the dataset, mutable state, and a memo of the last derived snapshot.
///
/// The snapshot is recomputed on read only when the fingerprint of the state changed.
pub struct Dashboard<'a> {
    dataset: &'a Dataset,
    state: DashboardState,
    today: NaiveDate,
    cache: RefCell<Option<(String, Rc<Snapshot<'a>>)>>,
    recomputations: Cell<usize>,
}

impl<'a> Dashboard<'a> {
    pub fn new(dataset: &'a Dataset, state: DashboardState, today: NaiveDate) -> Self {
        Dashboard {
            dataset,
            state,
            today,
            cache: RefCell::new(None),
            recomputations: Cell::new(0),
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DashboardState {
        &mut self.state
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    /// How many times the snapshot has been derived
    pub fn recomputations(&self) -> usize {
        self.recomputations.get()
    }

    /// SHA-256 over every input of the derivations
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.state).as_bytes());
        hasher.update(self.today.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn snapshot(&self) -> Rc<Snapshot<'a>> {
        let fingerprint = self.fingerprint();
        if let Some((cached, snapshot)) = self.cache.borrow().as_ref() {
            if *cached == fingerprint {
                return Rc::clone(snapshot);
            }
        }

        log::debug!("Recomputing dashboard for state {}", &fingerprint[..12]);
        let snapshot = Rc::new(Snapshot::compute(self.dataset, &self.state, self.today));
        self.recomputations.set(self.recomputations.get() + 1);
        *self.cache.borrow_mut() = Some((fingerprint, Rc::clone(&snapshot)));
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Subsidiary;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[test]
    fn snapshot_is_memoized_until_state_changes() {
        let dataset = Dataset::seed().unwrap();
        let mut dashboard = Dashboard::new(&dataset, DashboardState::default(), today());

        let first = dashboard.snapshot();
        let second = dashboard.snapshot();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(dashboard.recomputations(), 1);

        dashboard.state_mut().selection.currency = Some("EUR".to_string());
        let filtered = dashboard.snapshot();
        assert_eq!(dashboard.recomputations(), 2);
        assert_eq!(filtered.payments.len(), 5);

        // same state again hits the cache
        dashboard.snapshot();
        assert_eq!(dashboard.recomputations(), 2);
    }

    #[test]
    fn rate_changes_invalidate_the_snapshot() {
        let dataset = Dataset::seed().unwrap();
        let mut dashboard = Dashboard::new(&dataset, DashboardState::default(), today());
        let before = dashboard.snapshot().totals.total_in_base_currency;

        assert!(dashboard.state_mut().update_rate("USD", 0.25));
        let after = dashboard.snapshot().totals.total_in_base_currency;
        assert!(after < before);

        // record-rate aggregations ignore the rate table
        let revenue = dashboard.snapshot().totals.total_revenue;
        dashboard.state_mut().reset_rates();
        assert_eq!(dashboard.snapshot().totals.total_revenue, revenue);
        assert_eq!(dashboard.snapshot().totals.total_in_base_currency, before);
    }

    #[test]
    fn rejected_rate_update_keeps_cache() {
        let dataset = Dataset::seed().unwrap();
        let mut dashboard = Dashboard::new(&dataset, DashboardState::default(), today());
        dashboard.snapshot();
        assert!(!dashboard.state_mut().update_rate("USD", -5.0));
        assert_eq!(dashboard.state().rates.get("USD"), Some(0.18));
        dashboard.snapshot();
        assert_eq!(dashboard.recomputations(), 1);
    }

    #[test]
    fn clear_filters_restores_unfiltered_views() {
        let dataset = Dataset::seed().unwrap();
        let mut state = DashboardState::default();
        state.selection.company = Some("Toyota".to_string());
        state.selection.subsidiary = Some(Subsidiary::CompanyEur);
        let mut dashboard = Dashboard::new(&dataset, state, today());
        assert!(dashboard.state().has_active_filters());
        assert_eq!(dashboard.snapshot().profits_by_company.len(), 1);

        dashboard.state_mut().clear_filters();
        assert!(!dashboard.state().has_active_filters());
        let snapshot = dashboard.snapshot();
        assert_eq!(snapshot.payments.len(), 14);
        assert_eq!(snapshot.invoices.len(), 14);
        assert_eq!(snapshot.workers.len(), 20);
        assert_eq!(snapshot.profits_by_company.len(), 14);
    }

    #[test]
    fn snapshot_wires_every_view() {
        let dataset = Dataset::seed().unwrap();
        let dashboard = Dashboard::new(&dataset, DashboardState::default(), today());
        let snapshot = dashboard.snapshot();

        assert_eq!(snapshot.stats_by_currency.len(), 3);
        assert_eq!(snapshot.monthly_salaries_by_project.len(), 14);
        assert_eq!(snapshot.invoices_chart.len(), 6);
        assert_eq!(snapshot.available_months.len(), 12);
        assert_eq!(snapshot.unique_companies.len(), 14);
        assert_eq!(snapshot.company_workers("Apple"), 2);
        assert_eq!(snapshot.company_payments("Apple"), 1);
        assert!(snapshot.highest_paid_worker.is_some());
        assert!(snapshot.totals.total_revenue > snapshot.totals.total_costs);
    }

    #[test]
    fn moving_today_shifts_the_chart() {
        let dataset = Dataset::seed().unwrap();
        let mut dashboard = Dashboard::new(&dataset, DashboardState::default(), today());
        assert_eq!(dashboard.snapshot().invoices_chart[5].date, "2025-06");
        dashboard.set_today(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
        assert_eq!(dashboard.snapshot().invoices_chart[5].date, "2025-09");
        assert_eq!(dashboard.recomputations(), 2);
    }
}
