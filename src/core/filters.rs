use super::dataset::Dataset;
use super::model::{Invoice, Payment, Subsidiary, Worker, YearMonth};
use serde::{Deserialize, Serialize};

/// Chart bucket width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    #[default]
    Month,
}

impl Period {
    /// Grouping name shown in exports
    pub fn label(self) -> &'static str {
        match self {
            Period::Day => "Diário",
            Period::Week => "Semanal",
            Period::Month => "Mensal",
        }
    }

    pub fn file_suffix(self) -> &'static str {
        match self {
            Period::Day => "diario",
            Period::Week => "semanal",
            Period::Month => "mensal",
        }
    }
}

/// Current filter choices. `None` selects everything along that dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub currency: Option<String>,
    pub company: Option<String>,
    pub subsidiary: Option<Subsidiary>,
    pub period: Period,
    /// Narrows the daily chart to one month
    pub month: Option<YearMonth>,
}

impl FilterSelection {
    pub fn has_active_filters(&self) -> bool {
        self.currency.is_some() || self.company.is_some() || self.subsidiary.is_some()
    }

    /// Reset currency, company and subsidiary. Period and month are chart settings and stay.
    pub fn clear(&mut self) {
        *self = FilterSelection {
            period: self.period,
            month: self.month,
            ..FilterSelection::default()
        };
    }

    pub fn matches_payment(&self, payment: &Payment) -> bool {
        self.matches(&payment.currency.code, &payment.company, Some(payment.subsidiary))
    }

    pub fn matches_invoice(&self, invoice: &Invoice) -> bool {
        self.matches(&invoice.currency.code, &invoice.company, Some(invoice.subsidiary))
    }

    pub fn matches_worker(&self, worker: &Worker, dataset: &Dataset) -> bool {
        // only resolve the subsidiary when the filter needs it
        let subsidiary = match self.subsidiary {
            Some(_) => dataset.subsidiary_of(&worker.company),
            None => None,
        };
        self.matches(&worker.currency.code, &worker.company, subsidiary)
    }

    fn matches(&self, currency: &str, company: &str, subsidiary: Option<Subsidiary>) -> bool {
        self.currency.as_deref().is_none_or(|c| c == currency)
            && self.company.as_deref().is_none_or(|c| c == company)
            && self.subsidiary.is_none_or(|s| subsidiary == Some(s))
    }
}

/// Records passing the current selection, in dataset order
#[derive(Debug, Clone)]
pub struct Filtered<'a> {
    pub payments: Vec<&'a Payment>,
    pub invoices: Vec<&'a Invoice>,
    pub workers: Vec<&'a Worker>,
}

pub fn filter_dataset<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> Filtered<'a> {
    let filtered = Filtered {
        payments: dataset
            .payments
            .iter()
            .filter(|p| selection.matches_payment(p))
            .collect(),
        invoices: dataset
            .invoices
            .iter()
            .filter(|i| selection.matches_invoice(i))
            .collect(),
        workers: dataset
            .workers
            .iter()
            .filter(|w| selection.matches_worker(w, dataset))
            .collect(),
    };
    log::debug!(
        "Filtered {} payments, {} invoices, {} workers",
        filtered.payments.len(),
        filtered.invoices.len(),
        filtered.workers.len()
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids<T>(records: &[&T], id: impl Fn(&T) -> &str) -> Vec<String> {
        records.iter().map(|r| id(r).to_string()).collect()
    }

    #[test]
    fn usd_filter_returns_only_usd_payments() {
        let dataset = Dataset::seed().unwrap();
        let selection = FilterSelection {
            currency: Some("USD".to_string()),
            ..Default::default()
        };
        let filtered = filter_dataset(&dataset, &selection);
        let expected: Vec<_> = dataset
            .payments
            .iter()
            .filter(|p| p.currency.code == "USD")
            .map(|p| p.id.clone())
            .collect();
        assert_eq!(ids(&filtered.payments, |p| p.id.as_str()), expected);
        assert_eq!(filtered.payments.len(), 5);
    }

    #[test]
    fn filtering_is_idempotent() {
        let dataset = Dataset::seed().unwrap();
        let selection = FilterSelection {
            currency: Some("EUR".to_string()),
            subsidiary: Some(Subsidiary::CompanyEur),
            ..Default::default()
        };
        let first = filter_dataset(&dataset, &selection);
        let second = filter_dataset(&dataset, &selection);
        assert_eq!(ids(&first.payments, |p| p.id.as_str()), ids(&second.payments, |p| p.id.as_str()));
        assert_eq!(ids(&first.invoices, |i| i.id.as_str()), ids(&second.invoices, |i| i.id.as_str()));
        assert_eq!(ids(&first.workers, |w| w.id.as_str()), ids(&second.workers, |w| w.id.as_str()));
    }

    #[test]
    fn clear_resets_filter_dimensions_only() {
        let dataset = Dataset::seed().unwrap();
        let mut selection = FilterSelection {
            currency: Some("BRL".to_string()),
            company: Some("Nubank".to_string()),
            subsidiary: Some(Subsidiary::CompanyBrl),
            period: Period::Week,
            month: "2025-06".parse().ok(),
        };
        assert!(selection.has_active_filters());

        selection.clear();
        assert!(!selection.has_active_filters());
        assert_eq!(selection.period, Period::Week);
        assert!(selection.month.is_some());

        let filtered = filter_dataset(&dataset, &selection);
        assert_eq!(filtered.payments.len(), dataset.payments.len());
        assert_eq!(filtered.invoices.len(), dataset.invoices.len());
        assert_eq!(filtered.workers.len(), dataset.workers.len());
    }

    #[test]
    fn company_filter_applies_to_all_record_types() {
        let dataset = Dataset::seed().unwrap();
        let selection = FilterSelection {
            company: Some("Apple".to_string()),
            ..Default::default()
        };
        let filtered = filter_dataset(&dataset, &selection);
        assert_eq!(ids(&filtered.payments, |p| p.id.as_str()), ["pay_001"]);
        assert_eq!(ids(&filtered.invoices, |i| i.id.as_str()), ["inv_001"]);
        assert_eq!(ids(&filtered.workers, |w| w.id.as_str()), ["emp_001", "emp_015"]);
    }

    #[test]
    fn worker_subsidiary_comes_from_company_payments() {
        let dataset = Dataset::seed().unwrap();
        let selection = FilterSelection {
            subsidiary: Some(Subsidiary::CompanyEur),
            ..Default::default()
        };
        let filtered = filter_dataset(&dataset, &selection);
        // Invoices use their own tag: Microsoft, Google, Mercedes-Benz, Itaú
        assert_eq!(
            ids(&filtered.invoices, |i| i.id.as_str()),
            ["inv_002", "inv_005", "inv_008", "inv_012"]
        );
        // Workers follow their company's payments: every EUR-paying company
        assert!(filtered.workers.iter().all(|w| w.currency.code == "EUR"));
        assert_eq!(filtered.workers.len(), 7);
    }

    #[test]
    fn worker_without_payments_fails_subsidiary_filter() {
        let mut dataset = Dataset::seed().unwrap();
        dataset.workers[0].company = "Startup".to_string();
        let selection = FilterSelection {
            subsidiary: Some(Subsidiary::CompanyUsd),
            ..Default::default()
        };
        let filtered = filter_dataset(&dataset, &selection);
        assert!(filtered.workers.iter().all(|w| w.company != "Startup"));

        let filtered = filter_dataset(&dataset, &FilterSelection::default());
        assert!(filtered.workers.iter().any(|w| w.company == "Startup"));
    }
}
