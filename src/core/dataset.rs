use super::model::{Currency, Invoice, Payment, PaymentStatus, Subsidiary, Worker};
use super::rates::BASE_CURRENCY;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;

const SEED: &str = include_str!("../../data/seed.json");

const REQUIRED_CURRENCIES: &[&str] = &["USD", "EUR", "BRL"];

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate currency: {0}")]
    DuplicateCurrency(String),
    #[error("missing required currency: {0}")]
    MissingCurrency(&'static str),
    #[error("BRL must have value 1.0, found {0}")]
    BaseRate(f64),
    #[error("currency {code} has non-positive value {value}")]
    InvalidRate { code: String, value: f64 },
    #[error("unknown currency '{code}' on {record}")]
    UnknownCurrency { record: String, code: String },
    #[error("unknown worker '{worker}' on invoice {invoice}")]
    UnknownWorker { invoice: String, worker: String },
}

/// Dataset input format: records reference currencies by code and workers by id
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DatasetInput {
    pub currencies: Vec<Currency>,
    #[serde(default)]
    pub payments: Vec<PaymentInput>,
    #[serde(default)]
    pub workers: Vec<WorkerInput>,
    #[serde(default)]
    pub invoices: Vec<InvoiceInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    pub id: String,
    /// Amount in the payment's own currency
    pub amount: f64,
    pub status: PaymentStatus,
    pub email: String,
    pub company: String,
    /// Currency code
    pub currency: String,
    pub date: NaiveDate,
    pub subsidiary_company: Subsidiary,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceInput {
    pub id: String,
    pub amount: f64,
    pub status: PaymentStatus,
    pub email: String,
    pub company: String,
    pub subsidiary_company: Subsidiary,
    pub due_date: NaiveDate,
    pub invoice_number: String,
    /// Worker ids billed on this invoice
    #[serde(default)]
    pub workers: Vec<String>,
    pub currency: String,
    pub issue_date: NaiveDate,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerInput {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub hourly_rate: f64,
    /// Hours worked in a month
    pub hours_worked: f64,
    pub currency: String,
    pub company: String,
}

/// Validated, read-only records the dashboard derives its views from
#[derive(Debug, Clone)]
pub struct Dataset {
    pub currencies: Vec<Currency>,
    pub payments: Vec<Payment>,
    pub invoices: Vec<Invoice>,
    pub workers: Vec<Worker>,
}

impl Dataset {
    /// The bundled demo dataset
    pub fn seed() -> Result<Dataset, DataError> {
        Dataset::read_json(SEED.as_bytes())
    }

    pub fn read_json<R: Read>(reader: R) -> Result<Dataset, DataError> {
        let input: DatasetInput = serde_json::from_reader(reader)?;
        Dataset::from_input(input)
    }

    pub fn from_input(input: DatasetInput) -> Result<Dataset, DataError> {
        let currencies = validate_currencies(input.currencies)?;
        let by_code: HashMap<&str, &Currency> =
            currencies.iter().map(|c| (c.code.as_str(), c)).collect();
        let resolve = |record: &str, code: &str| -> Result<Currency, DataError> {
            by_code
                .get(code)
                .map(|c| (*c).clone())
                .ok_or_else(|| DataError::UnknownCurrency {
                    record: record.to_string(),
                    code: code.to_string(),
                })
        };

        let payments = input
            .payments
            .into_iter()
            .map(|p| {
                Ok(Payment {
                    currency: resolve(&p.id, &p.currency)?,
                    id: p.id,
                    amount: p.amount,
                    status: p.status,
                    email: p.email,
                    company: p.company,
                    date: p.date,
                    subsidiary: p.subsidiary_company,
                    description: p.description,
                })
            })
            .collect::<Result<Vec<_>, DataError>>()?;

        let workers = input
            .workers
            .into_iter()
            .map(|w| {
                Ok(Worker {
                    currency: resolve(&w.id, &w.currency)?,
                    id: w.id,
                    name: w.name,
                    email: w.email,
                    role: w.role,
                    hourly_rate: w.hourly_rate,
                    hours_worked: w.hours_worked,
                    company: w.company,
                })
            })
            .collect::<Result<Vec<_>, DataError>>()?;

        let invoices = input
            .invoices
            .into_iter()
            .map(|i| {
                if let Some(missing) = i
                    .workers
                    .iter()
                    .find(|id| !workers.iter().any(|w| &w.id == *id))
                {
                    return Err(DataError::UnknownWorker {
                        invoice: i.id.clone(),
                        worker: missing.clone(),
                    });
                }
                Ok(Invoice {
                    currency: resolve(&i.id, &i.currency)?,
                    id: i.id,
                    amount: i.amount,
                    status: i.status,
                    email: i.email,
                    company: i.company,
                    subsidiary: i.subsidiary_company,
                    due_date: i.due_date,
                    invoice_number: i.invoice_number,
                    worker_ids: i.workers,
                    issue_date: i.issue_date,
                    client: i.client,
                    description: i.description,
                })
            })
            .collect::<Result<Vec<_>, DataError>>()?;

        log::info!(
            "Loaded {} payments, {} invoices, {} workers",
            payments.len(),
            invoices.len(),
            workers.len()
        );

        Ok(Dataset {
            currencies,
            payments,
            invoices,
            workers,
        })
    }

    pub fn currency(&self, code: &str) -> Option<&Currency> {
        self.currencies.iter().find(|c| c.code == code)
    }

    pub fn worker(&self, id: &str) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id == id)
    }

    /// Workers billed on an invoice, in invoice order
    pub fn invoice_workers(&self, invoice: &Invoice) -> Vec<&Worker> {
        invoice
            .worker_ids
            .iter()
            .filter_map(|id| self.worker(id))
            .collect()
    }

    /// Subsidiary of the first payment made by `company`.
    ///
    /// Workers carry no subsidiary, so filtering them goes through this lookup. A company
    /// paying through several subsidiaries only ever reports the first one.
    pub fn subsidiary_of(&self, company: &str) -> Option<Subsidiary> {
        self.payments
            .iter()
            .find(|p| p.company == company)
            .map(|p| p.subsidiary)
    }

    /// Every company with a payment, sorted
    pub fn all_companies(&self) -> Vec<String> {
        let mut companies: Vec<String> = Vec::new();
        for p in &self.payments {
            if !companies.contains(&p.company) {
                companies.push(p.company.clone());
            }
        }
        companies.sort();
        companies
    }

    /// Every subsidiary with a payment, sorted by display name
    pub fn all_subsidiaries(&self) -> Vec<Subsidiary> {
        let mut subsidiaries: Vec<Subsidiary> = Vec::new();
        for p in &self.payments {
            if !subsidiaries.contains(&p.subsidiary) {
                subsidiaries.push(p.subsidiary);
            }
        }
        subsidiaries.sort_by_key(|s| s.display_name());
        subsidiaries
    }
}

fn validate_currencies(currencies: Vec<Currency>) -> Result<Vec<Currency>, DataError> {
    for (i, currency) in currencies.iter().enumerate() {
        if currencies[..i].iter().any(|c| c.code == currency.code) {
            return Err(DataError::DuplicateCurrency(currency.code.clone()));
        }
        if !(currency.value > 0.0) {
            return Err(DataError::InvalidRate {
                code: currency.code.clone(),
                value: currency.value,
            });
        }
    }
    for code in REQUIRED_CURRENCIES {
        if !currencies.iter().any(|c| c.code == *code) {
            return Err(DataError::MissingCurrency(code));
        }
    }
    if let Some(brl) = currencies.iter().find(|c| c.code == BASE_CURRENCY) {
        if brl.value != 1.0 {
            return Err(DataError::BaseRate(brl.value));
        }
    }
    Ok(currencies)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENCIES: &str = r#""currencies": [
        {"code": "USD", "symbol": "USD", "name": "US Dollar", "value": 0.2},
        {"code": "EUR", "symbol": "EUR", "name": "Euro", "value": 0.18},
        {"code": "BRL", "symbol": "BRL", "name": "Brazilian Real", "value": 1.0}
    ]"#;

    #[test]
    fn seed_loads() {
        let dataset = Dataset::seed().unwrap();
        assert_eq!(dataset.currencies.len(), 3);
        assert_eq!(dataset.payments.len(), 14);
        assert_eq!(dataset.workers.len(), 20);
        assert_eq!(dataset.invoices.len(), 14);
        assert_eq!(dataset.payments[0].currency.value, 0.2);
    }

    #[test]
    fn invoice_workers_resolve_in_order() {
        let dataset = Dataset::seed().unwrap();
        let workers = dataset.invoice_workers(&dataset.invoices[0]);
        let names: Vec<_> = workers.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["João Silva", "Emma Thompson"]);
    }

    #[test]
    fn subsidiary_lookup_uses_first_payment() {
        let dataset = Dataset::seed().unwrap();
        // Microsoft pays through COMPANY_USD though its invoice is COMPANY_EUR
        assert_eq!(dataset.subsidiary_of("Microsoft"), Some(Subsidiary::CompanyUsd));
        assert_eq!(dataset.subsidiary_of("Unknown"), None);
    }

    #[test]
    fn all_companies_sorted_and_distinct() {
        let dataset = Dataset::seed().unwrap();
        let companies = dataset.all_companies();
        assert_eq!(companies.len(), 14);
        assert_eq!(companies[0], "Amazon");
        assert_eq!(companies.last().map(String::as_str), Some("Toyota"));
    }

    #[test]
    fn all_subsidiaries_sorted_by_name() {
        let dataset = Dataset::seed().unwrap();
        assert_eq!(
            dataset.all_subsidiaries(),
            vec![
                Subsidiary::CompanyBrl,
                Subsidiary::CompanyEur,
                Subsidiary::CompanyUsd
            ]
        );
    }

    #[test]
    fn unknown_currency_rejected() {
        let json = format!(
            r#"{{{CURRENCIES}, "payments": [{{"id": "p1", "amount": 10, "status": "success",
            "email": "a@b.c", "company": "X", "currency": "GBP", "date": "2025-01-01",
            "subsidiaryCompany": "COMPANY_USD"}}]}}"#
        );
        let err = Dataset::read_json(json.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::UnknownCurrency { ref code, .. } if code == "GBP"));
    }

    #[test]
    fn unknown_worker_rejected() {
        let json = format!(
            r#"{{{CURRENCIES}, "invoices": [{{"id": "i1", "amount": 10, "status": "pending",
            "email": "a@b.c", "company": "X", "subsidiaryCompany": "COMPANY_BRL",
            "dueDate": "2025-02-01", "invoiceNumber": "X-1", "workers": ["emp_404"],
            "currency": "BRL", "issueDate": "2025-01-01"}}]}}"#
        );
        let err = Dataset::read_json(json.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::UnknownWorker { ref worker, .. } if worker == "emp_404"));
    }

    #[test]
    fn currency_invariants_enforced() {
        let missing = r#"{"currencies": [{"code": "BRL", "symbol": "BRL", "name": "Real", "value": 1.0}]}"#;
        assert!(matches!(
            Dataset::read_json(missing.as_bytes()),
            Err(DataError::MissingCurrency("USD"))
        ));

        let bad_base = CURRENCIES.replace("\"value\": 1.0", "\"value\": 2.0");
        let json = format!("{{{bad_base}}}");
        assert!(matches!(
            Dataset::read_json(json.as_bytes()),
            Err(DataError::BaseRate(v)) if v == 2.0
        ));

        let duplicate = CURRENCIES.replace("\"code\": \"EUR\"", "\"code\": \"USD\"");
        let json = format!("{{{duplicate}}}");
        assert!(matches!(
            Dataset::read_json(json.as_bytes()),
            Err(DataError::DuplicateCurrency(_))
        ));
    }
}
