//! CSV export presets.
//!
//! Each preset turns a [`Snapshot`] into rows of a `CsvRecord` struct. Column headers come from
//! the `#[serde(rename)]` of each field and column descriptions from their doc comments.

use crate::core::dashboard::Snapshot;
use crate::core::filters::Period;
use crate::core::rates::{convert_using_record_rate, BASE_CURRENCY};
use findash_derive::CsvRecord;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Placeholder for missing invoice client and description
const NOT_AVAILABLE: &str = "N/A";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("export output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Column of an export preset
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CsvField {
    pub name: &'static str,
    pub description: &'static str,
}

/// A row type that can be written by [`to_csv`]. Implemented with `#[derive(CsvRecord)]`.
pub trait CsvRecord {
    fn csv_schema() -> &'static [CsvField];
    fn csv_headers() -> &'static [&'static str];
    /// Cell values in header order, `None` for a missing value
    fn csv_values(&self) -> Vec<Option<String>>;
}

/// Rendering of a single CSV cell
pub trait CsvValue {
    fn csv_value(&self) -> Option<String>;
}

impl CsvValue for String {
    fn csv_value(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl CsvValue for &str {
    fn csv_value(&self) -> Option<String> {
        Some((*self).to_string())
    }
}

/// Raw numbers are falsy at zero: `0` and `NaN` render as an empty cell
impl CsvValue for f64 {
    fn csv_value(&self) -> Option<String> {
        (*self != 0.0 && !self.is_nan()).then(|| self.to_string())
    }
}

impl CsvValue for usize {
    fn csv_value(&self) -> Option<String> {
        (*self != 0).then(|| self.to_string())
    }
}

impl<T: CsvValue> CsvValue for Option<T> {
    fn csv_value(&self) -> Option<String> {
        self.as_ref().and_then(CsvValue::csv_value)
    }
}

/// Derived money value, written with two decimals
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Money(pub f64);

impl CsvValue for Money {
    fn csv_value(&self) -> Option<String> {
        Some(format!("{:.2}", self.0))
    }
}

/// Render rows as CSV: unquoted header, every cell wrapped in double quotes, `\n` line endings and
/// no trailing newline. Returns `None` when there are no rows.
pub fn to_csv<R: CsvRecord>(rows: &[R]) -> Result<Option<String>, ExportError> {
    if rows.is_empty() {
        return Ok(None);
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(R::csv_headers())?;
    for row in rows {
        let cells = row
            .csv_values()
            .into_iter()
            .map(|value| format!("\"{}\"", value.unwrap_or_default()));
        writer.write_record(cells)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let mut output = String::from_utf8(bytes)?;
    if output.ends_with('\n') {
        output.pop();
    }
    Ok(Some(output))
}

#[derive(Debug, Serialize, CsvRecord)]
pub struct PaymentRow {
    #[serde(rename = "Data")]
    date: String,
    /// Empty when the payment has no description
    #[serde(rename = "Descrição")]
    description: Option<String>,
    /// Amount in the payment currency
    #[serde(rename = "Valor")]
    amount: f64,
    #[serde(rename = "Moeda")]
    currency: String,
    /// Amount converted with the payment currency rate
    #[serde(rename = "Valor em BRL")]
    amount_brl: Money,
    #[serde(rename = "Empresa")]
    company: String,
}

#[derive(Debug, Serialize, CsvRecord)]
pub struct WorkerRow {
    #[serde(rename = "Nome")]
    name: String,
    #[serde(rename = "Cargo")]
    role: String,
    #[serde(rename = "Horas Trabalhadas")]
    hours_worked: f64,
    #[serde(rename = "Valor por Hora")]
    hourly_rate: f64,
    #[serde(rename = "Moeda")]
    currency: String,
    /// Hours worked times hourly rate
    #[serde(rename = "Salário Mensal")]
    monthly_salary: Money,
    #[serde(rename = "Salário em BRL")]
    monthly_salary_brl: Money,
    #[serde(rename = "Empresa")]
    company: String,
}

#[derive(Debug, Serialize, CsvRecord)]
pub struct ProfitRow {
    #[serde(rename = "Empresa")]
    company: String,
    #[serde(rename = "Receita")]
    revenue: Money,
    #[serde(rename = "Custos")]
    costs: Money,
    #[serde(rename = "Lucro")]
    profit: Money,
    #[serde(rename = "Margem de Lucro (%)")]
    profit_margin: Money,
    /// Always BRL
    #[serde(rename = "Moeda")]
    currency: &'static str,
}

#[derive(Debug, Serialize, CsvRecord)]
pub struct InvoiceRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Número da Fatura")]
    invoice_number: String,
    #[serde(rename = "Data de Emissão")]
    issue_date: String,
    #[serde(rename = "Data de Vencimento")]
    due_date: String,
    /// N/A when unknown
    #[serde(rename = "Cliente")]
    client: String,
    #[serde(rename = "Valor")]
    amount: f64,
    #[serde(rename = "Moeda")]
    currency: String,
    #[serde(rename = "Valor em BRL")]
    amount_brl: Money,
    /// success, pending, processing or failed
    #[serde(rename = "Status")]
    status: &'static str,
    #[serde(rename = "Empresa")]
    company: String,
    /// N/A when missing
    #[serde(rename = "Descrição")]
    description: String,
}

#[derive(Debug, Serialize, CsvRecord)]
pub struct ChartRow {
    /// Slot label, e.g. 15/06, jun./25-S3 or jun. de 25
    #[serde(rename = "Período")]
    label: String,
    /// Bucket key
    #[serde(rename = "Data")]
    date: String,
    #[serde(rename = "Valor Total (BRL)")]
    value: Money,
    /// Diário, Semanal or Mensal
    #[serde(rename = "Período de Agrupamento")]
    grouping: &'static str,
}

#[derive(Debug, Serialize, CsvRecord)]
pub struct CurrencyRow {
    #[serde(rename = "Moeda")]
    currency: String,
    #[serde(rename = "Quantidade de Pagamentos")]
    count: usize,
    #[serde(rename = "Total na Moeda")]
    total: Money,
    #[serde(rename = "Total em BRL")]
    total_brl: Money,
    /// Units of the currency per BRL, as stored on the currency
    #[serde(rename = "Taxa de Câmbio")]
    rate: f64,
}

#[derive(Debug, Serialize, CsvRecord)]
pub struct CompanyReportRow {
    #[serde(rename = "Empresa")]
    company: String,
    #[serde(rename = "Total de Receitas (BRL)")]
    revenue: Money,
    #[serde(rename = "Total de Custos (BRL)")]
    costs: Money,
    #[serde(rename = "Lucro (BRL)")]
    profit: Money,
    #[serde(rename = "Margem de Lucro (%)")]
    profit_margin: Money,
    #[serde(rename = "Número de Funcionários")]
    workers: usize,
    #[serde(rename = "Número de Pagamentos")]
    payments: usize,
}

pub fn payment_rows(snapshot: &Snapshot) -> Vec<PaymentRow> {
    snapshot
        .payments
        .iter()
        .map(|p| PaymentRow {
            date: p.date.to_string(),
            description: p.description.clone(),
            amount: p.amount,
            currency: p.currency.code.clone(),
            amount_brl: Money(convert_using_record_rate(p.amount, &p.currency)),
            company: p.company.clone(),
        })
        .collect()
}

pub fn worker_rows(snapshot: &Snapshot) -> Vec<WorkerRow> {
    snapshot
        .workers
        .iter()
        .map(|w| {
            let salary = w.monthly_salary();
            WorkerRow {
                name: w.name.clone(),
                role: w.role.clone(),
                hours_worked: w.hours_worked,
                hourly_rate: w.hourly_rate,
                currency: w.currency.code.clone(),
                monthly_salary: Money(salary),
                monthly_salary_brl: Money(convert_using_record_rate(salary, &w.currency)),
                company: w.company.clone(),
            }
        })
        .collect()
}

pub fn profit_rows(snapshot: &Snapshot) -> Vec<ProfitRow> {
    snapshot
        .profits_by_company
        .iter()
        .map(|c| ProfitRow {
            company: c.company.clone(),
            revenue: Money(c.revenue),
            costs: Money(c.costs),
            profit: Money(c.profit),
            profit_margin: Money(c.profit_margin),
            currency: BASE_CURRENCY,
        })
        .collect()
}

pub fn invoice_rows(snapshot: &Snapshot) -> Vec<InvoiceRow> {
    snapshot
        .invoices
        .iter()
        .map(|i| InvoiceRow {
            id: i.id.clone(),
            invoice_number: i.invoice_number.clone(),
            issue_date: i.issue_date.to_string(),
            due_date: i.due_date.to_string(),
            client: non_empty_or_na(i.client.as_deref()),
            amount: i.amount,
            currency: i.currency.code.clone(),
            amount_brl: Money(convert_using_record_rate(i.amount, &i.currency)),
            status: i.status.as_str(),
            company: i.company.clone(),
            description: non_empty_or_na(i.description.as_deref()),
        })
        .collect()
}

pub fn chart_rows(snapshot: &Snapshot) -> Vec<ChartRow> {
    snapshot
        .invoices_chart
        .iter()
        .map(|point| ChartRow {
            label: point.label.clone(),
            date: point.date.clone(),
            value: Money(point.value),
            grouping: snapshot.period.label(),
        })
        .collect()
}

pub fn currency_rows(snapshot: &Snapshot) -> Vec<CurrencyRow> {
    snapshot
        .stats_by_currency
        .iter()
        .map(|s| CurrencyRow {
            currency: s.currency.code.clone(),
            count: s.count,
            total: Money(s.total),
            total_brl: Money(s.total_brl),
            rate: s.currency.value,
        })
        .collect()
}

pub fn company_report_rows(snapshot: &Snapshot) -> Vec<CompanyReportRow> {
    snapshot
        .profits_by_company
        .iter()
        .map(|c| CompanyReportRow {
            company: c.company.clone(),
            revenue: Money(c.revenue),
            costs: Money(c.costs),
            profit: Money(c.profit),
            profit_margin: Money(c.profit_margin),
            workers: snapshot.company_workers(&c.company),
            payments: snapshot.company_payments(&c.company),
        })
        .collect()
}

fn non_empty_or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPreset {
    Payments,
    Workers,
    Profits,
    Invoices,
    Chart,
    Analytics,
    FullReport,
}

impl ExportPreset {
    pub const ALL: [ExportPreset; 7] = [
        ExportPreset::Payments,
        ExportPreset::Workers,
        ExportPreset::Profits,
        ExportPreset::Invoices,
        ExportPreset::Chart,
        ExportPreset::Analytics,
        ExportPreset::FullReport,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExportPreset::Payments => "payments",
            ExportPreset::Workers => "workers",
            ExportPreset::Profits => "profits",
            ExportPreset::Invoices => "invoices",
            ExportPreset::Chart => "chart",
            ExportPreset::Analytics => "analytics",
            ExportPreset::FullReport => "full-report",
        }
    }

    /// File name of the export. The chart file is named after the grouping period.
    pub fn filename(self, period: Period) -> String {
        match self {
            ExportPreset::Payments => "pagamentos.csv".to_string(),
            ExportPreset::Workers => "profissionais.csv".to_string(),
            ExportPreset::Profits => "lucros.csv".to_string(),
            ExportPreset::Invoices => "faturas.csv".to_string(),
            ExportPreset::Chart => format!("faturas_{}.csv", period.file_suffix()),
            ExportPreset::Analytics => "analytics_por_moeda.csv".to_string(),
            ExportPreset::FullReport => "relatorio_completo.csv".to_string(),
        }
    }

    pub fn columns(self) -> &'static [CsvField] {
        match self {
            ExportPreset::Payments => PaymentRow::csv_schema(),
            ExportPreset::Workers => WorkerRow::csv_schema(),
            ExportPreset::Profits => ProfitRow::csv_schema(),
            ExportPreset::Invoices => InvoiceRow::csv_schema(),
            ExportPreset::Chart => ChartRow::csv_schema(),
            ExportPreset::Analytics => CurrencyRow::csv_schema(),
            ExportPreset::FullReport => CompanyReportRow::csv_schema(),
        }
    }

    pub fn render(self, snapshot: &Snapshot) -> Result<Option<String>, ExportError> {
        match self {
            ExportPreset::Payments => to_csv(&payment_rows(snapshot)),
            ExportPreset::Workers => to_csv(&worker_rows(snapshot)),
            ExportPreset::Profits => to_csv(&profit_rows(snapshot)),
            ExportPreset::Invoices => to_csv(&invoice_rows(snapshot)),
            ExportPreset::Chart => to_csv(&chart_rows(snapshot)),
            ExportPreset::Analytics => to_csv(&currency_rows(snapshot)),
            ExportPreset::FullReport => to_csv(&company_report_rows(snapshot)),
        }
    }

    /// Rows of the export as a JSON array
    pub fn render_json(self, snapshot: &Snapshot) -> Result<serde_json::Value, ExportError> {
        let value = match self {
            ExportPreset::Payments => serde_json::to_value(payment_rows(snapshot))?,
            ExportPreset::Workers => serde_json::to_value(worker_rows(snapshot))?,
            ExportPreset::Profits => serde_json::to_value(profit_rows(snapshot))?,
            ExportPreset::Invoices => serde_json::to_value(invoice_rows(snapshot))?,
            ExportPreset::Chart => serde_json::to_value(chart_rows(snapshot))?,
            ExportPreset::Analytics => serde_json::to_value(currency_rows(snapshot))?,
            ExportPreset::FullReport => serde_json::to_value(company_report_rows(snapshot))?,
        };
        Ok(value)
    }
}

/// Write one preset into `out_dir`. No file is written when the export has no rows.
pub fn write_export(
    preset: ExportPreset,
    snapshot: &Snapshot,
    out_dir: &Path,
) -> Result<Option<PathBuf>, ExportError> {
    let Some(content) = preset.render(snapshot)? else {
        log::info!("Nothing to export for {}", preset.name());
        return Ok(None);
    };

    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(preset.filename(snapshot.period));
    fs::write(&path, content)?;
    log::debug!("Wrote {} export to {}", preset.name(), path.display());
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dashboard::DashboardState;
    use crate::core::dataset::Dataset;
    use chrono::NaiveDate;

    #[derive(CsvRecord)]
    struct Sample {
        #[serde(rename = "Nome")]
        name: String,
        #[serde(rename = "Valor")]
        value: f64,
        note: Option<String>,
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    fn snapshot_with<'a>(dataset: &'a Dataset, state: &DashboardState) -> Snapshot<'a> {
        Snapshot::compute(dataset, state, today())
    }

    #[test]
    fn csv_shape_quotes_cells_but_not_header() {
        let rows = [
            Sample {
                name: "Ana".to_string(),
                value: 1.5,
                note: None,
            },
            Sample {
                name: "Bia".to_string(),
                value: 0.0,
                note: Some("x".to_string()),
            },
        ];
        let csv = to_csv(&rows).unwrap().unwrap();
        assert_eq!(csv, "Nome,Valor,note\n\"Ana\",\"1.5\",\"\"\n\"Bia\",\"\",\"x\"");

        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), rows.len() + 1);
        assert!(lines.iter().all(|l| l.split(',').count() == 3));
    }

    #[test]
    fn csv_does_not_escape_embedded_quotes() {
        let rows = [Sample {
            name: "a \"b\", c".to_string(),
            value: 2.0,
            note: None,
        }];
        let csv = to_csv(&rows).unwrap().unwrap();
        assert_eq!(csv.lines().nth(1), Some("\"a \"b\", c\",\"2\",\"\""));
    }

    #[test]
    fn empty_rows_produce_nothing() {
        let rows: Vec<Sample> = Vec::new();
        assert!(to_csv(&rows).unwrap().is_none());
    }

    #[test]
    fn every_preset_renders_the_seed() {
        let dataset = Dataset::seed().unwrap();
        let state = DashboardState::default();
        let snapshot = snapshot_with(&dataset, &state);

        for preset in ExportPreset::ALL {
            let csv = preset.render(&snapshot).unwrap().unwrap();
            let header = csv.lines().next().unwrap();
            let columns: Vec<_> = preset.columns().iter().map(|c| c.name).collect();
            assert_eq!(header, columns.join(","), "{}", preset.name());
        }
    }

    #[test]
    fn payments_export_converts_to_brl() {
        let dataset = Dataset::seed().unwrap();
        let state = DashboardState::default();
        let snapshot = snapshot_with(&dataset, &state);
        let csv = ExportPreset::Payments.render(&snapshot).unwrap().unwrap();

        assert_eq!(csv.lines().count(), 15);
        assert_eq!(
            csv.lines().nth(1),
            Some("\"2025-06-15\",\"\",\"25000\",\"USD\",\"125000.00\",\"Apple\"")
        );
    }

    #[test]
    fn invoices_export_fills_missing_client_with_na() {
        let dataset = Dataset::seed().unwrap();
        let state = DashboardState::default();
        let snapshot = snapshot_with(&dataset, &state);
        let rows = invoice_rows(&snapshot);

        assert_eq!(rows.len(), 14);
        assert_eq!(rows[0].client, "N/A");
        assert_eq!(rows[0].description, "N/A");
        assert_eq!(rows[0].status, "success");
        assert!((rows[0].amount_brl.0 - 68000.0).abs() < 1e-6);
    }

    #[test]
    fn chart_export_follows_period() {
        let dataset = Dataset::seed().unwrap();
        let mut state = DashboardState::default();
        state.selection.period = Period::Week;
        let snapshot = snapshot_with(&dataset, &state);

        assert_eq!(ExportPreset::Chart.filename(snapshot.period), "faturas_semanal.csv");
        let rows = chart_rows(&snapshot);
        assert_eq!(rows.len(), 12);
        assert!(rows.iter().all(|r| r.grouping == "Semanal"));
    }

    #[test]
    fn full_report_counts_company_records() {
        let dataset = Dataset::seed().unwrap();
        let state = DashboardState::default();
        let snapshot = snapshot_with(&dataset, &state);
        let rows = company_report_rows(&snapshot);

        let apple = rows.iter().find(|r| r.company == "Apple").unwrap();
        assert_eq!(apple.workers, 2);
        assert_eq!(apple.payments, 1);
        let natura = rows.iter().find(|r| r.company == "Natura").unwrap();
        assert_eq!(natura.workers, 1);
    }

    #[test]
    fn company_without_workers_exports_empty_worker_count() {
        let json = r#"{
            "currencies": [
                {"code": "USD", "symbol": "US$", "name": "US Dollar", "value": 0.2},
                {"code": "EUR", "symbol": "€", "name": "Euro", "value": 0.18},
                {"code": "BRL", "symbol": "R$", "name": "Brazilian Real", "value": 1.0}
            ],
            "payments": [{"id": "p1", "amount": 500, "status": "success", "email": "a@solo.com",
                "company": "Solo", "currency": "BRL", "date": "2025-06-02",
                "subsidiaryCompany": "COMPANY_BRL"}]
        }"#;
        let dataset = Dataset::read_json(json.as_bytes()).unwrap();
        let snapshot = snapshot_with(&dataset, &DashboardState::default());

        let csv = ExportPreset::FullReport.render(&snapshot).unwrap().unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("\"Solo\","), "{row}");
        assert!(row.ends_with(",\"100.00\",\"\",\"1\""), "{row}");
    }

    #[test]
    fn analytics_leaves_zero_counts_empty_but_keeps_money() {
        let dataset = Dataset::seed().unwrap();
        let mut state = DashboardState::default();
        state.selection.currency = Some("USD".to_string());
        let snapshot = snapshot_with(&dataset, &state);

        let csv = ExportPreset::Analytics.render(&snapshot).unwrap().unwrap();
        assert!(csv.contains("\"EUR\",\"\",\"0.00\",\"0.00\",\"0.18\""), "{csv}");
        assert!(csv.contains("\"BRL\",\"\",\"0.00\",\"0.00\",\"1\""), "{csv}");
    }

    #[test]
    fn filtered_out_export_writes_no_file() {
        let dataset = Dataset::seed().unwrap();
        let mut state = DashboardState::default();
        state.selection.company = Some("Nobody".to_string());
        let snapshot = snapshot_with(&dataset, &state);

        let dir = std::env::temp_dir().join(format!("findash-export-{}", std::process::id()));
        let written = write_export(ExportPreset::Payments, &snapshot, &dir).unwrap();
        assert!(written.is_none());
        assert!(!dir.join("pagamentos.csv").exists());

        // analytics always has one row per currency
        let written = write_export(ExportPreset::Analytics, &snapshot, &dir).unwrap().unwrap();
        let content = fs::read_to_string(&written).unwrap();
        assert_eq!(content.lines().count(), 4);
        assert!(content.contains("\"USD\",\"\",\"0.00\",\"0.00\",\"0.2\""));
        fs::remove_dir_all(&dir).unwrap();
    }
}
