pub mod analytics;
pub mod chart;
pub mod dashboard;
pub mod dataset;
pub mod filters;
pub mod format;
pub mod model;
pub mod rates;

// Flat public surface for domain types and functions.
pub use analytics::{CompanyProfit, CurrencyStats, ProjectSalaries, Totals, WorkerSalary};
pub use chart::{ChartPoint, MonthOption};
pub use dashboard::{Dashboard, DashboardState, Snapshot};
pub use dataset::{DataError, Dataset, DatasetInput};
pub use filters::{FilterSelection, Period};
pub use format::{format_currency, format_number, format_percent};
pub use model::{Currency, Invoice, ParseError, Payment, PaymentStatus, Subsidiary, Worker, YearMonth};
pub use rates::{parse_rate_override, RateTable, BASE_CURRENCY};
