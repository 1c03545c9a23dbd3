use chrono::{Datelike, Months, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Errors raised when parsing user-supplied values (CLI flags, month keys).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid month '{0}', expected YYYY-MM")]
    Month(String),
    #[error("unknown subsidiary '{0}', expected COMPANY_USD, COMPANY_EUR or COMPANY_BRL")]
    Subsidiary(String),
    #[error("invalid rate override '{0}', expected CODE=RATE")]
    Rate(String),
}

/// A currency and its rate relative to BRL (`1 BRL = value <code>`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Currency {
    /// ISO code, e.g. USD
    pub code: String,
    pub symbol: String,
    pub name: String,
    /// Units of this currency bought by one BRL
    pub value: f64,
}

impl Currency {
    pub fn is_brl(&self) -> bool {
        self.code == crate::core::rates::BASE_CURRENCY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
        }
    }
}

/// Corporate entity that issued or received a payment or invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Subsidiary {
    #[serde(rename = "COMPANY_USD")]
    CompanyUsd,
    #[serde(rename = "COMPANY_EUR")]
    CompanyEur,
    #[serde(rename = "COMPANY_BRL")]
    CompanyBrl,
}

impl Subsidiary {
    pub fn code(self) -> &'static str {
        match self {
            Subsidiary::CompanyUsd => "COMPANY_USD",
            Subsidiary::CompanyEur => "COMPANY_EUR",
            Subsidiary::CompanyBrl => "COMPANY_BRL",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Subsidiary::CompanyUsd => "Subsidiária USD",
            Subsidiary::CompanyEur => "Subsidiária EUR",
            Subsidiary::CompanyBrl => "Subsidiária BRL",
        }
    }
}

impl fmt::Display for Subsidiary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Subsidiary {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "COMPANY_USD" => Ok(Subsidiary::CompanyUsd),
            "COMPANY_EUR" => Ok(Subsidiary::CompanyEur),
            "COMPANY_BRL" => Ok(Subsidiary::CompanyBrl),
            _ => Err(ParseError::Subsidiary(s.to_string())),
        }
    }
}

/// Calendar month key, rendered as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(YearMonth { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn days_in_month(self) -> u32 {
        let first = self.first_day();
        first
            .checked_add_months(Months::new(1))
            .map(|next| (next - first).num_days() as u32)
            .unwrap_or(31)
    }

    /// The month `n` months before this one
    pub fn months_back(self, n: u32) -> Self {
        let index = self.year * 12 + self.month as i32 - 1 - n as i32;
        YearMonth {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let first = self.first_day();
        (0..self.days_in_month()).filter_map(move |d| first.checked_add_days(chrono::Days::new(d.into())))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::Month(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        let year = year.parse().map_err(|_| err())?;
        let month = month.parse().map_err(|_| err())?;
        YearMonth::new(year, month).ok_or_else(err)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: String,
    pub amount: f64,
    pub status: PaymentStatus,
    pub email: String,
    pub company: String,
    pub currency: Currency,
    pub date: NaiveDate,
    pub subsidiary: Subsidiary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Invoice {
    pub id: String,
    pub amount: f64,
    pub status: PaymentStatus,
    pub email: String,
    pub company: String,
    pub subsidiary: Subsidiary,
    pub due_date: NaiveDate,
    pub invoice_number: String,
    /// Ids of the workers billed on this invoice, in order
    pub worker_ids: Vec<String>,
    pub currency: Currency,
    pub issue_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Worker {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub hourly_rate: f64,
    /// Hours worked in a month
    pub hours_worked: f64,
    pub currency: Currency,
    pub company: String,
}

impl Worker {
    /// Monthly salary in the worker's own currency
    pub fn monthly_salary(&self) -> f64 {
        self.hours_worked * self.hourly_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_month_parses_and_displays() {
        let ym: YearMonth = "2025-06".parse().unwrap();
        assert_eq!(ym, YearMonth { year: 2025, month: 6 });
        assert_eq!(ym.to_string(), "2025-06");
    }

    #[test]
    fn year_month_rejects_bad_input() {
        assert!("2025-13".parse::<YearMonth>().is_err());
        assert!("2025-6".parse::<YearMonth>().is_err());
        assert!("June".parse::<YearMonth>().is_err());
        assert_eq!(
            "".parse::<YearMonth>(),
            Err(ParseError::Month(String::new()))
        );
    }

    #[test]
    fn months_back_crosses_year_boundary() {
        let ym = YearMonth::new(2025, 2).unwrap();
        assert_eq!(ym.months_back(0), ym);
        assert_eq!(ym.months_back(2), YearMonth::new(2024, 12).unwrap());
        assert_eq!(ym.months_back(14), YearMonth::new(2023, 12).unwrap());
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(YearMonth::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(YearMonth::new(2025, 2).unwrap().days_in_month(), 28);
        assert_eq!(YearMonth::new(2025, 12).unwrap().days_in_month(), 31);
        assert_eq!(YearMonth::new(2025, 6).unwrap().days().count(), 30);
    }

    #[test]
    fn subsidiary_round_trips_codes() {
        assert_eq!("COMPANY_EUR".parse::<Subsidiary>(), Ok(Subsidiary::CompanyEur));
        assert_eq!("company-usd".parse::<Subsidiary>(), Ok(Subsidiary::CompanyUsd));
        assert!("COMPANY_GBP".parse::<Subsidiary>().is_err());
        assert_eq!(Subsidiary::CompanyBrl.to_string(), "COMPANY_BRL");
    }

    #[test]
    fn monthly_salary_is_rate_times_hours() {
        let worker = Worker {
            id: "emp_1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role: "Dev".to_string(),
            hourly_rate: 80.0,
            hours_worked: 150.0,
            currency: Currency {
                code: "USD".to_string(),
                symbol: "USD".to_string(),
                name: "US Dollar".to_string(),
                value: 0.2,
            },
            company: "Coca-Cola".to_string(),
        };
        assert_eq!(worker.monthly_salary(), 12000.0);
    }
}
