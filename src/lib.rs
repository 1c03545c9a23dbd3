//! Multi-currency financial dashboard: filtering, BRL conversion, profit and payroll
//! aggregation, invoice charts and CSV exports over an in-memory dataset.

pub mod core;
pub mod export;
