//! Personal income/expense ledger: storage, bank statement import, CSV
//! export, filtering and the aggregates behind the summary views.

pub mod app;
pub mod categories;
pub mod categorizer;
pub mod db;
pub mod error;
pub mod exporter;
pub mod filter;
pub mod fmt;
pub mod importer;
pub mod models;
pub mod reports;
pub mod settings;
pub mod sort;
pub mod store;

pub use app::{validate_draft, App, ImportReport};
pub use error::{LedgerError, Result};
