pub mod categories;
pub mod entry;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod status;
pub mod summary;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};

use pocket_ledger::db::{SqliteStore, DB_FILE};
use pocket_ledger::error::{LedgerError, Result};
use pocket_ledger::filter::{CategoryFilter, DateRangePreset, FilterSpec, TypeFilter};
use pocket_ledger::models::{TransactionDraft, TxType};
use pocket_ledger::settings::{get_data_dir, load_settings};
use pocket_ledger::App;

pub(crate) fn open_app() -> Result<App<SqliteStore>> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let kv = SqliteStore::open(&data_dir.join(DB_FILE))?;
    Ok(App::load(kv))
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn invalid(e: String) -> LedgerError {
    LedgerError::Validation(e)
}

#[derive(Parser)]
#[command(name = "pocket", about = "Personal income/expense ledger with bank statement import.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the database.
    Init {
        /// Path for ledger data (default: platform data dir)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Record a transaction.
    Add {
        #[command(flatten)]
        entry: EntryArgs,
    },
    /// Replace every field of an existing transaction.
    Edit {
        /// Transaction id
        id: String,
        #[command(flatten)]
        entry: EntryArgs,
    },
    /// Delete a transaction.
    Delete {
        /// Transaction id
        id: String,
    },
    /// Delete every transaction.
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// List transactions.
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Sort column: date, amount, category, note
        #[arg(long)]
        sort: Option<String>,
        /// Sort ascending
        #[arg(long, conflicts_with = "desc")]
        asc: bool,
        /// Sort descending
        #[arg(long)]
        desc: bool,
    },
    /// Totals, category breakdown and monthly evolution.
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Import a CSV file (self export or bank statement).
    Import {
        /// Path to the CSV file
        file: String,
    },
    /// Export every transaction to CSV.
    Export {
        /// Output path (default: <data_dir>/finanzas-YYYYMMDD.csv)
        #[arg(long)]
        output: Option<String>,
    },
    /// Manage categories.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Show the data location and record counts.
    Status,
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// List categories with their colors.
    List,
    /// Add a category.
    Add {
        /// Category name
        name: String,
    },
}

#[derive(Args)]
pub struct EntryArgs {
    /// income or expense
    #[arg(long = "type")]
    pub tx_type: String,
    /// Amount, positive (comma or period decimal separator)
    #[arg(long)]
    pub amount: String,
    #[arg(long)]
    pub category: String,
    /// Date: YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long, default_value = "")]
    pub note: String,
}

impl EntryArgs {
    pub fn to_draft(&self) -> Result<TransactionDraft> {
        let tx_type: TxType = self.tx_type.parse().map_err(invalid)?;
        Ok(TransactionDraft {
            tx_type: Some(tx_type),
            amount: self.amount.clone(),
            category: self.category.clone(),
            date: self
                .date
                .clone()
                .unwrap_or_else(|| today().format("%Y-%m-%d").to_string()),
            note: self.note.clone(),
        })
    }
}

#[derive(Args)]
pub struct FilterArgs {
    /// Date range: 7d, 30d, ytd, all (default from settings)
    #[arg(long)]
    pub range: Option<String>,
    /// all, income or expense
    #[arg(long = "type", default_value = "all")]
    pub tx_type: String,
    /// Category name, or all
    #[arg(long, default_value = "all")]
    pub category: String,
    /// Start date: YYYY-MM-DD
    #[arg(long = "from")]
    pub from_date: Option<String>,
    /// End date: YYYY-MM-DD
    #[arg(long = "to")]
    pub to_date: Option<String>,
    /// Text to look for in category and note
    #[arg(long, default_value = "")]
    pub search: String,
}

impl FilterArgs {
    pub fn to_spec(&self) -> Result<FilterSpec> {
        let range = match &self.range {
            Some(r) => r.clone(),
            None => load_settings().default_range,
        };
        let preset: DateRangePreset = range.parse().map_err(invalid)?;
        let tx_type: TypeFilter = self.tx_type.parse().map_err(invalid)?;
        Ok(FilterSpec {
            preset,
            tx_type,
            category: CategoryFilter::from(self.category.as_str()),
            from: self.from_date.clone(),
            to: self.to_date.clone(),
            search: self.search.clone(),
        })
    }
}
