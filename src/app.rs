//! Application state and the operations the presentation layer drives.
//!
//! [`App`] owns everything that used to be shared mutable state: the
//! transaction store, the category registry, preferences and the key/value
//! persistence handle. Every user action goes through one of its methods,
//! and every mutation is persisted before the method returns. Persistence
//! is best effort: a failed write is logged and the in-memory state stays
//! authoritative for the session.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::categories::CategoryRegistry;
use crate::db::{KeyValueStore, CATEGORIES_KEY, TRANSACTIONS_KEY};
use crate::error::{LedgerError, Result};
use crate::exporter;
use crate::filter::{self, FilterSpec};
use crate::importer::{self, Dialect};
use crate::models::{Transaction, TransactionDraft, TransactionFields, TxType};
use crate::reports::{self, CategoryBreakdown, MonthTotal, Summary};
use crate::settings::Preferences;
use crate::sort::{sort_transactions, SortState};
use crate::store::TransactionStore;

/// Checks a manual entry and turns it into storable fields.
pub fn validate_draft(draft: &TransactionDraft) -> Result<TransactionFields> {
    let date = draft.date.trim();
    if date.is_empty() {
        return Err(LedgerError::Validation("date is required".to_string()));
    }
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(LedgerError::Validation(format!(
            "date must be YYYY-MM-DD, got {date}"
        )));
    }
    let category = draft.category.trim();
    if category.is_empty() {
        return Err(LedgerError::Validation("category is required".to_string()));
    }
    let amount = importer::parse_plain_amount(draft.amount.trim()).ok_or_else(|| {
        LedgerError::Validation("amount must be greater than 0".to_string())
    })?;
    Ok(TransactionFields {
        tx_type: draft.tx_type.unwrap_or(TxType::Income),
        amount,
        category: category.to_string(),
        date: date.to_string(),
        note: draft.note.trim().to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub dialect: Dialect,
    pub imported: usize,
}

pub struct App<S: KeyValueStore> {
    kv: S,
    store: TransactionStore,
    categories: CategoryRegistry,
    prefs: Preferences,
}

impl<S: KeyValueStore> App<S> {
    /// Loads every record from `kv`. Missing or corrupt records start
    /// empty rather than failing.
    pub fn load(kv: S) -> Self {
        let prefs = Preferences::load(&kv);
        let store = TransactionStore::load(&kv);
        let categories = load_categories(&kv);
        let mut app = Self {
            kv,
            store,
            categories,
            prefs,
        };
        if app.categories.sync_from(app.store.all()) {
            app.save_categories();
        }
        app
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.store.all()
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    pub fn preferences(&self) -> Preferences {
        self.prefs
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    // -- mutations ---------------------------------------------------------

    pub fn create(&mut self, draft: &TransactionDraft) -> Result<&Transaction> {
        let fields = validate_draft(draft)?;
        let id = self.store.add(fields.into_transaction(String::new()));
        self.after_mutation();
        self.store
            .get(&id)
            .ok_or_else(|| LedgerError::UnknownTransaction(id.clone()))
    }

    /// Returns `Ok(false)` when no transaction has `id`.
    pub fn edit(&mut self, id: &str, draft: &TransactionDraft) -> Result<bool> {
        let fields = validate_draft(draft)?;
        if !self.store.update(id, fields) {
            return Ok(false);
        }
        self.after_mutation();
        Ok(true)
    }

    pub fn delete(&mut self, id: &str) -> Option<Transaction> {
        let removed = self.store.remove(id)?;
        self.save_transactions();
        Some(removed)
    }

    /// Empties the store and drops the persisted record along with it.
    pub fn clear(&mut self) -> usize {
        let count = self.store.clear();
        if let Err(e) = self.kv.remove(TRANSACTIONS_KEY) {
            warn!("could not remove transactions: {e}");
        }
        count
    }

    pub fn add_category(&mut self, name: &str) -> bool {
        let added = self.categories.add(name);
        if added {
            self.save_categories();
        }
        added
    }

    pub fn set_preferences(&mut self, prefs: Preferences) {
        self.prefs = prefs;
        if let Err(e) = self.prefs.persist(&mut self.kv) {
            warn!("could not save preferences: {e}");
        }
    }

    /// Imports a whole CSV file. On any failure the store is left as it was.
    pub fn import_text(&mut self, text: &str) -> Result<ImportReport> {
        let batch = importer::parse_csv(text, &self.store.ids())?;
        let imported = self.store.extend(batch.transactions);
        self.after_mutation();
        info!(dialect = batch.dialect.key(), imported, "import committed");
        Ok(ImportReport {
            dialect: batch.dialect,
            imported,
        })
    }

    pub fn export_csv(&self) -> Result<String> {
        exporter::export_csv(self.store.all())
    }

    // -- views -------------------------------------------------------------

    pub fn filtered(&self, spec: &FilterSpec, today: NaiveDate) -> Vec<&Transaction> {
        filter::apply(self.store.all(), spec, today)
    }

    /// Filtered and sorted rows for the table.
    pub fn view(&self, spec: &FilterSpec, sort: SortState, today: NaiveDate) -> Vec<&Transaction> {
        let mut rows = self.filtered(spec, today);
        sort_transactions(&mut rows, sort);
        rows
    }

    pub fn summary(&self, spec: &FilterSpec, today: NaiveDate) -> Summary {
        reports::summarize(&self.filtered(spec, today))
    }

    pub fn category_breakdown(&self, spec: &FilterSpec, today: NaiveDate) -> CategoryBreakdown {
        reports::by_category(&self.filtered(spec, today))
    }

    pub fn monthly(&self, spec: &FilterSpec, today: NaiveDate) -> Vec<MonthTotal> {
        reports::by_month(&self.filtered(spec, today))
    }

    // -- persistence -------------------------------------------------------

    fn after_mutation(&mut self) {
        self.save_transactions();
        if self.categories.sync_from(self.store.all()) {
            self.save_categories();
        }
    }

    fn save_transactions(&mut self) {
        if let Err(e) = self.store.persist(&mut self.kv) {
            warn!("could not save transactions: {e}");
        }
    }

    fn save_categories(&mut self) {
        let result = serde_json::to_string(&self.categories.user_defined())
            .map_err(LedgerError::from)
            .and_then(|json| self.kv.set(CATEGORIES_KEY, &json));
        if let Err(e) = result {
            warn!("could not save categories: {e}");
        }
    }
}

fn load_categories(kv: &impl KeyValueStore) -> CategoryRegistry {
    let raw = match kv.get(CATEGORIES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return CategoryRegistry::default(),
        Err(e) => {
            warn!("could not read categories: {e}");
            return CategoryRegistry::default();
        }
    };
    match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
        Ok(values) => {
            // Non-string entries are kept by their JSON text.
            let names = values.into_iter().map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            });
            CategoryRegistry::from_user_defined(names)
        }
        Err(e) => {
            warn!("ignoring unreadable categories: {e}");
            CategoryRegistry::default()
        }
    }
}
