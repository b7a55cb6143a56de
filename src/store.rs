use std::collections::HashSet;

use tracing::{debug, warn};

use crate::db::{KeyValueStore, TRANSACTIONS_KEY};
use crate::error::Result;
use crate::models::{Transaction, TransactionFields};

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// The authoritative, insertion-ordered list of transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from the persisted JSON array. Anything that is not an
    /// array yields an empty store; entries that do not deserialize are
    /// dropped one by one.
    pub fn load_from(bytes: &[u8]) -> Self {
        let values: Vec<serde_json::Value> = match serde_json::from_slice(bytes) {
            Ok(serde_json::Value::Array(values)) => values,
            Ok(_) => return Self::default(),
            Err(e) => {
                warn!("discarding unreadable transaction record: {e}");
                return Self::default();
            }
        };
        let mut store = Self::default();
        for value in values {
            match serde_json::from_value::<Transaction>(value) {
                Ok(tx) => {
                    store.add(tx);
                }
                Err(e) => debug!("dropping stored transaction: {e}"),
            }
        }
        store
    }

    pub fn load(kv: &impl KeyValueStore) -> Self {
        match kv.get(TRANSACTIONS_KEY) {
            Ok(Some(raw)) => Self::load_from(raw.as_bytes()),
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("could not read transactions: {e}");
                Self::default()
            }
        }
    }

    pub fn persist(&self, kv: &mut impl KeyValueStore) -> Result<()> {
        let json = serde_json::to_string(&self.transactions)?;
        kv.set(TRANSACTIONS_KEY, &json)
    }

    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> HashSet<String> {
        self.transactions.iter().map(|t| t.id.clone()).collect()
    }

    /// Appends a transaction, assigning a fresh id when it has none or when
    /// its id is already taken. Returns the id it was stored under.
    pub fn add(&mut self, mut tx: Transaction) -> String {
        if tx.id.trim().is_empty() || self.contains_id(&tx.id) {
            tx.id = new_id();
        }
        let id = tx.id.clone();
        self.transactions.push(tx);
        id
    }

    /// Appends an import batch in order.
    pub fn extend(&mut self, batch: Vec<Transaction>) -> usize {
        let count = batch.len();
        for tx in batch {
            self.add(tx);
        }
        count
    }

    /// Replaces every field except the id. Returns `false` when no
    /// transaction has that id.
    pub fn update(&mut self, id: &str, fields: TransactionFields) -> bool {
        match self.transactions.iter_mut().find(|t| t.id == id) {
            Some(tx) => {
                *tx = fields.into_transaction(tx.id.clone());
                true
            }
            None => {
                warn!(id, "update skipped: no such transaction");
                false
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Transaction> {
        let pos = self.transactions.iter().position(|t| t.id == id)?;
        Some(self.transactions.remove(pos))
    }

    pub fn clear(&mut self) -> usize {
        let count = self.transactions.len();
        self.transactions.clear();
        count
    }
}
