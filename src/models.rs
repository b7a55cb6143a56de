use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Direction of money flow. The amount on a [`Transaction`] is always
/// positive; the sign lives here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Income,
    Expense,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!("unknown transaction type: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub amount: f64,
    pub category: String,
    /// ISO `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub note: String,
}

impl Transaction {
    /// `YYYY-MM` prefix of the date.
    pub fn month_key(&self) -> &str {
        self.date.get(..7).unwrap_or(&self.date)
    }

    pub fn is_income(&self) -> bool {
        self.tx_type == TxType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.tx_type == TxType::Expense
    }
}

/// Every field of a transaction except its id. Used for edits, which
/// replace all of these in place.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFields {
    pub tx_type: TxType,
    pub amount: f64,
    pub category: String,
    pub date: String,
    pub note: String,
}

impl TransactionFields {
    pub fn into_transaction(self, id: String) -> Transaction {
        Transaction {
            id,
            tx_type: self.tx_type,
            amount: self.amount,
            category: self.category,
            date: self.date,
            note: self.note,
        }
    }
}

/// Unvalidated manual entry, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct TransactionDraft {
    pub tx_type: Option<TxType>,
    pub amount: String,
    pub category: String,
    pub date: String,
    pub note: String,
}
