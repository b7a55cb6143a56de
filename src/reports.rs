use std::collections::BTreeMap;

use crate::models::{Transaction, TxType};

/// Label used in breakdowns for expenses with a blank category.
pub const UNCATEGORIZED: &str = "Sin categoría";

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub income_total: f64,
    pub expense_total: f64,
    pub balance: f64,
    pub count: usize,
}

pub fn summarize(filtered: &[&Transaction]) -> Summary {
    let mut income_total = 0.0;
    let mut expense_total = 0.0;
    for tx in filtered {
        match tx.tx_type {
            TxType::Income => income_total += tx.amount,
            TxType::Expense => expense_total += tx.amount,
        }
    }
    Summary {
        income_total,
        expense_total,
        balance: income_total - expense_total,
        count: filtered.len(),
    }
}

// ---------------------------------------------------------------------------
// Expense breakdown by category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryBreakdown {
    /// In order of first appearance.
    pub categories: Vec<CategoryTotal>,
    pub total: f64,
}

impl CategoryBreakdown {
    /// A breakdown with a single slice says nothing, so it is only worth
    /// showing once two categories are present.
    pub fn is_meaningful(&self) -> bool {
        self.categories.len() >= 2
    }

    /// Percentage of the expense total that `item` represents.
    pub fn share(&self, item: &CategoryTotal) -> f64 {
        if self.total != 0.0 {
            item.total / self.total * 100.0
        } else {
            0.0
        }
    }
}

pub fn by_category(filtered: &[&Transaction]) -> CategoryBreakdown {
    let mut breakdown = CategoryBreakdown::default();
    for tx in filtered.iter().filter(|t| t.is_expense()) {
        let name = if tx.category.is_empty() {
            UNCATEGORIZED
        } else {
            tx.category.as_str()
        };
        match breakdown.categories.iter_mut().find(|c| c.category == name) {
            Some(entry) => entry.total += tx.amount,
            None => breakdown.categories.push(CategoryTotal {
                category: name.to_string(),
                total: tx.amount,
            }),
        }
        breakdown.total += tx.amount;
    }
    breakdown
}

// ---------------------------------------------------------------------------
// Monthly totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MonthTotal {
    /// `YYYY-MM`
    pub month: String,
    pub income_total: f64,
    pub expense_total: f64,
}

impl MonthTotal {
    pub fn net(&self) -> f64 {
        self.income_total - self.expense_total
    }
}

pub fn by_month(filtered: &[&Transaction]) -> Vec<MonthTotal> {
    let mut months: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for tx in filtered {
        let entry = months.entry(tx.month_key()).or_default();
        match tx.tx_type {
            TxType::Income => entry.0 += tx.amount,
            TxType::Expense => entry.1 += tx.amount,
        }
    }
    months
        .into_iter()
        .map(|(month, (income_total, expense_total))| MonthTotal {
            month: month.to_string(),
            income_total,
            expense_total,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_for(b: &CategoryBreakdown, category: &str) -> Option<f64> {
        b.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.total)
    }

    fn tx(tx_type: TxType, amount: f64, category: &str, date: &str) -> Transaction {
        Transaction {
            id: format!("{category}-{date}-{amount}"),
            tx_type,
            amount,
            category: category.to_string(),
            date: date.to_string(),
            note: String::new(),
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx(TxType::Income, 1800.0, "Nómina", "2024-02-28"),
            tx(TxType::Expense, 650.0, "Alquiler", "2024-02-01"),
            tx(TxType::Expense, 45.5, "Supermercado", "2024-02-10"),
            tx(TxType::Expense, 30.25, "Supermercado", "2024-03-03"),
            tx(TxType::Expense, 12.0, "", "2024-03-04"),
            tx(TxType::Income, 20.0, "Bizum", "2024-01-15"),
        ]
    }

    #[test]
    fn test_summarize() {
        let ts = sample();
        let view: Vec<&Transaction> = ts.iter().collect();
        let s = summarize(&view);
        assert_eq!(s.income_total, 1820.0);
        assert_eq!(s.expense_total, 737.75);
        assert_eq!(s.income_total - s.expense_total, s.balance);
        assert_eq!(s.count, view.len());
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), Summary::default());
    }

    #[test]
    fn test_by_category_expenses_only() {
        let ts = sample();
        let view: Vec<&Transaction> = ts.iter().collect();
        let b = by_category(&view);
        let names: Vec<&str> = b.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Alquiler", "Supermercado", UNCATEGORIZED]);
        assert_eq!(total_for(&b, "Supermercado"), Some(75.75));
        assert_eq!(total_for(&b, "Nómina"), None);
        assert_eq!(b.total, 737.75);
        assert!(b.is_meaningful());
    }

    #[test]
    fn test_single_category_is_not_meaningful() {
        let ts = vec![tx(TxType::Expense, 10.0, "Ocio", "2024-01-01")];
        let view: Vec<&Transaction> = ts.iter().collect();
        let b = by_category(&view);
        assert_eq!(total_for(&b, "Ocio"), Some(10.0));
        assert!(!b.is_meaningful());
        assert_eq!(b.share(&b.categories[0]), 100.0);
    }

    #[test]
    fn test_by_month_sorted_with_zero_fill() {
        let ts = sample();
        let view: Vec<&Transaction> = ts.iter().collect();
        let months = by_month(&view);
        let keys: Vec<&str> = months.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(keys, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(months[0].income_total, 20.0);
        assert_eq!(months[0].expense_total, 0.0);
        assert_eq!(months[1].income_total, 1800.0);
        assert_eq!(months[1].expense_total, 695.5);
        assert_eq!(months[2].income_total, 0.0);
        assert_eq!(months[2].expense_total, 42.25);
    }
}
