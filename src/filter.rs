use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{Transaction, TxType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRangePreset {
    Last7Days,
    #[default]
    Last30Days,
    YearToDate,
    All,
}

impl DateRangePreset {
    /// Earliest date kept by the preset, relative to `today`. The relative
    /// windows cover N calendar days including today: a date exactly N days
    /// back is already older than `now - N days` once the day has started.
    pub fn start(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Last7Days => Some(today - Duration::days(6)),
            Self::Last30Days => Some(today - Duration::days(29)),
            Self::YearToDate => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            Self::All => None,
        }
    }
}

impl FromStr for DateRangePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "7" | "7d" => Ok(Self::Last7Days),
            "30" | "30d" => Ok(Self::Last30Days),
            "ytd" => Ok(Self::YearToDate),
            "all" => Ok(Self::All),
            other => Err(format!("unknown date range: {other} (expected 7d, 30d, ytd, all)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(TxType),
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<TxType>().map(Self::Only)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        if s == "all" {
            Self::All
        } else {
            Self::Named(s.to_string())
        }
    }
}

/// What the user asked to see. Built once by the caller and handed to
/// [`apply`]; applying it has no side effects.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSpec {
    pub preset: DateRangePreset,
    pub tx_type: TypeFilter,
    pub category: CategoryFilter,
    pub from: Option<String>,
    pub to: Option<String>,
    pub search: String,
}

impl FilterSpec {
    /// Lets every transaction through.
    pub fn all() -> Self {
        Self {
            preset: DateRangePreset::All,
            ..Self::default()
        }
    }

    fn matches(&self, tx: &Transaction, preset_start: Option<NaiveDate>, needle: &str) -> bool {
        if let Some(start) = preset_start {
            match NaiveDate::parse_from_str(&tx.date, "%Y-%m-%d") {
                Ok(date) if date >= start => {}
                _ => return false,
            }
        }
        if let TypeFilter::Only(t) = self.tx_type {
            if tx.tx_type != t {
                return false;
            }
        }
        if let CategoryFilter::Named(name) = &self.category {
            if &tx.category != name {
                return false;
            }
        }
        // Fixed-width ISO dates compare correctly as strings.
        if let Some(from) = self.from.as_deref().filter(|d| !d.is_empty()) {
            if tx.date.as_str() < from {
                return false;
            }
        }
        if let Some(to) = self.to.as_deref().filter(|d| !d.is_empty()) {
            if tx.date.as_str() > to {
                return false;
            }
        }
        if !needle.is_empty() {
            let haystack = format!("{} {}", tx.category, tx.note).to_lowercase();
            if !haystack.contains(needle) {
                return false;
            }
        }
        true
    }
}

/// Transactions that satisfy every part of `spec`, in input order. `today`
/// anchors the relative presets.
pub fn apply<'a>(
    transactions: &'a [Transaction],
    spec: &FilterSpec,
    today: NaiveDate,
) -> Vec<&'a Transaction> {
    let preset_start = spec.preset.start(today);
    let needle = spec.search.trim().to_lowercase();
    transactions
        .iter()
        .filter(|tx| spec.matches(tx, preset_start, &needle))
        .collect()
}

pub fn apply_now<'a>(transactions: &'a [Transaction], spec: &FilterSpec) -> Vec<&'a Transaction> {
    apply(transactions, spec, chrono::Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, tx_type: TxType, category: &str, date: &str, note: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            tx_type,
            amount: 10.0,
            category: category.to_string(),
            date: date.to_string(),
            note: note.to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("1", TxType::Income, "Nómina", "2024-05-31", "NOMINA MAYO"),
            tx("2", TxType::Expense, "Supermercado", "2024-06-10", "Mercadona"),
            tx("3", TxType::Expense, "Ocio", "2024-06-14", "Cine con amigos"),
            tx("4", TxType::Expense, "Transporte", "2023-12-30", "Renfe"),
            tx("5", TxType::Income, "Bizum", "2024-01-02", "bizum de ana"),
        ]
    }

    fn ids(result: &[&Transaction]) -> Vec<String> {
        result.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_all_spec_is_identity() {
        let ts = sample();
        let result = apply(&ts, &FilterSpec::all(), today());
        assert_eq!(ids(&result), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_result_is_subset_in_order() {
        let ts = sample();
        let spec = FilterSpec {
            tx_type: TypeFilter::Only(TxType::Expense),
            ..FilterSpec::all()
        };
        assert_eq!(ids(&apply(&ts, &spec, today())), vec!["2", "3", "4"]);
    }

    #[test]
    fn test_preset_last_7_days() {
        let ts = sample();
        let spec = FilterSpec {
            preset: DateRangePreset::Last7Days,
            ..FilterSpec::all()
        };
        assert_eq!(ids(&apply(&ts, &spec, today())), vec!["2", "3"]);
    }

    #[test]
    fn test_relative_presets_drop_the_day_n_days_back() {
        let ts = vec![
            tx("edge7", TxType::Expense, "Ocio", "2024-06-08", ""),
            tx("in7", TxType::Expense, "Ocio", "2024-06-09", ""),
            tx("edge30", TxType::Expense, "Ocio", "2024-05-16", ""),
            tx("in30", TxType::Expense, "Ocio", "2024-05-17", ""),
        ];
        let week = FilterSpec {
            preset: DateRangePreset::Last7Days,
            ..FilterSpec::all()
        };
        assert_eq!(ids(&apply(&ts, &week, today())), vec!["in7"]);
        assert_eq!(ids(&apply(&ts, &FilterSpec::default(), today())), vec!["edge7", "in7", "in30"]);
    }

    #[test]
    fn test_preset_last_30_days() {
        let ts = sample();
        let spec = FilterSpec::default();
        assert_eq!(ids(&apply(&ts, &spec, today())), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_preset_ytd() {
        let ts = sample();
        let spec = FilterSpec {
            preset: DateRangePreset::YearToDate,
            ..FilterSpec::all()
        };
        assert_eq!(ids(&apply(&ts, &spec, today())), vec!["1", "2", "3", "5"]);
    }

    #[test]
    fn test_category_filter() {
        let ts = sample();
        let spec = FilterSpec {
            category: CategoryFilter::from("Ocio"),
            ..FilterSpec::all()
        };
        assert_eq!(ids(&apply(&ts, &spec, today())), vec!["3"]);
    }

    #[test]
    fn test_explicit_range_inclusive() {
        let ts = sample();
        let spec = FilterSpec {
            from: Some("2024-05-31".into()),
            to: Some("2024-06-10".into()),
            ..FilterSpec::all()
        };
        assert_eq!(ids(&apply(&ts, &spec, today())), vec!["1", "2"]);
    }

    #[test]
    fn test_empty_bounds_are_ignored() {
        let ts = sample();
        let spec = FilterSpec {
            from: Some(String::new()),
            to: Some(String::new()),
            ..FilterSpec::all()
        };
        assert_eq!(apply(&ts, &spec, today()).len(), ts.len());
    }

    #[test]
    fn test_preset_and_range_both_apply() {
        let ts = sample();
        let spec = FilterSpec {
            preset: DateRangePreset::Last7Days,
            from: Some("2024-01-01".into()),
            to: Some("2024-06-12".into()),
            ..FilterSpec::all()
        };
        assert_eq!(ids(&apply(&ts, &spec, today())), vec!["2"]);
    }

    #[test]
    fn test_search_matches_category_and_note() {
        let ts = sample();
        let spec = FilterSpec {
            search: "  BIZUM ".into(),
            ..FilterSpec::all()
        };
        assert_eq!(ids(&apply(&ts, &spec, today())), vec!["5"]);
        let spec = FilterSpec {
            search: "super".into(),
            ..FilterSpec::all()
        };
        assert_eq!(ids(&apply(&ts, &spec, today())), vec!["2"]);
    }

    #[test]
    fn test_parse_presets() {
        assert_eq!("7d".parse::<DateRangePreset>(), Ok(DateRangePreset::Last7Days));
        assert_eq!("YTD".parse::<DateRangePreset>(), Ok(DateRangePreset::YearToDate));
        assert!("90d".parse::<DateRangePreset>().is_err());
        assert_eq!("all".parse::<TypeFilter>(), Ok(TypeFilter::All));
        assert_eq!("income".parse::<TypeFilter>(), Ok(TypeFilter::Only(TxType::Income)));
    }

    #[test]
    fn test_apply_now_uses_wall_clock() {
        let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
        let ts = vec![
            tx("now", TxType::Income, "Otros", &today, ""),
            tx("old", TxType::Income, "Otros", "2001-01-01", ""),
        ];
        assert_eq!(ids(&apply_now(&ts, &FilterSpec::default())), vec!["now"]);
    }
}
