use std::collections::HashSet;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, info};

use crate::categorizer::infer_category;
use crate::error::{LedgerError, Result};
use crate::models::{Transaction, TxType};
use crate::store::new_id;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn leading_decimal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("valid decimal pattern")
    })
}

fn dmy_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").expect("valid date pattern"))
}

fn iso_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"))
}

/// Parses the longest decimal prefix of `raw` after leading whitespace,
/// so `"12.5abc"` is 12.5 and `"abc"` is `None`.
pub fn parse_leading_decimal(raw: &str) -> Option<f64> {
    let m = leading_decimal_re().find(raw.trim_start())?;
    m.as_str().parse().ok()
}

/// Bank amounts use `.` for thousands and `,` for decimals and may carry a
/// currency symbol: `"-1.234,56 €"` -> -1234.56. Zero is treated as no
/// amount at all.
pub fn parse_bank_amount(raw: &str) -> Option<f64> {
    let numeric: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    if numeric.is_empty() {
        return None;
    }
    let normalized = numeric.replace('.', "").replacen(',', ".", 1);
    let value = parse_leading_decimal(&normalized)?;
    if value == 0.0 || !value.is_finite() {
        return None;
    }
    Some(value)
}

/// Amount cell of the self format: plain decimal, a comma is accepted as
/// the decimal separator. Only positive values are usable.
pub fn parse_plain_amount(raw: &str) -> Option<f64> {
    let value = parse_leading_decimal(&raw.replacen(',', ".", 1))?;
    (value.is_finite() && value > 0.0).then_some(value)
}

const FALLBACK_DATE_FORMATS: &[&str] = &["%d-%m-%Y", "%Y/%m/%d", "%d.%m.%Y", "%Y-%m-%dT%H:%M:%S"];

/// Normalizes a statement date to `YYYY-MM-DD`. Accepts `DD/MM/YYYY`, ISO
/// dates and a handful of other common shapes.
pub fn to_iso_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(caps) = dmy_re().captures(raw) {
        let d: u32 = caps[1].parse().ok()?;
        let m: u32 = caps[2].parse().ok()?;
        let y: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(y, m, d).map(|dt| dt.format("%Y-%m-%d").to_string());
    }
    if iso_re().is_match(raw) {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(|_| raw.to_string());
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive().format("%Y-%m-%d").to_string());
    }
    for fmt in FALLBACK_DATE_FORMATS {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date().format("%Y-%m-%d").to_string());
        }
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d.format("%Y-%m-%d").to_string());
        }
    }
    None
}

fn strip_quotes(cell: &str) -> &str {
    let cell = cell.trim();
    cell.strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .unwrap_or(cell)
}

fn non_blank_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .filter(|l| !l.trim().is_empty())
        .collect()
}

fn is_blank_record(record: &csv::StringRecord) -> bool {
    record.iter().all(|f| f.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Dialects: enum dispatch, tried in priority order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    BankStatement,
    Generic,
}

const ALL_DIALECTS: &[Dialect] = &[Dialect::BankStatement, Dialect::Generic];

impl Dialect {
    pub fn key(&self) -> &'static str {
        match self {
            Self::BankStatement => "bank_statement",
            Self::Generic => "generic",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::BankStatement => "bank statement",
            Self::Generic => "generic",
        }
    }

    pub fn detect(&self, header: &str) -> bool {
        match self {
            Self::BankStatement => detect_bank_statement(header),
            Self::Generic => true,
        }
    }

    pub fn parse(&self, text: &str, existing_ids: &HashSet<String>) -> Result<Vec<Transaction>> {
        match self {
            Self::BankStatement => parse_bank_statement(text),
            Self::Generic => parse_generic(text, existing_ids),
        }
    }
}

pub fn detect_dialect(header: &str) -> Dialect {
    ALL_DIALECTS
        .iter()
        .copied()
        .find(|d| d.detect(header))
        .unwrap_or(Dialect::Generic)
}

// ---------------------------------------------------------------------------
// parse_csv
// ---------------------------------------------------------------------------

/// Rows accepted from one import, not yet committed to the store.
#[derive(Debug)]
pub struct ImportBatch {
    pub dialect: Dialect,
    pub transactions: Vec<Transaction>,
}

/// Parses a whole CSV file. `existing_ids` are the ids already in the
/// store; generic rows reusing one of them get a fresh id instead.
pub fn parse_csv(text: &str, existing_ids: &HashSet<String>) -> Result<ImportBatch> {
    let lines = non_blank_lines(text);
    if lines.len() < 2 {
        return Err(LedgerError::ImportFormat("the file contains no data rows".to_string()));
    }
    let dialect = detect_dialect(lines[0]);
    debug!(dialect = dialect.key(), "detected CSV dialect");

    let transactions = dialect.parse(text, existing_ids)?;
    if transactions.is_empty() {
        return Err(LedgerError::NothingImported {
            dialect: dialect.name(),
        });
    }
    info!(dialect = dialect.key(), rows = transactions.len(), "parsed CSV import");
    Ok(ImportBatch {
        dialect,
        transactions,
    })
}

// ---------------------------------------------------------------------------
// Bank statement parser (semicolon-delimited, es/ca headers)
// ---------------------------------------------------------------------------

const CONCEPT_HEADERS: &[&str] = &["concepto", "concepte"];
const DATE_HEADERS: &[&str] = &["fecha", "data"];
const AMOUNT_HEADERS: &[&str] = &["importe", "import"];

fn detect_bank_statement(header: &str) -> bool {
    let lower = header.to_lowercase();
    let has_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));
    has_any(CONCEPT_HEADERS) && has_any(DATE_HEADERS) && has_any(AMOUNT_HEADERS)
}

fn bank_reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(b';')
        .quoting(false)
        .from_reader(text.as_bytes())
}

fn bank_columns(header: &csv::StringRecord) -> Result<(usize, usize, usize)> {
    let cells: Vec<String> = header.iter().map(|h| strip_quotes(h).to_lowercase()).collect();
    let find = |names: &[&str]| cells.iter().position(|c| names.contains(&c.as_str()));
    match (find(CONCEPT_HEADERS), find(DATE_HEADERS), find(AMOUNT_HEADERS)) {
        (Some(c), Some(d), Some(a)) => Ok((c, d, a)),
        _ => Err(LedgerError::ImportFormat(
            "bank statement header is missing the concept, date or amount column".to_string(),
        )),
    }
}

fn parse_bank_statement(text: &str) -> Result<Vec<Transaction>> {
    let mut rdr = bank_reader(text);
    let mut records = rdr
        .records()
        .filter_map(|r| r.ok())
        .filter(|r| !is_blank_record(r));
    let Some(header) = records.next() else {
        return Err(LedgerError::ImportFormat("the file contains no header".to_string()));
    };
    let (idx_concept, idx_date, idx_amount) = bank_columns(&header)?;
    let min_cols = idx_concept.max(idx_date).max(idx_amount) + 1;
    let mut rows = Vec::new();

    for record in records {
        if record.len() < min_cols {
            debug!("skipping short statement row");
            continue;
        }
        let concept = strip_quotes(&record[idx_concept]);
        let raw_date = strip_quotes(&record[idx_date]);
        let raw_amount = strip_quotes(&record[idx_amount]);
        if raw_amount.is_empty() || raw_date.is_empty() {
            continue;
        }
        let Some(signed) = parse_bank_amount(raw_amount) else {
            debug!(raw_amount, "skipping statement row with unusable amount");
            continue;
        };
        let Some(date) = to_iso_date(raw_date) else {
            debug!(raw_date, "skipping statement row with unusable date");
            continue;
        };
        let tx_type = if signed < 0.0 {
            TxType::Expense
        } else {
            TxType::Income
        };
        let amount = signed.abs();
        rows.push(Transaction {
            id: new_id(),
            tx_type,
            amount,
            category: infer_category(concept, amount, tx_type).to_string(),
            date,
            note: concept.to_string(),
        });
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Generic parser (the self-export format)
// ---------------------------------------------------------------------------

struct GenericColumns {
    id: Option<usize>,
    tx_type: usize,
    amount: usize,
    category: usize,
    date: usize,
    note: Option<usize>,
}

impl GenericColumns {
    fn from_header(record: &csv::StringRecord) -> Result<Self> {
        let cells: Vec<String> = record.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |name: &str| cells.iter().position(|c| c == name);
        match (find("type"), find("amount"), find("category"), find("date")) {
            (Some(tx_type), Some(amount), Some(category), Some(date)) => Ok(Self {
                id: find("id"),
                tx_type,
                amount,
                category,
                date,
                note: find("note"),
            }),
            _ => Err(LedgerError::ImportFormat(
                "expected columns type, amount, category, date (or a bank statement export)"
                    .to_string(),
            )),
        }
    }
}

fn cell(record: &csv::StringRecord, idx: Option<usize>) -> &str {
    idx.and_then(|i| record.get(i)).map(str::trim).unwrap_or("")
}

fn parse_generic(text: &str, existing_ids: &HashSet<String>) -> Result<Vec<Transaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = rdr
        .records()
        .filter_map(|r| r.ok())
        .filter(|r| !is_blank_record(r));
    let Some(header) = records.next() else {
        return Err(LedgerError::ImportFormat("the file contains no header".to_string()));
    };
    let cols = GenericColumns::from_header(&header)?;
    let mut rows = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for record in records {
        let raw_type = cell(&record, Some(cols.tx_type));
        let raw_amount = cell(&record, Some(cols.amount));
        let category = cell(&record, Some(cols.category));
        let raw_date = cell(&record, Some(cols.date));
        if raw_type.is_empty() || raw_amount.is_empty() || category.is_empty() || raw_date.is_empty() {
            continue;
        }
        let Some(amount) = parse_plain_amount(raw_amount) else {
            debug!(raw_amount, "skipping row with non-positive amount");
            continue;
        };
        let Some(date) = to_iso_date(raw_date) else {
            debug!(raw_date, "skipping row with unusable date");
            continue;
        };
        // Anything other than the exact string "expense" is taken as income.
        let tx_type = if raw_type == "expense" {
            TxType::Expense
        } else {
            TxType::Income
        };

        let mut id = cell(&record, cols.id).to_string();
        if id.is_empty() || existing_ids.contains(&id) || seen_ids.contains(&id) {
            id = new_id();
        }
        seen_ids.insert(id.clone());

        rows.push(Transaction {
            id,
            tx_type,
            amount,
            category: category.to_string(),
            date,
            note: cell(&record, cols.note).to_string(),
        });
    }
    Ok(rows)
}
