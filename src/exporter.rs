use chrono::NaiveDate;
use tracing::info;

use crate::error::{LedgerError, Result};
use crate::models::Transaction;

pub const HEADER: [&str; 6] = ["id", "type", "amount", "category", "date", "note"];

/// Serialize transactions to the self CSV format. Fields containing a
/// comma, quote or newline are quoted with inner quotes doubled; rows are
/// separated by `\n` with no trailing newline.
pub fn export_csv(transactions: &[Transaction]) -> Result<String> {
    if transactions.is_empty() {
        return Err(LedgerError::NothingToExport);
    }
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());
    wtr.write_record(HEADER)?;
    for tx in transactions {
        let amount = tx.amount.to_string();
        wtr.write_record([
            tx.id.as_str(),
            tx.tx_type.as_str(),
            amount.as_str(),
            tx.category.as_str(),
            tx.date.as_str(),
            tx.note.as_str(),
        ])?;
    }
    let bytes = wtr.into_inner().map_err(|e| LedgerError::Io(e.into_error()))?;
    let mut text = String::from_utf8(bytes)
        .map_err(|e| LedgerError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    if text.ends_with('\n') {
        text.pop();
    }
    info!(rows = transactions.len(), "exported transactions to CSV");
    Ok(text)
}

pub fn export_file_name(today: NaiveDate) -> String {
    format!("finanzas-{}.csv", today.format("%Y%m%d"))
}
