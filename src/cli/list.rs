use colored::Colorize;
use comfy_table::{Cell, Table};

use pocket_ledger::error::{LedgerError, Result};
use pocket_ledger::fmt::{display_date, money};
use pocket_ledger::models::TxType;
use pocket_ledger::sort::{SortDirection, SortField};

use super::{open_app, today, FilterArgs};

pub fn run(filter: &FilterArgs, sort: Option<&str>, asc: bool, desc: bool) -> Result<()> {
    let spec = filter.to_spec()?;
    let mut app = open_app()?;

    // Explicit sort flags become the new saved default.
    let mut prefs = app.preferences();
    let mut state = prefs.sort_state();
    if let Some(field) = sort {
        let field: SortField = field.parse().map_err(LedgerError::Validation)?;
        if field != state.field {
            state.toggle(field);
        }
    }
    if asc {
        state.direction = SortDirection::Asc;
    } else if desc {
        state.direction = SortDirection::Desc;
    }
    if state != prefs.sort_state() {
        prefs.sort_field = state.field;
        prefs.sort_direction = state.direction;
        app.set_preferences(prefs);
    }

    let rows = app.view(&spec, state, today());
    if rows.is_empty() {
        println!("No transactions match the current filters.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Type", "Category", "Note", "Amount", "ID"]);
    for tx in &rows {
        let (kind, amount) = match tx.tx_type {
            TxType::Income => ("Income".green(), money(tx.amount).green()),
            TxType::Expense => ("Expense".red(), money(-tx.amount).red()),
        };
        table.add_row(vec![
            Cell::new(display_date(&tx.date)),
            Cell::new(kind),
            Cell::new(&tx.category),
            Cell::new(&tx.note),
            Cell::new(amount),
            Cell::new(&tx.id),
        ]);
    }
    println!("Transactions ({})\n{table}", rows.len());
    Ok(())
}
