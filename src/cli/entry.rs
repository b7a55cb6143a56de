use colored::Colorize;

use pocket_ledger::error::{LedgerError, Result};
use pocket_ledger::fmt::{display_date, money};
use pocket_ledger::models::TxType;

use super::{open_app, EntryArgs};

pub fn add(entry: &EntryArgs) -> Result<()> {
    let draft = entry.to_draft()?;
    let mut app = open_app()?;
    let tx = app.create(&draft)?;
    let amount = match tx.tx_type {
        TxType::Income => money(tx.amount).green(),
        TxType::Expense => money(tx.amount).red(),
    };
    println!(
        "Added {} {} in {} on {} ({})",
        tx.tx_type,
        amount,
        tx.category,
        display_date(&tx.date),
        tx.id
    );
    Ok(())
}

pub fn edit(id: &str, entry: &EntryArgs) -> Result<()> {
    let draft = entry.to_draft()?;
    let mut app = open_app()?;
    if !app.edit(id, &draft)? {
        return Err(LedgerError::UnknownTransaction(id.to_string()));
    }
    println!("Updated transaction {id}");
    Ok(())
}

pub fn delete(id: &str) -> Result<()> {
    let mut app = open_app()?;
    let tx = app
        .delete(id)
        .ok_or_else(|| LedgerError::UnknownTransaction(id.to_string()))?;
    println!(
        "Deleted {} {} ({}, {})",
        tx.tx_type,
        money(tx.amount),
        tx.category,
        display_date(&tx.date)
    );
    Ok(())
}

pub fn clear(yes: bool) -> Result<()> {
    if !yes {
        println!("This deletes every transaction. Re-run with --yes to confirm.");
        return Ok(());
    }
    let mut app = open_app()?;
    let removed = app.clear();
    println!("Deleted {removed} transactions");
    Ok(())
}
