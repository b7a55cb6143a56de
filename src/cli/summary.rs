use colored::Colorize;
use comfy_table::{Cell, Table};

use pocket_ledger::error::Result;
use pocket_ledger::fmt::money;

use super::{open_app, today, FilterArgs};

fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn swatch(hex: &str) -> String {
    match hex_rgb(hex) {
        Some((r, g, b)) => "■".truecolor(r, g, b).to_string(),
        None => "■".to_string(),
    }
}

pub fn run(filter: &FilterArgs) -> Result<()> {
    let spec = filter.to_spec()?;
    let app = open_app()?;
    let today = today();

    let summary = app.summary(&spec, today);
    let mut table = Table::new();
    table.set_header(vec!["", "Amount"]);
    table.add_row(vec![
        Cell::new("Income".green().bold()),
        Cell::new(money(summary.income_total)),
    ]);
    table.add_row(vec![
        Cell::new("Expenses".red().bold()),
        Cell::new(money(summary.expense_total)),
    ]);
    let balance_label = if summary.balance >= 0.0 {
        "Balance".green().bold()
    } else {
        "Balance".red().bold()
    };
    table.add_row(vec![Cell::new(balance_label), Cell::new(money(summary.balance))]);
    println!("Summary ({} transactions)\n{table}", summary.count);

    let breakdown = app.category_breakdown(&spec, today);
    if breakdown.is_meaningful() {
        let mut table = Table::new();
        table.set_header(vec!["", "Category", "Spent", "%"]);
        for item in &breakdown.categories {
            table.add_row(vec![
                Cell::new(swatch(app.categories().color_for(&item.category))),
                Cell::new(&item.category),
                Cell::new(money(item.total)),
                Cell::new(format!("{:.1}%", breakdown.share(item))),
            ]);
        }
        println!("\nExpenses by category\n{table}");
    }

    let months = app.monthly(&spec, today);
    if !months.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Month", "Income", "Expenses", "Net"]);
        for m in &months {
            let net = m.net();
            let net_cell = if net >= 0.0 {
                money(net).green()
            } else {
                money(net).red()
            };
            table.add_row(vec![
                Cell::new(&m.month),
                Cell::new(money(m.income_total)),
                Cell::new(money(m.expense_total)),
                Cell::new(net_cell),
            ]);
        }
        println!("\nMonthly\n{table}");
    }
    Ok(())
}
