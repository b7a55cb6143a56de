use comfy_table::{Cell, Table};

use pocket_ledger::categories::DEFAULT_CATEGORIES;
use pocket_ledger::error::Result;

use super::open_app;

pub fn list() -> Result<()> {
    let app = open_app()?;
    let registry = app.categories();

    let mut table = Table::new();
    table.set_header(vec!["Name", "Color", "Kind"]);
    for name in registry.names() {
        let kind = if DEFAULT_CATEGORIES.contains(&name.as_str()) {
            "built-in"
        } else {
            "custom"
        };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(registry.color_for(name)),
            Cell::new(kind),
        ]);
    }
    println!("Categories\n{table}");
    Ok(())
}

pub fn add(name: &str) -> Result<()> {
    let mut app = open_app()?;
    if app.add_category(name) {
        println!("Added category: {}", name.trim());
    } else {
        println!("Category already exists: {}", name.trim());
    }
    Ok(())
}
