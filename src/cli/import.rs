use std::path::PathBuf;

use pocket_ledger::error::Result;

use super::open_app;

pub fn run(file: &str) -> Result<()> {
    let file_path = PathBuf::from(file);
    // Bank exports are often Windows-1252; undecodable bytes become U+FFFD.
    let bytes = std::fs::read(&file_path)?;
    let text = String::from_utf8_lossy(&bytes);
    let mut app = open_app()?;

    let report = app.import_text(&text)?;
    println!(
        "{} transactions imported from {} ({})",
        report.imported,
        file_path.display(),
        report.dialect.name()
    );
    Ok(())
}
