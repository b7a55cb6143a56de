use std::path::{Path, PathBuf};

use pocket_ledger::error::Result;
use pocket_ledger::exporter::export_file_name;
use pocket_ledger::settings::get_data_dir;

use super::{open_app, today};

fn default_path() -> PathBuf {
    get_data_dir().join(export_file_name(today()))
}

fn write_csv(text: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, text)?;
    Ok(())
}

pub fn run(output: Option<String>) -> Result<()> {
    let app = open_app()?;
    let text = app.export_csv()?;
    let path = output.map(PathBuf::from).unwrap_or_else(default_path);
    write_csv(&text, &path)?;
    println!("Wrote {} transactions to {}", app.store().len(), path.display());
    Ok(())
}
