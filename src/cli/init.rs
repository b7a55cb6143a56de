use std::path::PathBuf;

use pocket_ledger::db::{SqliteStore, DB_FILE};
use pocket_ledger::error::Result;
use pocket_ledger::settings::{load_settings, save_settings, shellexpand_path, DATA_DIR_ENV};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();

    let resolved = match (data_dir, std::env::var(DATA_DIR_ENV)) {
        (Some(dir), _) => {
            settings.data_dir = shellexpand_path(&dir);
            save_settings(&settings)?;
            PathBuf::from(&settings.data_dir)
        }
        // The environment override is not written to the settings file.
        (None, Ok(dir)) if !dir.trim().is_empty() => PathBuf::from(dir),
        (None, _) => {
            save_settings(&settings)?;
            PathBuf::from(&settings.data_dir)
        }
    };

    std::fs::create_dir_all(&resolved)?;
    SqliteStore::open(&resolved.join(DB_FILE))?;

    println!("Initialized pocket ledger at {}", resolved.display());
    Ok(())
}
