use pocket_ledger::db::DB_FILE;
use pocket_ledger::error::Result;
use pocket_ledger::settings::get_data_dir;

use super::open_app;

pub fn run() -> Result<()> {
    let data_dir = get_data_dir();
    let db_path = data_dir.join(DB_FILE);

    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:    {size} bytes");

        let app = open_app()?;
        let prefs = app.preferences();
        println!();
        println!("Transactions:  {}", app.store().len());
        println!("Categories:    {}", app.categories().names().len());
        println!("Custom:        {}", app.categories().user_defined().len());
        println!(
            "Sort:          {:?} {:?}",
            prefs.sort_field, prefs.sort_direction
        );
    } else {
        println!();
        println!("Database not found. Run `pocket init` to set up.");
    }

    Ok(())
}
