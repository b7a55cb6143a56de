mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{CategoriesCommands, Cli, Commands};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Add { entry } => cli::entry::add(&entry),
        Commands::Edit { id, entry } => cli::entry::edit(&id, &entry),
        Commands::Delete { id } => cli::entry::delete(&id),
        Commands::Clear { yes } => cli::entry::clear(yes),
        Commands::List {
            filter,
            sort,
            asc,
            desc,
        } => cli::list::run(&filter, sort.as_deref(), asc, desc),
        Commands::Summary { filter } => cli::summary::run(&filter),
        Commands::Import { file } => cli::import::run(&file),
        Commands::Export { output } => cli::export::run(output),
        Commands::Categories { command } => match command {
            CategoriesCommands::List => cli::categories::list(),
            CategoriesCommands::Add { name } => cli::categories::add(&name),
        },
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
