mod cli;
mod currency;
mod detect;
mod error;
mod fmt;
mod importer;
mod mapper;
mod models;
mod parser;
mod schema;
mod settings;
mod transformer;
mod validator;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Import {
            file,
            entity,
            map,
            dry_run,
            company_id,
        } => cli::import::run(&file, &entity, &map, dry_run, company_id),
        Commands::Preview {
            file,
            entity,
            map,
            rows,
        } => cli::preview::run(&file, &entity, &map, rows),
        Commands::Schemas { entity } => cli::schemas::run(entity.as_deref()),
        Commands::Template { entity, output } => {
            cli::template::run(&entity, output.as_deref())
        }
        Commands::Rates { set } => cli::rates::run(&set),
        Commands::Convert { amount, from, to } => cli::convert::run(amount, &from, &to),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
