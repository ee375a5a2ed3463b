use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::import::apply_overrides;
use crate::cli::parse_entity;
use crate::error::Result;
use crate::importer::ImportSession;
use crate::settings::load_settings;

pub fn run(file: &str, entity: &str, map: &[String], rows: usize) -> Result<()> {
    let settings = load_settings();
    let entity = parse_entity(entity)?;
    let mut session = ImportSession::new(entity);
    session.load_file(Path::new(file), settings.max_file_size_bytes())?;
    apply_overrides(&mut session, map)?;

    println!(
        "{file}: {} row(s), {} column(s), delimiter {}",
        session.rows().len(),
        session.headers().len(),
        delimiter_label(session.delimiter()),
    );

    let mut mapping_table = Table::new();
    mapping_table.set_header(vec!["Col", "Header", "Field", "Required"]);
    for (column, header) in session.headers().iter().enumerate() {
        let (field, required) = match session.mapping().get(&column) {
            Some(key) => match session.schema().field(key) {
                Some(f) => (
                    format!("{} ({})", f.key, f.label),
                    if f.required { "yes" } else { "" },
                ),
                None => (key.clone(), ""),
            },
            None => ("(ignored)".to_string(), ""),
        };
        mapping_table.add_row(vec![
            Cell::new(column),
            Cell::new(header),
            Cell::new(field),
            Cell::new(required),
        ]);
    }
    println!("Column mapping\n{mapping_table}");

    if !session.rows().is_empty() && rows > 0 {
        let mut sample = Table::new();
        sample.set_header(session.headers().to_vec());
        for row in session.rows().iter().take(rows) {
            let cells: Vec<Cell> = session
                .headers()
                .iter()
                .map(|h| Cell::new(row.get(h).map(String::as_str).unwrap_or("")))
                .collect();
            sample.add_row(cells);
        }
        println!(
            "First {} row(s)\n{sample}",
            rows.min(session.rows().len())
        );
    }

    let errors = session.validate();
    if errors.is_empty() {
        println!("{}", "No validation errors".green());
    } else {
        println!("{}", format!("{} validation error(s):", errors.len()).red());
        for error in errors {
            println!("  {}", error.to_string().red());
        }
    }
    Ok(())
}

fn delimiter_label(delimiter: Option<char>) -> &'static str {
    match delimiter {
        Some(',') => "comma",
        Some(';') => "semicolon",
        Some('\t') => "tab",
        Some('|') => "pipe",
        _ => "n/a",
    }
}
