use std::path::Path;

use colored::Colorize;

use crate::cli::{parse_entity, parse_map_overrides};
use crate::error::{Result, SoukError};
use crate::importer::{ImportSession, OutboxBackend};
use crate::settings::load_settings;

pub fn run(
    file: &str,
    entity: &str,
    map: &[String],
    dry_run: bool,
    company_id: Option<i64>,
) -> Result<()> {
    let settings = load_settings();
    let entity = parse_entity(entity)?;
    let mut session = ImportSession::new(entity);
    session.load_file(Path::new(file), settings.max_file_size_bytes())?;

    println!(
        "Parsed {file}: {} row(s), {} column(s){}",
        session.rows().len(),
        session.headers().len(),
        delimiter_note(session.delimiter()),
    );

    apply_overrides(&mut session, map)?;
    let mapped = session.mapping().len();
    println!("Mapped {mapped} of {} column(s)", session.headers().len());

    if !session.validate().is_empty() {
        let count = session.errors().len();
        eprintln!("{}", format!("{count} validation error(s):").red());
        for error in session.errors() {
            eprintln!("  {}", error.to_string().red());
        }
        return Err(SoukError::Other(
            "import aborted; fix the file or adjust --map".to_string(),
        ));
    }

    let count = session.transform(
        company_id.unwrap_or(settings.company_id),
        &settings.base_currency,
    )?;
    let skipped = session.rows().len() - count;
    if skipped > 0 {
        println!("Skipped {skipped} empty row(s)");
    }

    if dry_run {
        println!(
            "{}",
            format!(
                "Dry run: {count} {} record(s) ready; nothing written",
                entity.key()
            )
            .green()
        );
        return Ok(());
    }

    let backend = OutboxBackend::new(settings.outbox_dir());
    let outcome = session.submit(&backend)?;
    println!(
        "{}",
        format!(
            "Imported {} {} record(s) to {}",
            outcome.imported_count,
            entity.key(),
            settings.outbox_dir().display()
        )
        .green()
    );
    Ok(())
}

fn delimiter_note(delimiter: Option<char>) -> String {
    match delimiter {
        Some('\t') => ", tab-delimited".to_string(),
        Some(d) => format!(", delimiter '{d}'"),
        None => String::new(),
    }
}

/// Apply `COL=FIELD` overrides on top of the auto-mapping. `COL=` clears a
/// column so an auto-mapped header can be dropped.
pub(crate) fn apply_overrides(session: &mut ImportSession, specs: &[String]) -> Result<()> {
    for (column, field_key) in parse_map_overrides(specs)? {
        if column >= session.headers().len() {
            return Err(SoukError::Other(format!(
                "Column {column} is out of range (file has {} columns)",
                session.headers().len()
            )));
        }
        if field_key.is_empty() {
            session.clear_mapping(column);
        } else if session.schema().field(&field_key).is_none() {
            return Err(SoukError::Other(format!(
                "Unknown field for {}: {field_key} (see `souk schemas --entity {}`)",
                session.entity().key(),
                session.entity().key()
            )));
        } else {
            session.set_mapping(column, &field_key);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EntityType;

    fn session_for(content: &str) -> ImportSession {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, content).unwrap();
        let mut session = ImportSession::new(EntityType::Transactions);
        session.load_file(&path, 10 * 1024 * 1024).unwrap();
        session
    }

    #[test]
    fn test_apply_overrides_sets_and_clears() {
        let mut session = session_for("Date,Desc,Montant,Type\n2024-01-15,A,10,expense\n");
        apply_overrides(
            &mut session,
            &["1=notes".to_string(), "3=".to_string()],
        )
        .unwrap();
        assert_eq!(session.mapping().get(&1).map(String::as_str), Some("notes"));
        assert!(!session.mapping().contains_key(&3));
    }

    #[test]
    fn test_apply_overrides_rejects_unknown_field() {
        let mut session = session_for("Date,Desc,Montant,Type\n2024-01-15,A,10,expense\n");
        let err = apply_overrides(&mut session, &["0=quantity".to_string()]).unwrap_err();
        assert!(err.to_string().contains("quantity"));
    }

    #[test]
    fn test_apply_overrides_rejects_out_of_range_column() {
        let mut session = session_for("Date,Desc,Montant,Type\n2024-01-15,A,10,expense\n");
        let err = apply_overrides(&mut session, &["9=notes".to_string()]).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
