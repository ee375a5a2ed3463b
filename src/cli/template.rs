use std::path::PathBuf;

use crate::cli::parse_entity;
use crate::error::{Result, SoukError};
use crate::schema::schema;

/// Write a one-row sample CSV whose headers are the schema labels.
pub fn run(entity: &str, output: Option<&str>) -> Result<()> {
    let entity = parse_entity(entity)?;
    let schema = schema(entity);
    let path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("template_{}.csv", entity.key())));

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(schema.fields.iter().map(|f| f.label))?;
    writer.write_record(schema.fields.iter().map(|f| f.example))?;
    writer
        .flush()
        .map_err(|e| SoukError::Persistence(e.to_string()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
