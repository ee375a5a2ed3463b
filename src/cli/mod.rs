pub mod convert;
pub mod import;
pub mod preview;
pub mod rates;
pub mod schemas;
pub mod template;

use clap::{Parser, Subcommand};

use crate::error::{Result, SoukError};
use crate::schema::EntityType;

pub(crate) fn parse_entity(key: &str) -> Result<EntityType> {
    EntityType::from_key(&key.to_lowercase()).ok_or_else(|| {
        SoukError::Other(format!(
            "Unknown entity type: {key} (expected transactions, invoices or inventory)"
        ))
    })
}

/// Parse repeated `<column-index>=<field-key>` override flags.
pub(crate) fn parse_map_overrides(specs: &[String]) -> Result<Vec<(usize, String)>> {
    specs
        .iter()
        .map(|spec| {
            let (col, field) = spec
                .split_once('=')
                .ok_or_else(|| SoukError::Other(format!("Invalid --map value: {spec} (expected COL=FIELD)")))?;
            let column: usize = col
                .trim()
                .parse()
                .map_err(|_| SoukError::Other(format!("Invalid column index in --map value: {spec}")))?;
            Ok((column, field.trim().to_string()))
        })
        .collect()
}

#[derive(Parser)]
#[command(name = "souk", about = "CSV/Excel import pipeline for the Souk ERP backend.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import a CSV/Excel file into an entity (transactions, invoices, inventory).
    Import {
        /// Path to the CSV or Excel file
        file: String,
        /// Entity type: transactions, invoices, inventory
        #[arg(long)]
        entity: String,
        /// Mapping override: <column-index>=<field-key> (repeatable)
        #[arg(long = "map", value_name = "COL=FIELD")]
        map: Vec<String>,
        /// Validate and transform but stop short of the backend hand-off
        #[arg(long = "dry-run")]
        dry_run: bool,
        /// Company ID to stamp on every record (default from settings)
        #[arg(long = "company-id")]
        company_id: Option<i64>,
    },
    /// Show detection, auto-mapping and the first rows without importing.
    Preview {
        /// Path to the CSV or Excel file
        file: String,
        /// Entity type: transactions, invoices, inventory
        #[arg(long)]
        entity: String,
        /// Mapping override: <column-index>=<field-key> (repeatable)
        #[arg(long = "map", value_name = "COL=FIELD")]
        map: Vec<String>,
        /// Number of data rows to show
        #[arg(long, default_value = "5")]
        rows: usize,
    },
    /// List the import schemas (fields, types, required/optional, synonyms).
    Schemas {
        /// Limit the listing to one entity type
        #[arg(long)]
        entity: Option<String>,
    },
    /// Write a sample CSV template for an entity.
    Template {
        /// Entity type: transactions, invoices, inventory
        #[arg(long)]
        entity: String,
        /// Output path (default: template_<entity>.csv)
        #[arg(long)]
        output: Option<String>,
    },
    /// Show or replace the exchange rate table.
    Rates {
        /// Replace the table wholesale: CODE=RATE, e.g. USD=10.12 (repeatable)
        #[arg(long = "set", value_name = "CODE=RATE")]
        set: Vec<String>,
    },
    /// Convert an amount between two currencies.
    Convert {
        amount: f64,
        /// Source currency code, e.g. USD
        from: String,
        /// Target currency code, e.g. MAD
        to: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entity() {
        assert_eq!(parse_entity("transactions").unwrap(), EntityType::Transactions);
        assert_eq!(parse_entity("Invoices").unwrap(), EntityType::Invoices);
        assert!(parse_entity("users").is_err());
    }

    #[test]
    fn test_parse_map_overrides() {
        let parsed = parse_map_overrides(&["0=date".to_string(), "3 = amount".to_string()]).unwrap();
        assert_eq!(parsed, vec![(0, "date".to_string()), (3, "amount".to_string())]);
        assert!(parse_map_overrides(&["nonsense".to_string()]).is_err());
        assert!(parse_map_overrides(&["x=date".to_string()]).is_err());
    }
}
