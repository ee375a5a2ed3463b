use rand::Rng;
use serde_json::{json, Value};

use crate::models::{ColumnMapping, RawRecord, TransformedRecord};
use crate::schema::{EntitySchema, EntityType, FieldSpec, FieldType};

/// Terms recognized (by containment) as the income direction of a
/// transaction `type` value; everything else is an expense.
const INCOME_TERMS: [&str; 6] = ["income", "revenu", "revenus", "credit", "entree", "+"];

/// Keep only the characters a float parser can use.
pub(crate) fn clean_number(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

/// Convert validated rows into canonical records for the backend. Each output
/// record is seeded with `company_id`; mapped columns are converted per field
/// type, entity defaults are applied, and rows with nothing mapped are
/// dropped.
pub fn transform(
    rows: &[RawRecord],
    headers: &[String],
    mapping: &ColumnMapping,
    schema: &EntitySchema,
    company_id: i64,
    base_currency: &str,
) -> Vec<TransformedRecord> {
    rows.iter()
        .filter_map(|row| {
            let mut out = TransformedRecord::new();
            out.insert("company_id".to_string(), json!(company_id));

            for (&column, field_key) in mapping {
                let Some(field) = schema.field(field_key) else {
                    continue;
                };
                let Some(header) = headers.get(column) else {
                    continue;
                };
                let value = row.get(header).map(|v| v.trim()).unwrap_or("");
                if value.is_empty() {
                    continue;
                }
                out.insert(field_key.clone(), transform_value(value, field));
            }

            // Nothing beyond the injected company_id means the row was empty
            // in every mapped column; defaults must not resurrect it.
            if out.len() == 1 {
                return None;
            }

            apply_defaults(&mut out, schema.entity, base_currency);
            Some(out)
        })
        .collect()
}

fn transform_value(value: &str, field: &FieldSpec) -> Value {
    match field.field_type {
        FieldType::Number => json!(clean_number(value).parse::<f64>().unwrap_or(0.0)),
        FieldType::Date => Value::String(normalize_date(value)),
        FieldType::Select => {
            if field.key == "type" {
                let lower = value.to_lowercase();
                if INCOME_TERMS.iter().any(|term| lower.contains(term)) {
                    json!("income")
                } else {
                    json!("expense")
                }
            } else {
                Value::String(value.to_lowercase())
            }
        }
        FieldType::Text | FieldType::Email => Value::String(value.to_string()),
    }
}

/// Normalize DD/MM/YYYY and DD-MM-YYYY to ISO by reordering; ISO passes
/// through. Anything else gets a few generic formats tried against it and,
/// failing that, passes through unchanged — unparseable dates are handed to
/// the backend as-is rather than silently dropped.
pub(crate) fn normalize_date(value: &str) -> String {
    let value = value.trim();

    if is_digit_groups(value, '-', &[4, 2, 2]) {
        return value.to_string();
    }
    if is_digit_groups(value, '/', &[2, 2, 4]) {
        let parts: Vec<&str> = value.split('/').collect();
        return format!("{}-{}-{}", parts[2], parts[1], parts[0]);
    }
    if is_digit_groups(value, '-', &[2, 2, 4]) {
        let parts: Vec<&str> = value.split('-').collect();
        return format!("{}-{}-{}", parts[2], parts[1], parts[0]);
    }

    for fmt in ["%Y/%m/%d", "%d.%m.%Y", "%m/%d/%Y", "%B %d, %Y", "%d %B %Y"] {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(value, fmt) {
            return date.format("%Y-%m-%d").to_string();
        }
    }

    value.to_string()
}

pub(crate) fn is_digit_groups(value: &str, sep: char, widths: &[usize]) -> bool {
    let parts: Vec<&str> = value.split(sep).collect();
    parts.len() == widths.len()
        && parts
            .iter()
            .zip(widths)
            .all(|(p, &w)| p.len() == w && p.chars().all(|c| c.is_ascii_digit()))
}

fn apply_defaults(record: &mut TransformedRecord, entity: EntityType, base_currency: &str) {
    match entity {
        EntityType::Transactions => {
            record
                .entry("currency".to_string())
                .or_insert_with(|| json!(base_currency));
            record
                .entry("type".to_string())
                .or_insert_with(|| json!("expense"));
        }
        EntityType::Invoices => {
            record
                .entry("currency".to_string())
                .or_insert_with(|| json!(base_currency));
            record
                .entry("status".to_string())
                .or_insert_with(|| json!("pending"));
            record
                .entry("invoice_number".to_string())
                .or_insert_with(|| json!(generated_invoice_number()));
        }
        EntityType::Inventory => {
            record
                .entry("currency".to_string())
                .or_insert_with(|| json!(base_currency));
        }
    }
}

/// Unique-enough placeholder for invoices imported without a number.
fn generated_invoice_number() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(5)
        .map(char::from)
        .collect();
    format!(
        "INV-{}-{}",
        chrono::Utc::now().timestamp_millis(),
        suffix.to_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::auto_map;
    use crate::parser::parse_text;
    use crate::schema::{schema, EntityType};

    fn run(entity: EntityType, csv_text: &str) -> Vec<TransformedRecord> {
        let table = parse_text(csv_text, ',').unwrap();
        let schema = schema(entity);
        let mapping = auto_map(&table.headers, schema);
        transform(&table.rows, &table.headers, &mapping, schema, 1, "MAD")
    }

    #[test]
    fn test_transaction_row() {
        let records = run(
            EntityType::Transactions,
            "Date,Desc,Montant,Type\n2024-01-15,Transport,150,expense\n",
        );
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec["company_id"], json!(1));
        assert_eq!(rec["date"], json!("2024-01-15"));
        assert_eq!(rec["description"], json!("Transport"));
        assert_eq!(rec["amount"], json!(150.0));
        assert_eq!(rec["type"], json!("expense"));
        assert_eq!(rec["currency"], json!("MAD"));
    }

    #[test]
    fn test_number_strips_noise_and_defaults_to_zero() {
        let records = run(
            EntityType::Transactions,
            "Date,Desc,Montant,Type\n2024-01-15,A,150.50 DH,expense\n2024-01-16,B,abc,expense\n",
        );
        assert_eq!(records[0]["amount"], json!(150.5));
        assert_eq!(records[1]["amount"], json!(0.0));
    }

    #[test]
    fn test_date_reordering() {
        assert_eq!(normalize_date("2024-01-15"), "2024-01-15");
        assert_eq!(normalize_date("15/01/2024"), "2024-01-15");
        assert_eq!(normalize_date("15-01-2024"), "2024-01-15");
    }

    #[test]
    fn test_date_generic_fallback() {
        assert_eq!(normalize_date("2024/01/15"), "2024-01-15");
        assert_eq!(normalize_date("15.01.2024"), "2024-01-15");
    }

    #[test]
    fn test_unparseable_date_passes_through() {
        assert_eq!(normalize_date("someday"), "someday");
        assert_eq!(normalize_date("15/13/2024"), "2024-13-15");
    }

    #[test]
    fn test_type_containment() {
        let records = run(
            EntityType::Transactions,
            "Date,Desc,Montant,Type\n\
             2024-01-15,A,10,Revenus\n\
             2024-01-15,B,10,CREDIT\n\
             2024-01-15,C,10,+\n\
             2024-01-15,D,10,sortie\n",
        );
        assert_eq!(records[0]["type"], json!("income"));
        assert_eq!(records[1]["type"], json!("income"));
        assert_eq!(records[2]["type"], json!("income"));
        assert_eq!(records[3]["type"], json!("expense"));
    }

    #[test]
    fn test_other_selects_lowercased() {
        let records = run(
            EntityType::Invoices,
            "Client,Total,Date,Statut\nABC,100,2024-01-15,PAID\n",
        );
        assert_eq!(records[0]["status"], json!("paid"));
    }

    #[test]
    fn test_transaction_defaults() {
        let records = run(EntityType::Transactions, "Date,Desc,Montant\n2024-01-15,A,10\n");
        assert_eq!(records[0]["currency"], json!("MAD"));
        assert_eq!(records[0]["type"], json!("expense"));
    }

    #[test]
    fn test_invoice_defaults_and_placeholder_number() {
        let records = run(EntityType::Invoices, "Client,Total,Date\nABC,100,2024-01-15\n");
        let rec = &records[0];
        assert_eq!(rec["status"], json!("pending"));
        assert_eq!(rec["currency"], json!("MAD"));
        let number = rec["invoice_number"].as_str().unwrap();
        assert!(number.starts_with("INV-"), "{number}");
    }

    #[test]
    fn test_mapped_invoice_number_not_overwritten() {
        let records = run(
            EntityType::Invoices,
            "Facture,Client,Total,Date\nFAC-007,ABC,100,2024-01-15\n",
        );
        assert_eq!(records[0]["invoice_number"], json!("FAC-007"));
    }

    #[test]
    fn test_row_empty_in_all_mapped_columns_dropped() {
        // The Notes column keeps the row alive in the parser, but every
        // mapped column is blank so the transformer drops it.
        let records = run(
            EntityType::Transactions,
            "Date,Desc,Montant,Zzz\n2024-01-15,A,10,x\n,,,only-unmapped\n",
        );
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_deterministic_for_fixed_input() {
        let csv_text = "Date,Desc,Montant,Type\n15/01/2024,Taxi,45.5,expense\n";
        let a = run(EntityType::Transactions, csv_text);
        let b = run(EntityType::Transactions, csv_text);
        assert_eq!(a, b);
    }
}
