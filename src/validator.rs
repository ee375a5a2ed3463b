use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::models::{ColumnMapping, RawRecord, ValidationError};
use crate::schema::{EntitySchema, FieldType};
use crate::transformer::clean_number;

/// Hard cap on reported errors so one bad file cannot flood the output.
/// Truncation keeps the earliest findings.
pub const MAX_ERRORS: usize = 50;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

/// Accepted date shapes paired with their chrono format.
const DATE_FORMATS: [(&str, char, [usize; 3]); 3] = [
    ("%Y-%m-%d", '-', [4, 2, 2]),
    ("%d/%m/%Y", '/', [2, 2, 4]),
    ("%d-%m-%Y", '-', [2, 2, 4]),
];

fn is_valid_date(value: &str) -> bool {
    DATE_FORMATS.iter().any(|(fmt, sep, widths)| {
        crate::transformer::is_digit_groups(value, *sep, widths)
            && NaiveDate::parse_from_str(value, fmt).is_ok()
    })
}

/// Monetary fields must be strictly positive; matched by key the same way
/// for amount, total_amount and unit_price.
fn is_monetary(field_key: &str) -> bool {
    field_key.contains("amount") || field_key.contains("price")
}

/// Check mapped columns against the schema. Returns findings only; never
/// fails and never mutates its inputs, so a pass can be re-run after the
/// caller adjusts the mapping.
pub fn validate(
    rows: &[RawRecord],
    headers: &[String],
    mapping: &ColumnMapping,
    schema: &EntitySchema,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    // Required-field coverage: one global finding, independent of rows.
    let missing: Vec<String> = schema
        .required_fields()
        .filter(|f| !mapping.values().any(|key| key == f.key))
        .map(|f| format!("{} ({})", f.key, f.label))
        .collect();
    if !missing.is_empty() {
        errors.push(ValidationError {
            row: None,
            field: None,
            message: format!("Required fields not mapped: {}", missing.join(", ")),
        });
    }

    for (row_index, row) in rows.iter().enumerate() {
        let row_number = row_index + 1;
        for (&column, field_key) in mapping {
            let Some(field) = schema.field(field_key) else {
                continue;
            };
            let Some(header) = headers.get(column) else {
                continue;
            };
            let value = row.get(header).map(|v| v.trim()).unwrap_or("");

            if value.is_empty() {
                if field.required {
                    errors.push(ValidationError {
                        row: Some(row_number),
                        field: Some(field.key.to_string()),
                        message: format!(
                            "Row {row_number}: {} is required (column \"{header}\")",
                            field.label
                        ),
                    });
                }
                continue;
            }

            let problem = match field.field_type {
                FieldType::Number => check_number(value, field.key),
                FieldType::Date => (!is_valid_date(value)).then(|| {
                    format!(
                        "invalid date (expected YYYY-MM-DD, DD/MM/YYYY or DD-MM-YYYY, found: \"{value}\")"
                    )
                }),
                FieldType::Email => (!email_regex().is_match(value))
                    .then(|| format!("invalid email address (found: \"{value}\")")),
                FieldType::Select => {
                    let valid = field.options.iter().any(|o| o.eq_ignore_ascii_case(value));
                    (!valid).then(|| {
                        format!(
                            "invalid value \"{value}\" (valid options: {})",
                            field.options.join(", ")
                        )
                    })
                }
                FieldType::Text => None,
            };

            if let Some(problem) = problem {
                errors.push(ValidationError {
                    row: Some(row_number),
                    field: Some(field.key.to_string()),
                    message: format!(
                        "Row {row_number}: {} (column \"{header}\") {problem}",
                        field.label
                    ),
                });
            }
        }
        if errors.len() >= MAX_ERRORS {
            break;
        }
    }

    errors.truncate(MAX_ERRORS);
    errors
}

fn check_number(value: &str, field_key: &str) -> Option<String> {
    match clean_number(value).parse::<f64>() {
        Err(_) => Some(format!("must be a number (found: \"{value}\")")),
        Ok(parsed) if is_monetary(field_key) && parsed <= 0.0 => {
            Some(format!("must be positive (found: {parsed})"))
        }
        Ok(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::auto_map;
    use crate::parser::parse_text;
    use crate::schema::{schema, EntityType};

    fn run(entity: EntityType, csv_text: &str) -> Vec<ValidationError> {
        let table = parse_text(csv_text, ',').unwrap();
        let schema = schema(entity);
        let mapping = auto_map(&table.headers, schema);
        validate(&table.rows, &table.headers, &mapping, schema)
    }

    #[test]
    fn test_clean_file_passes() {
        let errors = run(
            EntityType::Transactions,
            "Date,Desc,Montant,Type\n2024-01-15,Transport,150,expense\n",
        );
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_missing_required_mapping_is_one_global_error() {
        // No column maps to amount or type.
        let errors = run(EntityType::Transactions, "Date,Desc\n2024-01-15,Transport\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, None);
        assert!(errors[0].message.contains("amount"));
        assert!(errors[0].message.contains("type"));
    }

    #[test]
    fn test_unmapped_required_not_duplicated_per_row() {
        let errors = run(
            EntityType::Inventory,
            "Nom Article,Quantité\nStylo,5\nCahier,10\nGomme,3\n",
        );
        let about_unit_price: Vec<_> = errors
            .iter()
            .filter(|e| e.message.contains("unit_price"))
            .collect();
        assert_eq!(about_unit_price.len(), 1);
        assert_eq!(about_unit_price[0].row, None);
    }

    #[test]
    fn test_blank_required_value() {
        let errors = run(
            EntityType::Transactions,
            "Date,Desc,Montant,Type\n2024-01-15,,150,expense\n",
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, Some(1));
        assert_eq!(errors[0].field.as_deref(), Some("description"));
        assert!(errors[0].message.contains("Desc"));
    }

    #[test]
    fn test_non_numeric_amount() {
        let errors = run(
            EntityType::Transactions,
            "Date,Desc,Montant,Type\n2024-01-15,A,150,expense\n2024-01-16,B,abc,expense\n",
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, Some(2));
        assert_eq!(errors[0].field.as_deref(), Some("amount"));
        assert!(errors[0].message.contains("Montant"));
        assert!(errors[0].message.contains("abc"));
    }

    #[test]
    fn test_number_with_currency_noise_is_fine() {
        let errors = run(
            EntityType::Transactions,
            "Date,Desc,Montant,Type\n2024-01-15,A,\"1,250.00 DH\",expense\n",
        );
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_monetary_must_be_positive() {
        let errors = run(
            EntityType::Transactions,
            "Date,Desc,Montant,Type\n2024-01-15,A,0,expense\n2024-01-16,B,-5,expense\n",
        );
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("positive"));
        assert!(errors[1].message.contains("positive"));
    }

    #[test]
    fn test_non_monetary_number_may_be_negative() {
        // Inventory quantity is a plain number, not a monetary field.
        let errors = run(
            EntityType::Inventory,
            "Nom Article,Quantité,Prix Unitaire\nStylo,-3,2.50\n",
        );
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_date_formats() {
        let errors = run(
            EntityType::Transactions,
            "Date,Desc,Montant,Type\n\
             2024-01-15,A,10,expense\n\
             15/01/2024,B,10,expense\n\
             15-01-2024,C,10,expense\n\
             2024-13-45,D,10,expense\n\
             someday,E,10,expense\n",
        );
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].row, Some(4));
        assert_eq!(errors[1].row, Some(5));
        assert!(errors[1].message.contains("someday"));
    }

    #[test]
    fn test_rejects_well_shaped_impossible_date() {
        let errors = run(
            EntityType::Transactions,
            "Date,Desc,Montant,Type\n30/02/2024,A,10,expense\n",
        );
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("invalid date"));
    }

    #[test]
    fn test_select_membership_case_insensitive() {
        let errors = run(
            EntityType::Transactions,
            "Date,Desc,Montant,Type\n2024-01-15,A,10,EXPENSE\n2024-01-16,B,10,maybe\n",
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, Some(2));
        assert!(errors[0].message.contains("maybe"));
        assert!(errors[0].message.contains("income, expense"));
    }

    #[test]
    fn test_email_check() {
        let table = parse_text(
            "Client,Total,Date,Mail\nABC,100,2024-01-15,not-an-email\n",
            ',',
        )
        .unwrap();
        let schema = schema(EntityType::Invoices);
        let mut mapping = auto_map(&table.headers, schema);
        mapping.insert(3, "client_email".to_string());
        let errors = validate(&table.rows, &table.headers, &mapping, schema);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("not-an-email"));

        let table = parse_text(
            "Client,Total,Date,Mail\nABC,100,2024-01-15,contact@abc.com\n",
            ',',
        )
        .unwrap();
        let errors = validate(&table.rows, &table.headers, &mapping, schema);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_optional_blank_values_ignored() {
        let errors = run(
            EntityType::Transactions,
            "Date,Desc,Montant,Type,Notes\n2024-01-15,A,10,expense,\n",
        );
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_error_cap_keeps_earliest() {
        let mut csv_text = String::from("Date,Desc,Montant,Type\n");
        for i in 0..60 {
            csv_text.push_str(&format!("2024-01-15,row{i},abc,expense\n"));
        }
        let errors = run(EntityType::Transactions, &csv_text);
        assert_eq!(errors.len(), MAX_ERRORS);
        assert_eq!(errors[0].row, Some(1));
        assert_eq!(errors[MAX_ERRORS - 1].row, Some(MAX_ERRORS));
    }

    #[test]
    fn test_idempotent() {
        let table = parse_text(
            "Date,Desc,Montant,Type\n2024-01-15,A,abc,expense\n",
            ',',
        )
        .unwrap();
        let schema = schema(EntityType::Transactions);
        let mapping = auto_map(&table.headers, schema);
        let first = validate(&table.rows, &table.headers, &mapping, schema);
        let second = validate(&table.rows, &table.headers, &mapping, schema);
        assert_eq!(first, second);
    }
}
