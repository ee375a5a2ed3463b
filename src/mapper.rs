use crate::models::ColumnMapping;
use crate::schema::EntitySchema;

/// Lowercase and keep only `[a-z0-9]`, so "Montant Total (MAD)" and
/// "montant_total" normalize to the same thing.
fn normalize(header: &str) -> String {
    header
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Match source headers to schema fields by synonym substrings.
///
/// Headers are scanned left to right, fields in schema order; the first field
/// whose synonym matches claims the column. A field already claimed by an
/// earlier column is skipped and the scan continues with the remaining
/// fields, so a later duplicate header ends up unmapped rather than stealing
/// the field. Deterministic by construction.
pub fn auto_map(headers: &[String], schema: &EntitySchema) -> ColumnMapping {
    let mut mapping = ColumnMapping::new();
    for (index, header) in headers.iter().enumerate() {
        let clean = normalize(header);
        for field in schema.fields {
            if !field.synonyms.iter().any(|syn| clean.contains(syn)) {
                continue;
            }
            if mapping.values().any(|key| key == field.key) {
                continue;
            }
            mapping.insert(index, field.key.to_string());
            break;
        }
    }
    mapping
}
