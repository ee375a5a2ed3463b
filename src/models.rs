use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// One imported row, keyed by the source file's original header strings.
/// Never mutated after parsing; downstream stages only read it.
pub type RawRecord = HashMap<String, String>;

/// Source column index (0-based) -> schema field key. A field key appears at
/// most once as a value after auto-mapping; manual overrides are free-form and
/// uniqueness is re-checked by the validator.
pub type ColumnMapping = BTreeMap<usize, String>;

/// Canonical record ready for the backend: field key -> typed JSON value,
/// plus the injected `company_id` and entity defaults.
pub type TransformedRecord = serde_json::Map<String, serde_json::Value>;

/// Header row plus data rows produced by the tabular parser.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRecord>,
    /// Delimiter the detector settled on; `None` for workbook sources.
    pub delimiter: Option<char>,
}

/// One validation finding. `row` is the 1-based data row number; mapping-level
/// findings carry no row and no field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub row: Option<usize>,
    pub field: Option<String>,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// What the persistence collaborator reports back for one batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub imported_count: usize,
    #[serde(default)]
    pub skipped_count: usize,
    #[serde(default)]
    pub errors: Vec<String>,
}
