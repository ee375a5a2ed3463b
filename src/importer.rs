use std::path::{Path, PathBuf};

use serde_json::json;

use crate::error::{Result, SoukError};
use crate::mapper::auto_map;
use crate::models::{ColumnMapping, ImportOutcome, RawRecord, TransformedRecord, ValidationError};
use crate::parser::parse_file;
use crate::schema::{schema, EntitySchema, EntityType};
use crate::transformer::transform;
use crate::validator::validate;

// ---------------------------------------------------------------------------
// Persistence collaborator
// ---------------------------------------------------------------------------

/// Where a transformed batch is handed off. The real ERP backend sits behind
/// a REST API; the CLI stages batches in an outbox directory instead, and
/// tests use an in-memory implementation.
pub trait Backend {
    fn bulk_create(
        &self,
        entity: EntityType,
        records: &[TransformedRecord],
    ) -> Result<ImportOutcome>;
}

/// Writes each batch as one pretty-printed JSON document named
/// `<entity>-<timestamp>.json` under the outbox directory.
pub struct OutboxBackend {
    dir: PathBuf,
}

impl OutboxBackend {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl Backend for OutboxBackend {
    fn bulk_create(
        &self,
        entity: EntityType,
        records: &[TransformedRecord],
    ) -> Result<ImportOutcome> {
        std::fs::create_dir_all(&self.dir)?;
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S%.3f");
        let path = self.dir.join(format!("{}-{stamp}.json", entity.key()));
        let payload = json!({
            "entity": entity.key(),
            "records": records,
        });
        let body = serde_json::to_string_pretty(&payload)
            .map_err(|e| SoukError::Persistence(e.to_string()))?;
        std::fs::write(&path, format!("{body}\n"))?;
        Ok(ImportOutcome {
            imported_count: records.len(),
            skipped_count: 0,
            errors: vec![],
        })
    }
}

// ---------------------------------------------------------------------------
// Import session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Parsed,
    Mapped,
    Validated,
    Transformed,
    Submitted,
    Failed,
}

/// One file's trip through the pipeline: detect -> parse -> auto-map ->
/// (manual adjustments) -> validate -> transform -> submit. The session
/// survives a failed submission so a retry reuses everything already built.
pub struct ImportSession {
    entity: EntityType,
    headers: Vec<String>,
    rows: Vec<RawRecord>,
    delimiter: Option<char>,
    mapping: ColumnMapping,
    errors: Vec<ValidationError>,
    transformed: Vec<TransformedRecord>,
    stage: Stage,
}

impl ImportSession {
    pub fn new(entity: EntityType) -> Self {
        Self {
            entity,
            headers: Vec::new(),
            rows: Vec::new(),
            delimiter: None,
            mapping: ColumnMapping::new(),
            errors: Vec::new(),
            transformed: Vec::new(),
            stage: Stage::Idle,
        }
    }

    pub fn entity(&self) -> EntityType {
        self.entity
    }

    pub fn schema(&self) -> &'static EntitySchema {
        schema(self.entity)
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[RawRecord] {
        &self.rows
    }

    pub fn delimiter(&self) -> Option<char> {
        self.delimiter
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn transformed(&self) -> &[TransformedRecord] {
        &self.transformed
    }

    /// Parse the file and auto-map its columns.
    pub fn load_file(&mut self, path: &Path, max_size: u64) -> Result<()> {
        let table = parse_file(path, max_size)?;
        self.headers = table.headers;
        self.rows = table.rows;
        self.delimiter = table.delimiter;
        self.stage = Stage::Parsed;
        self.mapping = auto_map(&self.headers, self.schema());
        self.stage = Stage::Mapped;
        Ok(())
    }

    /// Manual mapping override. Uniqueness is deliberately not enforced here;
    /// the validator re-checks required coverage on the next pass.
    pub fn set_mapping(&mut self, column: usize, field_key: &str) {
        self.mapping.insert(column, field_key.to_string());
    }

    pub fn clear_mapping(&mut self, column: usize) {
        self.mapping.remove(&column);
    }

    /// Fast missing-required gate, usable before a full validation pass.
    pub fn check_mapping(&self) -> Result<()> {
        let missing: Vec<String> = self
            .schema()
            .required_fields()
            .filter(|f| !self.mapping.values().any(|key| key == f.key))
            .map(|f| f.key.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SoukError::MissingRequiredFields(missing))
        }
    }

    pub fn validate(&mut self) -> &[ValidationError] {
        self.errors = validate(&self.rows, &self.headers, &self.mapping, self.schema());
        self.stage = if self.errors.is_empty() {
            Stage::Validated
        } else {
            Stage::Failed
        };
        &self.errors
    }

    /// Validate, then transform. Refuses to produce records while any
    /// validation error stands.
    pub fn transform(&mut self, company_id: i64, base_currency: &str) -> Result<usize> {
        self.validate();
        if !self.errors.is_empty() {
            return Err(SoukError::RowValidation(self.errors.clone()));
        }
        self.transformed = transform(
            &self.rows,
            &self.headers,
            &self.mapping,
            self.schema(),
            company_id,
            base_currency,
        );
        self.stage = Stage::Transformed;
        Ok(self.transformed.len())
    }

    /// Hand the transformed batch to the backend. On failure the session is
    /// left intact (stage `Failed`) so the caller can retry submission
    /// without re-parsing or re-validating anything.
    pub fn submit(&mut self, backend: &dyn Backend) -> Result<ImportOutcome> {
        if self.stage != Stage::Transformed && self.stage != Stage::Failed {
            return Err(SoukError::Other(
                "nothing to submit; run transform first".to_string(),
            ));
        }
        if self.transformed.is_empty() {
            return Err(SoukError::Other(
                "no records left to import after transformation".to_string(),
            ));
        }
        match backend.bulk_create(self.entity, &self.transformed) {
            Ok(outcome) => {
                self.stage = Stage::Submitted;
                Ok(outcome)
            }
            Err(e) => {
                self.stage = Stage::Failed;
                Err(SoukError::Persistence(e.to_string()))
            }
        }
    }
}
