use thiserror::Error;

use crate::models::ValidationError;

#[derive(Error, Debug)]
pub enum SoukError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("File needs a header line plus at least one data line")]
    EmptyInput,

    #[error("Unsupported file format: {0} (expected .csv, .xlsx or .xls)")]
    UnsupportedFormat(String),

    #[error("File is {size} bytes; the accepted maximum is {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Required fields not mapped: {}", .0.join(", "))]
    MissingRequiredFields(Vec<String>),

    #[error("Validation failed with {} error(s); nothing was imported", .0.len())]
    RowValidation(Vec<ValidationError>),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SoukError>;
