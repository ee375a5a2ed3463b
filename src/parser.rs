use std::path::Path;

use crate::detect::detect_delimiter;
use crate::error::{Result, SoukError};
use crate::models::{ParsedTable, RawRecord};

/// Extensions accepted at the file boundary.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

/// Gate a file on extension and size before any of it is read. Returns the
/// lowercased extension on success.
pub fn check_file(path: &Path, max_size: u64) -> Result<String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if !ACCEPTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(SoukError::UnsupportedFormat(path.display().to_string()));
    }
    let size = std::fs::metadata(path)?.len();
    if size > max_size {
        return Err(SoukError::FileTooLarge {
            size,
            max: max_size,
        });
    }
    Ok(ext)
}

/// Read a CSV or Excel file into headers plus header-keyed rows.
pub fn parse_file(path: &Path, max_size: u64) -> Result<ParsedTable> {
    let ext = check_file(path, max_size)?;
    match ext.as_str() {
        "csv" => {
            let text = std::fs::read_to_string(path)?;
            let delimiter = detect_delimiter(&text);
            parse_text(&text, delimiter)
        }
        #[cfg(feature = "excel")]
        "xlsx" | "xls" => parse_workbook(path),
        #[cfg(not(feature = "excel"))]
        "xlsx" | "xls" => Err(SoukError::UnsupportedFormat(
            "Excel support is not compiled in; convert the file to CSV".to_string(),
        )),
        _ => Err(SoukError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Parse delimited text. Quoted fields are honored, ragged rows are padded
/// with empty strings, rows that are entirely empty are dropped, and row
/// order is preserved.
pub fn parse_text(text: &str, delimiter: char) -> Result<ParsedTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delimiter as u8)
        .from_reader(text.as_bytes());

    let mut lines: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let fields: Vec<String> = record.iter().map(strip_quotes).collect();
        // A lone empty field is a whitespace-only line; a line like ",,," still
        // counts here and is only dropped later as an all-empty row.
        if fields.len() == 1 && fields[0].is_empty() {
            continue;
        }
        lines.push(fields);
    }

    table_from_lines(lines, Some(delimiter))
}

/// First line becomes the header row; the rest become records keyed by the
/// header at the same column position.
fn table_from_lines(lines: Vec<Vec<String>>, delimiter: Option<char>) -> Result<ParsedTable> {
    if lines.len() < 2 {
        return Err(SoukError::EmptyInput);
    }

    let mut lines = lines.into_iter();
    let headers: Vec<String> = lines.next().unwrap_or_default();

    let mut rows = Vec::new();
    for fields in lines {
        let mut row = RawRecord::new();
        for (i, header) in headers.iter().enumerate() {
            let value = fields.get(i).cloned().unwrap_or_default();
            row.insert(header.clone(), value);
        }
        if row.values().all(|v| v.trim().is_empty()) {
            continue;
        }
        rows.push(row);
    }

    Ok(ParsedTable {
        headers,
        rows,
        delimiter,
    })
}

/// Strip one layer of surrounding double quotes left over when quoting did
/// not follow CSV rules exactly (e.g. a quoted field preceded by a space).
fn strip_quotes(field: &str) -> String {
    let trimmed = field.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(feature = "excel")]
pub fn parse_workbook(path: &Path) -> Result<ParsedTable> {
    use calamine::Reader;

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| SoukError::Other(format!("Failed to open workbook: {e}")))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SoukError::EmptyInput)?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| SoukError::Other(format!("Failed to read sheet '{sheet_name}': {e}")))?;

    let mut lines: Vec<Vec<String>> = Vec::new();
    for row in range.rows() {
        let fields: Vec<String> = row.iter().map(cell_to_string).collect();
        if fields.iter().all(|f| f.is_empty()) {
            continue;
        }
        lines.push(fields);
    }

    table_from_lines(lines, None)
}

#[cfg(feature = "excel")]
fn cell_to_string(cell: &calamine::Data) -> String {
    use calamine::Data;
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64()),
        Data::DateTimeIso(s) => s.chars().take(10).collect(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

#[cfg(any(feature = "excel", test))]
pub fn excel_serial_to_date(serial: f64) -> String {
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = chrono::NaiveDate::from_ymd_opt(1899, 12, 30).unwrap();
    let date = base + chrono::Duration::days(serial as i64);
    date.format("%Y-%m-%d").to_string()
}
