//! Delimited-text loader.
//!
//! Files from the field are rarely clean: the delimiter is unknown, the
//! encoding may be Latin-1, headers carry stray whitespace or repeat, and
//! some lines have the wrong number of fields. The loader sniffs the
//! delimiter, tolerates short rows, skips long ones and drops rows that are
//! entirely empty before inferring a storage type per column.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::error::{KeyScoutError, Result};
use crate::table::types::{Column, Table, TableSet};
use crate::table::value::Value;

/// Delimiters tried, in order, when sniffing a file.
pub const DEFAULT_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Cell spellings read as missing values.
const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

static ISO_DATETIME: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}(?:[T ]\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?)?$").ok()
});

/// Options controlling how files are parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOptions {
    /// Candidate delimiters in the order they are tried.
    pub delimiters: Vec<u8>,
    /// Recognize ISO-8601 dates and datetimes as a distinct column type.
    pub parse_dates: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            delimiters: DEFAULT_DELIMITERS.to_vec(),
            parse_dates: false,
        }
    }
}

/// Header and rows of one parse attempt, before type inference.
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
    skipped: usize,
}

/// Only `.csv` files are loaded.
pub fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Load one file into a [`Table`] named after the file.
pub fn load_csv(path: &Path, options: &IngestOptions) -> Result<Table> {
    let ingest_error = |message: String| KeyScoutError::Ingest {
        path: path.to_path_buf(),
        message,
    };

    let bytes = std::fs::read(path).map_err(|e| ingest_error(e.to_string()))?;
    let text = decode(&bytes);
    if text.trim().is_empty() {
        return Err(ingest_error("file is empty".to_string()));
    }

    let (delimiter, raw) = sniff(&text, &options.delimiters)
        .ok_or_else(|| ingest_error("no delimiter produced a readable header".to_string()))?;

    if raw.skipped > 0 {
        tracing::warn!(
            "{}: skipped {} malformed lines",
            path.display(),
            raw.skipped
        );
    }
    if raw.rows.is_empty() {
        return Err(ingest_error("no data rows".to_string()));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let headers = dedupe_headers(raw.headers);
    let mut columns = Vec::with_capacity(headers.len());
    for (i, header) in headers.into_iter().enumerate() {
        let cells: Vec<Option<&str>> = raw.rows.iter().map(|row| row[i].as_deref()).collect();
        columns.push(Column::new(
            header,
            infer_column_values(&cells, options.parse_dates),
        ));
    }

    let table = Table::new(name, columns)?;
    tracing::debug!(
        "Loaded {} ({} rows, {} columns, delimiter {:?})",
        path.display(),
        table.row_count,
        table.column_count(),
        delimiter as char
    );
    Ok(table)
}

/// Load several files, skipping the ones that fail.
///
/// A failed or duplicate file is logged and left out; the rest of the batch
/// still loads.
pub fn load_tables<P: AsRef<Path>>(paths: &[P], options: &IngestOptions) -> TableSet {
    let mut tables = TableSet::new();
    for path in paths {
        let path = path.as_ref();
        if !is_supported_file(path) {
            tracing::warn!("Skipping {}: unsupported file type", path.display());
            continue;
        }
        if let Err(e) = load_csv(path, options).and_then(|table| tables.insert(table)) {
            tracing::warn!("Skipping {}: {}", path.display(), e);
        }
    }
    tables
}

/// UTF-8 when valid, otherwise Latin-1. A leading byte-order mark is dropped.
fn decode(bytes: &[u8]) -> String {
    let text = match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    };
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

/// Pick the first delimiter that yields more than one column and at least
/// one row, falling back to the first one that parses at all.
fn sniff(text: &str, delimiters: &[u8]) -> Option<(u8, RawTable)> {
    let mut fallback = None;
    for &delimiter in delimiters {
        let Some(raw) = parse(text, delimiter) else {
            continue;
        };
        if raw.headers.len() > 1 && !raw.rows.is_empty() {
            return Some((delimiter, raw));
        }
        if fallback.is_none() {
            fallback = Some((delimiter, raw));
        }
    }
    fallback
}

fn parse(text: &str, delimiter: u8) -> Option<RawTable> {
    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .ok()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() {
        return None;
    }

    let mut rows = Vec::new();
    let mut skipped = 0;
    for record in reader.records() {
        let record = match record {
            Ok(r) if r.len() <= headers.len() => r,
            _ => {
                skipped += 1;
                continue;
            }
        };

        let mut row: Vec<Option<String>> = record.iter().map(cell).collect();
        row.resize(headers.len(), None);
        if row.iter().any(Option::is_some) {
            rows.push(row);
        }
    }

    Some(RawTable {
        headers,
        rows,
        skipped,
    })
}

fn cell(raw: &str) -> Option<String> {
    if raw.trim().is_empty() || NA_MARKERS.contains(&raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Make header names unique: blanks become `Unnamed: {i}` and repeats get a
/// `.1`, `.2`, … suffix.
pub fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let mut name = if raw.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                raw
            };
            let mut seen = counts.get(&name).copied().unwrap_or(0);
            while seen > 0 {
                counts.insert(name.clone(), seen + 1);
                name = format!("{}.{}", name, seen);
                seen = counts.get(&name).copied().unwrap_or(0);
            }
            counts.insert(name.clone(), seen + 1);
            name
        })
        .collect()
}

/// Convert raw cells to typed values, choosing one storage type for the
/// whole column: int, then float, then bool, then (when enabled) datetime,
/// else string.
pub fn infer_column_values(cells: &[Option<&str>], parse_dates: bool) -> Vec<Value> {
    let present = || cells.iter().flatten().map(|s| s.trim());

    if present().all(|s| s.parse::<i64>().is_ok()) {
        return convert(cells, |s| s.parse::<i64>().ok().map(Value::Int));
    }
    if present().all(|s| s.parse::<f64>().is_ok()) {
        return convert(cells, |s| s.parse::<f64>().ok().map(Value::Float));
    }
    if present().all(|s| parse_bool(s).is_some()) {
        return convert(cells, |s| parse_bool(s).map(Value::Bool));
    }
    if parse_dates && present().all(|s| parse_datetime(s).is_some()) {
        return convert(cells, |s| parse_datetime(s).map(Value::DateTime));
    }

    cells
        .iter()
        .map(|c| match c {
            Some(s) => Value::String((*s).to_string()),
            None => Value::Null,
        })
        .collect()
}

fn convert(cells: &[Option<&str>], parse: impl Fn(&str) -> Option<Value>) -> Vec<Value> {
    cells
        .iter()
        .map(|c| c.and_then(|s| parse(s.trim())).unwrap_or(Value::Null))
        .collect()
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// ISO-8601 date or datetime without offset.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let re = ISO_DATETIME.as_ref()?;
    if !re.is_match(s) {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::types::DataType;
    use std::path::PathBuf;

    fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_comma_separated() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "customers.csv", b"id,name\n1,Ann\n2,Bob\n");
        let table = load_csv(&path, &IngestOptions::default()).unwrap();
        assert_eq!(table.name, "customers.csv");
        assert_eq!(table.row_count, 2);
        assert_eq!(table.columns["id"].values, vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(table.columns["name"].values[1], Value::from("Bob"));
    }

    #[test]
    fn test_sniffs_semicolon_and_trims_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "t.csv", b" id ; price \n1;2.5\n2;3\n");
        let table = load_csv(&path, &IngestOptions::default()).unwrap();
        let names: Vec<&String> = table.columns.keys().collect();
        assert_eq!(names, ["id", "price"]);
        assert_eq!(
            table.columns["price"].values,
            vec![Value::Float(2.5), Value::Float(3.0)]
        );
    }

    #[test]
    fn test_single_column_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "ids.csv", b"id\n1\n2\n3\n");
        let table = load_csv(&path, &IngestOptions::default()).unwrap();
        assert_eq!(table.column_count(), 1);
        assert_eq!(table.row_count, 3);
    }

    #[test]
    fn test_short_rows_padded_long_rows_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "t.csv", b"a,b,c\n1,2,3\n4,5\n6,7,8,9\n");
        let table = load_csv(&path, &IngestOptions::default()).unwrap();
        assert_eq!(table.row_count, 2);
        assert_eq!(table.columns["c"].values, vec![Value::Int(3), Value::Null]);
    }

    #[test]
    fn test_blank_rows_dropped_and_na_markers_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "t.csv", b"a,b\n1,NA\n,\n2,x\n");
        let table = load_csv(&path, &IngestOptions::default()).unwrap();
        assert_eq!(table.row_count, 2);
        assert_eq!(table.columns["b"].values, vec![Value::Null, Value::from("x")]);
    }

    #[test]
    fn test_latin1_fallback_and_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "t.csv", b"id,city\n1,M\xfcnchen\n2,Z\xfcrich\n");
        let table = load_csv(&path, &IngestOptions::default()).unwrap();
        assert_eq!(table.columns["city"].values[0], Value::from("München"));

        let bom = write(dir.path(), "bom.csv", "\u{feff}id,x\n1,2\n".as_bytes());
        let table = load_csv(&bom, &IngestOptions::default()).unwrap();
        assert!(table.columns.contains_key("id"));
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "empty.csv", b"");
        let err = load_csv(&path, &IngestOptions::default()).unwrap_err();
        assert!(matches!(err, KeyScoutError::Ingest { .. }));

        let header_only = write(dir.path(), "header.csv", b"a,b\n");
        assert!(load_csv(&header_only, &IngestOptions::default()).is_err());
    }

    #[test]
    fn test_dedupe_headers() {
        let headers = ["a", "a", "", "a", "a.1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            dedupe_headers(headers),
            ["a", "a.1", "Unnamed: 2", "a.2", "a.1.1"]
        );
    }

    #[test]
    fn test_infer_column_types() {
        let infer = |cells: &[Option<&str>]| DataType::infer(&infer_column_values(cells, true));
        assert_eq!(infer(&[Some("1"), None, Some("3")]), DataType::Int);
        assert_eq!(infer(&[Some("1"), Some("2.5")]), DataType::Float);
        assert_eq!(infer(&[Some("True"), Some("false")]), DataType::Bool);
        assert_eq!(
            infer(&[Some("2024-01-31"), Some("2024-02-01 10:30:00")]),
            DataType::DateTime
        );
        assert_eq!(infer(&[Some("1"), Some("x")]), DataType::String);
    }

    #[test]
    fn test_int_column_with_nulls_profiles_as_int() {
        let values = infer_column_values(&[Some("1"), None, Some("3")], false);
        assert_eq!(values, vec![Value::Int(1), Value::Null, Value::Int(3)]);

        let column = Column::new("qty", values);
        let profile = crate::profile::profile_column(&column, 3, &Default::default());
        assert_eq!(profile.data_type, DataType::Int);
        assert!(profile.entropy.is_some());
        assert_eq!(profile.sample_values, ["1", "3"]);
    }

    #[test]
    fn test_dates_stay_text_by_default() {
        let values = infer_column_values(&[Some("2024-01-31")], false);
        assert_eq!(values, vec![Value::from("2024-01-31")]);
    }

    #[test]
    fn test_parse_datetime_rejects_non_iso() {
        assert!(parse_datetime("31/01/2024").is_none());
        assert!(parse_datetime("2024-13-01").is_none());
        assert!(parse_datetime("2024-01-31T08:15").is_some());
    }

    #[test]
    fn test_load_tables_skips_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "good.csv", b"id,v\n1,2\n");
        let empty = write(dir.path(), "empty.csv", b"");
        let other = write(dir.path(), "notes.txt", b"id,v\n1,2\n");
        let missing = dir.path().join("missing.csv");

        let tables = load_tables(&[good, empty, other, missing], &IngestOptions::default());
        assert_eq!(tables.names().collect::<Vec<_>>(), ["good.csv"]);
    }

    #[test]
    fn test_is_supported_file() {
        assert!(is_supported_file(Path::new("a/b.csv")));
        assert!(is_supported_file(Path::new("B.CSV")));
        assert!(!is_supported_file(Path::new("b.xlsx")));
        assert!(!is_supported_file(Path::new("noext")));
    }
}
