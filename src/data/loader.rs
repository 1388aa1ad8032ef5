use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::model::{
    LaunchRecord, LaunchTable, Outcome, COL_BOOSTER_CATEGORY, COL_CLASS, COL_LAUNCH_SITE,
    COL_PAYLOAD_MASS,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a launch file could not be turned into a [`LaunchTable`].
///
/// Every variant is fatal at startup: the dashboard never serves a
/// partially loaded table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("launch file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("reading {}: {}", .path.display(), .source)]
    Io { path: PathBuf, source: io::Error },

    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reading parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("decoding arrow data: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("data row {row}: invalid {column} value '{value}'")]
    InvalidValue {
        /// 1-based, not counting the CSV header line.
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("expected {0}")]
    Malformed(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

type Result<T> = std::result::Result<T, LoadError>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `Launch Site`, `Payload Mass (kg)`,
///   `Booster Version Category` and `class` columns (the usual export)
/// * `.json`    – `[{ "Launch Site": "...", "Payload Mass (kg)": 0.0, ... }, ...]`
/// * `.parquet` – same column names, numeric columns of any int/float type
pub fn load_file(path: &Path) -> Result<LaunchTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!(
        "Loaded {} launch records from {} ({} sites, payload {:?}..{:?} kg)",
        table.len(),
        path.display(),
        table.sites().len(),
        table.min_payload(),
        table.max_payload()
    );
    Ok(table)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

// ---------------------------------------------------------------------------
// Field validation shared by all formats
// ---------------------------------------------------------------------------

fn parse_payload(raw: &str, row: usize) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(check_payload)
        .ok_or_else(|| invalid(row, COL_PAYLOAD_MASS, raw))
}

fn check_payload(value: f64) -> Option<f64> {
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// `class` is written as `1` by most exports, `1.0` by some.
fn parse_class(raw: &str, row: usize) -> Result<Outcome> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|f| f.fract() == 0.0)
                .map(|f| f as i64)
        })
        .and_then(Outcome::from_class)
        .ok_or_else(|| invalid(row, COL_CLASS, raw))
}

fn class_from_f64(value: f64, row: usize) -> Result<Outcome> {
    Some(value)
        .filter(|f| f.fract() == 0.0)
        .and_then(|f| Outcome::from_class(f as i64))
        .ok_or_else(|| invalid(row, COL_CLASS, &value.to_string()))
}

fn invalid(row: usize, column: &'static str, value: &str) -> LoadError {
    LoadError::InvalidValue {
        row,
        column,
        value: value.to_string(),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names; the four required columns may
/// appear in any position. Extra columns (flight number, full booster
/// version, an unnamed index) are ignored.
fn load_csv(path: &Path) -> Result<LaunchTable> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let headers = reader.headers()?.clone();

    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    };
    let site_idx = position(COL_LAUNCH_SITE)?;
    let payload_idx = position(COL_PAYLOAD_MASS)?;
    let booster_idx = position(COL_BOOSTER_CATEGORY)?;
    let class_idx = position(COL_CLASS)?;

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = row_no + 1;
        let record = result?;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        records.push(LaunchRecord {
            launch_site: field(site_idx).trim().to_string(),
            payload_mass_kg: parse_payload(field(payload_idx), row)?,
            booster_version_category: field(booster_idx).trim().to_string(),
            outcome: parse_class(field(class_idx), row)?,
        });
    }

    Ok(LaunchTable::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Launch Site": "CCAFS LC-40",
///     "Payload Mass (kg)": 525.0,
///     "Booster Version Category": "v1.0",
///     "class": 0
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<LaunchTable> {
    let root: JsonValue = serde_json::from_reader(io::BufReader::new(open(path)?))?;

    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::Malformed("top-level JSON array".to_string()))?;

    let mut records = Vec::with_capacity(rows.len());

    for (row_no, value) in rows.iter().enumerate() {
        let row = row_no + 1;
        let obj = value
            .as_object()
            .ok_or_else(|| LoadError::Malformed(format!("data row {row} to be a JSON object")))?;

        let payload = json_field(obj, COL_PAYLOAD_MASS)?;
        let class = json_field(obj, COL_CLASS)?;

        records.push(LaunchRecord {
            launch_site: json_string(obj, COL_LAUNCH_SITE, row)?,
            payload_mass_kg: payload
                .as_f64()
                .and_then(check_payload)
                .ok_or_else(|| invalid(row, COL_PAYLOAD_MASS, &payload.to_string()))?,
            booster_version_category: json_string(obj, COL_BOOSTER_CATEGORY, row)?,
            outcome: match class.as_f64() {
                Some(f) => class_from_f64(f, row)?,
                None => return Err(invalid(row, COL_CLASS, &class.to_string())),
            },
        });
    }

    Ok(LaunchTable::from_records(records))
}

fn json_field<'a>(obj: &'a Map<String, JsonValue>, column: &str) -> Result<&'a JsonValue> {
    obj.get(column)
        .ok_or_else(|| LoadError::MissingColumn(column.to_string()))
}

fn json_string(obj: &Map<String, JsonValue>, column: &'static str, row: usize) -> Result<String> {
    let value = json_field(obj, column)?;
    value
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| invalid(row, column, &value.to_string()))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing launch records.
///
/// Expected schema:
/// - `Launch Site`, `Booster Version Category`: Utf8 or LargeUtf8
/// - `Payload Mass (kg)`, `class`: any integer or float type
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<LaunchTable> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let reader = builder.build()?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        append_batch(&batch, &mut records)?;
    }

    Ok(LaunchTable::from_records(records))
}

fn append_batch(batch: &RecordBatch, records: &mut Vec<LaunchRecord>) -> Result<()> {
    let offset = records.len();

    let sites = column_as(batch, COL_LAUNCH_SITE, &DataType::Utf8)?;
    let boosters = column_as(batch, COL_BOOSTER_CATEGORY, &DataType::Utf8)?;
    let payloads = column_as(batch, COL_PAYLOAD_MASS, &DataType::Float64)?;
    let classes = column_as(batch, COL_CLASS, &DataType::Float64)?;

    let sites = sites.as_string::<i32>();
    let boosters = boosters.as_string::<i32>();
    let payloads = payloads.as_primitive::<Float64Type>();
    let classes = classes.as_primitive::<Float64Type>();

    for i in 0..batch.num_rows() {
        let row = offset + i + 1;
        let null_check = |col: &dyn Array, name: &'static str| {
            if col.is_null(i) {
                Err(invalid(row, name, "null"))
            } else {
                Ok(())
            }
        };
        null_check(sites, COL_LAUNCH_SITE)?;
        null_check(boosters, COL_BOOSTER_CATEGORY)?;
        null_check(payloads, COL_PAYLOAD_MASS)?;
        null_check(classes, COL_CLASS)?;

        let payload = payloads.value(i);
        records.push(LaunchRecord {
            launch_site: sites.value(i).trim().to_string(),
            payload_mass_kg: check_payload(payload)
                .ok_or_else(|| invalid(row, COL_PAYLOAD_MASS, &payload.to_string()))?,
            booster_version_category: boosters.value(i).trim().to_string(),
            outcome: class_from_f64(classes.value(i), row)?,
        });
    }

    Ok(())
}

/// Look up a column by name and cast it to the type the loader reads.
fn column_as(batch: &RecordBatch, name: &str, to: &DataType) -> Result<ArrayRef> {
    let col = batch
        .column_by_name(name)
        .ok_or_else(|| LoadError::MissingColumn(name.to_string()))?;
    Ok(cast(col, to)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;
    use tempfile::{Builder, NamedTempFile};

    use super::*;

    fn temp_with(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const SAMPLE_CSV: &str = "\
,Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category
0,1,CCAFS LC-40,0,0.0,F9 v1.0  B0003,v1.0
1,2,CCAFS LC-40,0,525.0,F9 v1.0  B0004,v1.0
2,3,VAFB SLC-4E,1,500.0,F9 v1.1  B1003,v1.1
3,4,KSC LC-39A,1,2490.0,F9 FT B1031.1,FT
";

    #[test]
    fn loads_csv_with_extra_columns() {
        let file = temp_with(".csv", SAMPLE_CSV);
        let table = load_file(file.path()).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.sites(), ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A"]);
        assert_eq!(table.min_payload(), Some(0.0));
        assert_eq!(table.max_payload(), Some(2490.0));

        let first = &table.records()[2];
        assert_eq!(first.launch_site, "VAFB SLC-4E");
        assert_eq!(first.payload_mass_kg, 500.0);
        assert_eq!(first.booster_version_category, "v1.1");
        assert_eq!(first.outcome, Outcome::Success);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_file(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let file = temp_with(".csv", "Launch Site,class,Payload Mass (kg)\nA,1,10\n");
        let err = load_file(file.path()).unwrap_err();
        match err {
            LoadError::MissingColumn(col) => assert_eq!(col, COL_BOOSTER_CATEGORY),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_class_outside_zero_one() {
        let file = temp_with(
            ".csv",
            "Launch Site,class,Payload Mass (kg),Booster Version Category\nA,2,10,FT\n",
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidValue { row: 1, column: COL_CLASS, .. }
        ));
    }

    #[test]
    fn rejects_negative_payload() {
        let file = temp_with(
            ".csv",
            "Launch Site,class,Payload Mass (kg),Booster Version Category\nA,1,10,FT\nB,0,-5,FT\n",
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidValue { row: 2, column: COL_PAYLOAD_MASS, .. }
        ));
    }

    #[test]
    fn invalid_value_message_counts_data_rows_from_one() {
        let file = temp_with(
            ".csv",
            "Launch Site,class,Payload Mass (kg),Booster Version Category\nA,yes,10,FT\n",
        );
        let err = load_file(file.path()).unwrap_err();
        assert_eq!(err.to_string(), "data row 1: invalid class value 'yes'");
    }

    #[test]
    fn json_rows_count_from_one() {
        let file = temp_with(
            ".json",
            r#"[
                {"Launch Site": "A", "Payload Mass (kg)": 500, "Booster Version Category": "FT", "class": 1},
                {"Launch Site": "B", "Payload Mass (kg)": -1, "Booster Version Category": "FT", "class": 1}
            ]"#,
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidValue { row: 2, column: COL_PAYLOAD_MASS, .. }
        ));
    }

    #[test]
    fn accepts_float_class() {
        let file = temp_with(
            ".csv",
            "Launch Site,class,Payload Mass (kg),Booster Version Category\nA,1.0,10,FT\n",
        );
        let table = load_file(file.path()).unwrap();
        assert_eq!(table.records()[0].outcome, Outcome::Success);
    }

    #[test]
    fn header_only_csv_is_an_empty_table() {
        let file = temp_with(
            ".csv",
            "Launch Site,class,Payload Mass (kg),Booster Version Category\n",
        );
        let table = load_file(file.path()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn loads_records_oriented_json() {
        let file = temp_with(
            ".json",
            r#"[
                {"Launch Site": "A", "Payload Mass (kg)": 500, "Booster Version Category": "FT", "class": 1},
                {"Launch Site": "B", "Payload Mass (kg)": 3000.5, "Booster Version Category": "B4", "class": 0.0}
            ]"#,
        );
        let table = load_file(file.path()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[1].payload_mass_kg, 3000.5);
        assert_eq!(table.records()[1].outcome, Outcome::Failure);
    }

    #[test]
    fn json_without_required_key_fails() {
        let file = temp_with(
            ".json",
            r#"[{"Launch Site": "A", "Payload Mass (kg)": 500, "class": 1}]"#,
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(_)));
    }

    #[test]
    fn json_must_be_an_array() {
        let file = temp_with(".json", r#"{"Launch Site": "A"}"#);
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn loads_parquet_with_integer_columns() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_LAUNCH_SITE, DataType::Utf8, false),
            Field::new(COL_PAYLOAD_MASS, DataType::Int64, false),
            Field::new(COL_BOOSTER_CATEGORY, DataType::Utf8, false),
            Field::new(COL_CLASS, DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["A", "B"])),
                Arc::new(Int64Array::from(vec![500, 9000])),
                Arc::new(StringArray::from(vec!["FT", "B5"])),
                Arc::new(Int64Array::from(vec![1, 0])),
            ],
        )
        .unwrap();

        let file = Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.sites(), ["A", "B"]);
        assert_eq!(table.records()[1].payload_mass_kg, 9000.0);
        assert_eq!(table.records()[1].outcome, Outcome::Failure);
    }

    #[test]
    fn parquet_rejects_bad_class() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_LAUNCH_SITE, DataType::Utf8, false),
            Field::new(COL_PAYLOAD_MASS, DataType::Float64, false),
            Field::new(COL_BOOSTER_CATEGORY, DataType::Utf8, false),
            Field::new(COL_CLASS, DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["A"])),
                Arc::new(Float64Array::from(vec![500.0])),
                Arc::new(StringArray::from(vec!["FT"])),
                Arc::new(Float64Array::from(vec![0.5])),
            ],
        )
        .unwrap();

        let file = Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidValue { column: COL_CLASS, .. }
        ));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let file = temp_with(".xlsx", "");
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }
}
