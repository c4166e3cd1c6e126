use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use crate::error::DataError;

use super::model::{Dataset, RawRow};

/// Cell contents treated as a missing value. Any other spelling that
/// parses to NaN or an infinity (`NAN`, `inf`, `-Infinity`) is missing too.
pub const NA_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>", "#N/A",
];

/// The seven source columns, in `RawRow` field order, with accepted aliases.
const REQUIRED_COLUMNS: [&[&str]; 7] = [
    &["fileNumber", "file_number"],
    &["cycle_number"],
    &["latitude"],
    &["longitude"],
    &["pres"],
    &["temp"],
    &["psal"],
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a float dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one reading per line
/// * `.json`    – `[{ "fileNumber": ..., "cycle_number": ..., ... }, ...]`
/// * `.parquet` – one column per field, numeric or text
///
/// Rows with a missing value in any column are dropped; the remaining rows
/// are augmented with the derived quantities.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV file")?;
            load_csv(file)?
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            load_json(&text)?
        }
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataError::UnsupportedFormat(other.to_string()).into()),
    };

    log::info!(
        "Loaded {} rows ({} incomplete rows dropped, {} floats) from {}",
        dataset.len(),
        dataset.dropped_rows(),
        dataset.float_ids().len(),
        path.display()
    );
    Ok(dataset)
}

/// Coerce a text cell to a finite number. Missing values are not numbers.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if is_missing(s) {
        return None;
    }
    s.parse::<f64>().ok()
}

fn is_missing(s: &str) -> bool {
    let s = s.trim();
    NA_TOKENS.contains(&s) || s.parse::<f64>().is_ok_and(|v| !v.is_finite())
}

// ---------------------------------------------------------------------------
// Shared row assembly
// ---------------------------------------------------------------------------

/// Accumulates complete rows and counts the incomplete ones.
#[derive(Default)]
struct RowCollector {
    rows: Vec<RawRow>,
    dropped: usize,
}

impl RowCollector {
    fn drop_row(&mut self) {
        self.dropped += 1;
    }

    /// `values` holds the seven required cells in `REQUIRED_COLUMNS` order.
    fn push(&mut self, values: [f64; 7]) {
        let [file_number, cycle_number, latitude, longitude, pres, temp, psal] = values;
        self.rows.push(RawRow {
            file_number,
            cycle_number,
            latitude,
            longitude,
            pres,
            temp,
            psal,
        });
    }

    fn finish(self) -> Dataset {
        if self.dropped > 0 {
            log::debug!("Dropped {} rows with missing values", self.dropped);
        }
        Dataset::new(self.rows, self.dropped)
    }
}

/// Locate the required columns among `names`; returns their positions.
fn resolve_columns<S: AsRef<str>>(names: &[S]) -> Result<[usize; 7], DataError> {
    let mut positions = [0usize; 7];
    for (slot, aliases) in REQUIRED_COLUMNS.iter().enumerate() {
        positions[slot] = names
            .iter()
            .position(|n| aliases.contains(&n.as_ref().trim()))
            .ok_or_else(|| DataError::MissingColumn(aliases[0].to_string()))?;
    }
    Ok(positions)
}

fn not_numeric(row: usize, column: &str, value: impl ToString) -> DataError {
    DataError::NotNumeric {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one reading per record.
/// Short records are padded with missing values (and therefore dropped).
pub fn load_csv<R: Read>(source: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(source);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let positions = resolve_columns(&headers[..])?;

    let mut collector = RowCollector::default();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let incomplete = record.len() < headers.len() || record.iter().any(is_missing);
        if incomplete {
            collector.drop_row();
            continue;
        }

        let mut values = [0.0; 7];
        for (slot, &col) in positions.iter().enumerate() {
            let cell = record.get(col).unwrap_or("");
            values[slot] =
                parse_number(cell).ok_or_else(|| not_numeric(row_no, &headers[col], cell))?;
        }
        collector.push(values);
    }

    Ok(collector.finish())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "fileNumber": 6901234, "cycle_number": 1, "latitude": 71.2,
///     "longitude": 64.9, "pres": 5.0, "temp": -1.1, "psal": 33.8 },
///   ...
/// ]
/// ```
///
/// A key present in some records but absent or `null` in another makes that
/// record incomplete.
pub fn load_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root
        .as_array()
        .ok_or_else(|| DataError::Malformed("expected a top-level JSON array".to_string()))?;

    let objects: Vec<&Map<String, JsonValue>> = records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            rec.as_object()
                .ok_or_else(|| DataError::Malformed(format!("row {i} is not a JSON object")))
        })
        .collect::<Result<_, _>>()?;

    // The column set is the union of keys, in first-seen order.
    let mut columns: Vec<&str> = Vec::new();
    for obj in &objects {
        for key in obj.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }
    let positions = resolve_columns(&columns[..])?;

    let mut collector = RowCollector::default();

    for (row_no, obj) in objects.iter().enumerate() {
        let incomplete = columns.iter().any(|c| match obj.get(*c) {
            None | Some(JsonValue::Null) => true,
            Some(JsonValue::String(s)) => is_missing(s),
            Some(_) => false,
        });
        if incomplete {
            collector.drop_row();
            continue;
        }

        let mut values = [0.0; 7];
        for (slot, &col) in positions.iter().enumerate() {
            let name = columns[col];
            let cell = &obj[name];
            let number = match cell {
                JsonValue::Number(n) => n.as_f64(),
                JsonValue::String(s) => parse_number(s),
                _ => None,
            };
            values[slot] = number.ok_or_else(|| not_numeric(row_no, name, cell))?;
        }
        collector.push(values);
    }

    Ok(collector.finish())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Numeric columns may be Int32, Int64, Float32 or Float64; text columns are
/// coerced like CSV cells. A null, NaN or infinity in any column drops the
/// row.
pub fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut collector = RowCollector::default();
    let mut row_offset = 0usize;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        let positions = resolve_columns(&names[..])?;

        for row in 0..batch.num_rows() {
            let row_no = row_offset + row;
            let incomplete = batch
                .columns()
                .iter()
                .any(|col| {
                    col.is_null(row)
                        || non_finite_cell(col, row)
                        || text_cell(col, row).is_some_and(is_missing)
                });
            if incomplete {
                collector.drop_row();
                continue;
            }

            let mut values = [0.0; 7];
            for (slot, &col) in positions.iter().enumerate() {
                values[slot] = numeric_cell(batch.column(col), row, row_no, names[col])?;
            }
            collector.push(values);
        }
        row_offset += batch.num_rows();
    }

    Ok(collector.finish())
}

// -- Parquet / Arrow helpers --

fn text_cell(col: &ArrayRef, row: usize) -> Option<&str> {
    match col.data_type() {
        DataType::Utf8 => Some(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row)),
        _ => None,
    }
}

/// Float cells can hold NaN or an infinity without being null.
fn non_finite_cell(col: &ArrayRef, row: usize) -> bool {
    match col.data_type() {
        DataType::Float64 => !col.as_primitive::<Float64Type>().value(row).is_finite(),
        DataType::Float32 => !col.as_primitive::<Float32Type>().value(row).is_finite(),
        _ => false,
    }
}

/// Read a non-null, finite cell as `f64`.
fn numeric_cell(col: &ArrayRef, row: usize, row_no: usize, name: &str) -> Result<f64, DataError> {
    match col.data_type() {
        DataType::Float64 => Ok(col.as_primitive::<Float64Type>().value(row)),
        DataType::Float32 => Ok(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Int64 => Ok(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Int32 => Ok(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Utf8 | DataType::LargeUtf8 => {
            let text = text_cell(col, row).unwrap_or("");
            parse_number(text).ok_or_else(|| not_numeric(row_no, name, text))
        }
        other => Err(DataError::Malformed(format!(
            "column '{name}' has unsupported type {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use arrow::array::{Float32Array, Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    const HEADER: &str = "fileNumber,cycle_number,latitude,longitude,pres,temp,psal\n";

    fn csv(body: &str) -> Result<Dataset> {
        load_csv(Cursor::new(format!("{HEADER}{body}")))
    }

    #[test]
    fn csv_drops_row_with_missing_temp() {
        let ds = csv(
            "6901234,1,71.1,64.2,5.0,-1.1,33.8\n\
             6901234,1,71.1,64.2,10.0,,33.9\n\
             6901234,2,71.3,64.5,5.0,-0.9,33.7\n",
        )
        .unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.dropped_rows(), 1);
        assert_eq!(ds.rows()[1].cycle_number, 2.0);
    }

    #[test]
    fn csv_missing_tokens_and_short_rows_are_dropped() {
        let ds = csv(
            "1,1,70,60,5,2.0,NaN\n\
             1,1,70,60,5,2.0,NA\n\
             1,1,70,60,5\n\
             1,1,70,60,5,2.0,34.0\n",
        )
        .unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.dropped_rows(), 3);
    }

    #[test]
    fn csv_nan_and_infinity_spellings_are_dropped() {
        let ds = csv(
            "1,1,70,60,5,2.0,NAN\n\
             1,1,70,60,5,Nan,34.0\n\
             1,1,70,60,5,inf,34.0\n\
             1,1,70,60,5,2.0,-Infinity\n\
             1,INF,70,60,5,2.0,34.0\n\
             1,2,70,60,5,2.0,34.0\n",
        )
        .unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.dropped_rows(), 5);
        let row = &ds.rows()[0];
        assert_eq!(row.cycle_number, 2.0);
        assert!(row.speed_of_sound().is_finite());
    }

    #[test]
    fn non_finite_text_is_not_a_number() {
        assert_eq!(parse_number(" 3.5 "), Some(3.5));
        assert_eq!(parse_number("NAN"), None);
        assert_eq!(parse_number("infinity"), None);
    }

    #[test]
    fn json_nan_string_is_dropped() {
        let ds = load_json(
            r#"[
                {"fileNumber": 1, "cycle_number": 1, "latitude": 70.5, "longitude": 60.0, "pres": 5, "temp": "NAN", "psal": 34.0},
                {"fileNumber": 1, "cycle_number": 2, "latitude": 70.6, "longitude": 60.1, "pres": 5, "temp": 2.0, "psal": "inf"},
                {"fileNumber": 1, "cycle_number": 3, "latitude": 70.7, "longitude": 60.2, "pres": 5, "temp": 2.0, "psal": "34.0"}
            ]"#,
        )
        .unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.dropped_rows(), 2);
    }

    #[test]
    fn csv_extra_columns_take_part_in_drop_rule() {
        let text = "platform,fileNumber,cycle_number,latitude,longitude,pres,temp,psal\n\
                    A,1,1,70,60,5,2.0,34.0\n\
                    ,1,2,70,60,5,2.0,34.0\n";
        let ds = load_csv(Cursor::new(text)).unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn csv_non_numeric_value_is_format_error() {
        let err = csv("1,1,70,60,5,warm,34.0\n").unwrap_err();
        match err.downcast_ref::<DataError>() {
            Some(DataError::NotNumeric { row, column, value }) => {
                assert_eq!(*row, 0);
                assert_eq!(column, "temp");
                assert_eq!(value, "warm");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn csv_missing_column_is_format_error() {
        let err = load_csv(Cursor::new("fileNumber,cycle_number,latitude\n1,1,70\n")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::MissingColumn("longitude".to_string()))
        );
    }

    #[test]
    fn csv_accepts_snake_case_file_number() {
        let text = "file_number,cycle_number,latitude,longitude,pres,temp,psal\n3,1,70,60,5,2,34\n";
        let ds = load_csv(Cursor::new(text)).unwrap();
        assert_eq!(ds.float_ids(), &[3.0]);
    }

    #[test]
    fn csv_rows_are_augmented() {
        let ds = csv("1,1,70,60,0,10,35\n").unwrap();
        assert!((ds.rows()[0].anomaly_density() - 26.929).abs() < 1e-9);
    }

    #[test]
    fn json_records() {
        let ds = load_json(
            r#"[
                {"fileNumber": 1, "cycle_number": 1, "latitude": 70.5, "longitude": 60.0, "pres": 5, "temp": 2.0, "psal": 34.0},
                {"fileNumber": 1, "cycle_number": 2, "latitude": 70.6, "longitude": 60.1, "pres": 5, "temp": null, "psal": 34.0},
                {"fileNumber": "2", "cycle_number": 1, "latitude": 71.0, "longitude": 61.0, "pres": 5, "temp": 1.5, "psal": 34.2},
                {"fileNumber": 2, "cycle_number": 2, "latitude": 71.1, "longitude": 61.1, "pres": 5, "temp": 1.4}
            ]"#,
        )
        .unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.dropped_rows(), 2);
        assert_eq!(ds.float_ids(), &[1.0, 2.0]);
    }

    #[test]
    fn json_must_be_array_of_objects() {
        let err = load_json(r#"{"fileNumber": 1}"#).unwrap_err();
        assert!(matches!(err.downcast_ref::<DataError>(), Some(DataError::Malformed(_))));

        let err = load_json("[1, 2]").unwrap_err();
        assert!(matches!(err.downcast_ref::<DataError>(), Some(DataError::Malformed(_))));
    }

    #[test]
    fn json_boolean_is_not_numeric() {
        let err = load_json(
            r#"[{"fileNumber": 1, "cycle_number": 1, "latitude": true, "longitude": 60, "pres": 5, "temp": 2, "psal": 34}]"#,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::NotNumeric { column, .. }) if column == "latitude"
        ));
    }

    #[test]
    fn unsupported_extension() {
        let err = load_file(Path::new("floats.xlsx")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::UnsupportedFormat("xlsx".to_string()))
        );
    }

    /// Write `batch` to a temporary Parquet file and load it back.
    fn load_batch(tag: &str, batch: RecordBatch) -> Dataset {
        let path = std::env::temp_dir().join(format!(
            "argo-loader-{tag}-{}.parquet",
            std::process::id()
        ));
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        ds
    }

    #[test]
    fn parquet_round_trip_with_nulls() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("fileNumber", DataType::Int64, false),
            Field::new("cycle_number", DataType::Int64, false),
            Field::new("latitude", DataType::Float64, true),
            Field::new("longitude", DataType::Float64, true),
            Field::new("pres", DataType::Float64, true),
            Field::new("temp", DataType::Float64, true),
            Field::new("psal", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![7, 7, 8])),
                Arc::new(Int64Array::from(vec![1, 2, 1])),
                Arc::new(Float64Array::from(vec![70.0, 70.1, 71.0])),
                Arc::new(Float64Array::from(vec![60.0, 60.1, 61.0])),
                Arc::new(Float64Array::from(vec![Some(5.0), None, Some(5.0)])),
                Arc::new(Float64Array::from(vec![1.0, 1.1, 1.2])),
                Arc::new(StringArray::from(vec!["34.1", "34.2", "34.3"])),
            ],
        )
        .unwrap();

        let ds = load_batch("nulls", batch);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.dropped_rows(), 1);
        assert_eq!(ds.float_ids(), &[7.0, 8.0]);
        assert_eq!(ds.rows()[1].psal, 34.3);
    }

    #[test]
    fn parquet_nan_and_infinity_are_dropped() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("fileNumber", DataType::Int64, false),
            Field::new("cycle_number", DataType::Int64, false),
            Field::new("latitude", DataType::Float64, false),
            Field::new("longitude", DataType::Float64, false),
            Field::new("pres", DataType::Float64, false),
            Field::new("temp", DataType::Float64, false),
            Field::new("psal", DataType::Float32, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![7, 7, 7, 7])),
                Arc::new(Int64Array::from(vec![1, 2, 3, 4])),
                Arc::new(Float64Array::from(vec![70.0, 70.1, 70.2, 70.3])),
                Arc::new(Float64Array::from(vec![60.0, 60.1, 60.2, 60.3])),
                Arc::new(Float64Array::from(vec![5.0, 5.0, 5.0, 5.0])),
                Arc::new(Float64Array::from(vec![1.0, f64::NAN, f64::INFINITY, 1.3])),
                Arc::new(Float32Array::from(vec![f32::NEG_INFINITY, 34.2, 34.3, 34.4])),
            ],
        )
        .unwrap();

        let ds = load_batch("non-finite", batch);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.dropped_rows(), 3);
        let row = &ds.rows()[0];
        assert_eq!(row.cycle_number, 4.0);
        assert!(row.temp.is_finite() && row.psal.is_finite() && row.speed_of_sound().is_finite());
    }
}
