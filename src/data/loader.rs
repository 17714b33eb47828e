use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Date32Array, Date64Array, Float32Array, Float64Array,
    Int32Array, Int64Array, TimestampMicrosecondArray, TimestampMillisecondArray,
    TimestampNanosecondArray, TimestampSecondArray,
};
use arrow::datatypes::{DataType, TimeUnit};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Column, Table};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and validate the crime/CPI table.
///
/// Read and parse failures become [`DashboardError::DataLoad`]; a table that
/// parses but lacks a required numeric column is an
/// [`DashboardError::InvalidColumn`].
pub fn load_table(path: &Path) -> Result<Table> {
    let table = load_file(path).map_err(|e| DashboardError::DataLoad {
        path: path.to_path_buf(),
        reason: format!("{e:#}"),
    })?;
    table.validate()?;

    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        table.height(),
        table.column_names(),
        path.display()
    );
    Ok(table)
}

/// Parse a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line
/// * `.json`    – `[{ "Date": 2020, "CPI": 258.8, ... }, ...]`
/// * `.parquet` – flat scalar columns
pub fn load_file(path: &Path) -> anyhow::Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> anyhow::Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(CellValue::guess).collect());
    }

    Table::from_rows(&headers, rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Date": 2019, "CPI": 255.7, "Violent": 1203808, ... },
///   ...
/// ]
/// ```
///
/// A key missing from a record reads as null.
fn load_json(path: &Path) -> anyhow::Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Table::from_rows(&headers, rows)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::String(s) => CellValue::guess(s),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per table column.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).  Date and timestamp columns become
/// [`CellValue::Date`].
fn load_parquet(path: &Path) -> anyhow::Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<Column> = headers
        .iter()
        .map(|h| Column::new(h.clone(), Vec::new()))
        .collect();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, column) in columns.iter_mut().enumerate() {
            let array = batch.column(col_idx);
            for row in 0..batch.num_rows() {
                let cell = extract_cell(array, row)
                    .with_context(|| format!("column '{}', row {row}", column.name))?;
                column.cells.push(cell);
            }
        }
    }

    Table::from_columns(columns)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> anyhow::Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }

    fn downcast<'a, T: 'static>(col: &'a Arc<dyn Array>) -> anyhow::Result<&'a T> {
        col.as_any()
            .downcast_ref::<T>()
            .with_context(|| format!("unexpected array for {:?}", col.data_type()))
    }

    let cell = match col.data_type() {
        DataType::Utf8 => CellValue::guess(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => CellValue::guess(col.as_string::<i64>().value(row)),
        DataType::Int32 => CellValue::Integer(downcast::<Int32Array>(col)?.value(row) as i64),
        DataType::Int64 => CellValue::Integer(downcast::<Int64Array>(col)?.value(row)),
        DataType::Float32 => CellValue::Float(downcast::<Float32Array>(col)?.value(row) as f64),
        DataType::Float64 => CellValue::Float(downcast::<Float64Array>(col)?.value(row)),
        DataType::Boolean => {
            CellValue::Text(downcast::<BooleanArray>(col)?.value(row).to_string())
        }
        DataType::Date32 => date_cell(downcast::<Date32Array>(col)?.value_as_date(row)),
        DataType::Date64 => date_cell(downcast::<Date64Array>(col)?.value_as_date(row)),
        DataType::Timestamp(unit, _) => {
            let datetime = match unit {
                TimeUnit::Second => downcast::<TimestampSecondArray>(col)?.value_as_datetime(row),
                TimeUnit::Millisecond => {
                    downcast::<TimestampMillisecondArray>(col)?.value_as_datetime(row)
                }
                TimeUnit::Microsecond => {
                    downcast::<TimestampMicrosecondArray>(col)?.value_as_datetime(row)
                }
                TimeUnit::Nanosecond => {
                    downcast::<TimestampNanosecondArray>(col)?.value_as_datetime(row)
                }
            };
            date_cell(datetime)
        }
        other => bail!("unsupported parquet column type {other:?}"),
    };
    Ok(cell)
}

fn date_cell<D: std::fmt::Display>(value: Option<D>) -> CellValue {
    value
        .map(|d| CellValue::Date(d.to_string()))
        .unwrap_or(CellValue::Null)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::charts::ChartKind;
    use crate::data::model::{DATE_COLUMN, NUMERIC_COLUMNS};
    use crate::selection::{SelectionKey, dispatch};

    fn header() -> String {
        let mut cols = vec!["Date".to_string()];
        cols.extend(NUMERIC_COLUMNS.iter().map(|c| c.to_string()));
        cols.join(",")
    }

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_valid_csv() {
        let csv = format!(
            "{}\n2020,258.8,1,2,3,4,5,6,7,8,9,10\n2021,271.0,2,3,4,5,6,7,8,9,10,11\n",
            header()
        );
        let file = write_temp(".csv", &csv);
        let table = load_table(file.path()).unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(
            table.numeric("CPI").unwrap(),
            vec![Some(258.8), Some(271.0)]
        );
    }

    #[test]
    fn csv_without_murder_is_invalid_column() {
        let csv = "Date,CPI,Violent,Property\n2020,1,2,3\n";
        let file = write_temp(".csv", csv);
        let err = load_table(file.path()).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::InvalidColumn { ref column, .. } if column == "Murder"
        ));
    }

    #[test]
    fn missing_file_is_data_load_error() {
        let err = load_table(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::DataLoad { .. }));
    }

    #[test]
    fn unsupported_extension_is_data_load_error() {
        let file = write_temp(".xlsx", "whatever");
        let err = load_table(file.path()).unwrap_err();
        assert!(matches!(err, DashboardError::DataLoad { .. }));
    }

    #[test]
    fn malformed_csv_is_data_load_error() {
        let csv = format!("{}\n2020,1,2\n", header());
        let file = write_temp(".csv", &csv);
        let err = load_table(file.path()).unwrap_err();
        assert!(matches!(err, DashboardError::DataLoad { .. }));
    }

    #[test]
    fn json_records_match_csv() {
        let csv = format!("{}\n2020,258.8,1,2,3,4,5,6,7,8,9,10\n", header());
        let csv_file = write_temp(".csv", &csv);

        let mut record = serde_json::Map::new();
        record.insert("Date".into(), 2020.into());
        record.insert("CPI".into(), 258.8.into());
        for (i, name) in NUMERIC_COLUMNS.iter().enumerate().skip(1) {
            record.insert(name.to_string(), (i as i64).into());
        }
        let json = serde_json::to_string(&vec![JsonValue::Object(record)]).unwrap();
        let json_file = write_temp(".json", &json);

        let from_csv = load_table(csv_file.path()).unwrap();
        let from_json = load_table(json_file.path()).unwrap();
        for name in NUMERIC_COLUMNS {
            assert_eq!(
                from_csv.numeric(name).unwrap(),
                from_json.numeric(name).unwrap(),
                "{name}"
            );
        }
    }

    fn write_parquet(batch: &RecordBatch) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new()
            .suffix(".parquet")
            .tempfile()
            .unwrap();
        let mut writer =
            ArrowWriter::try_new(file.reopen().unwrap(), batch.schema(), None).unwrap();
        writer.write(batch).unwrap();
        writer.close().unwrap();
        file
    }

    #[test]
    fn parquet_matches_csv() {
        let csv = format!(
            "{}\n2020,258.8,1,2,3,4,5,6,7,8,9,10\n2021,271.0,2,3,4,5,6,7,8,9,10,11\n",
            header()
        );
        let csv_file = write_temp(".csv", &csv);

        let mut fields = vec![
            Field::new("Date", DataType::Int64, false),
            Field::new("CPI", DataType::Float64, false),
        ];
        let mut arrays: Vec<Arc<dyn Array>> = vec![
            Arc::new(Int64Array::from(vec![2020, 2021])),
            Arc::new(Float64Array::from(vec![258.8, 271.0])),
        ];
        for (k, name) in NUMERIC_COLUMNS.iter().enumerate().skip(1) {
            let k = k as i64;
            fields.push(Field::new(*name, DataType::Int64, false));
            arrays.push(Arc::new(Int64Array::from(vec![k, k + 1])));
        }
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap();
        let parquet_file = write_parquet(&batch);

        let from_csv = load_table(csv_file.path()).unwrap();
        let from_parquet = load_table(parquet_file.path()).unwrap();
        assert_eq!(from_csv.height(), from_parquet.height());
        for name in NUMERIC_COLUMNS.iter().copied().chain([DATE_COLUMN]) {
            assert_eq!(
                from_csv.numeric(name).unwrap(),
                from_parquet.numeric(name).unwrap(),
                "{name}"
            );
        }
    }

    #[test]
    fn parquet_string_dates_and_nulls_load() {
        let mut fields = vec![Field::new("Date", DataType::Utf8, false)];
        let mut arrays: Vec<Arc<dyn Array>> =
            vec![Arc::new(StringArray::from(vec!["2020-01-01", "2021-01-01"]))];
        fields.push(Field::new("CPI", DataType::Float64, false));
        arrays.push(Arc::new(Float64Array::from(vec![258.8, 271.0])));
        for name in NUMERIC_COLUMNS.iter().skip(1) {
            fields.push(Field::new(*name, DataType::Int64, true));
            arrays.push(Arc::new(Int64Array::from(vec![Some(1), None])));
        }
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap();
        let file = write_parquet(&batch);

        let table = load_table(file.path()).unwrap();
        assert_eq!(table.numeric("Date").unwrap(), vec![Some(2020.0), Some(2021.0)]);
        assert_eq!(table.numeric("Murder").unwrap(), vec![Some(1.0), None]);
    }

    #[test]
    fn csv_text_dates_load_and_plot() {
        let csv = format!(
            "{}\n01/15/2020,258.8,1,2,3,4,5,6,7,8,9,10\nJan 2021,271.0,2,3,4,5,6,7,8,9,10,11\n",
            header()
        );
        let file = write_temp(".csv", &csv);
        let table = load_table(file.path()).unwrap();
        assert_eq!(
            table.column(DATE_COLUMN).unwrap().cells,
            vec![
                CellValue::Date("01/15/2020".into()),
                CellValue::Text("Jan 2021".into()),
            ]
        );

        let chart = dispatch(&table, SelectionKey::first()).unwrap();
        let ChartKind::Line {
            points,
            x_categories,
        } = chart.kind
        else {
            panic!("expected line chart");
        };
        assert_eq!(points, vec![[0.0, 258.8], [1.0, 271.0]]);
        assert_eq!(x_categories, vec!["01/15/2020", "Jan 2021"]);
    }

    #[test]
    fn csv_missing_value_tokens_are_null() {
        let csv = format!(
            "{}\n2020,258.8,1,2,3,NA,5,6,7,8,9,10\n2021,N/A,2,3,4,5,6,7,8,9,10,null\n",
            header()
        );
        let file = write_temp(".csv", &csv);
        let table = load_table(file.path()).unwrap();
        assert_eq!(table.numeric("Rape").unwrap(), vec![None, Some(5.0)]);
        assert_eq!(table.numeric("CPI").unwrap(), vec![Some(258.8), None]);
        assert_eq!(table.numeric("Total").unwrap(), vec![Some(10.0), None]);
    }
}
