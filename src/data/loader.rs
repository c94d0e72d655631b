use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Schema};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::LoadError;
use super::model::{Column, ErrorCode, TelemetryTable, TestRecord};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a telemetry table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the ten schema columns (any order)
/// * `.parquet` – flat columns with the same names; numeric columns of any
///   integer or float type, `Error Code` as integer or string
pub fn load_file(path: &Path) -> Result<TelemetryTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(open(path)?),
        "parquet" | "pq" => load_parquet(open(path)?),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io(e),
    })
}

/// Position of every schema column in the source, or the list of missing ones.
fn locate_columns(headers: &[String]) -> Result<[usize; 10], LoadError> {
    let mut positions = [0usize; 10];
    let mut missing = Vec::new();
    for column in Column::ALL {
        match headers.iter().position(|h| h == column.name()) {
            Some(idx) => positions[column as usize] = idx,
            None => missing.push(column.name().to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(LoadError::Schema {
            missing,
            found: headers.to_vec(),
        });
    }
    for extra in headers.iter().filter(|h| Column::from_name(h).is_none()) {
        log::warn!("Ignoring unknown column '{extra}'");
    }
    Ok(positions)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: one header row, then one sample per line.
/// Headers and cells are trimmed, so `Time, Battery Voltage, ...` works too.
pub fn load_csv<R: Read>(source: R) -> Result<TelemetryTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let positions = locate_columns(&headers)?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result?;
        let field = |column: Column| record.get(positions[column as usize]).unwrap_or("");
        let number = |column: Column| parse_number(field(column), row, column);

        records.push(TestRecord {
            time: number(Column::Time)?,
            battery_voltage: number(Column::BatteryVoltage)?,
            battery_current: number(Column::BatteryCurrent)?,
            battery_power: number(Column::BatteryPower)?,
            torque: number(Column::Torque)?,
            cadence: number(Column::Cadence)?,
            rider_power: number(Column::RiderPower)?,
            ride_distance: number(Column::RideDistance)?,
            speed: number(Column::Speed)?,
            error_code: ErrorCode::parse(field(Column::ErrorCode)),
        });
    }

    TelemetryTable::new(records)
}

fn parse_number(s: &str, row: usize, column: Column) -> Result<f64, LoadError> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(LoadError::Parse {
            row,
            column: column.name().to_string(),
            value: s.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per schema column.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(file: File) -> Result<TelemetryTable, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let headers = field_names(builder.schema());
    let positions = locate_columns(&headers)?;
    let reader = builder.build()?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let first_row = records.len() + 1;

        // Normalise every numeric column to Float64 and Error Code to Utf8.
        let mut casted: Vec<ArrayRef> = Vec::with_capacity(9);
        for column in Column::ALL.into_iter().filter(|c| c.is_numeric()) {
            casted.push(cast(batch.column(positions[column as usize]), &DataType::Float64)?);
        }
        let numeric: Vec<&Float64Array> = casted
            .iter()
            .map(|a| a.as_primitive::<Float64Type>())
            .collect();
        let codes = cast(
            batch.column(positions[Column::ErrorCode as usize]),
            &DataType::Utf8,
        )?;
        let codes = codes.as_string::<i32>();

        for i in 0..batch.num_rows() {
            let row = first_row + i;
            let mut values = [0.0f64; 9];
            for (slot, (column, array)) in values.iter_mut().zip(
                Column::ALL
                    .into_iter()
                    .filter(|c| c.is_numeric())
                    .zip(&numeric),
            ) {
                if array.is_null(i) {
                    return Err(LoadError::Parse {
                        row,
                        column: column.name().to_string(),
                        value: "null".to_string(),
                    });
                }
                *slot = array.value(i);
            }
            let error_code = if codes.is_null(i) {
                ErrorCode::Missing
            } else {
                ErrorCode::parse(codes.value(i))
            };

            let [
                time,
                battery_voltage,
                battery_current,
                battery_power,
                torque,
                cadence,
                rider_power,
                ride_distance,
                speed,
            ] = values;
            records.push(TestRecord {
                time,
                battery_voltage,
                battery_current,
                battery_power,
                torque,
                cadence,
                rider_power,
                ride_distance,
                speed,
                error_code,
            });
        }
    }

    TelemetryTable::new(records)
}

fn field_names(schema: &Schema) -> Vec<String> {
    schema.fields().iter().map(|f| f.name().clone()).collect()
}
