use std::fmt;
use std::sync::Arc;

use super::error::LoadError;

// ---------------------------------------------------------------------------
// Column – the fixed telemetry schema
// ---------------------------------------------------------------------------

/// One column of the telemetry CSV, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Time,
    BatteryVoltage,
    BatteryCurrent,
    BatteryPower,
    Torque,
    Cadence,
    RiderPower,
    RideDistance,
    Speed,
    ErrorCode,
}

impl Column {
    /// Every column of the schema, in header order.
    pub const ALL: [Column; 10] = [
        Column::Time,
        Column::BatteryVoltage,
        Column::BatteryCurrent,
        Column::BatteryPower,
        Column::Torque,
        Column::Cadence,
        Column::RiderPower,
        Column::RideDistance,
        Column::Speed,
        Column::ErrorCode,
    ];

    /// Columns that can be plotted against Time.
    pub const METRICS: [Column; 8] = [
        Column::BatteryVoltage,
        Column::BatteryCurrent,
        Column::BatteryPower,
        Column::Torque,
        Column::Cadence,
        Column::RiderPower,
        Column::RideDistance,
        Column::Speed,
    ];

    /// Exact header name in the CSV file.
    pub fn name(self) -> &'static str {
        match self {
            Column::Time => "Time",
            Column::BatteryVoltage => "Battery Voltage",
            Column::BatteryCurrent => "Battery Current",
            Column::BatteryPower => "Battery Power",
            Column::Torque => "Torque",
            Column::Cadence => "Cadence",
            Column::RiderPower => "Rider Power",
            Column::RideDistance => "Ride Distance",
            Column::Speed => "Speed",
            Column::ErrorCode => "Error Code",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Column::Time => "s",
            Column::BatteryVoltage => "V",
            Column::BatteryCurrent => "A",
            Column::BatteryPower | Column::RiderPower => "W",
            Column::Torque => "Nm",
            Column::Cadence => "rpm",
            Column::RideDistance => "km",
            Column::Speed => "km/h",
            Column::ErrorCode => "",
        }
    }

    pub fn is_numeric(self) -> bool {
        self != Column::ErrorCode
    }

    /// Resolve an exact header name.
    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Axis / legend label, e.g. `Battery Power (W)`.
    pub fn label(self) -> String {
        match self.unit() {
            "" => self.name().to_string(),
            unit => format!("{} ({unit})", self.name()),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// ErrorCode – the controller status flag
// ---------------------------------------------------------------------------

/// Status flag reported by the controller for a sample.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Code(i64),
    Status(String),
    Missing,
}

impl ErrorCode {
    /// Interpret a raw cell. Integral floats (`"0.0"`) count as codes since
    /// Pandas writes integer columns with NaNs that way.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return ErrorCode::Missing;
        }
        if let Ok(i) = s.parse::<i64>() {
            return ErrorCode::Code(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                return ErrorCode::Code(f as i64);
            }
        }
        ErrorCode::Status(s.to_string())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Code(c) => write!(f, "{c}"),
            ErrorCode::Status(s) => write!(f, "{s}"),
            ErrorCode::Missing => write!(f, "<none>"),
        }
    }
}

// ---------------------------------------------------------------------------
// TestRecord – one sampled instant
// ---------------------------------------------------------------------------

/// A single telemetry sample (one row of the source file).
#[derive(Debug, Clone, PartialEq)]
pub struct TestRecord {
    /// Seconds since the start of the test.
    pub time: f64,
    pub battery_voltage: f64,
    pub battery_current: f64,
    /// Voltage × current, computed upstream.
    pub battery_power: f64,
    pub torque: f64,
    pub cadence: f64,
    pub rider_power: f64,
    /// Cumulative, non-decreasing.
    pub ride_distance: f64,
    pub speed: f64,
    pub error_code: ErrorCode,
}

impl TestRecord {
    /// Numeric value of `column`, `None` for the non-numeric Error Code.
    pub fn value(&self, column: Column) -> Option<f64> {
        let v = match column {
            Column::Time => self.time,
            Column::BatteryVoltage => self.battery_voltage,
            Column::BatteryCurrent => self.battery_current,
            Column::BatteryPower => self.battery_power,
            Column::Torque => self.torque,
            Column::Cadence => self.cadence,
            Column::RiderPower => self.rider_power,
            Column::RideDistance => self.ride_distance,
            Column::Speed => self.speed,
            Column::ErrorCode => return None,
        };
        Some(v)
    }
}

// ---------------------------------------------------------------------------
// TimeRange – closed interval in seconds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Self {
        TimeRange { start, end }
    }

    /// False for `start > end` or NaN bounds.
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }

    /// Clamp both bounds into `outer`.
    pub fn clamped_to(&self, outer: TimeRange) -> TimeRange {
        TimeRange {
            start: self.start.clamp(outer.start, outer.end),
            end: self.end.clamp(outer.start, outer.end),
        }
    }
}

// ---------------------------------------------------------------------------
// TelemetryTable – the immutable loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed file. Time is strictly ascending and every numeric value
/// is finite; both are checked once in [`TelemetryTable::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryTable {
    records: Vec<TestRecord>,
}

impl TelemetryTable {
    /// Validate and wrap loaded records. `row` numbers in errors are 1-based
    /// data rows (the header is not counted).
    pub fn new(records: Vec<TestRecord>) -> Result<Self, LoadError> {
        for (i, rec) in records.iter().enumerate() {
            for column in Column::ALL {
                if let Some(v) = rec.value(column) {
                    if !v.is_finite() {
                        return Err(LoadError::Parse {
                            row: i + 1,
                            column: column.name().to_string(),
                            value: v.to_string(),
                        });
                    }
                }
            }
            if i > 0 && rec.time <= records[i - 1].time {
                return Err(LoadError::UnsortedTime { row: i + 1 });
            }
        }
        Ok(TelemetryTable { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }

    /// First and last Time, `None` for an empty table.
    pub fn time_bounds(&self) -> Option<TimeRange> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some(TimeRange::new(first.time, last.time))
    }

    /// Values of a numeric column in row order (empty for Error Code).
    pub fn column(&self, column: Column) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().filter_map(move |r| r.value(column))
    }

    /// True when a numeric column is zero in every row of a non-empty table.
    pub fn all_zero(&self, column: Column) -> bool {
        column.is_numeric() && !self.is_empty() && self.column(column).all(|v| v == 0.0)
    }
}

// ---------------------------------------------------------------------------
// TelemetryView – a derived row selection over a shared table
// ---------------------------------------------------------------------------

/// Ordered subset of rows of a shared [`TelemetryTable`].
///
/// Filtering and downsampling produce new views; the table itself is never
/// touched.
#[derive(Debug, Clone)]
pub struct TelemetryView {
    table: Arc<TelemetryTable>,
    rows: Vec<usize>,
}

impl TelemetryView {
    /// `rows` must be ascending indices into `table`.
    pub(crate) fn new(table: Arc<TelemetryTable>, rows: Vec<usize>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(rows.last().map_or(true, |&i| i < table.len()));
        TelemetryView { table, rows }
    }

    pub fn table(&self) -> &Arc<TelemetryTable> {
        &self.table
    }

    pub fn row_indices(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &TestRecord> + '_ {
        self.rows.iter().map(move |&i| &self.table.records()[i])
    }

    pub fn first(&self) -> Option<&TestRecord> {
        self.rows.first().map(|&i| &self.table.records()[i])
    }

    pub fn last(&self) -> Option<&TestRecord> {
        self.rows.last().map(|&i| &self.table.records()[i])
    }

    pub fn column(&self, column: Column) -> impl Iterator<Item = f64> + '_ {
        self.records().filter_map(move |r| r.value(column))
    }

    /// `[time, value]` pairs for plotting.
    pub fn points(&self, column: Column) -> Vec<[f64; 2]> {
        self.records()
            .filter_map(|r| r.value(column).map(|v| [r.time, v]))
            .collect()
    }
}

impl PartialEq for TelemetryView {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.table, &other.table) || self.table == other.table)
            && self.rows == other.rows
    }
}
