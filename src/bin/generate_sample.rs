use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use powerpedal_dashboard::data::model::Column;

const ROWS: usize = 10_000;
const DT: f64 = 0.1;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One bench run, column-major in schema order (Error Code last).
struct Run {
    numeric: Vec<Vec<f64>>,
    error_code: Vec<i64>,
}

/// Simulate a pedal-assist bench run: torque pulses with each crank stroke,
/// the controller draws current proportional to torque × cadence, and the
/// pack voltage sags under load while slowly discharging. Rider Power and
/// Speed stay at zero, as on the bench rig.
fn simulate(rng: &mut SimpleRng) -> Run {
    let mut numeric = vec![Vec::with_capacity(ROWS); 9];
    let mut error_code = Vec::with_capacity(ROWS);
    let mut distance = 0.0f64;

    for i in 0..ROWS {
        let t = i as f64 * DT;
        let cadence = (65.0 + 12.0 * (t / 45.0).sin() + rng.gauss(0.0, 2.0)).max(0.0);
        let stroke = (t * cadence / 60.0 * std::f64::consts::TAU).sin().abs();
        let torque = (8.0 + 22.0 * stroke + rng.gauss(0.0, 1.5)).max(0.0);
        let current = (torque * cadence / 120.0 + rng.gauss(0.0, 0.3)).clamp(0.0, 25.0);
        let voltage = 42.0 - 6.0 * (t / (ROWS as f64 * DT)) - 0.05 * current + rng.gauss(0.0, 0.02);
        distance += cadence / 60.0 * 2.1 * DT / 1000.0;

        let row = [
            t,
            voltage,
            current,
            voltage * current,
            torque,
            cadence,
            0.0,
            distance,
            0.0,
        ];
        for (col, value) in numeric.iter_mut().zip(row) {
            col.push(value);
        }
        error_code.push(if current >= 20.0 { 3 } else { 0 });
    }

    Run {
        numeric,
        error_code,
    }
}

fn write_csv(run: &Run, path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(Column::ALL.iter().map(|c| c.name()))?;
    for i in 0..ROWS {
        let mut record: Vec<String> = run
            .numeric
            .iter()
            .enumerate()
            .map(|(c, col)| {
                if c == 0 {
                    format!("{:.1}", col[i])
                } else {
                    format!("{:.4}", col[i])
                }
            })
            .collect();
        record.push(run.error_code[i].to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(run: &Run, path: &str) -> Result<()> {
    let mut fields = Vec::new();
    let mut arrays: Vec<ArrayRef> = Vec::new();
    for (column, values) in Column::ALL.iter().zip(&run.numeric) {
        fields.push(Field::new(column.name(), DataType::Float64, false));
        arrays.push(Arc::new(Float64Array::from(values.clone())));
    }
    fields.push(Field::new(Column::ErrorCode.name(), DataType::Int64, false));
    arrays.push(Arc::new(Int64Array::from(run.error_code.clone())));

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let run = simulate(&mut rng);

    let csv_path = "powerpedal_test_results.csv";
    let parquet_path = "powerpedal_test_results.parquet";
    write_csv(&run, csv_path)?;
    write_parquet(&run, parquet_path)?;

    println!("Wrote {ROWS} samples to {csv_path} and {parquet_path}");
    Ok(())
}
