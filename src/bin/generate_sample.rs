//! Writes a synthetic crime/CPI table as `output.csv` and `output.parquet`.
//!
//! Usage: `generate_sample [OUTPUT_DIR]` (defaults to the current directory).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const FIRST_YEAR: i64 = 1995;
const LAST_YEAR: i64 = 2022;
const POPULATION: f64 = 330_000_000.0;

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

/// (column, count in the first year, yearly drift as a fraction)
const OFFENCES: [(&str, f64, f64); 7] = [
    ("Murder", 21_600.0, -0.008),
    ("Rape", 97_500.0, 0.004),
    ("Robbery", 580_000.0, -0.035),
    ("assault", 1_100_000.0, -0.012),
    ("Burglary", 2_600_000.0, -0.045),
    ("Larceny theft", 7_990_000.0, -0.022),
    ("Vehicle theft", 1_470_000.0, -0.025),
];

struct Sample {
    headers: Vec<String>,
    dates: Vec<i64>,
    cpi: Vec<f64>,
    /// Integer columns in `headers` order after Date and CPI.
    counts: Vec<Vec<i64>>,
    crime_percentage: Vec<f64>,
}

fn generate(rng: &mut SimpleRng) -> Sample {
    let dates: Vec<i64> = (FIRST_YEAR..=LAST_YEAR).collect();

    let mut cpi = Vec::with_capacity(dates.len());
    let mut level = 152.4;
    for _ in &dates {
        cpi.push((level * 10.0_f64).round() / 10.0);
        level *= 1.0 + rng.gauss(0.025, 0.01).max(-0.004);
    }

    let offence_counts: Vec<Vec<i64>> = OFFENCES
        .iter()
        .map(|&(_, base, drift)| {
            dates
                .iter()
                .enumerate()
                .map(|(i, _)| {
                    let trend = base * (1.0 + drift).powi(i as i32);
                    rng.gauss(trend, trend * 0.02).max(0.0).round() as i64
                })
                .collect()
        })
        .collect();

    let sum_rows = |cols: &[Vec<i64>]| -> Vec<i64> {
        (0..dates.len()).map(|i| cols.iter().map(|c| c[i]).sum()).collect()
    };
    let violent = sum_rows(&offence_counts[..4]);
    let property = sum_rows(&offence_counts[4..]);
    let total: Vec<i64> = violent.iter().zip(&property).map(|(v, p)| v + p).collect();
    let crime_percentage = total
        .iter()
        .map(|&t| (t as f64 / POPULATION * 100.0 * 1e4).round() / 1e4)
        .collect();

    let mut headers = vec![
        "Date".to_string(),
        "CPI".to_string(),
        "Violent".to_string(),
        "Property".to_string(),
    ];
    headers.extend(OFFENCES.iter().map(|(name, _, _)| name.to_string()));
    headers.push("Total".to_string());

    let mut counts = vec![violent, property];
    counts.extend(offence_counts);
    counts.push(total);

    Sample {
        headers,
        dates,
        cpi,
        counts,
        crime_percentage,
    }
}

fn write_csv(sample: &Sample, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    let mut header = sample.headers.clone();
    header.push("CrimePercentage".to_string());
    writer.write_record(&header)?;

    for (i, date) in sample.dates.iter().enumerate() {
        let mut record = vec![date.to_string(), sample.cpi[i].to_string()];
        record.extend(sample.counts.iter().map(|c| c[i].to_string()));
        record.push(sample.crime_percentage[i].to_string());
        writer.write_record(&record)?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(sample: &Sample, path: &Path) -> Result<()> {
    let mut fields = vec![
        Field::new("Date", DataType::Int64, false),
        Field::new("CPI", DataType::Float64, false),
    ];
    let mut arrays: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(sample.dates.clone())),
        Arc::new(Float64Array::from(sample.cpi.clone())),
    ];
    for (name, values) in sample.headers[2..].iter().zip(&sample.counts) {
        fields.push(Field::new(name, DataType::Int64, false));
        arrays.push(Arc::new(Int64Array::from(values.clone())));
    }
    fields.push(Field::new("CrimePercentage", DataType::Float64, false));
    arrays.push(Arc::new(Float64Array::from(sample.crime_percentage.clone())));

    let schema = Arc::new(Schema::new(fields));
    let batch =
        RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut rng = SimpleRng::new(42);
    let sample = generate(&mut rng);

    let csv_path = out_dir.join("output.csv");
    let parquet_path = out_dir.join("output.parquet");
    write_csv(&sample, &csv_path)?;
    write_parquet(&sample, &parquet_path)?;

    println!(
        "Wrote {} years ({FIRST_YEAR}-{LAST_YEAR}) to {} and {}",
        sample.dates.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
