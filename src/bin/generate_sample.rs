use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Seeded noise source for the synthetic floats (splitmix64 stream).
struct Noise(u64);

impl Noise {
    fn next_bits(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn uniform(&mut self) -> f64 {
        (self.next_bits() >> 11) as f64 * f64::EPSILON / 2.0
    }

    /// Normal sample via the polar method.
    fn normal(&mut self, mean: f64, sd: f64) -> f64 {
        loop {
            let u = 2.0 * self.uniform() - 1.0;
            let v = 2.0 * self.uniform() - 1.0;
            let r2 = u * u + v * v;
            if r2 > 0.0 && r2 < 1.0 {
                return mean + sd * u * (-2.0 * r2.ln() / r2).sqrt();
            }
        }
    }
}

/// One generated reading; `None` marks a missing sensor value.
struct Reading {
    file_number: i64,
    cycle_number: i64,
    latitude: f64,
    longitude: f64,
    pres: f64,
    temp: Option<f64>,
    psal: Option<f64>,
}

/// Arctic-style profile: cold fresh surface layer over warmer Atlantic water.
fn temperature_at(pres: f64, surface: f64) -> f64 {
    let atlantic = 1.5 * (-((pres - 300.0) / 200.0).powi(2)).exp();
    let deep = -0.7 + (surface + 0.7) * (-pres / 60.0).exp();
    deep + atlantic
}

fn salinity_at(pres: f64, surface: f64) -> f64 {
    34.92 - (34.92 - surface) * (-pres / 80.0).exp()
}

fn main() {
    let mut noise = Noise(42);

    let floats: [(i64, f64, f64); 5] = [
        (6901234, 72.0, 60.0),
        (6901235, 74.5, 68.0),
        (6901240, 70.2, 75.5),
        (6902011, 76.0, 82.0),
        (6902015, 68.5, 55.0),
    ];
    let levels: Vec<f64> = (0..40).map(|i| 5.0 + i as f64 * 25.0).collect();

    let mut readings = Vec::new();
    for (f, &(file_number, start_lat, start_lon)) in floats.iter().enumerate() {
        let n_cycles = 4 + f as i64;
        let (mut lat, mut lon) = (start_lat, start_lon);

        for cycle in 1..=n_cycles {
            lat += noise.normal(0.05, 0.15);
            lon += noise.normal(0.2, 0.4);
            let surface_temp = noise.normal(1.0, 1.5);
            let surface_psal = noise.normal(32.8, 0.4);

            for &pres in &levels {
                let temp = temperature_at(pres, surface_temp) + noise.normal(0.0, 0.02);
                let psal = salinity_at(pres, surface_psal) + noise.normal(0.0, 0.005);
                // Occasional sensor dropouts exercise the loader's drop rule.
                let drop = noise.uniform();
                readings.push(Reading {
                    file_number,
                    cycle_number: cycle,
                    latitude: lat,
                    longitude: lon,
                    pres,
                    temp: (drop > 0.01).then_some(temp),
                    psal: (drop < 0.99).then_some(psal),
                });
            }
        }
    }

    // ---- CSV ----
    let csv_path = "ArgoFloats_east.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    writer
        .write_record([
            "fileNumber",
            "cycle_number",
            "latitude",
            "longitude",
            "pres",
            "temp",
            "psal",
        ])
        .expect("Failed to write CSV header");
    let cell = |v: Option<f64>| v.map(|x| format!("{x:.4}")).unwrap_or_default();
    for r in &readings {
        writer
            .write_record([
                r.file_number.to_string(),
                r.cycle_number.to_string(),
                format!("{:.4}", r.latitude),
                format!("{:.4}", r.longitude),
                format!("{:.1}", r.pres),
                cell(r.temp),
                cell(r.psal),
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");

    // ---- Parquet ----
    let schema = Arc::new(Schema::new(vec![
        Field::new("fileNumber", DataType::Int64, false),
        Field::new("cycle_number", DataType::Int64, false),
        Field::new("latitude", DataType::Float64, false),
        Field::new("longitude", DataType::Float64, false),
        Field::new("pres", DataType::Float64, false),
        Field::new("temp", DataType::Float64, true),
        Field::new("psal", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(readings.iter().map(|r| r.file_number))),
            Arc::new(Int64Array::from_iter_values(readings.iter().map(|r| r.cycle_number))),
            Arc::new(Float64Array::from_iter_values(readings.iter().map(|r| r.latitude))),
            Arc::new(Float64Array::from_iter_values(readings.iter().map(|r| r.longitude))),
            Arc::new(Float64Array::from_iter_values(readings.iter().map(|r| r.pres))),
            Arc::new(Float64Array::from(readings.iter().map(|r| r.temp).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(readings.iter().map(|r| r.psal).collect::<Vec<_>>())),
        ],
    )
    .expect("Failed to create RecordBatch");

    let parquet_path = "ArgoFloats_east.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} readings from {} floats to {csv_path} and {parquet_path}",
        readings.len(),
        floats.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_seeded_and_in_range() {
        let mut a = Noise(42);
        let mut b = Noise(42);
        for _ in 0..1000 {
            let x = a.uniform();
            assert!((0.0..1.0).contains(&x));
            assert_eq!(x, b.uniform());
        }
    }

    #[test]
    fn normal_samples_centre_on_mean() {
        let mut noise = Noise(7);
        let n = 20_000;
        let mean = (0..n).map(|_| noise.normal(5.0, 0.5)).sum::<f64>() / n as f64;
        assert!((mean - 5.0).abs() < 0.02, "mean {mean}");
    }
}
