use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Per weather type: (temperature, humidity, wind, precipitation, pressure,
/// uv, visibility) as (mean, std dev) pairs, plus typical cloud cover.
struct Profile {
    weather: &'static str,
    temperature: (f64, f64),
    humidity: (f64, f64),
    wind: (f64, f64),
    precipitation: (f64, f64),
    pressure: (f64, f64),
    uv: (f64, f64),
    visibility: (f64, f64),
    cloud_cover: [&'static str; 2],
}

static PROFILES: [Profile; 4] = [
    Profile {
        weather: "Sunny",
        temperature: (32.0, 6.0),
        humidity: (50.0, 12.0),
        wind: (7.0, 3.0),
        precipitation: (20.0, 12.0),
        pressure: (1016.0, 6.0),
        uv: (8.0, 2.5),
        visibility: (7.5, 2.0),
        cloud_cover: ["clear", "partly cloudy"],
    },
    Profile {
        weather: "Rainy",
        temperature: (20.0, 6.0),
        humidity: (85.0, 8.0),
        wind: (14.0, 5.0),
        precipitation: (78.0, 12.0),
        pressure: (1004.0, 8.0),
        uv: (2.5, 1.5),
        visibility: (3.5, 1.5),
        cloud_cover: ["overcast", "partly cloudy"],
    },
    Profile {
        weather: "Cloudy",
        temperature: (22.0, 7.0),
        humidity: (68.0, 10.0),
        wind: (10.0, 4.0),
        precipitation: (45.0, 15.0),
        pressure: (1010.0, 6.0),
        uv: (3.5, 2.0),
        visibility: (5.5, 2.0),
        cloud_cover: ["overcast", "cloudy"],
    },
    Profile {
        weather: "Snowy",
        temperature: (-3.0, 5.0),
        humidity: (78.0, 9.0),
        wind: (12.0, 5.0),
        precipitation: (70.0, 15.0),
        pressure: (992.0, 10.0),
        uv: (1.5, 1.0),
        visibility: (2.5, 1.2),
        cloud_cover: ["overcast", "cloudy"],
    },
];

const LOCATIONS: [&str; 3] = ["coastal", "inland", "mountain"];
const SEASONS: [&str; 4] = ["Winter", "Spring", "Summer", "Autumn"];

const HEADERS: [&str; 11] = [
    "Temperature",
    "Humidity",
    "Wind Speed",
    "Precipitation (%)",
    "Cloud Cover",
    "Atmospheric Pressure",
    "UV Index",
    "Season",
    "Visibility (km)",
    "Location",
    "Weather Type",
];

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

    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, (mean, std_dev): (f64, f64)) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Row {
    temperature: f64,
    humidity: i64,
    wind: f64,
    precipitation: f64,
    cloud_cover: &'static str,
    pressure: f64,
    uv: i64,
    season: &'static str,
    visibility: f64,
    location: &'static str,
    weather: &'static str,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn generate(n: usize, rng: &mut SimpleRng) -> Vec<Row> {
    (0..n)
        .map(|_| {
            let p = &PROFILES[(rng.next_u64() % PROFILES.len() as u64) as usize];
            Row {
                temperature: round1(rng.gauss(p.temperature)),
                humidity: rng.gauss(p.humidity).clamp(0.0, 100.0).round() as i64,
                wind: round1(rng.gauss(p.wind).max(0.0)),
                precipitation: round1(rng.gauss(p.precipitation).clamp(0.0, 100.0)),
                cloud_cover: rng.pick(&p.cloud_cover),
                pressure: (rng.gauss(p.pressure) * 100.0).round() / 100.0,
                uv: rng.gauss(p.uv).clamp(0.0, 14.0).round() as i64,
                season: if p.weather == "Snowy" {
                    "Winter"
                } else {
                    rng.pick(&SEASONS)
                },
                visibility: round1(rng.gauss(p.visibility).max(0.0)),
                location: rng.pick(&LOCATIONS),
                weather: p.weather,
            }
        })
        .collect()
}

fn write_csv(rows: &[Row], path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADERS)?;
    for r in rows {
        writer.write_record([
            r.temperature.to_string(),
            r.humidity.to_string(),
            r.wind.to_string(),
            r.precipitation.to_string(),
            r.cloud_cover.to_string(),
            r.pressure.to_string(),
            r.uv.to_string(),
            r.season.to_string(),
            r.visibility.to_string(),
            r.location.to_string(),
            r.weather.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let f64_col = |get: fn(&Row) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(get).collect::<Vec<_>>()))
    };
    let i64_col = |get: fn(&Row) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(get).collect::<Vec<_>>()))
    };
    let str_col = |get: fn(&Row) -> &'static str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(get).collect::<Vec<_>>()))
    };

    let types = [
        DataType::Float64,
        DataType::Int64,
        DataType::Float64,
        DataType::Float64,
        DataType::Utf8,
        DataType::Float64,
        DataType::Int64,
        DataType::Utf8,
        DataType::Float64,
        DataType::Utf8,
        DataType::Utf8,
    ];
    let schema = Arc::new(Schema::new(
        HEADERS
            .iter()
            .zip(types)
            .map(|(name, dt)| Field::new(*name, dt, false))
            .collect::<Vec<_>>(),
    ));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            f64_col(|r| r.temperature),
            i64_col(|r| r.humidity),
            f64_col(|r| r.wind),
            f64_col(|r| r.precipitation),
            str_col(|r| r.cloud_cover),
            f64_col(|r| r.pressure),
            i64_col(|r| r.uv),
            str_col(|r| r.season),
            f64_col(|r| r.visibility),
            str_col(|r| r.location),
            str_col(|r| r.weather),
        ],
    )?;

    let file = std::fs::File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let n: usize = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 500,
    };
    let mut rng = SimpleRng::new(42);
    let rows = generate(n, &mut rng);

    let csv_path = "weather_classification_data.csv";
    let parquet_path = "weather_classification_data.parquet";
    write_csv(&rows, csv_path)?;
    write_parquet(&rows, parquet_path)?;

    println!("Wrote {n} weather records to {csv_path} and {parquet_path}");
    Ok(())
}
