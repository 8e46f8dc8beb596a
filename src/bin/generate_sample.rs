//! Writes a synthetic `processed_air_quality_dataset.csv` so the dashboard
//! can run without the real preprocessed data.
//!
//! The category columns imitate what the upstream preprocessing produces; the
//! dashboard only reads them.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

const OUTPUT_PATH: &str = "processed_air_quality_dataset.csv";

/// (station, PM2.5 level multiplier, dew point offset)
const STATIONS: [(&str, f64, f64); 3] = [
    ("Guanyuan", 1.05, 0.0),
    ("Tiantan", 1.0, 0.5),
    ("Dingling", 0.8, -1.0),
];

/// Upper PM2.5 bound (µg/m³) of each band, with its label.
const BANDS: [(f64, &str); 6] = [
    (35.0, "Good"),
    (75.0, "Moderate"),
    (115.0, "Unhealthy for Sensitive Groups"),
    (150.0, "Unhealthy"),
    (250.0, "Very Unhealthy"),
    (f64::INFINITY, "Hazardous"),
];

#[derive(Serialize)]
struct Row {
    station: &'static str,
    datetime: String,
    #[serde(rename = "PM2.5")]
    pm25: f64,
    #[serde(rename = "SO2")]
    so2: f64,
    #[serde(rename = "NO2")]
    no2: f64,
    #[serde(rename = "CO")]
    co: f64,
    #[serde(rename = "O3")]
    o3: f64,
    #[serde(rename = "DEWP")]
    dewp: f64,
    #[serde(rename = "TEMP")]
    temp: f64,
    #[serde(rename = "PRES")]
    pres: f64,
    #[serde(rename = "Season")]
    season: &'static str,
    #[serde(rename = "Air_Quality_Category")]
    category: &'static str,
    #[serde(rename = "Air_Quality_Numeric")]
    numeric: u8,
}

/// Box-Muller transform for a normal sample.
fn gauss(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen_range(1e-15..1.0);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

fn season(month: u32) -> &'static str {
    match month {
        3..=5 => "Spring",
        6..=8 => "Summer",
        9..=11 => "Autumn",
        _ => "Winter",
    }
}

fn band(pm25: f64) -> (&'static str, u8) {
    let idx = BANDS
        .iter()
        .position(|(upper, _)| pm25 <= *upper)
        .unwrap_or(BANDS.len() - 1);
    (BANDS[idx].1, idx as u8 + 1)
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn main() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    let start = NaiveDate::from_ymd_opt(2013, 3, 1).context("start date")?;
    let end = NaiveDate::from_ymd_opt(2017, 2, 28).context("end date")?;

    let mut writer = csv::Writer::from_path(OUTPUT_PATH)
        .with_context(|| format!("creating {OUTPUT_PATH}"))?;
    let mut rows = 0usize;

    for (station, level, dewp_offset) in STATIONS {
        for date in start.iter_days().take_while(|d| *d <= end) {
            let day_of_year = date.ordinal() as f64;
            // Annual cycle: coldest around mid-January, warmest mid-July.
            let phase = ((day_of_year - 15.0) / 365.25 * std::f64::consts::TAU).cos();
            // Slow improvement over the years.
            let yearly = 1.0 - 0.05 * (date.year() - 2013) as f64;

            let temp = 13.0 - 15.0 * phase + gauss(&mut rng, 0.0, 3.0);
            let dewp = 2.0 - 15.0 * phase + dewp_offset + gauss(&mut rng, 0.0, 4.0);
            let pres = 1012.0 + 12.0 * phase + gauss(&mut rng, 0.0, 3.0);
            let pm25 = ((70.0 + 35.0 * phase) * level * yearly + gauss(&mut rng, 0.0, 35.0)).max(3.0);
            let so2 = (8.0 + 12.0 * phase + gauss(&mut rng, 0.0, 4.0)).max(1.0);
            let no2 = (40.0 + 0.3 * pm25 + gauss(&mut rng, 0.0, 8.0)).max(2.0);
            let co = (600.0 + 9.0 * pm25 + gauss(&mut rng, 0.0, 150.0)).max(100.0);
            let o3 = (60.0 - 40.0 * phase + gauss(&mut rng, 0.0, 15.0)).max(1.0);

            let (category, numeric) = band(pm25);
            writer.serialize(Row {
                station,
                datetime: date.format("%Y-%m-%d 00:00:00").to_string(),
                pm25: round1(pm25),
                so2: round1(so2),
                no2: round1(no2),
                co: round1(co),
                o3: round1(o3),
                dewp: round1(dewp),
                temp: round1(temp),
                pres: round1(pres),
                season: season(date.month()),
                category,
                numeric,
            })?;
            rows += 1;
        }
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {rows} observations for {} stations to {OUTPUT_PATH}", STATIONS.len());
    Ok(())
}
