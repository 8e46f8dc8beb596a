use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, AsArray, Float64Array, StringArray};
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use once_cell::sync::{Lazy, OnceCell};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::LoadError;
use super::model::{parse_datetime, parse_label, AirQualityDataset, Observation};
use crate::config;

/// Columns every tabular input must carry. JSON records may omit numeric keys.
const REQUIRED_COLUMNS: [&str; 12] = [
    "station",
    "datetime",
    "PM2.5",
    "SO2",
    "NO2",
    "CO",
    "O3",
    "DEWP",
    "TEMP",
    "PRES",
    "Season",
    "Air_Quality_Category",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the processed dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, comma-delimited (what the preprocessing writes)
/// * `.json`    – `[{ "station": "...", "datetime": "...", "PM2.5": 12.0, ... }, ...]`
/// * `.parquet` – same columns; numeric columns of any int/float type
pub fn load_file(path: &Path) -> Result<AirQualityDataset, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let observations = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    Ok(AirQualityDataset::new(path, observations))
}

/// A dataset loaded at most once, then shared read-only.
///
/// A failed load leaves the cache empty so the error is reported again on
/// the next call instead of being remembered.
pub struct DatasetCache {
    path: PathBuf,
    cell: OnceCell<Arc<AirQualityDataset>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DatasetCache {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    /// Return the cached dataset, reading the file on first use only.
    pub fn get(&self) -> Result<Arc<AirQualityDataset>, LoadError> {
        self.cell
            .get_or_try_init(|| {
                log::info!("Reading dataset from {}", self.path.display());
                let dataset = load_file(&self.path)?;
                log::info!(
                    "Loaded {} observations for stations {:?}",
                    dataset.len(),
                    dataset.stations()
                );
                Ok(Arc::new(dataset))
            })
            .cloned()
    }
}

static DATASET: Lazy<DatasetCache> = Lazy::new(|| DatasetCache::new(config::DATA_PATH));

/// The process-wide dataset at [`config::DATA_PATH`].
pub fn dataset() -> Result<Arc<AirQualityDataset>, LoadError> {
    DATASET.get()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<Observation>, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(LoadError::MissingColumn(missing.to_string()));
    }

    let mut observations = Vec::new();
    for result in reader.deserialize::<Observation>() {
        observations.push(result?);
    }
    Ok(observations)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records', date_format='iso')`).
fn load_json(path: &Path) -> Result<Vec<Observation>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let observations = serde_json::from_reader(BufReader::new(file))?;
    Ok(observations)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). `datetime` may be a string, date or
/// timestamp column.
fn load_parquet(path: &Path) -> Result<Vec<Observation>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut observations = Vec::new();
    for batch in reader {
        let batch = batch?;
        let offset = observations.len();
        observations.extend(batch_observations(&batch, offset)?);
    }
    Ok(observations)
}

fn batch_observations(batch: &RecordBatch, offset: usize) -> Result<Vec<Observation>, LoadError> {
    let station = text_column(batch, "station")?;
    let datetime = text_column(batch, "datetime")?;
    let season = text_column(batch, "Season")?;
    let category = text_column(batch, "Air_Quality_Category")?;

    let pm25 = float_column(batch, "PM2.5")?;
    let so2 = float_column(batch, "SO2")?;
    let no2 = float_column(batch, "NO2")?;
    let co = float_column(batch, "CO")?;
    let o3 = float_column(batch, "O3")?;
    let dewp = float_column(batch, "DEWP")?;
    let temp = float_column(batch, "TEMP")?;
    let pres = float_column(batch, "PRES")?;
    let aq_numeric = match batch.column_by_name("Air_Quality_Numeric") {
        Some(_) => Some(float_column(batch, "Air_Quality_Numeric")?),
        None => None,
    };

    let mut rows = Vec::with_capacity(batch.num_rows());
    for i in 0..batch.num_rows() {
        let row = offset + i;
        let raw_datetime = text_value(&datetime, i, row, "datetime")?;
        let datetime = parse_datetime(raw_datetime).ok_or_else(|| LoadError::Parse {
            row,
            message: format!("invalid datetime '{raw_datetime}'"),
        })?;

        rows.push(Observation {
            station: text_value(&station, i, row, "station")?.to_string(),
            datetime,
            pm25: float_value(&pm25, i),
            so2: float_value(&so2, i),
            no2: float_value(&no2, i),
            co: float_value(&co, i),
            o3: float_value(&o3, i),
            dewp: float_value(&dewp, i),
            temp: float_value(&temp, i),
            pres: float_value(&pres, i),
            season: label_value(&season, i),
            category: label_value(&category, i),
            aq_numeric: aq_numeric.as_ref().and_then(|col| float_value(col, i)),
        });
    }
    Ok(rows)
}

// -- Arrow helpers --

/// Cast any column to Utf8 so strings, dates and timestamps read the same way.
fn text_column(batch: &RecordBatch, name: &str) -> Result<StringArray, LoadError> {
    let col = batch
        .column_by_name(name)
        .ok_or_else(|| LoadError::MissingColumn(name.to_string()))?;
    let cast = arrow::compute::cast(col, &DataType::Utf8)?;
    Ok(cast.as_string::<i32>().clone())
}

/// Cast any numeric column to Float64.
fn float_column(batch: &RecordBatch, name: &str) -> Result<Float64Array, LoadError> {
    let col = batch
        .column_by_name(name)
        .ok_or_else(|| LoadError::MissingColumn(name.to_string()))?;
    let cast = arrow::compute::cast(col, &DataType::Float64)?;
    Ok(cast.as_primitive::<Float64Type>().clone())
}

fn text_value<'a>(
    col: &'a StringArray,
    i: usize,
    row: usize,
    name: &str,
) -> Result<&'a str, LoadError> {
    if col.is_null(i) {
        return Err(LoadError::Parse {
            row,
            message: format!("null value in '{name}'"),
        });
    }
    Ok(col.value(i))
}

/// Null and missing tokens give no label.
fn label_value(col: &StringArray, i: usize) -> Option<String> {
    if col.is_null(i) {
        None
    } else {
        parse_label(col.value(i))
    }
}

fn float_value(col: &Float64Array, i: usize) -> Option<f64> {
    if col.is_null(i) {
        None
    } else {
        Some(col.value(i)).filter(|v| !v.is_nan())
    }
}
