use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// Observation – one row of the processed dataset
// ---------------------------------------------------------------------------

/// One station-timestamp reading.
///
/// Numeric columns are optional: an empty cell, JSON `null` or one of the
/// [`NA_TOKENS`] is a missing value and is skipped by every aggregation, the
/// way a data-frame skips NaN. `Season`, `Air_Quality_Category` and
/// `Air_Quality_Numeric` come pre-computed from the upstream preprocessing
/// and are never derived here; a missing season or category leaves the row
/// out of that grouping.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Observation {
    pub station: String,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub datetime: NaiveDateTime,

    #[serde(rename = "PM2.5", default, deserialize_with = "deserialize_number")]
    pub pm25: Option<f64>,
    #[serde(rename = "SO2", default, deserialize_with = "deserialize_number")]
    pub so2: Option<f64>,
    #[serde(rename = "NO2", default, deserialize_with = "deserialize_number")]
    pub no2: Option<f64>,
    #[serde(rename = "CO", default, deserialize_with = "deserialize_number")]
    pub co: Option<f64>,
    #[serde(rename = "O3", default, deserialize_with = "deserialize_number")]
    pub o3: Option<f64>,

    #[serde(rename = "DEWP", default, deserialize_with = "deserialize_number")]
    pub dewp: Option<f64>,
    #[serde(rename = "TEMP", default, deserialize_with = "deserialize_number")]
    pub temp: Option<f64>,
    #[serde(rename = "PRES", default, deserialize_with = "deserialize_number")]
    pub pres: Option<f64>,

    #[serde(rename = "Season", deserialize_with = "deserialize_label")]
    pub season: Option<String>,
    #[serde(rename = "Air_Quality_Category", deserialize_with = "deserialize_label")]
    pub category: Option<String>,
    #[serde(
        rename = "Air_Quality_Numeric",
        default,
        deserialize_with = "deserialize_number"
    )]
    pub aq_numeric: Option<f64>,
}

// -- Missing values --

/// Cell texts read as missing. Same list as pandas' default `na_values`.
pub const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(raw: &str) -> bool {
    NA_TOKENS.contains(&raw.trim())
}

/// Parse a numeric cell. Missing tokens and NaN give `Ok(None)`.
pub fn parse_number(raw: &str) -> Result<Option<f64>, String> {
    if is_missing(raw) {
        return Ok(None);
    }
    raw.trim()
        .parse::<f64>()
        .map(|v| Some(v).filter(|v| !v.is_nan()))
        .map_err(|_| format!("invalid number '{raw}'"))
}

/// A CSV field arrives as text or an inferred number, JSON as a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberCell {
    Number(f64),
    Text(String),
}

fn deserialize_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberCell>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberCell::Number(v)) => Ok(Some(v).filter(|v| !v.is_nan())),
        Some(NumberCell::Text(raw)) => parse_number(&raw).map_err(serde::de::Error::custom),
    }
}

/// `Season` / `Air_Quality_Category`: a missing token is no label at all.
pub fn parse_label(raw: &str) -> Option<String> {
    (!is_missing(raw)).then(|| raw.trim().to_string())
}

fn deserialize_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_label))
}

// -- Datetimes --

const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Layouts carrying a UTC offset, e.g. `2013-03-01 00:00:00+08:00`.
const OFFSET_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Parse the `datetime` column. Accepts the layouts pandas writes by default
/// plus a bare date (taken as midnight).
///
/// An offset-aware value keeps its wall-clock time and drops the offset, so
/// `2013-03-01 00:00:00+08:00` reads as midnight on 1 March.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .or_else(|| {
                    OFFSET_DATETIME_FORMATS
                        .iter()
                        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
                })
                .map(|dt| dt.naive_local())
        })
}

fn deserialize_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_datetime(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid datetime '{raw}'")))
}

// ---------------------------------------------------------------------------
// Variable – a numeric column selectable in the correlation chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    Pm25,
    So2,
    No2,
    Co,
    O3,
    Dewp,
    Temp,
    Pres,
}

impl Variable {
    /// Column header as it appears in the dataset.
    pub fn column(self) -> &'static str {
        match self {
            Variable::Pm25 => "PM2.5",
            Variable::So2 => "SO2",
            Variable::No2 => "NO2",
            Variable::Co => "CO",
            Variable::O3 => "O3",
            Variable::Dewp => "DEWP",
            Variable::Temp => "TEMP",
            Variable::Pres => "PRES",
        }
    }

    /// The value of this column for one observation; NaN counts as missing.
    pub fn value(self, obs: &Observation) -> Option<f64> {
        let v = match self {
            Variable::Pm25 => obs.pm25,
            Variable::So2 => obs.so2,
            Variable::No2 => obs.no2,
            Variable::Co => obs.co,
            Variable::O3 => obs.o3,
            Variable::Dewp => obs.dewp,
            Variable::Temp => obs.temp,
            Variable::Pres => obs.pres,
        };
        v.filter(|x| !x.is_nan())
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// AirQualityDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full record set. Immutable once loaded; shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AirQualityDataset {
    pub source: PathBuf,
    pub observations: Vec<Observation>,
}

impl AirQualityDataset {
    pub fn new(source: impl Into<PathBuf>, observations: Vec<Observation>) -> Self {
        AirQualityDataset {
            source: source.into(),
            observations,
        }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Distinct station names in order of first appearance.
    pub fn stations(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for obs in &self.observations {
            if !seen.contains(&obs.station.as_str()) {
                seen.push(&obs.station);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::obs;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_pandas_datetime_layouts() {
        let dt = parse_datetime("2014-07-01 13:00:00").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.hour()), (2014, 7, 13));

        let iso = parse_datetime("2015-01-02T03:04:05.250").unwrap();
        assert_eq!((iso.year(), iso.day(), iso.second()), (2015, 2, 5));

        let short = parse_datetime("2016-12-31 23:30").unwrap();
        assert_eq!(short.minute(), 30);

        let date_only = parse_datetime(" 2013-03-01 ").unwrap();
        assert_eq!((date_only.year(), date_only.hour()), (2013, 0));
    }

    #[test]
    fn offset_datetime_keeps_wall_clock_time() {
        let expected = parse_datetime("2013-03-01 00:00:00").unwrap();
        assert_eq!(parse_datetime("2013-03-01 00:00:00+08:00"), Some(expected));
        assert_eq!(parse_datetime("2013-03-01T00:00:00+08:00"), Some(expected));
        assert_eq!(parse_datetime("2013-03-01T00:00:00.000+0800"), Some(expected));
        assert_eq!(parse_datetime("2013-03-01T00:00:00Z"), Some(expected));
        assert!(parse_datetime("2013-03-01 00:00:00+08:00 CST").is_none());
    }

    #[test]
    fn missing_tokens_parse_as_no_number() {
        for token in ["", " ", "NA", "N/A", "n/a", "null", "NULL", "NaN", "nan", "-nan", "<NA>", "None"] {
            assert_eq!(parse_number(token), Ok(None), "token {token:?}");
        }
        assert_eq!(parse_number(" 12.5 "), Ok(Some(12.5)));
        assert_eq!(parse_number("-3"), Ok(Some(-3.0)));
        assert!(parse_number("abc").is_err());
    }

    #[test]
    fn missing_tokens_parse_as_no_label() {
        assert_eq!(parse_label("Spring"), Some("Spring".to_string()));
        assert_eq!(parse_label(""), None);
        assert_eq!(parse_label("NA"), None);
    }

    #[test]
    fn rejects_unparseable_datetime() {
        assert!(parse_datetime("01/03/2013").is_none());
        assert!(parse_datetime("").is_none());
    }

    #[test]
    fn variable_value_treats_nan_as_missing() {
        let mut o = obs("Tiantan", "2013-05-01", "Spring", Some(12.0), "Good");
        o.so2 = Some(f64::NAN);
        o.dewp = Some(-3.5);

        assert_eq!(Variable::Pm25.value(&o), Some(12.0));
        assert_eq!(Variable::Dewp.value(&o), Some(-3.5));
        assert_eq!(Variable::So2.value(&o), None);
        assert_eq!(Variable::O3.value(&o), None);
    }

    #[test]
    fn variable_displays_column_header() {
        assert_eq!(Variable::Pm25.to_string(), "PM2.5");
        assert_eq!(Variable::Dewp.to_string(), "DEWP");
    }

    #[test]
    fn stations_in_first_appearance_order() {
        let ds = AirQualityDataset::new(
            "mem",
            vec![
                obs("Tiantan", "2013-05-01", "Spring", Some(1.0), "Good"),
                obs("Guanyuan", "2013-05-01", "Spring", Some(1.0), "Good"),
                obs("Tiantan", "2013-05-02", "Spring", Some(1.0), "Good"),
            ],
        );
        assert_eq!(ds.stations(), vec!["Tiantan", "Guanyuan"]);
        assert_eq!(ds.len(), 3);
    }
}
