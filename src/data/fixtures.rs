//! In-memory observations shared by the unit tests.

use super::filter;
use super::model::{parse_datetime, parse_label, AirQualityDataset, Observation};

/// An observation with the given key fields; every other numeric column is
/// missing until the test sets it. An empty `season` or `category` is missing.
pub fn obs(
    station: &str,
    datetime: &str,
    season: &str,
    pm25: Option<f64>,
    category: &str,
) -> Observation {
    Observation {
        station: station.to_string(),
        datetime: parse_datetime(datetime).expect("fixture datetime"),
        pm25,
        so2: None,
        no2: None,
        co: None,
        o3: None,
        dewp: None,
        temp: None,
        pres: None,
        season: parse_label(season),
        category: parse_label(category),
        aq_numeric: None,
    }
}

/// A fully populated observation for correlation/trend tests.
pub fn full_obs(station: &str, datetime: &str, season: &str, values: [f64; 9]) -> Observation {
    let [pm25, so2, no2, co, o3, dewp, temp, pres, aq_numeric] = values;
    Observation {
        pm25: Some(pm25),
        so2: Some(so2),
        no2: Some(no2),
        co: Some(co),
        o3: Some(o3),
        dewp: Some(dewp),
        temp: Some(temp),
        pres: Some(pres),
        aq_numeric: Some(aq_numeric),
        ..obs(station, datetime, season, None, "Moderate")
    }
}

/// Three stations across two years and three seasons, plus one row from an
/// unrecognized station.
pub fn mixed_dataset() -> AirQualityDataset {
    let rows = vec![
        full_obs("Guanyuan", "2013-04-01 00:00:00", "Spring", [10.0, 5.0, 30.0, 800.0, 60.0, -2.0, 14.0, 1012.0, 1.0]),
        full_obs("Guanyuan", "2013-07-01 00:00:00", "Summer", [40.0, 3.0, 25.0, 700.0, 120.0, 18.0, 29.0, 1001.0, 2.0]),
        full_obs("Tiantan", "2013-07-02 00:00:00", "Summer", [55.0, 4.0, 35.0, 900.0, 110.0, 20.0, 30.0, 1000.0, 2.0]),
        full_obs("Guanyuan", "2014-01-10 00:00:00", "Winter", [150.0, 40.0, 70.0, 2500.0, 10.0, -15.0, -3.0, 1030.0, 4.0]),
        full_obs("Dingling", "2014-01-11 00:00:00", "Winter", [90.0, 20.0, 40.0, 1500.0, 20.0, -14.0, -5.0, 1028.0, 3.0]),
        full_obs("Guanyuan", "2014-04-02 00:00:00", "Spring", [20.0, 6.0, 28.0, 850.0, 70.0, 0.0, 16.0, 1011.0, 1.0]),
        full_obs("Dingling", "2014-07-03 00:00:00", "Summer", [35.0, 2.0, 15.0, 600.0, 140.0, 19.0, 31.0, 999.0, 1.0]),
        full_obs("Wanliu", "2014-07-03 00:00:00", "Summer", [60.0, 2.0, 15.0, 600.0, 140.0, 19.0, 31.0, 999.0, 2.0]),
    ];
    AirQualityDataset::new("fixture", rows)
}

/// Rows of `dataset` at `station`.
pub fn station_rows<'a>(dataset: &'a AirQualityDataset, station: &str) -> Vec<&'a Observation> {
    filter::rows(dataset, &filter::station_indices(dataset, station))
}
