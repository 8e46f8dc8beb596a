/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → AirQualityDataset (memoized once per process)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  station == selection → filtered rows
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  seasonal / yearly means, category counts, linear fit
///   └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

#[cfg(test)]
pub mod fixtures;
