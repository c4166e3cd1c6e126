/// Data layer: core types, loading, derived quantities, selection and series.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, drop incomplete rows → Vec<RawRow>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ derived   │  density anomaly, speed of sound → MeasurementRow
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  rows, float ids, latest-cycle index (latest)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Selection → visible row indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  series   │  indices → map / profile series for the plots
///   └──────────┘
/// ```

pub mod derived;
pub mod filter;
pub mod latest;
pub mod loader;
pub mod model;
pub mod series;
