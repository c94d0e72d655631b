/// Data layer: core types, loading, caching, and the reduction pipeline.
///
/// Architecture:
/// ```text
///  .csv / .parquet
///        │
///        ▼
///   ┌──────────┐      ┌───────┐
///   │  loader   │ ◄── │ cache │  path + mtime → Arc<TelemetryTable>
///   └──────────┘      └───────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ TelemetryTable │  immutable Vec<TestRecord>, Time ascending
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  [start, end] → TelemetryView (row indices)
///   └──────────┘
///        │
///        ├──► stats        max / average over every row in range
///        ▼
///   ┌────────────┐
///   │ downsample │  ≤ max_points rows, endpoints kept → plot series
///   └────────────┘
/// ```

pub mod cache;
pub mod downsample;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
