/// Data layer: core types, loading, dropdown options and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → LaunchTable
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ LaunchTable  │  Vec<LaunchRecord>, site index, payload bounds
///   └─────────────┘
///        │
///        ├──────────────────┐
///        ▼                  ▼
///   ┌──────────┐     ┌────────────┐
///   │ options   │     │ aggregate   │  success_summary / payload_correlation
///   └──────────┘     └────────────┘
/// ```

pub mod aggregate;
pub mod loader;
pub mod model;
pub mod options;
