/// Data layer: loading, filtering, and descriptive statistics.
///
/// Architecture:
/// ```text
///  .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (column registry, category index)
///   └──────────┘
///        │            cache: load once, share via Arc
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → View (+ degradations)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  means, describe, counts, correlation, chart data
///   └───────────┘
///        │
///        ├──▶ insights   plain-language findings
///        └──▶ export     View → CSV
/// ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod export;
pub mod filter;
pub mod insights;
pub mod loader;
pub mod model;
