/// Data layer: table model, loading, and statistics.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table, check required columns
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  named columns of cells, read-only
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  CPI correlation vector
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod stats;
