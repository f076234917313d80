/// Data layer: core types, loading, and the report pipeline.
///
/// Architecture:
/// ```text
///  data.CSV  (cp949 / utf-8 / euc-kr)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode + parse → Table   (cached by path + mtime)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ pipeline  │  derive unit price → summarize / rank / lookup
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  profile  │  numeric columns, histograms (column explorer)
///   └──────────┘
/// ```

pub mod cache;
pub mod error;
pub mod format;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod profile;
pub mod schema;
