/// Data layer: core types, parsing, indexing, and filtering.
///
/// Architecture:
/// ```text
///  <root>/<run>/journal.txt      <root>/<run>/Pump-*.txt
///        │                              │
///        ▼                              ▼
///   ┌──────────┐                  ┌──────────┐
///   │ journal  │ → RunMetadata    │  index   │ → pump → [MetricRef]
///   └──────────┘                  └──────────┘
///        │                              │
///        ▼                              ▼
///   ┌──────────┐                  ┌──────────┐   ┌──────┐
///   │  filter  │ criteria/select  │  loader  │ ← │ time │
///   └──────────┘                  └──────────┘   └──────┘
///                                       │
///                                       ▼
///                                  TimeSeries
/// ```

pub mod filter;
pub mod index;
pub mod journal;
pub mod loader;
pub mod model;
pub mod time;
