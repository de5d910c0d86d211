/// Data layer: tick model, grade tables, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  ticks.csv bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode CSV → TickLog (+ rejected rows)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterCriteria predicates → surviving ticks
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ pyramid   │  grades bands + distinct routes → Vec<PyramidRow>
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod grades;
pub mod loader;
pub mod model;
pub mod pyramid;
