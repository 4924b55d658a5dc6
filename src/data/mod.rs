/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SubmissionSet
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ SubmissionSet  │  Vec<Submission>, subcommittee index
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  stage predicates → active + derived subsets
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
