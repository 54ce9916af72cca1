/// Database utilities
///
/// - [`pool`]: PostgreSQL connection pool construction
/// - [`migrations`]: Embedded migration runner

pub mod migrations;
pub mod pool;
