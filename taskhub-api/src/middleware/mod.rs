/// Request-level middleware
///
/// - `auth`: the bearer-token authentication gate

pub mod auth;
